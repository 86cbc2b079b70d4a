//! Mode dispatch over an injected lifecycle engine

use clap::ValueEnum;
use std::fmt;

use crate::engine::Engine;
use crate::error::SeedError;
use crate::fetch::Fetch;
use crate::loader;
use crate::schema::TableSchema;
use crate::ui::{Phase, Ui};
use crate::writer::PgWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Mode {
    /// Install, initialize and start PostgreSQL, then seed if empty
    #[default]
    Default,
    /// Stop the running server
    Stop,
    /// Stop the server and delete the data and binary directories
    Uninstall,
    /// Uninstall, then run the default flow
    Reinstall,
}

/// What a run ended with, for the closing summary
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Seeded(u64),
    AlreadySeeded,
    Stopped,
    Uninstalled,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Seeded(rows) => write!(f, "Seeded {} rows", rows),
            Outcome::AlreadySeeded => write!(f, "Database already seeded"),
            Outcome::Stopped => write!(f, "Server stopped"),
            Outcome::Uninstalled => write!(f, "PostgreSQL data and binaries removed"),
        }
    }
}

/// The seed-if-empty step of the default flow
pub trait Seed {
    /// Rows inserted, or `None` when every selected table already holds data
    fn seed_if_empty(&self, engine: &dyn Engine, ui: &mut dyn Ui) -> Result<Option<u64>, SeedError>;
}

/// Seeds the engine's database from a source API
pub struct ApiSeed<F: Fetch> {
    pub fetch: F,
    pub tables: Vec<&'static TableSchema>,
}

impl<F: Fetch> Seed for ApiSeed<F> {
    fn seed_if_empty(&self, engine: &dyn Engine, ui: &mut dyn Ui) -> Result<Option<u64>, SeedError> {
        let mut writer = PgWriter::new(engine.connect()?);
        loader::seed_if_empty(&self.fetch, &mut writer, &self.tables, ui)
    }
}

pub fn execute(
    mode: Mode,
    engine: &dyn Engine,
    seed: &dyn Seed,
    ui: &mut dyn Ui,
) -> Result<Outcome, SeedError> {
    log::debug!("running mode {:?}", mode);
    match mode {
        Mode::Default => provision_and_seed(engine, seed, ui),
        Mode::Stop => {
            ui.set_phase(Phase::Stopping);
            engine.stop(ui)?;
            Ok(Outcome::Stopped)
        }
        Mode::Uninstall => {
            ui.set_phase(Phase::Uninstalling);
            engine.uninstall(ui)?;
            Ok(Outcome::Uninstalled)
        }
        Mode::Reinstall => {
            ui.set_phase(Phase::Uninstalling);
            engine.uninstall(ui)?;
            provision_and_seed(engine, seed, ui)
        }
    }
}

fn provision_and_seed(
    engine: &dyn Engine,
    seed: &dyn Seed,
    ui: &mut dyn Ui,
) -> Result<Outcome, SeedError> {
    ui.set_phase(Phase::Checking);
    engine.install(ui)?;

    if !engine.is_initialized() {
        ui.set_phase(Phase::Initializing);
        engine.initialize(ui)?;
    }

    if engine.is_running() {
        ui.log("PostgreSQL server is already running.");
    } else {
        ui.set_phase(Phase::Starting);
        engine.start(ui)?;
    }

    Ok(match seed.seed_if_empty(engine, ui)? {
        Some(rows) => Outcome::Seeded(rows),
        None => Outcome::AlreadySeeded,
    })
}
