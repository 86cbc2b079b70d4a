//! Fetch → map → insert pipeline.
//!
//! All schema statements run before any data statement. Tables load in the
//! order given (dependency order from the registry), every resource is fetched
//! once per table, and the whole load ends with a single commit. Any error
//! aborts before the commit, so a failed load leaves no rows behind.

use crate::error::SeedError;
use crate::fetch::Fetch;
use crate::schema::TableSchema;
use crate::ui::{Phase, Ui};
use crate::writer::Sink;

/// Resources between two progress reports
pub const PROGRESS_INTERVAL: usize = 50;

/// Load every selected table. Returns the number of rows inserted.
pub fn seed(
    fetch: &impl Fetch,
    sink: &mut impl Sink,
    tables: &[&TableSchema],
    ui: &mut dyn Ui,
) -> Result<u64, SeedError> {
    ui.set_phase(Phase::Seeding);
    ui.log("Creating tables if they do not exist...");
    for table in tables {
        sink.create_table(table)?;
    }

    let mut total: u64 = 0;
    for table in tables {
        total += load_table(fetch, sink, table, ui)?;
    }

    sink.commit()?;
    ui.log("Database commit complete.");
    Ok(total)
}

/// Seed the selected tables that hold no rows yet. Populated tables are left
/// alone, so a later `--include` only loads what is missing. Returns `None`
/// when every selected table was already populated.
pub fn seed_if_empty(
    fetch: &impl Fetch,
    sink: &mut impl Sink,
    tables: &[&TableSchema],
    ui: &mut dyn Ui,
) -> Result<Option<u64>, SeedError> {
    let mut pending = Vec::with_capacity(tables.len());
    for &table in tables {
        if sink.has_rows(table.name)? {
            log::info!("table {} already populated", table.name);
            ui.log(&format!("Table {} already has data, skipping.", table.name));
        } else {
            pending.push(table);
        }
    }

    if pending.is_empty() {
        return Ok(None);
    }
    seed(fetch, sink, &pending, ui).map(Some)
}

fn load_table(
    fetch: &impl Fetch,
    sink: &mut impl Sink,
    table: &TableSchema,
    ui: &mut dyn Ui,
) -> Result<u64, SeedError> {
    ui.log(&format!("Fetching {} list...", table.resource));

    let refs = fetch.list(table.resource)?;
    let count = refs.len() as u64;
    log::debug!("{}: {} resources listed", table.name, count);
    ui.progress(table.name, 0, count);

    let mut rows: u64 = 0;
    for (i, resource) in refs.iter().enumerate() {
        let payload = fetch.detail(&resource.url)?;
        for statement in (table.records)(&payload)? {
            sink.insert(&statement)?;
            rows += 1;
        }

        let done = i + 1;
        if done % PROGRESS_INTERVAL == 0 {
            ui.progress(table.name, done as u64, count);
            ui.log(&format!("Inserted {} {} records...", done, table.name));
        }
    }

    ui.progress(table.name, count, count);
    ui.log(&format!(
        "{}: {} rows from {} resources",
        table.name, rows, count
    ));
    Ok(rows)
}
