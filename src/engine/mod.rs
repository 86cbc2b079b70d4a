//! Local PostgreSQL lifecycle.
//!
//! The cluster moves through `not installed → installed → initialized →
//! running`. Variants differ only in how binaries are acquired and found:
//! `BundledEngine` downloads a portable archive, `SystemEngine` uses the
//! distribution package manager. Everything past installation is shared and
//! lives in the provided methods of `Engine`.

pub mod bundled;
pub mod download;
pub mod layout;
pub mod process;
pub mod system;

pub use bundled::BundledEngine;
pub use layout::Layout;
pub use process::{Invocation, Runner, SystemRunner};
pub use system::SystemEngine;

use std::path::PathBuf;

use postgres::{Client, NoTls};

use crate::error::SeedError;
use crate::ui::Ui;

pub const HOST: &str = "localhost";
pub const PORT: u16 = 5432;
pub const USER: &str = "postgres";
pub const DATABASE: &str = "postgres";

/// Platform file name of a server tool (`pg_ctl` → `pg_ctl.exe` on Windows)
pub fn executable(name: &str) -> String {
    format!("{}{}", name, std::env::consts::EXE_SUFFIX)
}

pub trait Engine {
    fn layout(&self) -> &Layout;

    fn runner(&self) -> &dyn Runner;

    /// Directory holding the server tools, or `None` to resolve them on PATH
    fn bin_dir(&self) -> Option<PathBuf>;

    fn is_installed(&self) -> bool;

    /// Acquire the server binaries when they are not present yet
    fn install(&self, ui: &mut dyn Ui) -> Result<(), SeedError>;

    fn tool(&self, name: &str) -> Invocation {
        match self.bin_dir() {
            Some(dir) => Invocation::new(dir.join(executable(name))),
            None => Invocation::new(name),
        }
    }

    fn is_initialized(&self) -> bool {
        self.layout().is_initialized()
    }

    /// Run `initdb` once. An existing version marker makes this a no-op.
    fn initialize(&self, ui: &mut dyn Ui) -> Result<(), SeedError> {
        let data = self.layout().data_dir();
        if self.is_initialized() {
            ui.log(&format!("Database already initialized at {}", data.display()));
            return Ok(());
        }

        self.layout().create_data_dir()?;
        ui.log("Initializing new PostgreSQL database cluster...");
        self.runner().run(
            &self
                .tool("initdb")
                .arg("-D")
                .arg(&data)
                .arg(format!("--username={}", USER))
                .arg("--encoding=UTF8")
                .arg("--no-locale"),
        )?;
        ui.log(&format!("Database initialized at {}", data.display()));
        Ok(())
    }

    /// `pg_ctl status` exits 0 only while a server runs on the data directory
    fn is_running(&self) -> bool {
        self.runner().probe(
            &self
                .tool("pg_ctl")
                .arg("-D")
                .arg(self.layout().data_dir())
                .arg("status"),
        )
    }

    /// Start the server and wait until it accepts connections
    fn start(&self, ui: &mut dyn Ui) -> Result<(), SeedError> {
        ui.log("Starting PostgreSQL server...");
        self.runner().run(
            &self
                .tool("pg_ctl")
                .arg("-D")
                .arg(self.layout().data_dir())
                .arg("-l")
                .arg(self.layout().server_log())
                .arg("-w")
                .arg("start"),
        )?;
        ui.log("PostgreSQL server started.");
        Ok(())
    }

    /// Immediate shutdown: no checkpoint, recovery runs on next start
    fn stop(&self, ui: &mut dyn Ui) -> Result<(), SeedError> {
        ui.log("Stopping PostgreSQL server...");
        self.runner().run(
            &self
                .tool("pg_ctl")
                .arg("-D")
                .arg(self.layout().data_dir())
                .arg("stop")
                .arg("-m")
                .arg("immediate"),
        )?;
        ui.log("PostgreSQL server stopped.");
        Ok(())
    }

    /// Stop if possible, then delete the data and binary directories
    fn uninstall(&self, ui: &mut dyn Ui) -> Result<(), SeedError> {
        if let Err(err) = self.stop(ui) {
            log::warn!("stop during uninstall failed: {}", err);
            ui.warn("Could not stop server (it may not be running).");
        }

        for dir in self.layout().remove_all()? {
            ui.log(&format!("Removed {}", dir.display()));
        }
        Ok(())
    }

    fn connect(&self) -> Result<Client, SeedError> {
        connect()
    }
}

/// Connection to the local cluster: fixed address and superuser, no password, no TLS
pub fn connect() -> Result<Client, SeedError> {
    log::debug!("connecting to {}@{}:{}/{}", USER, HOST, PORT, DATABASE);
    postgres::Config::new()
        .host(HOST)
        .port(PORT)
        .user(USER)
        .dbname(DATABASE)
        .connect(NoTls)
        .map_err(SeedError::Connect)
}
