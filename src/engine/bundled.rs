use std::fs;
use std::path::PathBuf;

use super::download::{download, extract_zip, prune};
use super::{executable, Engine, Invocation, Layout, Runner, SystemRunner};
use crate::error::SeedError;
use crate::ui::{Phase, Ui};

pub const POSTGRESQL_VERSION: &str = "16.2-1";

/// Folders of the binary distribution the server never needs
const UNNEEDED_DIRS: &[&str] = &[
    "pgAdmin 4",
    "StackBuilder",
    "symbols",
    "doc",
    "include",
    "pgAdmin4",
    "pgadmin4",
    "pgadmin",
    "pgadmin 4",
];

pub fn archive_url(version: &str) -> String {
    format!(
        "https://get.enterprisedb.com/postgresql/postgresql-{}-windows-x64-binaries.zip",
        version
    )
}

/// Portable binaries downloaded next to the data directory (Windows)
pub struct BundledEngine {
    layout: Layout,
    runner: Box<dyn Runner>,
    url: String,
}

impl BundledEngine {
    pub fn new(layout: Layout) -> Self {
        Self::with_runner(layout, Box::new(SystemRunner))
    }

    pub fn with_runner(layout: Layout, runner: Box<dyn Runner>) -> Self {
        Self {
            layout,
            runner,
            url: archive_url(POSTGRESQL_VERSION),
        }
    }

    fn bundled_pg_ctl(&self) -> PathBuf {
        self.layout.bundled_bin_dir().join(executable("pg_ctl"))
    }
}

impl Engine for BundledEngine {
    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn runner(&self) -> &dyn Runner {
        self.runner.as_ref()
    }

    /// Bundled tools win over whatever is on PATH
    fn bin_dir(&self) -> Option<PathBuf> {
        if self.bundled_pg_ctl().is_file() {
            Some(self.layout.bundled_bin_dir())
        } else {
            None
        }
    }

    fn is_installed(&self) -> bool {
        self.bundled_pg_ctl().is_file()
            || self.runner.probe(&Invocation::new("psql").arg("--version"))
    }

    fn install(&self, ui: &mut dyn Ui) -> Result<(), SeedError> {
        if self.is_installed() {
            ui.log("PostgreSQL is already installed.");
            return Ok(());
        }

        ui.set_phase(Phase::Installing);
        let archive = self.layout.archive_path();
        let install_dir = self.layout.install_dir();

        ui.log(&format!("Downloading PostgreSQL {}...", POSTGRESQL_VERSION));
        download(&self.url, &archive, ui)?;

        ui.log("Unpacking...");
        let files = extract_zip(&archive, &install_dir, ui)?;
        fs::remove_file(&archive).map_err(|e| SeedError::io(&archive, e))?;
        ui.log(&format!(
            "Unpacked {} files into {}",
            files,
            install_dir.display()
        ));

        let removed = prune(&[install_dir.clone(), install_dir.join("pgsql")], UNNEEDED_DIRS)?;
        for dir in removed {
            ui.log(&format!("Removed unneeded folder {}", dir.display()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::process::testing::RecordingRunner;

    #[test]
    fn test_archive_url() {
        assert_eq!(
            archive_url(POSTGRESQL_VERSION),
            "https://get.enterprisedb.com/postgresql/postgresql-16.2-1-windows-x64-binaries.zip"
        );
    }

    #[test]
    fn test_installed_when_bundled_tools_present() {
        let temp = tempfile::tempdir().unwrap();
        let layout = Layout::new(temp.path());
        let engine =
            BundledEngine::with_runner(layout.clone(), Box::new(RecordingRunner::failing(&["psql"])));
        assert!(!engine.is_installed());
        assert_eq!(engine.bin_dir(), None);

        fs::create_dir_all(layout.bundled_bin_dir()).unwrap();
        fs::write(layout.bundled_bin_dir().join(executable("pg_ctl")), "").unwrap();

        assert!(engine.is_installed());
        assert_eq!(engine.bin_dir(), Some(layout.bundled_bin_dir()));
    }

    #[test]
    fn test_installed_when_psql_on_path() {
        let temp = tempfile::tempdir().unwrap();
        let engine =
            BundledEngine::with_runner(Layout::new(temp.path()), Box::new(RecordingRunner::default()));
        assert!(engine.is_installed());
    }
}
