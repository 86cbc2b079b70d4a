use std::fs;
use std::path::{Path, PathBuf};

use super::{Engine, Invocation, Layout, Runner, SystemRunner};
use crate::error::SeedError;
use crate::ui::{Phase, Ui};

/// Debian/Ubuntu keep server tools off PATH, one directory per major version
pub const PACKAGE_ROOT: &str = "/usr/lib/postgresql";

/// PostgreSQL from the distribution package manager (Linux)
pub struct SystemEngine {
    layout: Layout,
    runner: Box<dyn Runner>,
    package_root: PathBuf,
}

impl SystemEngine {
    pub fn new(layout: Layout) -> Self {
        Self::with_runner(layout, Box::new(SystemRunner), PACKAGE_ROOT)
    }

    pub fn with_runner(
        layout: Layout,
        runner: Box<dyn Runner>,
        package_root: impl Into<PathBuf>,
    ) -> Self {
        Self {
            layout,
            runner,
            package_root: package_root.into(),
        }
    }
}

impl Engine for SystemEngine {
    fn layout(&self) -> &Layout {
        &self.layout
    }

    fn runner(&self) -> &dyn Runner {
        self.runner.as_ref()
    }

    fn bin_dir(&self) -> Option<PathBuf> {
        if self.runner.probe(&Invocation::new("pg_ctl").arg("--version")) {
            return None;
        }
        newest_version_bin(&self.package_root)
    }

    fn is_installed(&self) -> bool {
        self.runner.probe(&Invocation::new("psql").arg("--version"))
    }

    fn install(&self, ui: &mut dyn Ui) -> Result<(), SeedError> {
        if self.is_installed() {
            ui.log("PostgreSQL is already installed.");
            return Ok(());
        }

        ui.set_phase(Phase::Installing);
        ui.log("PostgreSQL is not installed. Installing with apt-get...");
        self.runner.run(
            &Invocation::new("sudo")
                .arg("apt-get")
                .arg("install")
                .arg("-y")
                .arg("postgresql")
                .arg("postgresql-contrib"),
        )?;
        ui.log("PostgreSQL installation complete.");
        Ok(())
    }
}

/// `<root>/<version>/bin` for the highest version directory that has one
fn newest_version_bin(root: &Path) -> Option<PathBuf> {
    let entries = fs::read_dir(root).ok()?;
    entries
        .filter_map(|entry| entry.ok())
        .filter_map(|entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            let version = parse_version(&name)?;
            let bin = entry.path().join("bin");
            bin.is_dir().then_some((version, bin))
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, bin)| bin)
}

fn parse_version(name: &str) -> Option<Vec<u32>> {
    name.split('.').map(|part| part.parse().ok()).collect()
}
