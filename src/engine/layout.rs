use std::fs;
use std::path::PathBuf;

use crate::error::SeedError;

const DATA_DIR: &str = "Database";
const INSTALL_DIR: &str = "postgresql";
const ARCHIVE: &str = "postgresql.zip";
const VERSION_MARKER: &str = "PG_VERSION";
const SERVER_LOG: &str = "logfile.txt";

/// On-disk locations of the cluster, all relative to one root directory
#[derive(Debug, Clone)]
pub struct Layout {
    root: PathBuf,
}

impl Layout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Cluster data directory (`initdb -D`)
    pub fn data_dir(&self) -> PathBuf {
        self.root.join(DATA_DIR)
    }

    /// Where downloaded binaries are unpacked
    pub fn install_dir(&self) -> PathBuf {
        self.root.join(INSTALL_DIR)
    }

    /// `bin/` inside the unpacked archive
    pub fn bundled_bin_dir(&self) -> PathBuf {
        self.install_dir().join("pgsql").join("bin")
    }

    pub fn archive_path(&self) -> PathBuf {
        self.root.join(ARCHIVE)
    }

    pub fn version_marker(&self) -> PathBuf {
        self.data_dir().join(VERSION_MARKER)
    }

    pub fn server_log(&self) -> PathBuf {
        self.data_dir().join(SERVER_LOG)
    }

    /// A cluster exists once `initdb` has written its version marker
    pub fn is_initialized(&self) -> bool {
        self.version_marker().is_file()
    }

    pub fn create_data_dir(&self) -> Result<(), SeedError> {
        let dir = self.data_dir();
        fs::create_dir_all(&dir).map_err(|e| SeedError::io(dir, e))
    }

    /// Delete the data and binary directories. Missing directories are skipped.
    /// Returns the directories actually removed.
    pub fn remove_all(&self) -> Result<Vec<PathBuf>, SeedError> {
        let mut removed = Vec::new();
        for dir in [self.data_dir(), self.install_dir()] {
            if dir.is_dir() {
                fs::remove_dir_all(&dir).map_err(|e| SeedError::io(&dir, e))?;
                removed.push(dir);
            }
        }
        Ok(removed)
    }
}
