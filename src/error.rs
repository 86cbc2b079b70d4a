//! Error kinds raised while provisioning the database and seeding it.
//!
//! Every variant is fatal to the current run. The one tolerated failure, a
//! stop request during uninstall, is handled by the caller and never surfaces
//! here.

use std::path::PathBuf;

use thiserror::Error;

/// Failures talking to the source API.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request never produced a response.
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    /// The server answered with a non-2xx status.
    #[error("{url} answered with HTTP {status}")]
    Status { url: String, status: u16 },
    /// The body was not the JSON shape we expected.
    #[error("response from {url} is not valid JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors emitted by the lifecycle manager, the fetcher and the loader.
#[derive(Debug, Error)]
pub enum SeedError {
    /// Downloading or unpacking the database engine failed.
    #[error("failed to acquire PostgreSQL binaries ({step}): {source}")]
    BinaryAcquisition {
        step: &'static str,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// An engine process exited unsuccessfully.
    #[error("`{command}` exited with {}", describe_code(.code))]
    Process { command: String, code: Option<i32> },
    /// An engine process could not be launched at all.
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// A payload lacked a field the record cannot exist without.
    #[error("{table} payload is missing required field `{field}`")]
    Mapping {
        table: &'static str,
        field: &'static str,
    },
    #[error("failed to connect to PostgreSQL: {0}")]
    Connect(#[source] postgres::Error),
    /// A statement against the database failed.
    #[error("statement on `{table}` failed: {source}")]
    Insert {
        table: String,
        #[source]
        source: postgres::Error,
    },
    /// An insert statement names a placeholder with no bound value.
    #[error("insert into `{table}` has no value for parameter `:{parameter}`")]
    Bind { table: String, parameter: String },
    #[error("filesystem error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SeedError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SeedError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn acquisition(
        step: &'static str,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        SeedError::BinaryAcquisition {
            step,
            source: source.into(),
        }
    }
}

fn describe_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "no exit code (terminated by signal)".to_string(),
    }
}
