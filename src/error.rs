// src/error.rs
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UpgradeError {
    #[error("Failed to create working directory for repo at {path}: {source}")]
    WorkspaceInit {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Unable to find {name} on PATH")]
    ToolNotFound { name: String },

    #[error("No project files found in repository")]
    NoProjectFiles,

    #[error("{message}")]
    Invocation { input: PathBuf, message: String },

    #[error("{tool} did not finish within {}s while processing {}", after.as_secs(), input.display())]
    TimedOut {
        tool: String,
        input: PathBuf,
        after: Duration,
    },

    #[error("{message}")]
    FileFailed { path: PathBuf, message: String },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },

    #[error("Modified file disappeared from workspace: {path}")]
    Vanished { path: PathBuf },

    #[error("Source path escapes the workspace: {path}")]
    InvalidPath { path: PathBuf },

    #[error("Failed to read analysis report {path}: {source}")]
    Report {
        source: serde_json::Error,
        path: PathBuf,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, UpgradeError>;

impl UpgradeError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        Self::Io {
            source,
            path: path.into(),
        }
    }
}

// Allow `?` on std::io::Error by converting to UpgradeError::Io with unknown path.
impl From<std::io::Error> for UpgradeError {
    fn from(source: std::io::Error) -> Self {
        UpgradeError::Io {
            source,
            path: PathBuf::from("<unknown>"),
        }
    }
}
