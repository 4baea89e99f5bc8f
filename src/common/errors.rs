use std::path::PathBuf;
use thiserror::Error;

/// Typed error values for cleanup operations.
/// We use `anyhow` at the top level for CLI error handling; these typed
/// errors let modules distinguish "skipped by policy" from "failed".
#[derive(Debug, Error)]
pub enum CleanupError {
    /// File system operation failed
    #[error("I/O error at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not copy a structured store aside before mutating it
    #[error("failed to back up '{path}' before mutation: {source}")]
    StoreBackup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A structured-store mutation failed after the backup was taken.
    /// The original file has already been restored from the backup.
    #[error("store mutation failed for '{path}': {source}")]
    StoreMutation {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Requested browser was not detected on this machine
    #[error("browser '{0}' not found")]
    BrowserNotFound(String),
}

impl CleanupError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CleanupError::Io {
            path: path.into(),
            source,
        }
    }
}
