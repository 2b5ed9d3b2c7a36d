use std::path::PathBuf;

use thiserror::Error;

/// Error type that captures storage and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Persistence error: {0}")]
    Persistence(String),
    #[error("State file `{}` is corrupt: {reason}", path.display())]
    CorruptState { path: PathBuf, reason: String },
}
