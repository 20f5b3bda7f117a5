//! Store error types.

use std::path::PathBuf;

/// Errors from the apps.json store.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The target file exists but does not parse. Run-level fatal: sunray
    /// refuses to overwrite configuration it cannot read back.
    #[error("corrupt configuration at {path}: {source}")]
    CorruptConfig {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
