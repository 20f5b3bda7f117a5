//! Adapter-level error types.

/// Errors raised while scanning one launcher's metadata store.
///
/// These never abort a discovery run; `discover_all` converts them into an
/// empty contribution plus a diagnostic.
#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error("launcher not installed")]
    Unavailable,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("launcher command failed: {0}")]
    Command(String),

    #[error("malformed launcher metadata: {0}")]
    Parse(String),
}
