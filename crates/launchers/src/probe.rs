//! Filesystem probes shared by the adapters.

use std::path::{Path, PathBuf};

/// Returns the current user's home directory.
pub fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}

/// Returns the sandbox root for a flatpak application id, e.g.
/// `~/.var/app/com.valvesoftware.Steam`.
pub fn flatpak_app_root(home: &Path, app_id: &str) -> PathBuf {
    home.join(".var").join("app").join(app_id)
}

/// Expands a leading `~/` to the given home directory.
pub fn expand_home(home: &Path, path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else if path == "~" {
        home.to_path_buf()
    } else {
        PathBuf::from(path)
    }
}
