//! Disk cache for downloaded cover art.
//!
//! Covers live in one flat directory (by default Sunshine's `covers/`
//! next to `apps.json`) with filenames derived from the game's identity
//! key, so re-runs find the same file regardless of which image the API
//! would return today.

use std::fs;
use std::path::{Path, PathBuf};

use sunray_model::IdentityKey;

/// Errors from cache operations.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Cover art directory keyed by game identity.
pub struct CoverCache {
    dir: PathBuf,
}

impl CoverCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Returns the existing cover for a game, if one was downloaded before.
    ///
    /// The extension is whatever content type the original download carried,
    /// so the lookup scans for any file with the identity's stem.
    pub fn find(&self, identity: &IdentityKey) -> Option<PathBuf> {
        let stem = identity.file_stem();
        let entries = fs::read_dir(&self.dir).ok()?;
        for entry in entries.flatten() {
            let path = entry.path();
            if path.file_stem().is_some_and(|s| s.to_string_lossy() == stem) && path.is_file() {
                return Some(path);
            }
        }
        None
    }

    /// Writes a downloaded cover and returns its path.
    pub fn store(
        &self,
        identity: &IdentityKey,
        data: &[u8],
        content_type: &str,
    ) -> Result<PathBuf, CacheError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(format!(
            "{}{}",
            identity.file_stem(),
            content_type_to_ext(content_type)
        ));
        fs::write(&path, data)?;
        Ok(path)
    }
}

/// Maps a content type to a file extension.
fn content_type_to_ext(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => ".png",
        "image/webp" => ".webp",
        "image/gif" => ".gif",
        _ => ".jpg",
    }
}
