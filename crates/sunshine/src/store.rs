//! Loading and atomically rewriting `apps.json`.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StoreError;
use crate::types::AppsConfig;

/// Read/write access to Sunshine's `apps.json`.
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration.
    ///
    /// An absent file is a fresh install and loads as the stock default; a
    /// file that exists but does not parse is [`StoreError::CorruptConfig`],
    /// never silently replaced.
    pub fn load(&self) -> Result<AppsConfig, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no apps.json, starting from default");
                return Ok(AppsConfig::default());
            }
            Err(e) => return Err(e.into()),
        };

        serde_json::from_str(&content).map_err(|source| StoreError::CorruptConfig {
            path: self.path.clone(),
            source,
        })
    }

    /// Writes the configuration atomically.
    ///
    /// Serializes into a temporary file in the target directory, carries
    /// over the existing file's permission bits, then renames over the
    /// target, so a crash mid-write leaves the previous file intact.
    pub fn save(&self, config: &AppsConfig) -> Result<(), StoreError> {
        let parent = self
            .path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));
        fs::create_dir_all(parent)?;

        let mut content = serde_json::to_string_pretty(config)?;
        content.push('\n');

        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(content.as_bytes())?;
        tmp.flush()?;

        if let Ok(meta) = fs::metadata(&self.path) {
            fs::set_permissions(tmp.path(), meta.permissions())?;
        }

        tmp.persist(&self.path).map_err(|e| e.error)?;
        debug!(path = %self.path.display(), apps = config.apps.len(), "apps.json saved");
        Ok(())
    }
}
