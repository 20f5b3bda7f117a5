//! Stable identity keys for deduplicating games across runs and launchers.

use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::record::LauncherKind;

/// Deterministic deduplication key for a game.
///
/// Built from the source launcher's slug and its native stable identifier,
/// e.g. `steam:504230`. Two discovery runs over an unchanged install always
/// produce the same key, and the slug prefix keeps same-named games from
/// different launchers apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IdentityKey(String);

impl IdentityKey {
    /// Builds the key for a game.
    ///
    /// Without a native identifier this falls back to the normalized display
    /// name (`<slug>:name:<normalized>`), accepting the documented collision
    /// risk for two same-named games from the same launcher.
    pub fn for_game(source: LauncherKind, native_id: Option<&str>, name: &str) -> Self {
        match native_id {
            Some(id) if !id.trim().is_empty() => {
                IdentityKey(format!("{}:{}", source.slug(), id.trim()))
            }
            _ => IdentityKey(format!("{}:name:{}", source.slug(), normalized_name(name))),
        }
    }

    /// Parses a key previously stored in the target configuration.
    pub fn from_stored(raw: &str) -> Self {
        IdentityKey(raw.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Filesystem-safe stem for cache files keyed by this identity.
    ///
    /// First 16 bytes of SHA-256, hex encoded (32 characters).
    pub fn file_stem(&self) -> String {
        let hash = Sha256::digest(self.0.as_bytes());
        hex::encode(&hash[..16])
    }
}

impl fmt::Display for IdentityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Case-insensitive, whitespace-collapsed form of a display name.
pub fn normalized_name(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
