//! Game record types and the raw-descriptor normalizer.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::identity::IdentityKey;

/// Launcher family that produced a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LauncherKind {
    Steam,
    Lutris,
    Heroic,
    Bottles,
    RetroArch,
    Ryujinx,
}

impl LauncherKind {
    /// Returns all supported launcher kinds.
    pub fn all() -> &'static [LauncherKind] {
        &[
            LauncherKind::Steam,
            LauncherKind::Lutris,
            LauncherKind::Heroic,
            LauncherKind::Bottles,
            LauncherKind::RetroArch,
            LauncherKind::Ryujinx,
        ]
    }

    /// Stable lowercase tag used in identity keys and CLI flags.
    pub fn slug(&self) -> &'static str {
        match self {
            LauncherKind::Steam => "steam",
            LauncherKind::Lutris => "lutris",
            LauncherKind::Heroic => "heroic",
            LauncherKind::Bottles => "bottles",
            LauncherKind::RetroArch => "retroarch",
            LauncherKind::Ryujinx => "ryujinx",
        }
    }

    /// Human-readable launcher name.
    pub fn display_name(&self) -> &'static str {
        match self {
            LauncherKind::Steam => "Steam",
            LauncherKind::Lutris => "Lutris",
            LauncherKind::Heroic => "Heroic",
            LauncherKind::Bottles => "Bottles",
            LauncherKind::RetroArch => "RetroArch",
            LauncherKind::Ryujinx => "Ryujinx",
        }
    }
}

impl fmt::Display for LauncherKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for LauncherKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_ascii_lowercase();
        LauncherKind::all()
            .iter()
            .find(|k| k.slug() == lower)
            .copied()
            .ok_or_else(|| format!("unknown launcher '{s}'"))
    }
}

/// How a launcher is installed on this machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstallVariant {
    Native,
    Flatpak,
}

impl fmt::Display for InstallVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallVariant::Native => write!(f, "native"),
            InstallVariant::Flatpak => write!(f, "flatpak"),
        }
    }
}

/// Unvalidated game data as read from one launcher entry.
///
/// Adapters fill in whatever their metadata store provides; [`normalize`]
/// decides whether it amounts to a usable game. `launch` must already be
/// expanded of launcher-internal indirection (flatpak prefixes, wrapper
/// scripts) so the host application can execute it directly.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawDescriptor {
    /// Launcher-native stable identifier (app id, game id, rom path, ...).
    pub native_id: Option<String>,
    pub name: Option<String>,
    /// Argv needed to start the game through its launcher.
    pub launch: Vec<String>,
    pub working_dir: Option<PathBuf>,
}

/// Canonical, launcher-agnostic representation of one discovered game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub name: String,
    pub launch: Vec<String>,
    pub source: LauncherKind,
    #[serde(default)]
    pub native_id: Option<String>,
    #[serde(default)]
    pub working_dir: Option<PathBuf>,
    /// Local cover image, absent until artwork resolution runs.
    #[serde(default)]
    pub artwork: Option<PathBuf>,
}

impl GameRecord {
    /// Returns the deduplication key for this record.
    ///
    /// Deterministic over launcher-stable fields only; artwork and other
    /// transient state never influence it.
    pub fn identity(&self) -> IdentityKey {
        IdentityKey::for_game(self.source, self.native_id.as_deref(), &self.name)
    }
}

/// A descriptor that cannot be turned into a [`GameRecord`].
///
/// Treated as a per-entry skip by the discovery pipeline, never as a
/// run-level failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed {launcher} descriptor: missing {field}")]
pub struct MalformedDescriptor {
    pub launcher: LauncherKind,
    pub field: &'static str,
}

/// Maps a raw launcher descriptor into a canonical record.
///
/// Pure mapping, no I/O. Fails if the descriptor lacks a display name or a
/// launch command, naming the missing field.
pub fn normalize(
    raw: RawDescriptor,
    source: LauncherKind,
) -> Result<GameRecord, MalformedDescriptor> {
    let name = raw
        .name
        .as_deref()
        .map(str::trim)
        .filter(|n| !n.is_empty())
        .ok_or(MalformedDescriptor {
            launcher: source,
            field: "name",
        })?
        .to_string();

    if raw.launch.is_empty() || raw.launch.iter().all(|a| a.trim().is_empty()) {
        return Err(MalformedDescriptor {
            launcher: source,
            field: "launch command",
        });
    }

    let native_id = raw
        .native_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string);

    Ok(GameRecord {
        name,
        launch: raw.launch,
        source,
        native_id,
        working_dir: raw.working_dir,
        artwork: None,
    })
}
