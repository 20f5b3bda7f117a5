//! Ryujinx (Ryubing) adapter: rom directories from the emulator config.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sunray_model::{InstallVariant, LauncherKind, RawDescriptor};

use crate::probe::flatpak_app_root;
use crate::{Adapter, LauncherError};

const FLATPAK_ID: &str = "io.github.ryubing.Ryujinx";

/// Switch rom container formats Ryujinx loads directly.
const ROM_EXTENSIONS: &[&str] = &["nsp", "xci", "nca", "nro"];

pub struct RyujinxAdapter {
    config_path: PathBuf,
    default_games_dir: PathBuf,
}

#[derive(Debug, Deserialize)]
struct RyujinxConfig {
    #[serde(default)]
    game_dirs: Vec<String>,
}

impl RyujinxAdapter {
    /// Probes for a Ryubing flatpak installation under the given home
    /// directory. The upstream AppImage/native builds keep no stable config
    /// path, so only the flatpak layout is supported.
    pub fn detect(home: &Path) -> Option<Self> {
        let app_root = flatpak_app_root(home, FLATPAK_ID);
        app_root.is_dir().then(|| Self {
            config_path: app_root.join("config").join("Ryujinx").join("Config.json"),
            default_games_dir: app_root.join("data").join("Ryujinx").join("games"),
        })
    }

    pub fn with_paths(config_path: impl Into<PathBuf>, default_games_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            default_games_dir: default_games_dir.into(),
        }
    }

    fn game_dirs(&self) -> Vec<PathBuf> {
        if let Ok(content) = fs::read_to_string(&self.config_path) {
            if let Ok(config) = serde_json::from_str::<RyujinxConfig>(&content) {
                if !config.game_dirs.is_empty() {
                    return config.game_dirs.into_iter().map(PathBuf::from).collect();
                }
            }
        }
        vec![self.default_games_dir.clone()]
    }
}

impl Adapter for RyujinxAdapter {
    fn kind(&self) -> LauncherKind {
        LauncherKind::Ryujinx
    }

    fn variant(&self) -> InstallVariant {
        InstallVariant::Flatpak
    }

    fn discover(&self) -> Result<Vec<RawDescriptor>, LauncherError> {
        let mut descriptors = Vec::new();
        for dir in self.game_dirs() {
            collect_roms(&dir, &mut descriptors);
        }
        Ok(descriptors)
    }
}

/// Recursively collects rom files under a game directory. A missing or
/// unreadable directory contributes nothing.
fn collect_roms(dir: &Path, out: &mut Vec<RawDescriptor>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_roms(&path, out);
            continue;
        }

        let is_rom = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| ROM_EXTENSIONS.contains(&e.to_lowercase().as_str()))
            .unwrap_or(false);
        if !is_rom {
            continue;
        }

        let name = path
            .file_stem()
            .map(|s| strip_brackets(&s.to_string_lossy()))
            .filter(|n| !n.is_empty());
        let rom = path.to_string_lossy().into_owned();

        out.push(RawDescriptor {
            native_id: Some(rom.clone()),
            name,
            launch: vec!["flatpak".into(), "run".into(), FLATPAK_ID.into(), rom],
            working_dir: None,
        });
    }
}

/// Removes `[...]` groups (title ids, versions) from a rom filename.
fn strip_brackets(name: &str) -> String {
    let mut result = String::with_capacity(name.len());
    let mut depth = 0usize;
    for c in name.chars() {
        match c {
            '[' => depth += 1,
            ']' => depth = depth.saturating_sub(1),
            c if depth == 0 => result.push(c),
            _ => {}
        }
    }
    result.trim().to_string()
}
