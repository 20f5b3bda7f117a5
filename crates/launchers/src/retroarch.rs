//! RetroArch adapter: playlist files + libretro core resolution.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use sunray_model::{InstallVariant, LauncherKind, RawDescriptor};
use tracing::warn;

use crate::probe::{expand_home, flatpak_app_root};
use crate::{Adapter, LauncherError};

const FLATPAK_ID: &str = "org.libretro.RetroArch";

pub struct RetroArchAdapter {
    config_dir: PathBuf,
    home: PathBuf,
    variant: InstallVariant,
}

/// A RetroArch playlist (`.lpl`) document.
#[derive(Debug, Deserialize)]
struct Playlist {
    #[serde(default)]
    items: Vec<PlaylistItem>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    #[serde(default)]
    path: String,
    #[serde(default)]
    label: String,
    #[serde(default)]
    core_path: String,
    #[serde(default)]
    core_name: String,
}

impl RetroArchAdapter {
    /// Probes for a RetroArch installation under the given home directory.
    pub fn detect(home: &Path) -> Option<Self> {
        let flatpak = flatpak_app_root(home, FLATPAK_ID)
            .join("config")
            .join("retroarch");
        if flatpak.is_dir() {
            return Some(Self::with_config_dir(flatpak, home, InstallVariant::Flatpak));
        }

        let native = home.join(".config").join("retroarch");
        if native.is_dir() {
            return Some(Self::with_config_dir(native, home, InstallVariant::Native));
        }

        None
    }

    pub fn with_config_dir(
        config_dir: impl Into<PathBuf>,
        home: impl Into<PathBuf>,
        variant: InstallVariant,
    ) -> Self {
        Self {
            config_dir: config_dir.into(),
            home: home.into(),
            variant,
        }
    }

    fn launch_prefix(&self) -> Vec<String> {
        match self.variant {
            InstallVariant::Native => vec!["retroarch".into()],
            InstallVariant::Flatpak => vec!["flatpak".into(), "run".into(), FLATPAK_ID.into()],
        }
    }

    /// Reads one setting from `retroarch.cfg`, `~` expanded.
    fn config_value(&self, key: &str) -> Option<PathBuf> {
        let content = fs::read_to_string(self.config_dir.join("retroarch.cfg")).ok()?;
        config_value(&content, key).map(|v| expand_home(&self.home, &v))
    }

    fn playlist_dir(&self) -> PathBuf {
        self.config_value("playlist_directory")
            .unwrap_or_else(|| self.config_dir.join("playlists"))
    }

    fn cores_dir(&self) -> PathBuf {
        if let Some(dir) = self.config_value("libretro_directory") {
            return dir;
        }
        let default = self.config_dir.join("cores");
        if default.is_dir() {
            return default;
        }
        // The flatpak ships its cores inside the sandbox; the path is opaque
        // from the host but valid for the launched process.
        if self.variant == InstallVariant::Flatpak {
            return PathBuf::from("/app/libretro");
        }
        default
    }
}

impl Adapter for RetroArchAdapter {
    fn kind(&self) -> LauncherKind {
        LauncherKind::RetroArch
    }

    fn variant(&self) -> InstallVariant {
        self.variant
    }

    fn discover(&self) -> Result<Vec<RawDescriptor>, LauncherError> {
        if !self.config_dir.is_dir() {
            return Err(LauncherError::Unavailable);
        }

        let playlist_dir = self.playlist_dir();
        let entries = match fs::read_dir(&playlist_dir) {
            Ok(entries) => entries,
            Err(_) => return Ok(Vec::new()),
        };

        let cores_dir = self.cores_dir();
        let prefix = self.launch_prefix();
        let mut descriptors = Vec::new();

        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("lpl") {
                continue;
            }

            let playlist: Playlist = match fs::read_to_string(&path)
                .map_err(LauncherError::Io)
                .and_then(|c| {
                    serde_json::from_str(&c).map_err(|e| LauncherError::Parse(e.to_string()))
                }) {
                Ok(playlist) => playlist,
                Err(e) => {
                    warn!(playlist = %path.display(), error = %e, "skipping playlist");
                    continue;
                }
            };

            for item in playlist.items {
                descriptors.push(item_descriptor(&item, &cores_dir, &self.home, &prefix));
            }
        }

        Ok(descriptors)
    }
}

/// Reads a `key = "value"` setting from retroarch.cfg content.
fn config_value(content: &str, key: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let (k, v) = line.split_once('=')?;
        if k.trim() == key {
            let value = v.trim().trim_matches('"');
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Builds a descriptor for one playlist item; an unresolvable core leaves
/// the launch command empty so normalization records the skip.
fn item_descriptor(
    item: &PlaylistItem,
    cores_dir: &Path,
    home: &Path,
    prefix: &[String],
) -> RawDescriptor {
    let launch = resolve_core(cores_dir, home, &item.core_path, &item.core_name)
        .map(|core| {
            let mut argv = prefix.to_vec();
            argv.push("-L".into());
            argv.push(core.to_string_lossy().into_owned());
            argv.push(item.path.clone());
            argv
        })
        .unwrap_or_default();

    RawDescriptor {
        native_id: (!item.path.is_empty()).then(|| item.path.clone()),
        name: (!item.label.is_empty()).then(|| item.label.clone()),
        launch,
        working_dir: None,
    }
}

/// Determines the core to launch a playlist item with.
///
/// An explicit `core_path` wins unless it is the `DETECT`/`NULL` sentinel;
/// otherwise the core name is sanitized and looked up in the cores
/// directory, first by canonical filename, then by fuzzy match against the
/// installed `.so` files.
fn resolve_core(
    cores_dir: &Path,
    home: &Path,
    core_path: &str,
    core_name: &str,
) -> Option<PathBuf> {
    if !core_path.is_empty() {
        let upper = core_path.to_uppercase();
        if upper != "DETECT" && upper != "NULL" {
            return Some(expand_home(home, core_path));
        }
    }

    if core_name.is_empty() {
        return None;
    }

    let sanitized: String = core_name
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            ' ' | '-' => Some('_'),
            '(' | ')' => None,
            c => Some(c),
        })
        .collect();

    let candidate = cores_dir.join(format!("{sanitized}_libretro.so"));
    if candidate.is_file() {
        return Some(candidate);
    }

    let compact = sanitized.replace('_', "");
    if let Ok(entries) = fs::read_dir(cores_dir) {
        for entry in entries.flatten() {
            let file_name = entry.file_name();
            let file_name = file_name.to_string_lossy();
            if !file_name.ends_with(".so") {
                continue;
            }
            let entry_compact: String = file_name
                .to_lowercase()
                .chars()
                .filter(|c| !matches!(c, '_' | '-' | ' '))
                .collect();
            if entry_compact.contains(&compact) {
                return Some(entry.path());
            }
        }
    }

    // Unverifiable guess; still correct for sandboxed cores dirs the host
    // cannot read.
    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;

    const CFG: &str = r#"
# RetroArch config
video_driver = "gl"
playlist_directory = "~/roms/playlists"
libretro_directory = "/opt/libretro"
"#;

    #[test]
    fn config_value_parses_quoted_settings() {
        assert_eq!(
            config_value(CFG, "playlist_directory").as_deref(),
            Some("~/roms/playlists")
        );
        assert_eq!(
            config_value(CFG, "libretro_directory").as_deref(),
            Some("/opt/libretro")
        );
        assert_eq!(config_value(CFG, "missing_setting"), None);
    }

    #[test]
    fn resolve_core_explicit_path() {
        let core = resolve_core(
            Path::new("/cores"),
            Path::new("/home/user"),
            "~/cores/snes9x_libretro.so",
            "Snes9x",
        );
        assert_eq!(
            core,
            Some(PathBuf::from("/home/user/cores/snes9x_libretro.so"))
        );
    }

    #[test]
    fn resolve_core_detect_sentinel_falls_through() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("snes9x_libretro.so"), b"").unwrap();

        let core = resolve_core(tmp.path(), Path::new("/home/user"), "DETECT", "Snes9x");
        assert_eq!(core, Some(tmp.path().join("snes9x_libretro.so")));
    }

    #[test]
    fn resolve_core_fuzzy_match() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("mgba_libretro.so"), b"").unwrap();

        let core = resolve_core(tmp.path(), Path::new("/h"), "", "mGBA");
        assert_eq!(core, Some(tmp.path().join("mgba_libretro.so")));
    }

    #[test]
    fn resolve_core_nothing_to_go_on() {
        assert_eq!(resolve_core(Path::new("/cores"), Path::new("/h"), "", ""), None);
    }

    #[test]
    fn discover_reads_playlists() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("retroarch");
        let playlists = config.join("playlists");
        let cores = config.join("cores");
        fs::create_dir_all(&playlists).unwrap();
        fs::create_dir_all(&cores).unwrap();
        fs::write(cores.join("mgba_libretro.so"), b"").unwrap();

        fs::write(
            playlists.join("Nintendo - Game Boy Advance.lpl"),
            r#"{"items": [
                {"path": "/roms/gba/metroid.gba", "label": "Metroid Fusion",
                 "core_path": "DETECT", "core_name": "mGBA"},
                {"path": "", "label": ""}
            ]}"#,
        )
        .unwrap();

        let adapter =
            RetroArchAdapter::with_config_dir(&config, tmp.path(), InstallVariant::Native);
        let descriptors = adapter.discover().unwrap();

        assert_eq!(descriptors.len(), 2);
        let good = descriptors
            .iter()
            .find(|d| d.name.as_deref() == Some("Metroid Fusion"))
            .unwrap();
        assert_eq!(good.native_id.as_deref(), Some("/roms/gba/metroid.gba"));
        assert_eq!(good.launch[0], "retroarch");
        assert_eq!(good.launch[1], "-L");
        assert!(good.launch[2].ends_with("mgba_libretro.so"));
        assert_eq!(good.launch[3], "/roms/gba/metroid.gba");

        // The empty item survives as a descriptor for skip accounting.
        assert!(descriptors.iter().any(|d| d.name.is_none()));
    }

    #[test]
    fn discover_skips_corrupt_playlist() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("retroarch");
        let playlists = config.join("playlists");
        fs::create_dir_all(&playlists).unwrap();
        fs::write(playlists.join("bad.lpl"), "not json").unwrap();
        fs::write(
            playlists.join("good.lpl"),
            r#"{"items": [{"path": "/roms/x.sfc", "label": "X",
                "core_path": "/cores/snes9x_libretro.so", "core_name": "Snes9x"}]}"#,
        )
        .unwrap();

        let adapter =
            RetroArchAdapter::with_config_dir(&config, tmp.path(), InstallVariant::Native);
        let descriptors = adapter.discover().unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name.as_deref(), Some("X"));
    }

    #[test]
    fn missing_playlist_dir_is_empty_not_error() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("retroarch");
        fs::create_dir_all(&config).unwrap();

        let adapter =
            RetroArchAdapter::with_config_dir(&config, tmp.path(), InstallVariant::Native);
        assert!(adapter.discover().unwrap().is_empty());
    }
}
