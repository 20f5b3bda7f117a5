//! Heroic adapter: per-runner JSON install stores.
//!
//! Heroic fronts several stores, each with its own installed-games file and
//! its own JSON shape:
//! - legendary (Epic): a map keyed by app id
//! - gog / nile (Amazon): `{"installed": [...]}`
//! - sideload: `{"games": [...]}`
//! Some nile builds write a bare list; that shape is handled too.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use sunray_model::{InstallVariant, LauncherKind, RawDescriptor};
use tracing::warn;

use crate::probe::flatpak_app_root;
use crate::{Adapter, LauncherError};

const FLATPAK_ID: &str = "com.heroicgameslauncher.hgl";

/// (runner tag, store file relative to the heroic config root)
const RUNNER_STORES: &[(&str, &str)] = &[
    ("legendary", "legendaryConfig/legendary/installed.json"),
    ("gog", "gog_store/installed.json"),
    ("nile", "nile_config/nile/installed.json"),
    ("sideload", "sideload_apps/library.json"),
];

pub struct HeroicAdapter {
    config_root: PathBuf,
    variant: InstallVariant,
}

impl HeroicAdapter {
    /// Probes for a Heroic installation under the given home directory.
    pub fn detect(home: &Path) -> Option<Self> {
        let flatpak = flatpak_app_root(home, FLATPAK_ID)
            .join("config")
            .join("heroic");
        if flatpak.is_dir() {
            return Some(Self::with_config_root(flatpak, InstallVariant::Flatpak));
        }

        let native = home.join(".config").join("heroic");
        if native.is_dir() {
            return Some(Self::with_config_root(native, InstallVariant::Native));
        }

        None
    }

    pub fn with_config_root(config_root: impl Into<PathBuf>, variant: InstallVariant) -> Self {
        Self {
            config_root: config_root.into(),
            variant,
        }
    }

    fn launch_prefix(&self) -> Vec<String> {
        match self.variant {
            InstallVariant::Native => vec!["heroic".into()],
            InstallVariant::Flatpak => vec!["flatpak".into(), "run".into(), FLATPAK_ID.into()],
        }
    }
}

impl Adapter for HeroicAdapter {
    fn kind(&self) -> LauncherKind {
        LauncherKind::Heroic
    }

    fn variant(&self) -> InstallVariant {
        self.variant
    }

    fn discover(&self) -> Result<Vec<RawDescriptor>, LauncherError> {
        if !self.config_root.is_dir() {
            return Err(LauncherError::Unavailable);
        }

        let prefix = self.launch_prefix();
        let mut descriptors = Vec::new();

        for (runner, rel_path) in RUNNER_STORES {
            let path = self.config_root.join(rel_path);
            let content = match fs::read_to_string(&path) {
                Ok(content) => content,
                // Runner not in use.
                Err(_) => continue,
            };

            let data: Value = match serde_json::from_str(&content) {
                Ok(data) => data,
                Err(e) => {
                    warn!(store = %path.display(), error = %e, "unparseable heroic store");
                    continue;
                }
            };

            descriptors.extend(parse_store(runner, &data, &prefix));
        }

        Ok(descriptors)
    }
}

/// Extracts descriptors from one runner store document.
fn parse_store(runner: &str, data: &Value, prefix: &[String]) -> Vec<RawDescriptor> {
    match data {
        Value::Object(map) => {
            if let Some(Value::Array(installed)) = map.get("installed") {
                installed
                    .iter()
                    .filter_map(|g| store_entry(runner, g, prefix))
                    .collect()
            } else if let Some(Value::Array(games)) = map.get("games") {
                games
                    .iter()
                    .filter_map(|g| sideload_entry(g, prefix))
                    .collect()
            } else {
                // Legendary: map of app id -> game object.
                map.iter()
                    .filter_map(|(app_id, g)| legendary_entry(runner, app_id, g, prefix))
                    .collect()
            }
        }
        Value::Array(games) => games
            .iter()
            .filter_map(|g| store_entry(runner, g, prefix))
            .collect(),
        _ => Vec::new(),
    }
}

/// GOG/nile style entry: `appName` (or `app_name`) plus an install path whose
/// final component doubles as the title.
fn store_entry(runner: &str, game: &Value, prefix: &[String]) -> Option<RawDescriptor> {
    let obj = game.as_object()?;
    let app_id = obj
        .get("appName")
        .or_else(|| obj.get("app_name"))
        .and_then(Value::as_str)?;

    let install_path = obj.get("install_path").and_then(Value::as_str);
    let title = obj
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or_else(|| {
            install_path
                .and_then(|p| Path::new(p).file_name())
                .map(|n| n.to_string_lossy().into_owned())
        })
        .unwrap_or_else(|| app_id.to_string());

    Some(descriptor(runner, app_id, &title, install_path, prefix))
}

/// Sideloaded entry: `app_name` + `title`.
fn sideload_entry(game: &Value, prefix: &[String]) -> Option<RawDescriptor> {
    let obj = game.as_object()?;
    let app_id = obj.get("app_name").and_then(Value::as_str)?;
    let title = obj.get("title").and_then(Value::as_str)?;
    Some(descriptor("sideload", app_id, title, None, prefix))
}

/// Legendary entry: keyed by app id, value holds the title.
fn legendary_entry(
    runner: &str,
    app_id: &str,
    game: &Value,
    prefix: &[String],
) -> Option<RawDescriptor> {
    let obj = game.as_object()?;
    let title = obj
        .get("title")
        .or_else(|| obj.get("app_name"))
        .and_then(Value::as_str)?;
    let install_path = obj.get("install_path").and_then(Value::as_str);
    Some(descriptor(runner, app_id, title, install_path, prefix))
}

fn descriptor(
    runner: &str,
    app_id: &str,
    title: &str,
    install_path: Option<&str>,
    prefix: &[String],
) -> RawDescriptor {
    let mut launch = prefix.to_vec();
    launch.push(format!("heroic://launch/{runner}/{app_id}"));
    launch.push("--no-gui".into());
    launch.push("--no-sandbox".into());

    RawDescriptor {
        native_id: Some(format!("{runner}/{app_id}")),
        name: Some(title.to_string()),
        launch,
        working_dir: install_path.filter(|p| !p.is_empty()).map(Into::into),
    }
}
