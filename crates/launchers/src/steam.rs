//! Steam adapter: library folders + app manifests.

use std::fs;
use std::path::{Path, PathBuf};

use sunray_model::{InstallVariant, LauncherKind, RawDescriptor};
use tracing::debug;

use crate::probe::flatpak_app_root;
use crate::vdf;
use crate::{Adapter, LauncherError};

const FLATPAK_ID: &str = "com.valvesoftware.Steam";

/// Tooling entries Steam installs alongside games; never worth streaming.
const EXCLUDED_PREFIXES: &[&str] = &[
    "proton",
    "steam linux runtime",
    "steamworks common",
    "steamvr",
];

pub struct SteamAdapter {
    root: PathBuf,
    variant: InstallVariant,
}

impl SteamAdapter {
    /// Probes for a Steam installation under the given home directory.
    pub fn detect(home: &Path) -> Option<Self> {
        let flatpak = flatpak_app_root(home, FLATPAK_ID)
            .join(".steam")
            .join("steam");
        if flatpak.is_dir() {
            return Some(Self::with_root(flatpak, InstallVariant::Flatpak));
        }

        let native = home.join(".steam").join("steam");
        if native.is_dir() {
            return Some(Self::with_root(native, InstallVariant::Native));
        }

        None
    }

    /// Creates an adapter over an explicit Steam root.
    pub fn with_root(root: impl Into<PathBuf>, variant: InstallVariant) -> Self {
        Self {
            root: root.into(),
            variant,
        }
    }

    fn launch_prefix(&self) -> Vec<String> {
        match self.variant {
            InstallVariant::Native => vec!["steam".into()],
            InstallVariant::Flatpak => vec!["flatpak".into(), "run".into(), FLATPAK_ID.into()],
        }
    }

    /// Returns every steamapps directory to scan: libraries listed in
    /// `config/libraryfolders.vdf`, falling back to the root library.
    fn steamapps_dirs(&self) -> Vec<PathBuf> {
        let vdf_path = self.root.join("config").join("libraryfolders.vdf");
        let libraries = match fs::read_to_string(&vdf_path) {
            Ok(content) => vdf::library_paths(&content),
            Err(_) => Vec::new(),
        };

        if libraries.is_empty() {
            vec![self.root.join("steamapps")]
        } else {
            libraries
                .into_iter()
                .map(|lib| PathBuf::from(lib).join("steamapps"))
                .collect()
        }
    }
}

impl Adapter for SteamAdapter {
    fn kind(&self) -> LauncherKind {
        LauncherKind::Steam
    }

    fn variant(&self) -> InstallVariant {
        self.variant
    }

    fn discover(&self) -> Result<Vec<RawDescriptor>, LauncherError> {
        if !self.root.is_dir() {
            return Err(LauncherError::Unavailable);
        }

        let prefix = self.launch_prefix();
        let mut descriptors = Vec::new();

        for steamapps in self.steamapps_dirs() {
            let entries = match fs::read_dir(&steamapps) {
                Ok(entries) => entries,
                // A stale library path in libraryfolders.vdf is common;
                // skip it rather than failing the scan.
                Err(e) => {
                    debug!(dir = %steamapps.display(), error = %e, "skipping steam library");
                    continue;
                }
            };

            for entry in entries.flatten() {
                let file_name = entry.file_name();
                let file_name = file_name.to_string_lossy();
                if !file_name.starts_with("appmanifest_") || !file_name.ends_with(".acf") {
                    continue;
                }

                let content = match fs::read_to_string(entry.path()) {
                    Ok(content) => content,
                    Err(e) => {
                        debug!(manifest = %entry.path().display(), error = %e, "unreadable manifest");
                        continue;
                    }
                };

                if let Some(desc) = manifest_descriptor(&content, &prefix) {
                    descriptors.push(desc);
                }
            }
        }

        Ok(descriptors)
    }
}

/// Builds a descriptor from one appmanifest document.
///
/// Returns `None` only for excluded tooling entries; incomplete manifests
/// still yield a descriptor so normalization can count the skip.
fn manifest_descriptor(content: &str, prefix: &[String]) -> Option<RawDescriptor> {
    let appid = vdf::manifest_field(content, "appid");
    let name = vdf::manifest_field(content, "name");

    if let Some(name) = &name {
        let lower = name.to_lowercase();
        if EXCLUDED_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            return None;
        }
    }

    let launch = appid
        .as_deref()
        .map(|id| {
            let mut argv = prefix.to_vec();
            argv.push(format!("steam://rungameid/{id}"));
            argv
        })
        .unwrap_or_default();

    Some(RawDescriptor {
        native_id: appid,
        name,
        launch,
        working_dir: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_manifest(dir: &Path, appid: &str, name: &str) {
        let content = format!(
            "\"AppState\"\n{{\n\t\"appid\"\t\t\"{appid}\"\n\t\"name\"\t\t\"{name}\"\n}}\n"
        );
        fs::write(dir.join(format!("appmanifest_{appid}.acf")), content).unwrap();
    }

    fn steam_root(tmp: &Path) -> PathBuf {
        let root = tmp.join("steam");
        fs::create_dir_all(root.join("steamapps")).unwrap();
        fs::create_dir_all(root.join("config")).unwrap();
        root
    }

    #[test]
    fn discover_reads_default_library() {
        let tmp = tempfile::tempdir().unwrap();
        let root = steam_root(tmp.path());
        write_manifest(&root.join("steamapps"), "504230", "Celeste");
        write_manifest(&root.join("steamapps"), "620", "Portal 2");

        let adapter = SteamAdapter::with_root(&root, InstallVariant::Native);
        let mut names: Vec<_> = adapter
            .discover()
            .unwrap()
            .into_iter()
            .filter_map(|d| d.name)
            .collect();
        names.sort();

        assert_eq!(names, vec!["Celeste", "Portal 2"]);
    }

    #[test]
    fn discover_follows_library_folders() {
        let tmp = tempfile::tempdir().unwrap();
        let root = steam_root(tmp.path());
        let extra = tmp.path().join("extra-library");
        fs::create_dir_all(extra.join("steamapps")).unwrap();
        write_manifest(&extra.join("steamapps"), "620", "Portal 2");

        fs::write(
            root.join("config").join("libraryfolders.vdf"),
            format!(
                "\"libraryfolders\"\n{{\n\t\"0\"\n\t{{\n\t\t\"path\"\t\t\"{}\"\n\t}}\n}}\n",
                extra.display()
            ),
        )
        .unwrap();

        let adapter = SteamAdapter::with_root(&root, InstallVariant::Native);
        let descriptors = adapter.discover().unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].native_id.as_deref(), Some("620"));
    }

    #[test]
    fn discover_excludes_tooling_entries() {
        let tmp = tempfile::tempdir().unwrap();
        let root = steam_root(tmp.path());
        let apps = root.join("steamapps");
        write_manifest(&apps, "504230", "Celeste");
        write_manifest(&apps, "1493710", "Proton Experimental");
        write_manifest(&apps, "1070560", "Steam Linux Runtime 1.0");

        let adapter = SteamAdapter::with_root(&root, InstallVariant::Native);
        let descriptors = adapter.discover().unwrap();
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].name.as_deref(), Some("Celeste"));
    }

    #[test]
    fn discover_tolerates_stale_library_path() {
        let tmp = tempfile::tempdir().unwrap();
        let root = steam_root(tmp.path());
        fs::write(
            root.join("config").join("libraryfolders.vdf"),
            "\"libraryfolders\"\n{\n\t\"0\"\n\t{\n\t\t\"path\"\t\t\"/mnt/gone\"\n\t}\n}\n",
        )
        .unwrap();

        let adapter = SteamAdapter::with_root(&root, InstallVariant::Native);
        assert!(adapter.discover().unwrap().is_empty());
    }

    #[test]
    fn discover_missing_root_is_unavailable() {
        let adapter = SteamAdapter::with_root("/nonexistent/steam", InstallVariant::Native);
        assert!(matches!(
            adapter.discover(),
            Err(LauncherError::Unavailable)
        ));
    }

    #[test]
    fn incomplete_manifest_yields_descriptor_for_skip_accounting() {
        let desc = manifest_descriptor("\"AppState\"\n{\n}\n", &["steam".into()]).unwrap();
        assert!(desc.name.is_none());
        assert!(desc.launch.is_empty());
    }

    #[test]
    fn flatpak_launch_prefix() {
        let adapter = SteamAdapter::with_root("/x", InstallVariant::Flatpak);
        assert_eq!(
            adapter.launch_prefix(),
            vec!["flatpak", "run", "com.valvesoftware.Steam"]
        );
    }
}
