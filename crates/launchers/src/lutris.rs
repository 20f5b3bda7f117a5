//! Lutris adapter.
//!
//! Lutris keeps its library in a private database, so listing goes through
//! the launcher's own CLI (`lutris -lo --json`), the same interface the
//! desktop client uses. Output parsing is separated out so it stays testable
//! without a Lutris install.

use std::path::Path;
use std::process::Command;

use serde::Deserialize;
use sunray_model::{InstallVariant, LauncherKind, RawDescriptor};

use crate::probe::flatpak_app_root;
use crate::{Adapter, LauncherError};

const FLATPAK_ID: &str = "net.lutris.Lutris";

pub struct LutrisAdapter {
    variant: InstallVariant,
}

/// One entry from `lutris -lo --json`.
#[derive(Debug, Deserialize)]
struct LutrisGame {
    id: i64,
    name: Option<String>,
    #[serde(default)]
    directory: Option<String>,
}

impl LutrisAdapter {
    /// Probes for a Lutris installation under the given home directory.
    pub fn detect(home: &Path) -> Option<Self> {
        if flatpak_app_root(home, FLATPAK_ID).is_dir() {
            return Some(Self {
                variant: InstallVariant::Flatpak,
            });
        }
        if home.join(".local").join("share").join("lutris").is_dir() {
            return Some(Self {
                variant: InstallVariant::Native,
            });
        }
        None
    }

    pub fn with_variant(variant: InstallVariant) -> Self {
        Self { variant }
    }

    fn launch_prefix(&self) -> Vec<String> {
        // LUTRIS_SKIP_INIT keeps the client from running first-time setup
        // when launched headless from Sunshine.
        let mut argv = vec!["env".into(), "LUTRIS_SKIP_INIT=1".into()];
        match self.variant {
            InstallVariant::Native => argv.push("lutris".into()),
            InstallVariant::Flatpak => {
                argv.extend(["flatpak".into(), "run".into(), FLATPAK_ID.into()]);
            }
        }
        argv
    }

    fn list_command(&self) -> Command {
        match self.variant {
            InstallVariant::Native => {
                let mut cmd = Command::new("lutris");
                cmd.args(["-lo", "--json"]);
                cmd
            }
            InstallVariant::Flatpak => {
                let mut cmd = Command::new("flatpak");
                cmd.args(["run", FLATPAK_ID, "-lo", "--json"]);
                cmd
            }
        }
    }
}

impl Adapter for LutrisAdapter {
    fn kind(&self) -> LauncherKind {
        LauncherKind::Lutris
    }

    fn variant(&self) -> InstallVariant {
        self.variant
    }

    fn discover(&self) -> Result<Vec<RawDescriptor>, LauncherError> {
        let output = self
            .list_command()
            .output()
            .map_err(|e| LauncherError::Command(format!("failed to run lutris: {e}")))?;

        if !output.status.success() {
            return Err(LauncherError::Command(format!(
                "lutris listing exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        parse_listing(&stdout, &self.launch_prefix())
    }
}

/// Parses the JSON game listing into raw descriptors.
fn parse_listing(json: &str, prefix: &[String]) -> Result<Vec<RawDescriptor>, LauncherError> {
    // An empty library prints nothing rather than `[]`.
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }

    let games: Vec<LutrisGame> = serde_json::from_str(json)
        .map_err(|e| LauncherError::Parse(format!("lutris listing: {e}")))?;

    Ok(games
        .into_iter()
        .map(|game| {
            let mut launch = prefix.to_vec();
            launch.push(format!("lutris:rungameid/{}", game.id));
            RawDescriptor {
                native_id: Some(game.id.to_string()),
                name: game.name,
                launch,
                working_dir: game
                    .directory
                    .filter(|d| !d.is_empty())
                    .map(Into::into),
            }
        })
        .collect())
}
