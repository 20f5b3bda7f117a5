//! Bottles adapter.
//!
//! Bottles is flatpak-only and its bottle configuration lives in YAML files
//! the CLI owns, so listing goes through `bottles-cli`: first the gaming
//! bottles, then the registered programs per bottle. Output parsing is in
//! pure functions; the program names double as both display name and the
//! launcher-native identifier (scoped by bottle).

use std::path::Path;
use std::process::Command;

use sunray_model::{InstallVariant, LauncherKind, RawDescriptor};
use tracing::warn;

use crate::probe::flatpak_app_root;
use crate::{Adapter, LauncherError};

const FLATPAK_ID: &str = "com.usebottles.bottles";

pub struct BottlesAdapter;

impl BottlesAdapter {
    /// Probes for a Bottles installation under the given home directory.
    pub fn detect(home: &Path) -> Option<Self> {
        let bottles_dir = flatpak_app_root(home, FLATPAK_ID)
            .join("data")
            .join("bottles")
            .join("bottles");
        bottles_dir.is_dir().then_some(Self)
    }

    fn cli_command(args: &[&str]) -> Command {
        let mut cmd = Command::new("flatpak");
        cmd.args(["run", "--command=bottles-cli", FLATPAK_ID]);
        cmd.args(args);
        cmd
    }

    fn run_cli(args: &[&str]) -> Result<String, LauncherError> {
        let output = Self::cli_command(args)
            .output()
            .map_err(|e| LauncherError::Command(format!("failed to run bottles-cli: {e}")))?;

        if !output.status.success() {
            return Err(LauncherError::Command(format!(
                "bottles-cli exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Adapter for BottlesAdapter {
    fn kind(&self) -> LauncherKind {
        LauncherKind::Bottles
    }

    fn variant(&self) -> InstallVariant {
        InstallVariant::Flatpak
    }

    fn discover(&self) -> Result<Vec<RawDescriptor>, LauncherError> {
        let listing = Self::run_cli(&["list", "bottles", "-f", "environment:gaming"])?;
        let bottles = parse_bottle_list(&listing);

        Ok(collect_programs(&bottles, |bottle| {
            Self::run_cli(&["programs", "-b", bottle])
        }))
    }
}

/// Lists the programs of each bottle. A bottle whose listing fails
/// contributes nothing; the remaining bottles are still queried.
fn collect_programs(
    bottles: &[String],
    list: impl Fn(&str) -> Result<String, LauncherError>,
) -> Vec<RawDescriptor> {
    let mut descriptors = Vec::new();
    for bottle in bottles {
        let programs = match list(bottle) {
            Ok(output) => output,
            Err(e) => {
                warn!(bottle = %bottle, error = %e, "skipping bottle");
                continue;
            }
        };
        for program in parse_program_list(&programs) {
            descriptors.push(program_descriptor(bottle, &program));
        }
    }
    descriptors
}

/// Parses `bottles-cli list bottles` output: one `- <name>` line per bottle.
fn parse_bottle_list(output: &str) -> Vec<String> {
    output
        .lines()
        .filter_map(|line| line.strip_prefix("- "))
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

/// Parses `bottles-cli programs` output, dropping the `Found N programs:`
/// header and list markers.
fn parse_program_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with("Found"))
        .map(|line| line.trim_start_matches("- ").trim().to_string())
        .filter(|name| !name.is_empty())
        .collect()
}

fn program_descriptor(bottle: &str, program: &str) -> RawDescriptor {
    RawDescriptor {
        native_id: Some(format!("{bottle}/{program}")),
        name: Some(program.to_string()),
        launch: vec![
            "flatpak".into(),
            "run".into(),
            "--command=bottles-cli".into(),
            FLATPAK_ID.into(),
            "run".into(),
            "-b".into(),
            bottle.into(),
            "-p".into(),
            program.into(),
        ],
        working_dir: None,
    }
}
