//! Launcher adapters for sunray.
//!
//! One adapter per (launcher, install variant) pair behind the [`Adapter`]
//! trait. [`detect_adapters`] probes which launchers are present on this
//! machine and [`discover_all`] runs every adapter, containing per-adapter
//! and per-entry failures so one broken launcher never aborts a run.

pub mod bottles;
pub mod error;
pub mod heroic;
pub mod lutris;
pub mod probe;
pub mod retroarch;
pub mod ryujinx;
pub mod steam;
pub mod vdf;

use std::path::Path;

use sunray_model::{GameRecord, InstallVariant, LauncherKind, RawDescriptor, normalize};
use tracing::{debug, warn};

pub use error::LauncherError;

/// A launcher adapter: reads one launcher's on-disk metadata and yields
/// raw game descriptors.
pub trait Adapter {
    fn kind(&self) -> LauncherKind;
    fn variant(&self) -> InstallVariant;

    /// Reads the launcher's metadata store.
    ///
    /// Returns every entry the launcher knows about, including incomplete
    /// ones; normalization downstream decides what is usable. Errors here
    /// mean the whole store was unreadable, not that one entry was bad.
    fn discover(&self) -> Result<Vec<RawDescriptor>, LauncherError>;
}

/// Outcome of running one adapter, for user-facing reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryReport {
    pub kind: LauncherKind,
    pub variant: InstallVariant,
    /// Games that normalized into usable records.
    pub found: usize,
    /// Entries dropped as malformed.
    pub skipped: usize,
    /// Set when the adapter itself failed and contributed nothing.
    pub error: Option<String>,
}

/// Probes for every supported launcher and returns the available adapters.
///
/// A launcher is considered available when its expected configuration path
/// exists; the flatpak layout wins over the native one when both are present,
/// matching how the launchers themselves resolve it.
pub fn detect_adapters(home: &Path) -> Vec<Box<dyn Adapter>> {
    let mut adapters: Vec<Box<dyn Adapter>> = Vec::new();

    if let Some(a) = steam::SteamAdapter::detect(home) {
        adapters.push(Box::new(a));
    }
    if let Some(a) = lutris::LutrisAdapter::detect(home) {
        adapters.push(Box::new(a));
    }
    if let Some(a) = heroic::HeroicAdapter::detect(home) {
        adapters.push(Box::new(a));
    }
    if let Some(a) = bottles::BottlesAdapter::detect(home) {
        adapters.push(Box::new(a));
    }
    if let Some(a) = retroarch::RetroArchAdapter::detect(home) {
        adapters.push(Box::new(a));
    }
    if let Some(a) = ryujinx::RyujinxAdapter::detect(home) {
        adapters.push(Box::new(a));
    }

    adapters
}

/// Runs every adapter and normalizes the results.
///
/// Adapter-level failures are logged and reported as an empty contribution;
/// malformed entries are skipped individually. Ordering of the returned
/// records follows adapter order and carries no meaning.
pub fn discover_all(adapters: &[Box<dyn Adapter>]) -> (Vec<GameRecord>, Vec<DiscoveryReport>) {
    let mut records = Vec::new();
    let mut reports = Vec::new();

    for adapter in adapters {
        let kind = adapter.kind();
        let variant = adapter.variant();

        let raws = match adapter.discover() {
            Ok(raws) => raws,
            Err(e) => {
                warn!(launcher = %kind, %variant, error = %e, "launcher scan failed");
                reports.push(DiscoveryReport {
                    kind,
                    variant,
                    found: 0,
                    skipped: 0,
                    error: Some(e.to_string()),
                });
                continue;
            }
        };

        let mut found = 0;
        let mut skipped = 0;
        for raw in raws {
            match normalize(raw, kind) {
                Ok(record) => {
                    found += 1;
                    records.push(record);
                }
                Err(e) => {
                    debug!(launcher = %kind, error = %e, "skipping entry");
                    skipped += 1;
                }
            }
        }

        reports.push(DiscoveryReport {
            kind,
            variant,
            found,
            skipped,
            error: None,
        });
    }

    (records, reports)
}
