//! Canonical game records shared across the sunray crates.
//!
//! Launcher adapters produce [`RawDescriptor`]s, [`normalize`] turns them
//! into [`GameRecord`]s, and [`IdentityKey`] deduplicates records across
//! discovery runs and launchers.

pub mod identity;
pub mod record;

pub use identity::{IdentityKey, normalized_name};
pub use record::{
    GameRecord, InstallVariant, LauncherKind, MalformedDescriptor, RawDescriptor, normalize,
};
