//! Sunshine target configuration: `apps.json` store and merge engine.
//!
//! The store owns reading and atomically rewriting Sunshine's `apps.json`;
//! the merge engine reconciles discovered [`sunray_model::GameRecord`]s
//! against it. Fields sunray does not understand round-trip untouched.

pub mod error;
pub mod merge;
pub mod store;
pub mod types;

pub use error::StoreError;
pub use merge::{MergeAction, MergeMode, MergeOutcome, MergeReport, merge};
pub use store::Store;
pub use types::{App, AppsConfig};
