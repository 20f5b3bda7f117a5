//! Reconciling discovered games against the existing configuration.

use std::collections::HashMap;

use sunray_model::{GameRecord, normalized_name};
use tracing::debug;

use crate::types::{App, AppsConfig, shell_join};

/// How to treat a discovered game whose identity already exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergeMode {
    /// Leave the existing entry exactly as it is.
    #[default]
    SkipExisting,
    /// Overwrite the launch command, artwork, and working directory;
    /// everything else on the entry is preserved.
    Update,
}

/// What happened to one discovered record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    Added,
    Updated,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub name: String,
    pub action: MergeAction,
}

/// Per-record outcomes of a merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeReport {
    pub outcomes: Vec<MergeOutcome>,
}

impl MergeReport {
    pub fn added(&self) -> usize {
        self.count(MergeAction::Added)
    }

    pub fn updated(&self) -> usize {
        self.count(MergeAction::Updated)
    }

    pub fn skipped(&self) -> usize {
        self.count(MergeAction::Skipped)
    }

    fn count(&self, action: MergeAction) -> usize {
        self.outcomes.iter().filter(|o| o.action == action).count()
    }
}

/// Merges discovered records into the configuration.
///
/// Matching is by stored identity first; entries that predate sunray (no
/// `sunray-id`) are matched by normalized display name so a game the user
/// added by hand is never duplicated. Name matches are skipped even in
/// [`MergeMode::Update`] since their launch commands were never sunray's.
/// Existing entries with no discovered counterpart are left untouched;
/// nothing is ever deleted.
///
/// The caller persists the result with a single `Store::save`.
pub fn merge(config: &mut AppsConfig, records: &[GameRecord], mode: MergeMode) -> MergeReport {
    let mut by_id: HashMap<String, usize> = HashMap::new();
    let mut by_name: HashMap<String, usize> = HashMap::new();

    for (i, app) in config.apps.iter().enumerate() {
        if let Some(id) = &app.sunray_id {
            by_id.insert(id.clone(), i);
        }
        by_name.entry(normalized_name(&app.name)).or_insert(i);
    }

    let mut report = MergeReport::default();

    for record in records {
        let key = record.identity().to_string();

        let action = if let Some(&i) = by_id.get(&key) {
            match mode {
                MergeMode::SkipExisting => MergeAction::Skipped,
                MergeMode::Update => {
                    update_in_place(&mut config.apps[i], record);
                    MergeAction::Updated
                }
            }
        } else if by_name.contains_key(&normalized_name(&record.name)) {
            debug!(game = %record.name, "name already present, presumed manual entry");
            MergeAction::Skipped
        } else {
            let app = App::from_record(record);
            by_id.insert(key, config.apps.len());
            by_name.insert(normalized_name(&app.name), config.apps.len());
            config.apps.push(app);
            MergeAction::Added
        };

        report.outcomes.push(MergeOutcome {
            name: record.name.clone(),
            action,
        });
    }

    report
}

/// Overwrites only the fields sunray owns. A record without artwork keeps
/// the entry's existing image rather than clearing it.
fn update_in_place(app: &mut App, record: &GameRecord) {
    app.cmd = Some(shell_join(&record.launch));
    if let Some(artwork) = &record.artwork {
        app.image_path = Some(artwork.to_string_lossy().into_owned());
    }
    app.working_dir = record
        .working_dir
        .as_ref()
        .map(|p| p.to_string_lossy().into_owned())
        .or(app.working_dir.take());
}
