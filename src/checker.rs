//! Runs the enabled checks over a document diff.
//!
//! Checks are independent, so they run in parallel; their outputs are
//! concatenated and sorted once into canonical order, which makes the
//! result independent of scheduling.

use crate::changes::{filter_by_level, sort_changes, Change, Level};
use crate::checks::{self, Check};
use crate::config::CheckConfig;
use crate::diff::DocumentDiff;
use crate::model::SourceLocations;
use rayon::prelude::*;
use tracing::{debug, info};

/// Classifies the changes in a [`DocumentDiff`].
pub struct Checker {
    config: CheckConfig,
}

impl Checker {
    #[must_use]
    pub const fn new(config: CheckConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &CheckConfig {
        &self.config
    }

    /// Checks selected by the configuration, in registry order.
    pub fn enabled_checks(&self) -> impl Iterator<Item = &'static dyn Check> + '_ {
        checks::checks()
            .iter()
            .copied()
            .filter(|check| self.config.is_check_enabled(check.name()))
    }

    /// Run every enabled check and return the changes in canonical order.
    #[must_use]
    pub fn run(&self, diff: &DocumentDiff<'_>, sources: &SourceLocations) -> Vec<Change> {
        let enabled: Vec<&dyn Check> = self.enabled_checks().collect();
        let mut changes: Vec<Change> = enabled
            .par_iter()
            .flat_map_iter(|check| {
                let found = check.run(diff, sources, &self.config);
                debug!(check = check.name(), changes = found.len(), "check finished");
                found
            })
            .collect();
        sort_changes(&mut changes);
        info!(
            checks = enabled.len(),
            changes = changes.len(),
            breaking = changes.iter().filter(|c| c.level == Level::Err).count(),
            "classified changes"
        );
        changes
    }

    /// Like [`run`](Self::run), keeping only changes at or above `min`.
    #[must_use]
    pub fn run_filtered(
        &self,
        diff: &DocumentDiff<'_>,
        sources: &SourceLocations,
        min: Level,
    ) -> Vec<Change> {
        filter_by_level(self.run(diff, sources), min)
    }
}
