//! Merge statistics

use pantry_domain::Store;
use std::collections::BTreeMap;

/// Counts collected during a merge pass
///
/// Unnamed records are dropped rather than failing the merge; the drop rate
/// is the signal that a retailer layout has drifted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MergeReport {
    /// Records offered to the merge
    pub input_records: usize,

    /// Canonical records emitted
    pub emitted: usize,

    /// Records dropped for lacking a name
    pub dropped_unnamed: usize,

    /// Records collapsed into an earlier record with the same identity
    pub collapsed_duplicates: usize,

    /// Emitted records per store
    pub per_store: BTreeMap<Store, usize>,
}

impl MergeReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an emitted canonical record
    pub fn record_emitted(&mut self, store: Store) {
        self.emitted += 1;
        *self.per_store.entry(store).or_insert(0) += 1;
    }

    /// Record a dropped unnamed record
    pub fn record_drop(&mut self) {
        self.dropped_unnamed += 1;
    }

    /// Record a collapsed duplicate
    pub fn record_duplicate(&mut self) {
        self.collapsed_duplicates += 1;
    }

    /// Share of input records dropped for lacking a name
    pub fn drop_rate(&self) -> f64 {
        if self.input_records == 0 {
            0.0
        } else {
            self.dropped_unnamed as f64 / self.input_records as f64
        }
    }

    /// Generate a summary report
    pub fn summary(&self) -> String {
        let mut lines = vec![
            "Merge Summary".to_string(),
            "=============".to_string(),
            format!("Input records: {}", self.input_records),
            format!("Emitted: {}", self.emitted),
            format!("Collapsed duplicates: {}", self.collapsed_duplicates),
            format!(
                "Dropped (no name): {} ({:.1}%)",
                self.dropped_unnamed,
                self.drop_rate() * 100.0
            ),
        ];

        if !self.per_store.is_empty() {
            lines.push(String::new());
            lines.push("Emitted by store:".to_string());
            for (store, count) in &self.per_store {
                lines.push(format!("  {}: {}", store.display_name(), count));
            }
        }

        lines.join("\n")
    }
}
