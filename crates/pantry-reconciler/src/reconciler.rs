//! Cross-source merge

use crate::config::{IdentityStrategy, ReconcilerConfig};
use crate::error::ReconcilerError;
use crate::report::MergeReport;
use pantry_domain::{normalize_whitespace, CanonicalProductRecord, Collector, SourceRecord, Store};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

/// Records produced by one collector of one retailer
#[derive(Debug, Clone)]
pub struct SourceBatch {
    /// Retailer the batch came from
    pub store: Store,

    /// Collection strategy within the retailer
    pub collector: Collector,

    /// Records in collection order
    pub records: Vec<SourceRecord>,
}

impl SourceBatch {
    /// Create a batch
    pub fn new(store: Store, collector: Collector, records: Vec<SourceRecord>) -> Self {
        Self {
            store,
            collector,
            records,
        }
    }
}

/// Result of a merge pass
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// One canonical record per distinct identity, in insertion order
    pub records: Vec<CanonicalProductRecord>,

    /// Merge statistics
    pub report: MergeReport,
}

/// The Reconciler collapses per-source records into canonical records
///
/// Merging is a single ordered pass so that the first record of an identity
/// in priority order always wins.
#[derive(Debug, Clone)]
pub struct Reconciler {
    priority: Vec<Collector>,
    identity: IdentityStrategy,
}

impl Reconciler {
    /// Create a reconciler, validating the configuration
    pub fn new(config: &ReconcilerConfig) -> Result<Self, ReconcilerError> {
        config.validate()?;
        Ok(Self {
            priority: config.priority()?,
            identity: config.identity,
        })
    }

    /// Reconciler with default settings (exact identity)
    pub fn default_config() -> Self {
        Self {
            priority: Collector::ALL.to_vec(),
            identity: IdentityStrategy::Exact,
        }
    }

    fn rank(&self, collector: Collector) -> usize {
        self.priority
            .iter()
            .position(|c| *c == collector)
            .unwrap_or(self.priority.len())
    }

    /// Reconcile records already known to share an identity
    ///
    /// The first named record in collector priority order wins; ties keep the
    /// given order. Returns `None` when no record has a name.
    pub fn reconcile(&self, records: &[SourceRecord]) -> Option<CanonicalProductRecord> {
        let mut ordered: Vec<&SourceRecord> = records.iter().collect();
        ordered.sort_by_key(|record| self.rank(record.collector));
        ordered.into_iter().find_map(CanonicalProductRecord::from_source)
    }

    /// Merge every batch into canonical records
    ///
    /// Batches are ordered by the store's first appearance, then by collector
    /// priority. Identity is scoped to a store: the same name at two retailers
    /// yields two records.
    pub fn merge_all(&self, batches: Vec<SourceBatch>) -> MergeOutcome {
        let mut store_order: Vec<Store> = Vec::new();
        for batch in &batches {
            if !store_order.contains(&batch.store) {
                store_order.push(batch.store);
            }
        }

        let mut batches = batches;
        batches.sort_by_key(|batch| {
            let store_rank = store_order.iter().position(|s| *s == batch.store).unwrap_or(usize::MAX);
            (store_rank, self.rank(batch.collector))
        });

        let mut report = MergeReport::new();
        let mut index = IdentityIndex::new(self.identity);
        let mut records = Vec::new();

        for batch in batches {
            debug!(
                store = %batch.store,
                collector = %batch.collector,
                records = batch.records.len(),
                "Merging batch"
            );
            for record in batch.records {
                report.input_records += 1;

                let Some(name) = record.identity() else {
                    warn!(store = %record.store, collector = %record.collector, "Dropping record without a name");
                    report.record_drop();
                    continue;
                };

                if !index.insert(record.store, name) {
                    debug!(name = %name, collector = %record.collector, "Collapsed duplicate");
                    report.record_duplicate();
                    continue;
                }

                if let Some(canonical) = CanonicalProductRecord::from_source(&record) {
                    report.record_emitted(canonical.store);
                    records.push(canonical);
                }
            }
        }

        info!(
            "Merged {} records into {} ({} duplicates, {} dropped)",
            report.input_records, report.emitted, report.collapsed_duplicates, report.dropped_unnamed
        );
        if report.dropped_unnamed > 0 {
            warn!("Drop rate {:.1}%", report.drop_rate() * 100.0);
        }

        MergeOutcome { records, report }
    }
}

impl Default for Reconciler {
    fn default() -> Self {
        Self::default_config()
    }
}

/// Seen identities per store
struct IdentityIndex {
    strategy: IdentityStrategy,
    keys: HashSet<(Store, String)>,
    fuzzy: HashMap<Store, Vec<String>>,
}

impl IdentityIndex {
    fn new(strategy: IdentityStrategy) -> Self {
        Self {
            strategy,
            keys: HashSet::new(),
            fuzzy: HashMap::new(),
        }
    }

    /// Register a name; returns `false` if an equivalent one was seen
    fn insert(&mut self, store: Store, name: &str) -> bool {
        match self.strategy {
            IdentityStrategy::Exact => self.keys.insert((store, name.to_string())),
            IdentityStrategy::Normalized => self.keys.insert((store, name_key(name))),
            IdentityStrategy::Fuzzy { threshold } => {
                let key = name_key(name);
                let seen = self.fuzzy.entry(store).or_default();
                if seen.iter().any(|other| *other == key || strsim::jaro_winkler(other, &key) > threshold) {
                    return false;
                }
                seen.push(key);
                true
            }
        }
    }
}

/// Lowercased, whitespace-collapsed name
fn name_key(name: &str) -> String {
    normalize_whitespace(name).to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_domain::{NutrientKey, NutrientTable, ProductDetails};

    fn detailed(name: &str, store: Store, collector: Collector, sodium: f64) -> SourceRecord {
        let details = ProductDetails {
            nutrients: NutrientTable::zeroed().with(NutrientKey::Sodium, sodium),
            ..Default::default()
        };
        SourceRecord::detailed(name, store, collector, details)
    }

    fn unnamed(store: Store, collector: Collector) -> SourceRecord {
        let mut record = SourceRecord::name_only("x", store, collector);
        record.name = None;
        record
    }

    #[test]
    fn test_dedup_by_exact_name_prefers_priority() {
        let catalog = SourceBatch::new(
            Store::RetailerA,
            Collector::Catalog,
            vec![detailed("Organic Kale Chips", Store::RetailerA, Collector::Catalog, 300.0)],
        );
        let index = SourceBatch::new(
            Store::RetailerA,
            Collector::ArticleIndex,
            vec![detailed("Organic Kale Chips", Store::RetailerA, Collector::ArticleIndex, 120.0)],
        );

        let outcome = Reconciler::default().merge_all(vec![catalog, index]);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].nutrient_table.get(NutrientKey::Sodium), 120.0);
        assert_eq!(outcome.report.collapsed_duplicates, 1);
    }

    #[test]
    fn test_exact_identity_keeps_near_duplicates() {
        let batch = SourceBatch::new(
            Store::RetailerA,
            Collector::ArticleIndex,
            vec![
                detailed("Organic Kale Chips", Store::RetailerA, Collector::ArticleIndex, 1.0),
                detailed("organic kale chips", Store::RetailerA, Collector::ArticleIndex, 2.0),
                detailed("Organic  Kale Chips", Store::RetailerA, Collector::ArticleIndex, 3.0),
            ],
        );
        let outcome = Reconciler::default().merge_all(vec![batch]);
        assert_eq!(outcome.records.len(), 3);
    }

    #[test]
    fn test_normalized_identity_collapses_case_and_spacing() {
        let batch = SourceBatch::new(
            Store::RetailerA,
            Collector::ArticleIndex,
            vec![
                detailed("Organic Kale Chips", Store::RetailerA, Collector::ArticleIndex, 1.0),
                detailed("organic  KALE chips", Store::RetailerA, Collector::ArticleIndex, 2.0),
            ],
        );
        let reconciler = Reconciler::new(&ReconcilerConfig::normalized()).unwrap();
        let outcome = reconciler.merge_all(vec![batch]);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].name, "Organic Kale Chips");
    }

    #[test]
    fn test_fuzzy_identity() {
        let batch = SourceBatch::new(
            Store::RetailerB,
            Collector::Catalog,
            vec![
                detailed("Organic Kale Chips", Store::RetailerB, Collector::Catalog, 1.0),
                detailed("Organic Kale Chip", Store::RetailerB, Collector::Catalog, 2.0),
                detailed("Sparkling Water", Store::RetailerB, Collector::Catalog, 3.0),
            ],
        );
        let reconciler = Reconciler::new(&ReconcilerConfig::fuzzy(0.95)).unwrap();
        let outcome = reconciler.merge_all(vec![batch]);
        let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Organic Kale Chips", "Sparkling Water"]);
    }

    #[test]
    fn test_identity_is_scoped_to_store() {
        let a = SourceBatch::new(
            Store::RetailerA,
            Collector::Catalog,
            vec![detailed("Hummus", Store::RetailerA, Collector::Catalog, 1.0)],
        );
        let b = SourceBatch::new(
            Store::RetailerB,
            Collector::Catalog,
            vec![detailed("Hummus", Store::RetailerB, Collector::Catalog, 2.0)],
        );
        let outcome = Reconciler::default().merge_all(vec![a, b]);
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.report.per_store[&Store::RetailerA], 1);
        assert_eq!(outcome.report.per_store[&Store::RetailerB], 1);
    }

    #[test]
    fn test_unnamed_records_dropped_and_counted() {
        let batch = SourceBatch::new(
            Store::RetailerC,
            Collector::Catalog,
            vec![
                unnamed(Store::RetailerC, Collector::Catalog),
                detailed("Tea", Store::RetailerC, Collector::Catalog, 0.0),
                SourceRecord::name_only("   ", Store::RetailerC, Collector::Catalog),
            ],
        );
        let outcome = Reconciler::default().merge_all(vec![batch]);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.report.input_records, 3);
        assert_eq!(outcome.report.dropped_unnamed, 2);
        assert!((outcome.report.drop_rate() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_order_is_store_first_appearance_then_priority() {
        let batches = vec![
            SourceBatch::new(
                Store::RetailerB,
                Collector::Catalog,
                vec![detailed("B catalog", Store::RetailerB, Collector::Catalog, 0.0)],
            ),
            SourceBatch::new(
                Store::RetailerA,
                Collector::LabelListing,
                vec![detailed("A label", Store::RetailerA, Collector::LabelListing, 0.0)],
            ),
            SourceBatch::new(
                Store::RetailerB,
                Collector::EditorialPost,
                vec![detailed("B post", Store::RetailerB, Collector::EditorialPost, 0.0)],
            ),
            SourceBatch::new(
                Store::RetailerA,
                Collector::ArticleIndex,
                vec![
                    detailed("A index 1", Store::RetailerA, Collector::ArticleIndex, 0.0),
                    detailed("A index 2", Store::RetailerA, Collector::ArticleIndex, 0.0),
                ],
            ),
        ];
        let outcome = Reconciler::default().merge_all(batches);
        let names: Vec<_> = outcome.records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["B post", "B catalog", "A index 1", "A index 2", "A label"]);
    }

    #[test]
    fn test_every_emitted_record_has_full_nutrient_table() {
        let batch = SourceBatch::new(
            Store::RetailerA,
            Collector::EditorialPost,
            vec![SourceRecord::name_only("Gift Card", Store::RetailerA, Collector::EditorialPost)],
        );
        let outcome = Reconciler::default().merge_all(vec![batch]);
        let record = &outcome.records[0];
        assert_eq!(record.nutrient_table.iter().count(), 10);
        assert!(record.nutrient_table.is_all_zero());
        assert!(record.labels.is_none());
    }

    #[test]
    fn test_reconcile_prefers_priority_and_skips_unnamed() {
        let records = vec![
            detailed("Soyrizo", Store::RetailerA, Collector::Catalog, 1.0),
            unnamed(Store::RetailerA, Collector::ArticleIndex),
            detailed("Soyrizo", Store::RetailerA, Collector::EditorialPost, 2.0),
        ];
        let canonical = Reconciler::default().reconcile(&records).unwrap();
        assert_eq!(canonical.nutrient_table.get(NutrientKey::Sodium), 2.0);

        assert!(Reconciler::default()
            .reconcile(&[unnamed(Store::RetailerA, Collector::Catalog)])
            .is_none());
    }

    #[test]
    fn test_custom_priority() {
        let config = ReconcilerConfig {
            collector_priority: vec!["catalog".to_string()],
            ..Default::default()
        };
        let reconciler = Reconciler::new(&config).unwrap();
        let records = vec![
            detailed("Soyrizo", Store::RetailerA, Collector::ArticleIndex, 1.0),
            detailed("Soyrizo", Store::RetailerA, Collector::Catalog, 2.0),
        ];
        let canonical = reconciler.reconcile(&records).unwrap();
        assert_eq!(canonical.nutrient_table.get(NutrientKey::Sodium), 2.0);
    }
}
