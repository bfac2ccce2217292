//! Label Inference Engine
//!
//! Three independent evidence strategies are unioned:
//!
//! 1. **Name substring**: a label keyword (spaced or hyphenated) appears in the
//!    lowercased product name.
//! 2. **Fuzzy exemplar**: the name scores above the threshold against an entry
//!    of a curated reference list. The first exemplar crossing the threshold
//!    wins and the rest of that list is skipped.
//! 3. **Dairy keyword scan**: no dairy indicator appears in the ingredients,
//!    so `dairy_free` is asserted.
//!
//! An empty union is reported as `None` ("labels unknown").

use crate::config::LabelConfig;
use crate::error::ExtractorError;
use pantry_domain::{
    normalize_whitespace, Collector, Label, LabelSet, ProductDetails, ReferenceLabelIndex,
    SourceRecord, Store,
};
use std::collections::HashSet;
use tracing::{debug, trace};

/// String similarity in `[0.0, 1.0]`, higher is closer
pub type Similarity = fn(&str, &str) -> f64;

/// Whether a similarity score crosses the threshold (exclusive)
///
/// ```
/// use pantry_extractor::exceeds_threshold;
///
/// assert!(!exceeds_threshold(0.97, 0.97));
/// assert!(exceeds_threshold(0.971, 0.97));
/// ```
pub fn exceeds_threshold(score: f64, threshold: f64) -> bool {
    score > threshold
}

/// Labels whose keyword appears in the product name
pub fn name_labels(name: &str) -> LabelSet {
    let lower = normalize_whitespace(name).to_lowercase();
    Label::ALL
        .into_iter()
        .filter(|label| {
            lower.contains(label.keyword())
                || label.hyphenated().is_some_and(|h| lower.contains(h))
        })
        .collect()
}

/// Label inference over the same three strategies as [`LabelEngine`]
///
/// Builds matching rules from `config` on each call; unknown curated label
/// names are ignored here, whereas [`LabelEngine::new`] rejects them.
pub fn infer_labels(
    name: &str,
    ingredients: &str,
    index: &ReferenceLabelIndex,
    config: &LabelConfig,
) -> Option<LabelSet> {
    let rules = Rules::lenient(config);
    let curated: Vec<(Label, Vec<String>)> = rules
        .curated
        .iter()
        .map(|label| (*label, lowercase_list(index.exemplars(*label))))
        .collect();
    rules.infer(&curated, name, Some(ingredients))
}

/// Matching rules shared by the engine and the free function
#[derive(Debug, Clone)]
struct Rules {
    curated: Vec<Label>,
    threshold: f64,
    dairy_keywords: Vec<String>,
    similarity: Similarity,
}

impl Rules {
    fn lenient(config: &LabelConfig) -> Self {
        Self {
            curated: config.curated_labels.iter().filter_map(|l| Label::parse(l)).collect(),
            threshold: config.fuzzy_threshold,
            dairy_keywords: lowercase_list(&config.dairy_keywords),
            similarity: strsim::jaro_winkler,
        }
    }

    fn infer(
        &self,
        curated: &[(Label, Vec<String>)],
        name: &str,
        ingredients: Option<&str>,
    ) -> Option<LabelSet> {
        let mut labels = name_labels(name);

        let needle = normalize_whitespace(name).to_lowercase();
        for (label, exemplars) in curated {
            if labels.contains(*label) {
                continue;
            }
            let hit = exemplars
                .iter()
                .find(|exemplar| exceeds_threshold((self.similarity)(&needle, exemplar), self.threshold));
            if let Some(exemplar) = hit {
                trace!(name = %name, exemplar = %exemplar, label = %label, "Fuzzy exemplar match");
                labels.insert(*label);
            }
        }

        if let Some(ingredients) = ingredients {
            if self.is_dairy_free(ingredients) {
                labels.insert(Label::DairyFree);
            }
        }

        if labels.is_empty() {
            None
        } else {
            Some(labels)
        }
    }

    fn is_dairy_free(&self, ingredients: &str) -> bool {
        let lower = ingredients.to_lowercase();
        !self.dairy_keywords.iter().any(|k| lower.contains(k.as_str()))
    }
}

/// Infers dietary labels against an injected reference index
///
/// The curated exemplar lists are normalised once at construction; an engine
/// is read-only afterwards and can serve every worker thread.
#[derive(Debug, Clone)]
pub struct LabelEngine {
    rules: Rules,
    curated: Vec<(Label, Vec<String>)>,
}

impl LabelEngine {
    /// Create an engine, validating the curated label names
    pub fn new(config: &LabelConfig, index: &ReferenceLabelIndex) -> Result<Self, ExtractorError> {
        if !(0.0..=1.0).contains(&config.fuzzy_threshold) {
            return Err(ExtractorError::InvalidThreshold(config.fuzzy_threshold));
        }
        let labels = config.curated()?;

        let curated: Vec<(Label, Vec<String>)> = labels
            .iter()
            .map(|label| (*label, lowercase_list(index.exemplars(*label))))
            .collect();
        debug!(
            curated = curated.len(),
            exemplars = curated.iter().map(|(_, list)| list.len()).sum::<usize>(),
            "Label engine ready"
        );

        Ok(Self {
            rules: Rules {
                curated: labels,
                ..Rules::lenient(config)
            },
            curated,
        })
    }

    /// Replace the similarity function (default Jaro-Winkler)
    pub fn with_similarity(mut self, similarity: Similarity) -> Self {
        self.rules.similarity = similarity;
        self
    }

    /// Infer labels for a product
    ///
    /// Without an ingredient block the dairy scan is skipped; missing text is
    /// not evidence that a product is dairy-free.
    pub fn infer(&self, name: &str, ingredients: Option<&str>) -> Option<LabelSet> {
        self.rules.infer(&self.curated, name, ingredients)
    }

    /// Whether an ingredient statement contains no dairy indicator
    pub fn is_dairy_free(&self, ingredients: &str) -> bool {
        self.rules.is_dairy_free(ingredients)
    }

    /// Similarity threshold in use
    pub fn threshold(&self) -> f64 {
        self.rules.threshold
    }
}

/// One label-listing record per distinct exemplar name in the index
///
/// Each record's labels are every curated list naming it plus any label its
/// name carries as a keyword.
pub fn records_from_reference(index: &ReferenceLabelIndex, store: Store) -> Vec<SourceRecord> {
    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for label in index.labels() {
        for name in index.exemplars(label) {
            if !seen.insert(name.as_str()) {
                continue;
            }
            let mut labels: LabelSet = index.labels_listing(name).into_iter().collect();
            labels.extend_from(&name_labels(name));

            let details = ProductDetails {
                labels: Some(labels),
                ..Default::default()
            };
            records.push(SourceRecord::detailed(
                name.clone(),
                store,
                Collector::LabelListing,
                details,
            ));
        }
    }

    debug!(store = %store, records = records.len(), "Built label-listing records");
    records
}

fn lowercase_list<S: AsRef<str>>(items: &[S]) -> Vec<String> {
    items
        .iter()
        .map(|item| normalize_whitespace(item.as_ref()).to_lowercase())
        .filter(|item| !item.is_empty())
        .collect()
}
