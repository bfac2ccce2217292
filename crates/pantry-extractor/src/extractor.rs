//! Core Extractor implementation

use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::labels::LabelEngine;
use crate::nutrients::{parse_nutrients_detailed, parse_serving_info};
use crate::sections::{InsufficientReason, SectionSplitter, SplitOutcome};
use crate::types::{BatchExtraction, ExtractionIssue, ExtractionMetadata, ExtractionResult, Section};
use pantry_domain::{Label, LabelSet, ProductDetails, RawProductText, ReferenceLabelIndex, SourceRecord};
use rayon::prelude::*;
use std::time::Instant;
use tracing::{debug, info, warn};

/// The Extractor turns scraped page text into per-source records
///
/// Pages are independent of one another; the only shared state is the
/// read-only label engine.
#[derive(Debug, Clone)]
pub struct Extractor {
    config: ExtractorConfig,
    labels: LabelEngine,
    splitter: SectionSplitter,
}

impl Extractor {
    /// Create a new Extractor
    pub fn new(config: ExtractorConfig, index: &ReferenceLabelIndex) -> Result<Self, ExtractorError> {
        config.validate()?;
        let labels = LabelEngine::new(&config.labels, index)?;
        let splitter = SectionSplitter::new(&config.sections);
        Ok(Self {
            config,
            labels,
            splitter,
        })
    }

    /// Replace the label engine (e.g. one with a custom similarity function)
    pub fn with_label_engine(mut self, labels: LabelEngine) -> Self {
        self.labels = labels;
        self
    }

    /// Extract one page
    ///
    /// Never fails: missing sections and unparseable values are recorded as
    /// issues and defaulted.
    pub fn process(&self, raw: RawProductText) -> ExtractionResult {
        let mut issues = Vec::new();

        let (ingredients, nutrition) = if raw.ingredient_block.is_some() || raw.nutrition_block.is_some() {
            (raw.ingredient_block, raw.nutrition_block)
        } else if let Some(page) = raw.page_text.as_deref() {
            match self.splitter.split(page) {
                SplitOutcome::Sections { ingredients, nutrition } => (Some(ingredients), Some(nutrition)),
                SplitOutcome::Insufficient(reason) => {
                    issues.push(match reason {
                        InsufficientReason::MissingIngredientsMarker => {
                            ExtractionIssue::MissingSection(Section::Ingredients)
                        }
                        InsufficientReason::MissingNutritionMarker => {
                            ExtractionIssue::MissingSection(Section::Nutrition)
                        }
                        InsufficientReason::RegionalVarianceDisclaimer => {
                            warn!(name = %raw.name, store = %raw.source_id, "Values vary by region, keeping name only");
                            ExtractionIssue::RegionalVarianceDisclaimer
                        }
                    });
                    debug!(name = %raw.name, ?reason, "Insufficient structured data");
                    return ExtractionResult {
                        record: SourceRecord::name_only(raw.name, raw.source_id, raw.collector),
                        issues,
                    };
                }
            }
        } else {
            (None, None)
        };

        let ingredients = ingredients.filter(|text| !text.trim().is_empty());
        let nutrition = nutrition.filter(|text| !text.trim().is_empty());
        if ingredients.is_none() {
            issues.push(ExtractionIssue::MissingSection(Section::Ingredients));
        }
        if nutrition.is_none() {
            issues.push(ExtractionIssue::MissingSection(Section::Nutrition));
        }

        let (nutrients, unparseable) = parse_nutrients_detailed(nutrition.as_deref());
        issues.extend(unparseable.into_iter().map(ExtractionIssue::UnparseableNumericToken));
        let serving = parse_serving_info(nutrition.as_deref());

        let inferred = self.labels.infer(&raw.name, ingredients.as_deref());
        let labels = match raw.declared_labels.as_deref() {
            Some(declared) => Some(merge_declared(&raw.name, declared, inferred)),
            None => inferred,
        };
        if labels.is_none() {
            issues.push(ExtractionIssue::NoLabelEvidence);
        }

        let record = if ingredients.is_none() && nutrition.is_none() && labels.is_none() {
            SourceRecord::name_only(raw.name, raw.source_id, raw.collector)
        } else {
            let details = ProductDetails {
                ingredients,
                nutrients,
                labels,
                serving_size: serving.serving_size,
                servings_per_container: serving.servings_per_container,
            };
            SourceRecord::detailed(raw.name, raw.source_id, raw.collector, details)
        };

        ExtractionResult { record, issues }
    }

    /// Extract a batch of pages, preserving input order
    pub fn process_all(&self, pages: Vec<RawProductText>) -> BatchExtraction {
        let start = Instant::now();
        let total_pages = pages.len();

        let results: Vec<ExtractionResult> = if self.config.parallel {
            pages.into_par_iter().map(|raw| self.process(raw)).collect()
        } else {
            pages.into_iter().map(|raw| self.process(raw)).collect()
        };

        let partial = results.iter().filter(|r| r.record.is_partial()).count();
        let metadata = ExtractionMetadata {
            total_pages,
            detailed: total_pages - partial,
            partial,
            issues: results.iter().map(|r| r.issues.len()).sum(),
            processing_time_ms: start.elapsed().as_millis() as u64,
        };

        info!(
            "Extracted {} pages ({} detailed, {} name-only) in {}ms",
            metadata.total_pages, metadata.detailed, metadata.partial, metadata.processing_time_ms
        );

        BatchExtraction { results, metadata }
    }
}

/// Union retailer-declared labels with inferred ones
///
/// A declared list, even an empty one, is evidence, so the result is always
/// known.
fn merge_declared(name: &str, declared: &[String], inferred: Option<LabelSet>) -> LabelSet {
    let mut labels = inferred.unwrap_or_default();
    for tag in declared {
        match Label::parse(tag) {
            Some(label) => {
                labels.insert(label);
            }
            None => debug!(name = %name, tag = %tag, "Ignoring unknown declared label"),
        }
    }
    labels
}
