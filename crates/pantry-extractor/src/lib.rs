//! Pantry Extractor
//!
//! Turns scraped product-page text into per-source records.
//!
//! # Overview
//!
//! Two independent components consume the same raw text:
//!
//! - **Nutrient Parser**: locates each of the ten nutrient phrases and reads
//!   the first number after it, defaulting to zero.
//! - **Label Inference Engine**: unions name keywords, fuzzy matches against
//!   curated exemplar lists and an ingredient dairy scan.
//!
//! Free-text pages are first cut into sections by a two-state splitter.
//!
//! # Architecture
//!
//! ```text
//! RawProductText → Extractor → SourceRecord → Reconciler → ProductStore
//! ```
//!
//! # Example Usage
//!
//! ```
//! use pantry_domain::{Label, NutrientKey, RawProductText, ReferenceLabelIndex, Store};
//! use pantry_extractor::{Extractor, ExtractorConfig};
//!
//! let index = ReferenceLabelIndex::empty();
//! let extractor = Extractor::new(ExtractorConfig::default(), &index).unwrap();
//!
//! let raw = RawProductText::new("Organic Almond Bar", Store::RetailerB)
//!     .with_ingredients("almonds, dates")
//!     .with_nutrition("Total Fat 12.5g, Sodium 30mg");
//!
//! let result = extractor.process(raw);
//! let details = result.record.details().unwrap();
//! assert_eq!(details.nutrients.get(NutrientKey::TotalFat), 12.5);
//!
//! let labels = details.labels.as_ref().unwrap();
//! assert!(labels.contains(Label::Organic));
//! assert!(labels.contains(Label::DairyFree));
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod extractor;
mod labels;
mod nutrients;
mod sections;
mod types;

#[cfg(test)]
mod tests;

pub use config::{ExtractorConfig, LabelConfig, SectionConfig, DEFAULT_FUZZY_THRESHOLD};
pub use error::ExtractorError;
pub use extractor::Extractor;
pub use labels::{exceeds_threshold, infer_labels, name_labels, records_from_reference, LabelEngine, Similarity};
pub use nutrients::{first_quantity, parse_nutrients, parse_nutrients_detailed, parse_serving_info, ServingInfo};
pub use sections::{InsufficientReason, SectionSplitter, SplitOutcome};
pub use types::{BatchExtraction, ExtractionIssue, ExtractionMetadata, ExtractionResult, Section};
