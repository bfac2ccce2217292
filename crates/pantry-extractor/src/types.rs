//! Result types for extraction

use pantry_domain::{NutrientKey, SourceRecord};
use std::fmt;

/// A section of a product page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// Ingredient statement
    Ingredients,
    /// Nutrition facts
    Nutrition,
}

/// Something extraction recovered from instead of failing
///
/// None of these abort a record; they are reported so callers can measure
/// how much of the scraped text was usable.
#[derive(Debug, Clone, PartialEq)]
pub enum ExtractionIssue {
    /// A section was absent from the page; its fields were defaulted
    MissingSection(Section),

    /// A nutrient phrase matched but no number followed it; defaulted to zero
    UnparseableNumericToken(NutrientKey),

    /// The page states values vary by region or size; only the name was kept
    RegionalVarianceDisclaimer,

    /// No label strategy produced evidence; labels are unknown
    NoLabelEvidence,
}

impl fmt::Display for ExtractionIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractionIssue::MissingSection(Section::Ingredients) => write!(f, "missing ingredients section"),
            ExtractionIssue::MissingSection(Section::Nutrition) => write!(f, "missing nutrition section"),
            ExtractionIssue::UnparseableNumericToken(key) => write!(f, "no number after '{}'", key),
            ExtractionIssue::RegionalVarianceDisclaimer => write!(f, "values vary by region"),
            ExtractionIssue::NoLabelEvidence => write!(f, "no label evidence"),
        }
    }
}

/// Result of extracting one page
#[derive(Debug, Clone)]
pub struct ExtractionResult {
    /// The per-source record (partial or detailed)
    pub record: SourceRecord,

    /// Recoveries made along the way
    pub issues: Vec<ExtractionIssue>,
}

/// Metadata about a batch extraction
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionMetadata {
    /// Pages processed
    pub total_pages: usize,

    /// Records with details
    pub detailed: usize,

    /// Name-only partial records
    pub partial: usize,

    /// Total recoveries across all pages
    pub issues: usize,

    /// Wall-clock processing time in milliseconds
    pub processing_time_ms: u64,
}

/// Result of extracting a batch of pages
#[derive(Debug, Clone)]
pub struct BatchExtraction {
    /// Per-page results, in input order
    pub results: Vec<ExtractionResult>,

    /// Batch metadata
    pub metadata: ExtractionMetadata,
}

impl BatchExtraction {
    /// The extracted records, in input order
    pub fn into_records(self) -> Vec<SourceRecord> {
        self.results.into_iter().map(|r| r.record).collect()
    }
}
