//! Error types for the Extractor
//!
//! Extraction itself never fails on bad page text; these errors cover
//! configuration only.

use thiserror::Error;

/// Errors that can occur while configuring extraction
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Similarity threshold outside [0.0, 1.0]
    #[error("Invalid similarity threshold: {0} (expected 0.0..=1.0)")]
    InvalidThreshold(f64),

    /// Label name not in the canonical vocabulary
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ExtractorError {
    fn from(e: toml::de::Error) -> Self {
        ExtractorError::Config(format!("Failed to parse TOML: {}", e))
    }
}
