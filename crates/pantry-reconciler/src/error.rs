//! Reconciler error types

use thiserror::Error;

/// Errors that can occur while configuring reconciliation
///
/// Merging itself never fails; unusable records are dropped and counted.
#[derive(Error, Debug)]
pub enum ReconcilerError {
    /// Store tag not recognized
    #[error("Unknown store: {0}")]
    UnknownStore(String),

    /// Collector name not recognized
    #[error("Unknown collector: {0}")]
    UnknownCollector(String),

    /// Canonical field name not recognized
    #[error("Unknown canonical field '{field}' for column '{column}'")]
    UnknownField {
        /// Retailer column being mapped
        column: String,
        /// Offending target field
        field: String,
    },

    /// Similarity threshold outside [0.0, 1.0]
    #[error("Invalid identity threshold: {0} (expected 0.0..=1.0)")]
    InvalidThreshold(f64),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<toml::de::Error> for ReconcilerError {
    fn from(e: toml::de::Error) -> Self {
        ReconcilerError::Config(format!("Failed to parse TOML: {}", e))
    }
}
