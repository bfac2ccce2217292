//! Configuration for the Extractor

use crate::error::ExtractorError;
use pantry_domain::Label;
use serde::{Deserialize, Serialize};

/// Default similarity a product name must exceed to match a curated exemplar
pub const DEFAULT_FUZZY_THRESHOLD: f64 = 0.97;

/// Label inference settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Jaro-Winkler score an exemplar must exceed (strictly) to match
    pub fuzzy_threshold: f64,

    /// Ingredient keywords whose presence rules out `dairy_free`
    pub dairy_keywords: Vec<String>,

    /// Labels whose curated exemplar lists take part in fuzzy matching
    pub curated_labels: Vec<String>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: DEFAULT_FUZZY_THRESHOLD,
            dairy_keywords: ["milk", "cream", "cheese", "curd", "custard", "rennet"]
                .into_iter()
                .map(String::from)
                .collect(),
            curated_labels: ["vegan", "gluten_free", "kosher"]
                .into_iter()
                .map(String::from)
                .collect(),
        }
    }
}

impl LabelConfig {
    /// Parse the curated label names
    pub fn curated(&self) -> Result<Vec<Label>, ExtractorError> {
        self.curated_labels
            .iter()
            .map(|name| Label::parse(name).ok_or_else(|| ExtractorError::UnknownLabel(name.clone())))
            .collect()
    }
}

/// Markers used to split free-text pages into sections
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SectionConfig {
    /// Literal marker opening the ingredient statement
    pub ingredients_marker: String,

    /// Literal marker opening the nutrition facts
    pub nutrition_marker: String,

    /// Phrase after which the nutrition section is footnotes (case-insensitive)
    pub nutrition_trailer: Option<String>,

    /// Phrases stating values vary by region or size (case-insensitive)
    pub disclaimer_phrases: Vec<String>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            ingredients_marker: "INGREDIENTS:".to_string(),
            nutrition_marker: "NUTRITION FACTS:".to_string(),
            nutrition_trailer: Some("tells you".to_string()),
            disclaimer_phrases: vec!["varies by region".to_string()],
        }
    }
}

/// Configuration for the Extractor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Process pages on the rayon thread pool
    pub parallel: bool,

    /// Label inference settings
    pub labels: LabelConfig,

    /// Free-text section splitting settings
    pub sections: SectionConfig,
}

impl ExtractorConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ExtractorError> {
        let threshold = self.labels.fuzzy_threshold;
        if !(0.0..=1.0).contains(&threshold) {
            return Err(ExtractorError::InvalidThreshold(threshold));
        }
        self.labels.curated()?;
        if self.labels.dairy_keywords.iter().any(|k| k.trim().is_empty()) {
            return Err(ExtractorError::Config("dairy_keywords must not contain blank entries".to_string()));
        }
        if self.sections.ingredients_marker.is_empty() || self.sections.nutrition_marker.is_empty() {
            return Err(ExtractorError::Config("section markers must not be empty".to_string()));
        }
        Ok(())
    }

    /// Strict preset: only near-identical exemplar names match
    pub fn strict() -> Self {
        let mut config = Self::default();
        config.labels.fuzzy_threshold = 0.99;
        config
    }

    /// Lenient preset: looser exemplar matching, parallel processing
    pub fn lenient() -> Self {
        let mut config = Self::default();
        config.labels.fuzzy_threshold = 0.93;
        config.parallel = true;
        config
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ExtractorError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ExtractorError> {
        toml::to_string_pretty(self)
            .map_err(|e| ExtractorError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
