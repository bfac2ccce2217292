//! Reconciler configuration

use crate::error::ReconcilerError;
use crate::rename::{CanonicalField, RenameTable};
use pantry_domain::{Collector, Store};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// How two records are judged to be the same product
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum IdentityStrategy {
    /// Trimmed names must be identical
    #[default]
    Exact,

    /// Names compared case-insensitively with whitespace collapsed
    Normalized,

    /// Normalized names whose Jaro-Winkler score exceeds the threshold
    Fuzzy {
        /// Score a pair must exceed (strictly)
        threshold: f64,
    },
}

/// Configuration for reconciliation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    /// Collectors in merge priority order, highest first
    pub collector_priority: Vec<String>,

    /// Identity check used for deduplication
    pub identity: IdentityStrategy,

    /// Per-store column overrides layered over the built-in tables
    /// (`store tag → column → canonical field`)
    pub renames: BTreeMap<String, BTreeMap<String, String>>,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            collector_priority: Collector::ALL.iter().map(|c| c.as_str().to_string()).collect(),
            identity: IdentityStrategy::Exact,
            renames: BTreeMap::new(),
        }
    }
}

impl ReconcilerConfig {
    /// Normalized-name identity
    pub fn normalized() -> Self {
        Self {
            identity: IdentityStrategy::Normalized,
            ..Default::default()
        }
    }

    /// Fuzzy identity at the given threshold
    pub fn fuzzy(threshold: f64) -> Self {
        Self {
            identity: IdentityStrategy::Fuzzy { threshold },
            ..Default::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ReconcilerError> {
        if let IdentityStrategy::Fuzzy { threshold } = self.identity {
            if !(0.0..=1.0).contains(&threshold) {
                return Err(ReconcilerError::InvalidThreshold(threshold));
            }
        }
        self.priority()?;
        for store in Store::ALL {
            self.rename_table(store)?;
        }
        for tag in self.renames.keys() {
            Store::parse(tag).ok_or_else(|| ReconcilerError::UnknownStore(tag.clone()))?;
        }
        Ok(())
    }

    /// Collector priority, highest first
    ///
    /// Collectors missing from the configured list rank after it.
    pub fn priority(&self) -> Result<Vec<Collector>, ReconcilerError> {
        let mut order = Vec::with_capacity(Collector::ALL.len());
        for name in &self.collector_priority {
            let collector =
                Collector::parse(name).ok_or_else(|| ReconcilerError::UnknownCollector(name.clone()))?;
            if order.contains(&collector) {
                return Err(ReconcilerError::Config(format!("collector '{}' listed twice", name)));
            }
            order.push(collector);
        }
        for collector in Collector::ALL {
            if !order.contains(&collector) {
                order.push(collector);
            }
        }
        Ok(order)
    }

    /// The rename table for a store: built-in mapping plus overrides
    pub fn rename_table(&self, store: Store) -> Result<RenameTable, ReconcilerError> {
        let mut table = RenameTable::for_store(store);
        let overrides = self
            .renames
            .iter()
            .filter(|(tag, _)| Store::parse(tag) == Some(store))
            .flat_map(|(_, columns)| columns.iter());

        for (column, field) in overrides {
            let field = CanonicalField::parse(field).ok_or_else(|| ReconcilerError::UnknownField {
                column: column.clone(),
                field: field.clone(),
            })?;
            table = table.with(column, field);
        }
        Ok(table)
    }

    /// Load configuration from TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ReconcilerError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ReconcilerError> {
        toml::to_string_pretty(self)
            .map_err(|e| ReconcilerError::Config(format!("Failed to serialize to TOML: {}", e)))
    }
}
