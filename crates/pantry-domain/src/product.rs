//! Product module - per-source records and the canonical product record

use crate::label::LabelSet;
use crate::nutrient::NutrientTable;
use crate::source::{Collector, Store};
use std::fmt;

/// Synthetic row identity assigned by the storage sink (UUIDv7)
///
/// UUIDv7 keeps identities sortable by insertion time without coordination
/// between ingest runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductId(u128);

impl ProductId {
    /// Generate a new UUIDv7-based ProductId
    ///
    /// # Examples
    ///
    /// ```
    /// use pantry_domain::ProductId;
    ///
    /// let id = ProductId::new();
    /// assert!(id.value() > 0);
    /// ```
    pub fn new() -> Self {
        Self(uuid::Uuid::now_v7().as_u128())
    }

    /// Create a ProductId from a raw u128 value
    ///
    /// This is primarily for storage layer deserialization.
    pub fn from_value(value: u128) -> Self {
        Self(value)
    }

    /// Parse a ProductId from a UUID string
    pub fn from_string(s: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(s)
            .map(|u| Self(u.as_u128()))
            .map_err(|e| format!("Invalid UUIDv7 string: {}", e))
    }

    /// Get the raw u128 value
    pub fn value(&self) -> u128 {
        self.0
    }
}

impl Default for ProductId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", uuid::Uuid::from_u128(self.0))
    }
}

/// Everything recovered from a page beyond its name
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ProductDetails {
    /// Free-text ingredient statement
    pub ingredients: Option<String>,

    /// Nutrition facts (all ten keys, zero-defaulted)
    pub nutrients: NutrientTable,

    /// Dietary labels; `None` means no evidence either way
    pub labels: Option<LabelSet>,

    /// Serving size as printed ("2 oz", "1 cup (30g)")
    pub serving_size: Option<String>,

    /// Servings per container
    pub servings_per_container: Option<f64>,
}

/// What a per-source record carries beyond identity
#[derive(Debug, Clone, PartialEq)]
pub enum RecordBody {
    /// Extraction gave up; only the name is usable
    NameOnly,
    /// Extraction produced details
    Detailed(ProductDetails),
}

/// One product as seen by one collector of one retailer
///
/// A record without a name cannot be identified and is dropped during
/// reconciliation.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceRecord {
    /// Product name (primary identity)
    pub name: Option<String>,

    /// Origin retailer
    pub store: Store,

    /// Collection strategy within the retailer
    pub collector: Collector,

    /// Partial or detailed payload
    pub body: RecordBody,
}

impl SourceRecord {
    /// A partial record carrying only a name
    pub fn name_only(name: impl Into<String>, store: Store, collector: Collector) -> Self {
        Self {
            name: Some(name.into()),
            store,
            collector,
            body: RecordBody::NameOnly,
        }
    }

    /// A record with extracted details
    pub fn detailed(
        name: impl Into<String>,
        store: Store,
        collector: Collector,
        details: ProductDetails,
    ) -> Self {
        Self {
            name: Some(name.into()),
            store,
            collector,
            body: RecordBody::Detailed(details),
        }
    }

    /// Name, if present and not blank
    pub fn identity(&self) -> Option<&str> {
        self.name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Details, if this is not a partial record
    pub fn details(&self) -> Option<&ProductDetails> {
        match &self.body {
            RecordBody::NameOnly => None,
            RecordBody::Detailed(details) => Some(details),
        }
    }

    /// Whether only the name was recovered
    pub fn is_partial(&self) -> bool {
        matches!(self.body, RecordBody::NameOnly)
    }
}

/// The unified, cross-retailer product record
///
/// Immutable once emitted by the reconciler.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalProductRecord {
    /// Product name
    pub name: String,

    /// Free-text ingredient statement
    pub ingredients: Option<String>,

    /// Nutrition facts, always fully populated
    pub nutrient_table: NutrientTable,

    /// `None` = labels unknown, `Some(empty)` = confirmed no labels apply
    pub labels: Option<LabelSet>,

    /// Serving size as printed
    pub serving_size: Option<String>,

    /// Servings per container
    pub servings_per_container: Option<f64>,

    /// Retailer carrying the product
    pub store: Store,
}

impl CanonicalProductRecord {
    /// Build a canonical record from a named source record
    ///
    /// Returns `None` when the record has no usable name. Partial records get
    /// an all-zero nutrient table and unknown labels.
    pub fn from_source(record: &SourceRecord) -> Option<Self> {
        let name = record.identity()?.to_string();
        let canonical = match &record.body {
            RecordBody::NameOnly => Self {
                name,
                ingredients: None,
                nutrient_table: NutrientTable::zeroed(),
                labels: None,
                serving_size: None,
                servings_per_container: None,
                store: record.store,
            },
            RecordBody::Detailed(details) => Self {
                name,
                ingredients: details.ingredients.clone(),
                nutrient_table: details.nutrients,
                labels: details.labels.clone(),
                serving_size: details.serving_size.clone(),
                servings_per_container: details.servings_per_container,
                store: record.store,
            },
        };
        Some(canonical)
    }
}
