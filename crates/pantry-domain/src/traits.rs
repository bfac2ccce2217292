//! Trait definitions for external interactions
//!
//! These traits define the boundary between the pipeline and the storage
//! sink. Infrastructure implementations live in other crates.

use crate::label::Label;
use crate::nutrient::NutrientKey;
use crate::product::{CanonicalProductRecord, ProductId};
use crate::source::{Store, StoreLocation};
use std::fmt;

/// Trait for persisting canonical records and querying them back
///
/// Implemented by the infrastructure layer (pantry-store)
pub trait ProductStore {
    /// Error type for store operations
    type Error;

    /// Persist canonical records, returning the identity assigned to each
    fn persist(&mut self, records: &[CanonicalProductRecord]) -> Result<Vec<ProductId>, Self::Error>;

    /// Register physical store locations
    fn add_locations(&mut self, locations: &[StoreLocation]) -> Result<usize, Self::Error>;

    /// Run a structured filter request
    ///
    /// An empty request yields an empty result (no columns, no rows).
    fn search(&self, request: &SearchRequest) -> Result<SearchResult, Self::Error>;
}

/// Direction of a nutrient bound
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    /// Quantity must be at most this value
    AtMost(f64),
    /// Quantity must be at least this value
    AtLeast(f64),
}

/// A bound on one nutrient
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NutrientBound {
    /// Nutrient being bounded
    pub key: NutrientKey,
    /// Bound on its quantity
    pub bound: Bound,
}

/// Structured filter request produced by a search front end
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchRequest {
    /// Every word must appear in the product name
    pub name_contains: Option<String>,

    /// Per-nutrient upper/lower bounds
    pub nutrient_bounds: Vec<NutrientBound>,

    /// Every label must be present
    pub labels: Vec<Label>,

    /// Product must come from one of these stores
    pub stores: Vec<Store>,

    /// Every word must appear in the ingredients
    pub ingredients_contain: Option<String>,

    /// No word may appear in the ingredients
    pub ingredients_exclude: Option<String>,

    /// Store location postal code must start with this prefix
    pub zipcode_prefix: Option<String>,
}

impl SearchRequest {
    /// Whether the request carries no criteria at all
    pub fn is_empty(&self) -> bool {
        self.name_contains.as_deref().is_none_or(|s| s.trim().is_empty())
            && self.nutrient_bounds.is_empty()
            && self.labels.is_empty()
            && self.stores.is_empty()
            && ingredient_words(self.ingredients_contain.as_deref()).is_empty()
            && ingredient_words(self.ingredients_exclude.as_deref()).is_empty()
            && self.zipcode_prefix.as_deref().is_none_or(|s| s.trim().is_empty())
    }
}

/// Words of an ingredient filter; commas separate words like whitespace
pub fn ingredient_words(text: Option<&str>) -> Vec<String> {
    text.map(|t| t.replace(',', " ").split_whitespace().map(String::from).collect())
        .unwrap_or_default()
}

/// One value in a search result row
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    /// SQL NULL
    Null,
    /// Integer value
    Integer(i64),
    /// Floating-point value
    Real(f64),
    /// Text value
    Text(String),
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Integer(v) => write!(f, "{}", v),
            Cell::Real(v) => write!(f, "{}", v),
            Cell::Text(v) => f.write_str(v),
        }
    }
}

/// Column names and rows returned by a search
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchResult {
    /// Unqualified column names, in row order
    pub columns: Vec<String>,
    /// Result rows; every row has `columns.len()` cells
    pub rows: Vec<Vec<Cell>>,
}

impl SearchResult {
    /// The `([], [])` result
    pub fn empty() -> Self {
        Self::default()
    }

    /// Whether there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Index of a column by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}
