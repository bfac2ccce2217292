//! Pantry Domain Layer
//!
//! This crate contains the value types shared by every stage of the grocery
//! product pipeline, plus the trait boundary to the storage sink. Its only
//! external dependency is `uuid`, used for synthetic row identity.
//!
//! ## Key Concepts
//!
//! - **RawProductText**: transient text scraped from one product page
//! - **NutrientTable**: ten nutrient quantities, never absent, zero-defaulted
//! - **LabelSet**: inferred dietary labels (vegan, kosher, dairy_free, ...)
//! - **ReferenceLabelIndex**: retailer-curated exemplar names per label
//! - **SourceRecord**: one product as seen by one retailer collector, either
//!   a name-only partial or a detailed record
//! - **CanonicalProductRecord**: the unified record handed to storage
//!
//! ## Architecture
//!
//! - Pure value types and trait definitions only
//! - Extraction, reconciliation and storage live in other crates

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod label;
pub mod nutrient;
pub mod product;
pub mod reference;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use label::{Label, LabelSet};
pub use nutrient::{NutrientKey, NutrientTable};
pub use product::{CanonicalProductRecord, ProductDetails, ProductId, RecordBody, SourceRecord};
pub use reference::{normalize_whitespace, ReferenceIndexBuilder, ReferenceLabelIndex};
pub use source::{Collector, RawProductText, Store, StoreLocation};
