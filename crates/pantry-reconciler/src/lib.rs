//! Pantry Reconciler
//!
//! Normalizes per-source records onto the canonical schema and deduplicates
//! them by product identity.
//!
//! The Reconciler provides:
//! - Column-rename projection of tabular retailer exports
//! - Priority-ordered merge with exact, normalized or fuzzy identity
//! - A merge report counting drops and collapsed duplicates
//!
//! # Examples
//!
//! ```
//! use pantry_domain::{Collector, SourceRecord, Store};
//! use pantry_reconciler::{Reconciler, SourceBatch};
//!
//! let editorial = SourceBatch::new(
//!     Store::RetailerA,
//!     Collector::EditorialPost,
//!     vec![SourceRecord::name_only("Organic Kale Chips", Store::RetailerA, Collector::EditorialPost)],
//! );
//! let index = SourceBatch::new(
//!     Store::RetailerA,
//!     Collector::ArticleIndex,
//!     vec![SourceRecord::name_only("Organic Kale Chips", Store::RetailerA, Collector::ArticleIndex)],
//! );
//!
//! let outcome = Reconciler::default().merge_all(vec![editorial, index]);
//! assert_eq!(outcome.records.len(), 1);
//! assert_eq!(outcome.report.collapsed_duplicates, 1);
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod projection;
mod reconciler;
mod rename;
mod report;

pub use config::{IdentityStrategy, ReconcilerConfig};
pub use error::ReconcilerError;
pub use projection::{project, project_rows};
pub use reconciler::{MergeOutcome, Reconciler, SourceBatch};
pub use rename::{CanonicalField, RenameTable};
pub use report::MergeReport;
