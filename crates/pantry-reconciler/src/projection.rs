//! Projection of tabular retailer exports onto per-source records
//!
//! Retailer exports arrive as JSON objects keyed by the retailer's own column
//! names. Cells are loosely typed: numbers may be JSON numbers or text with
//! units, and labels may be arrays, comma lists or set literals such as
//! `{'vegan', 'kosher'}`.

use crate::rename::{CanonicalField, RenameTable};
use pantry_domain::{
    Collector, Label, LabelSet, ProductDetails, RecordBody, SourceRecord, Store,
};
use pantry_extractor::first_quantity;
use serde_json::{Map, Value};
use tracing::debug;

/// Project one exported row onto a source record
///
/// Unmapped columns are ignored. A row whose only non-empty mapped cell is
/// the name becomes a name-only record.
pub fn project(row: &Map<String, Value>, store: Store, collector: Collector, table: &RenameTable) -> SourceRecord {
    let mut name = None;
    let mut details = ProductDetails::default();
    let mut has_details = false;

    for (column, cell) in row {
        let Some(field) = table.field(column) else {
            debug!(column = %column, store = %store, "Ignoring unmapped column");
            continue;
        };
        if is_blank(cell) {
            continue;
        }

        match field {
            CanonicalField::Name => name = text(cell),
            CanonicalField::Ingredients => {
                details.ingredients = text(cell);
                has_details |= details.ingredients.is_some();
            }
            CanonicalField::Nutrient(key) => {
                details.nutrients.set(key, quantity(cell).unwrap_or(0.0));
                has_details = true;
            }
            CanonicalField::Labels => {
                details.labels = Some(labels(cell));
                has_details = true;
            }
            CanonicalField::ServingSize => {
                details.serving_size = text(cell);
                has_details |= details.serving_size.is_some();
            }
            CanonicalField::ServingsPerContainer => {
                details.servings_per_container = servings(cell);
                has_details |= details.servings_per_container.is_some();
            }
        }
    }

    SourceRecord {
        name,
        store,
        collector,
        body: if has_details {
            RecordBody::Detailed(details)
        } else {
            RecordBody::NameOnly
        },
    }
}

/// Project every row of an export
///
/// Non-object rows yield unnamed records, which reconciliation drops and
/// counts.
pub fn project_rows(rows: &[Value], store: Store, collector: Collector, table: &RenameTable) -> Vec<SourceRecord> {
    rows.iter()
        .map(|row| match row {
            Value::Object(map) => project(map, store, collector, table),
            _ => SourceRecord {
                name: None,
                store,
                collector,
                body: RecordBody::NameOnly,
            },
        })
        .collect()
}

fn is_blank(cell: &Value) -> bool {
    match cell {
        Value::Null => true,
        Value::String(s) => {
            let s = s.trim();
            s.is_empty() || s.eq_ignore_ascii_case("nan") || s.eq_ignore_ascii_case("null")
        }
        _ => false,
    }
}

fn text(cell: &Value) -> Option<String> {
    let s = match cell {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

fn quantity(cell: &Value) -> Option<f64> {
    match cell {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => first_quantity(s),
        _ => None,
    }
}

fn servings(cell: &Value) -> Option<f64> {
    match cell {
        Value::String(s) if s.to_lowercase().contains("vari") => None,
        other => quantity(other),
    }
}

fn labels(cell: &Value) -> LabelSet {
    let tags: Vec<String> = match cell {
        Value::Array(items) => items.iter().filter_map(text).collect(),
        Value::String(s) => s
            .trim()
            .trim_start_matches(['{', '['])
            .trim_end_matches(['}', ']'])
            .split(',')
            .map(|tag| tag.trim().trim_matches(['\'', '"']).to_string())
            .collect(),
        _ => Vec::new(),
    };

    let mut set = LabelSet::new();
    for tag in tags.iter().filter(|t| !t.is_empty()) {
        match Label::parse(tag) {
            Some(label) => {
                set.insert(label);
            }
            None => debug!(tag = %tag, "Ignoring unknown label"),
        }
    }
    set
}
