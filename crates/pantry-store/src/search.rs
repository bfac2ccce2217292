//! SQL construction for structured product searches

use pantry_domain::traits::{ingredient_words, Bound, Cell, SearchRequest};
use rusqlite::types::ValueRef;
use rusqlite::ToSql;

/// A built query: SQL text, its parameters and the unqualified column names
pub(crate) struct SearchQuery {
    pub(crate) sql: String,
    pub(crate) params: Vec<Box<dyn ToSql>>,
    pub(crate) columns: Vec<String>,
}

impl SearchQuery {
    /// Translate a request into SQL, or `None` when no criterion is usable
    ///
    /// Always selects name, store and address, then one extra column per
    /// filtered attribute. Every criterion is ANDed.
    pub(crate) fn build(request: &SearchRequest) -> Option<Self> {
        let mut select: Vec<(String, String)> = vec![
            ("p.name".to_string(), "name".to_string()),
            ("p.store".to_string(), "store".to_string()),
            ("l.address".to_string(), "address".to_string()),
        ];
        let mut conditions: Vec<String> = Vec::new();
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        if let Some(name) = &request.name_contains {
            for word in name.split_whitespace() {
                conditions.push("p.name LIKE ? ESCAPE '\\'".to_string());
                params.push(Box::new(contains_pattern(word)));
            }
        }

        for bound in &request.nutrient_bounds {
            let column = bound.key.as_str();
            add_column(&mut select, format!("p.{}", column), column);
            let (op, value) = match bound.bound {
                Bound::AtMost(v) => ("<=", v),
                Bound::AtLeast(v) => (">=", v),
            };
            conditions.push(format!("p.{} {} ?", column, op));
            params.push(Box::new(value));
        }

        for label in &request.labels {
            conditions.push("(',' || p.labels || ',') LIKE ? ESCAPE '\\'".to_string());
            params.push(Box::new(format!("%,{},%", escape_like(label.as_str()))));
        }

        if !request.stores.is_empty() {
            let placeholders = vec!["?"; request.stores.len()].join(", ");
            conditions.push(format!("p.store IN ({})", placeholders));
            for store in &request.stores {
                params.push(Box::new(store.as_str()));
            }
        }

        let contain_words = ingredient_words(request.ingredients_contain.as_deref());
        let exclude_words = ingredient_words(request.ingredients_exclude.as_deref());
        if !contain_words.is_empty() || !exclude_words.is_empty() {
            add_column(&mut select, "p.ingredients".to_string(), "ingredients");
        }
        for word in contain_words {
            conditions.push("p.ingredients LIKE ? ESCAPE '\\'".to_string());
            params.push(Box::new(contains_pattern(&word)));
        }
        for word in exclude_words {
            conditions.push("(p.ingredients IS NOT NULL AND p.ingredients NOT LIKE ? ESCAPE '\\')".to_string());
            params.push(Box::new(contains_pattern(&word)));
        }

        if let Some(prefix) = request.zipcode_prefix.as_deref().map(str::trim).filter(|p| !p.is_empty()) {
            add_column(&mut select, "l.zipcode".to_string(), "zipcode");
            conditions.push("l.zipcode LIKE ? ESCAPE '\\'".to_string());
            params.push(Box::new(format!("{}%", escape_like(prefix))));
        }

        if conditions.is_empty() {
            return None;
        }

        let mut sql = format!(
            "SELECT {} FROM products p LEFT JOIN locations l ON l.store = p.store",
            select.iter().map(|(expr, _)| expr.as_str()).collect::<Vec<_>>().join(", ")
        );
        sql.push_str(" WHERE ");
        sql.push_str(&conditions.join(" AND "));
        sql.push_str(" ORDER BY p.rowid, l.id");

        Some(Self {
            sql,
            params,
            columns: select.into_iter().map(|(_, name)| name).collect(),
        })
    }
}

fn add_column(select: &mut Vec<(String, String)>, expr: String, name: &str) {
    if !select.iter().any(|(_, existing)| existing == name) {
        select.push((expr, name.to_string()));
    }
}

/// `%word%` LIKE pattern with the wildcard characters of `word` escaped
fn contains_pattern(word: &str) -> String {
    format!("%{}%", escape_like(word))
}

fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub(crate) fn to_cell(value: ValueRef<'_>) -> Cell {
    match value {
        ValueRef::Null => Cell::Null,
        ValueRef::Integer(v) => Cell::Integer(v),
        ValueRef::Real(v) => Cell::Real(v),
        ValueRef::Text(bytes) => Cell::Text(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Cell::Text(format!("<{} bytes>", bytes.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pantry_domain::traits::NutrientBound;
    use pantry_domain::{Label, NutrientKey, Store};

    #[test]
    fn test_base_columns() {
        let request = SearchRequest {
            name_contains: Some("kale chips".to_string()),
            ..Default::default()
        };
        let query = SearchQuery::build(&request).unwrap();
        assert_eq!(query.columns, vec!["name", "store", "address"]);
        assert_eq!(query.params.len(), 2);
        assert!(query.sql.contains("p.name LIKE ? ESCAPE '\\' AND p.name LIKE ? ESCAPE '\\'"));
    }

    #[test]
    fn test_filter_columns_added_once() {
        let request = SearchRequest {
            nutrient_bounds: vec![
                NutrientBound { key: NutrientKey::Sodium, bound: Bound::AtMost(200.0) },
                NutrientBound { key: NutrientKey::Sodium, bound: Bound::AtLeast(10.0) },
                NutrientBound { key: NutrientKey::Protein, bound: Bound::AtLeast(5.0) },
            ],
            ingredients_contain: Some("oats".to_string()),
            ingredients_exclude: Some("milk, honey".to_string()),
            zipcode_prefix: Some("606".to_string()),
            ..Default::default()
        };
        let query = SearchQuery::build(&request).unwrap();
        assert_eq!(
            query.columns,
            vec!["name", "store", "address", "sodium", "protein", "ingredients", "zipcode"]
        );
        assert!(query.sql.contains("p.sodium <= ?"));
        assert!(query.sql.contains("p.sodium >= ?"));
        assert!(query.sql.contains("p.protein >= ?"));
        // 3 bounds + 1 contains + 2 excludes + 1 zipcode
        assert_eq!(query.params.len(), 7);
    }

    #[test]
    fn test_labels_and_stores() {
        let request = SearchRequest {
            labels: vec![Label::Vegan, Label::GlutenFree],
            stores: vec![Store::RetailerA, Store::RetailerC],
            ..Default::default()
        };
        let query = SearchQuery::build(&request).unwrap();
        assert!(query.sql.contains("p.store IN (?, ?)"));
        assert_eq!(query.params.len(), 4);
        assert_eq!(query.columns.len(), 3);
    }

    #[test]
    fn test_no_usable_criterion_builds_nothing() {
        let request = SearchRequest {
            name_contains: Some("  ".to_string()),
            ingredients_contain: Some(",".to_string()),
            ..Default::default()
        };
        assert!(SearchQuery::build(&request).is_none());
    }

    #[test]
    fn test_like_wildcards_escaped() {
        assert_eq!(contains_pattern("50%"), "%50\\%%");
        assert_eq!(escape_like("a_b\\c"), "a\\_b\\\\c");
        assert_eq!(escape_like("kale"), "kale");
    }
}
