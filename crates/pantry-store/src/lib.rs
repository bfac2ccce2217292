//! Pantry Storage Layer
//!
//! Implements the ProductStore trait on SQLite.
//!
//! # Architecture
//!
//! - One `products` row per canonical record, with a fixed column per nutrient
//! - A `locations` table of physical stores for zipcode search
//! - Searches are built as parameterised SQL from a structured request
//!
//! # Examples
//!
//! ```
//! use pantry_domain::traits::{ProductStore, SearchRequest};
//! use pantry_store::SqliteStore;
//!
//! let store = SqliteStore::new(":memory:").unwrap();
//! let result = store.search(&SearchRequest::default()).unwrap();
//! assert!(result.columns.is_empty() && result.rows.is_empty());
//! ```

#![warn(missing_docs)]

mod search;

use pantry_domain::traits::{Cell, ProductStore, SearchRequest, SearchResult};
use pantry_domain::{
    CanonicalProductRecord, LabelSet, NutrientKey, NutrientTable, ProductId, Store, StoreLocation,
};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur during storage operations
#[derive(Error, Debug)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Invalid data format
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// SQLite-based implementation of ProductStore
///
/// # Thread Safety
///
/// SQLite connections are not thread-safe. Each thread should have its own SqliteStore instance.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Create a new SqliteStore with the given database path
    ///
    /// Use `:memory:` for an in-memory database (useful for testing).
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pantry_store::SqliteStore;
    ///
    /// let store = SqliteStore::new("pantry.db").unwrap();
    /// ```
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let conn = Connection::open(path)?;
        let mut store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    fn initialize_schema(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        Ok(())
    }

    fn product_id_to_bytes(id: ProductId) -> Vec<u8> {
        id.value().to_be_bytes().to_vec()
    }

    fn bytes_to_product_id(bytes: &[u8]) -> Result<ProductId, StoreError> {
        let arr: [u8; 16] = bytes.try_into().map_err(|_| {
            StoreError::InvalidData(format!("Expected 16 bytes for ProductId, got {}", bytes.len()))
        })?;
        Ok(ProductId::from_value(u128::from_be_bytes(arr)))
    }

    fn product_columns() -> String {
        let nutrients: Vec<&str> = NutrientKey::ALL.iter().map(|k| k.as_str()).collect();
        format!(
            "id, name, ingredients, {}, labels, serving_size, servings_per_container, store",
            nutrients.join(", ")
        )
    }

    fn row_to_product(row: &Row<'_>) -> rusqlite::Result<(ProductId, CanonicalProductRecord)> {
        let id_bytes: Vec<u8> = row.get(0)?;
        let id = Self::bytes_to_product_id(&id_bytes).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Blob, Box::new(e))
        })?;

        let mut nutrient_table = NutrientTable::zeroed();
        for (offset, key) in NutrientKey::ALL.into_iter().enumerate() {
            nutrient_table.set(key, row.get(3 + offset)?);
        }

        let labels: Option<String> = row.get(13)?;
        let store_tag: String = row.get(16)?;
        let store = Store::parse(&store_tag).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                16,
                rusqlite::types::Type::Text,
                Box::new(StoreError::InvalidData(format!("Unknown store: {}", store_tag))),
            )
        })?;

        Ok((
            id,
            CanonicalProductRecord {
                name: row.get(1)?,
                ingredients: row.get(2)?,
                nutrient_table,
                labels: labels.map(|tags| LabelSet::parse_tags(&tags)),
                serving_size: row.get(14)?,
                servings_per_container: row.get(15)?,
                store,
            },
        ))
    }

    /// Fetch one product by identity
    pub fn get_product(&self, id: ProductId) -> Result<Option<CanonicalProductRecord>, StoreError> {
        let sql = format!("SELECT {} FROM products WHERE id = ?1", Self::product_columns());
        let product = self
            .conn
            .query_row(&sql, params![Self::product_id_to_bytes(id)], Self::row_to_product)
            .optional()?;
        Ok(product.map(|(_, record)| record))
    }

    /// Every stored product in insertion order
    pub fn all_products(&self) -> Result<Vec<(ProductId, CanonicalProductRecord)>, StoreError> {
        let sql = format!("SELECT {} FROM products ORDER BY rowid", Self::product_columns());
        let mut stmt = self.conn.prepare(&sql)?;
        let products = stmt
            .query_map([], Self::row_to_product)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(products)
    }

    /// Number of stored products
    pub fn product_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM products", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Number of stored locations
    pub fn location_count(&self) -> Result<usize, StoreError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;
        Ok(count as usize)
    }
}

impl ProductStore for SqliteStore {
    type Error = StoreError;

    fn persist(&mut self, records: &[CanonicalProductRecord]) -> Result<Vec<ProductId>, Self::Error> {
        let placeholders: Vec<String> = (1..=17).map(|i| format!("?{}", i)).collect();
        let sql = format!(
            "INSERT INTO products ({}) VALUES ({})",
            Self::product_columns(),
            placeholders.join(", ")
        );

        let tx = self.conn.transaction()?;
        let mut ids = Vec::with_capacity(records.len());
        {
            let mut stmt = tx.prepare(&sql)?;
            for record in records {
                let id = ProductId::new();
                let mut values: Vec<Box<dyn rusqlite::ToSql>> = vec![
                    Box::new(Self::product_id_to_bytes(id)),
                    Box::new(record.name.clone()),
                    Box::new(record.ingredients.clone()),
                ];
                for (_, quantity) in record.nutrient_table.iter() {
                    values.push(Box::new(quantity));
                }
                values.push(Box::new(record.labels.as_ref().map(LabelSet::tags)));
                values.push(Box::new(record.serving_size.clone()));
                values.push(Box::new(record.servings_per_container));
                values.push(Box::new(record.store.as_str()));

                let value_refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();
                stmt.execute(&value_refs[..])?;
                ids.push(id);
            }
        }
        tx.commit()?;

        info!("Persisted {} products", ids.len());
        Ok(ids)
    }

    fn add_locations(&mut self, locations: &[StoreLocation]) -> Result<usize, Self::Error> {
        let tx = self.conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO locations (store, address, city, state, zipcode) VALUES (?1, ?2, ?3, ?4, ?5)",
            )?;
            for location in locations {
                stmt.execute(params![
                    location.store.as_str(),
                    location.address,
                    location.city,
                    location.state,
                    location.zipcode,
                ])?;
            }
        }
        tx.commit()?;

        debug!("Added {} locations", locations.len());
        Ok(locations.len())
    }

    fn search(&self, request: &SearchRequest) -> Result<SearchResult, Self::Error> {
        if request.is_empty() {
            return Ok(SearchResult::empty());
        }

        let Some(query) = search::SearchQuery::build(request) else {
            return Ok(SearchResult::empty());
        };
        debug!(sql = %query.sql, "Running search");

        let mut stmt = self.conn.prepare(&query.sql)?;
        let param_refs: Vec<&dyn rusqlite::ToSql> = query.params.iter().map(|p| p.as_ref()).collect();
        let width = query.columns.len();

        let rows = stmt
            .query_map(&param_refs[..], |row| {
                (0..width)
                    .map(|i| row.get_ref(i).map(search::to_cell))
                    .collect::<rusqlite::Result<Vec<Cell>>>()
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(SearchResult {
            columns: query.columns,
            rows,
        })
    }
}
