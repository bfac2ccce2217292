//! Retailer column → canonical field mapping

use pantry_domain::{NutrientKey, Store};
use std::collections::HashMap;
use std::fmt;

/// A field of the canonical product record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CanonicalField {
    /// Product name
    Name,
    /// Ingredient statement
    Ingredients,
    /// One nutrient quantity
    Nutrient(NutrientKey),
    /// Dietary labels
    Labels,
    /// Serving size text
    ServingSize,
    /// Servings per container
    ServingsPerContainer,
}

impl CanonicalField {
    /// Canonical attribute name
    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Name => "name",
            CanonicalField::Ingredients => "ingredients",
            CanonicalField::Nutrient(key) => key.as_str(),
            CanonicalField::Labels => "labels",
            CanonicalField::ServingSize => "serving_size",
            CanonicalField::ServingsPerContainer => "servings_per_container",
        }
    }

    /// Parse a canonical attribute name
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "name" => Some(CanonicalField::Name),
            "ingredients" => Some(CanonicalField::Ingredients),
            "labels" => Some(CanonicalField::Labels),
            "serving_size" => Some(CanonicalField::ServingSize),
            "servings_per_container" => Some(CanonicalField::ServingsPerContainer),
            other => NutrientKey::parse(other).map(CanonicalField::Nutrient),
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed mapping from one retailer's export columns to canonical fields
///
/// Column names are matched case-insensitively after trimming.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenameTable {
    columns: HashMap<String, CanonicalField>,
}

impl RenameTable {
    /// An empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table for a retailer's export layout
    pub fn for_store(store: Store) -> Self {
        use CanonicalField::*;
        use NutrientKey::*;

        let pairs: &[(&str, CanonicalField)] = match store {
            Store::RetailerA => &[
                ("name", Name),
                ("ingredients", Ingredients),
                ("calories", Nutrient(Calories)),
                ("trans_fat", Nutrient(TransFat)),
                ("tot_fat", Nutrient(TotalFat)),
                ("satu_fat", Nutrient(SaturatedFat)),
                ("sodium", Nutrient(Sodium)),
                ("cholesterol", Nutrient(Cholesterol)),
                ("tot_carhy", Nutrient(TotalCarbohydrate)),
                ("diet_fiber", Nutrient(DietaryFiber)),
                ("protein", Nutrient(Protein)),
                ("sugars", Nutrient(Sugars)),
                ("serve_ct", ServingsPerContainer),
                ("serve_size", ServingSize),
                ("labels", Labels),
            ],
            Store::RetailerB => &[
                ("product name", Name),
                ("ingredients", Ingredients),
                ("calories", Nutrient(Calories)),
                ("trans fat", Nutrient(TransFat)),
                ("saturated fat", Nutrient(SaturatedFat)),
                ("total fat", Nutrient(TotalFat)),
                ("sodium", Nutrient(Sodium)),
                ("cholesterol", Nutrient(Cholesterol)),
                ("total carbohydrate", Nutrient(TotalCarbohydrate)),
                ("dietary fiber", Nutrient(DietaryFiber)),
                ("protein", Nutrient(Protein)),
                ("sugars", Nutrient(Sugars)),
                ("labels", Labels),
                ("serving size", ServingSize),
                ("servings per container", ServingsPerContainer),
            ],
            Store::RetailerC => &[
                ("name", Name),
                ("ingred", Ingredients),
                ("serv_size", ServingSize),
                ("tot_serv", ServingsPerContainer),
                ("calories", Nutrient(Calories)),
                ("tot_fat", Nutrient(TotalFat)),
                ("satu_fat", Nutrient(SaturatedFat)),
                ("trans_fat", Nutrient(TransFat)),
                ("tot_carhy", Nutrient(TotalCarbohydrate)),
                ("sugar", Nutrient(Sugars)),
                ("protein", Nutrient(Protein)),
                ("sodium", Nutrient(Sodium)),
                ("diet_fiber", Nutrient(DietaryFiber)),
                ("cholestreol", Nutrient(Cholesterol)),
                ("labels", Labels),
            ],
        };

        pairs
            .iter()
            .fold(Self::new(), |table, (column, field)| table.with(*column, *field))
    }

    /// Add or replace a column mapping
    pub fn with(mut self, column: impl AsRef<str>, field: CanonicalField) -> Self {
        self.columns.insert(normalize_column(column.as_ref()), field);
        self
    }

    /// Canonical field for a retailer column
    pub fn field(&self, column: &str) -> Option<CanonicalField> {
        self.columns.get(&normalize_column(column)).copied()
    }

    /// Number of mapped columns
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Whether no column is mapped
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn normalize_column(column: &str) -> String {
    column.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tables_cover_every_field() {
        for store in Store::ALL {
            let table = RenameTable::for_store(store);
            assert_eq!(table.len(), 15, "{} table", store);

            let fields: std::collections::HashSet<_> = table.columns.values().copied().collect();
            assert!(fields.contains(&CanonicalField::Name));
            for key in NutrientKey::ALL {
                assert!(fields.contains(&CanonicalField::Nutrient(key)), "{} misses {}", store, key);
            }
        }
    }

    #[test]
    fn test_retailer_c_abbreviations() {
        let table = RenameTable::for_store(Store::RetailerC);
        assert_eq!(table.field("ingred"), Some(CanonicalField::Ingredients));
        assert_eq!(table.field("cholestreol"), Some(CanonicalField::Nutrient(NutrientKey::Cholesterol)));
        assert_eq!(table.field("sugar"), Some(CanonicalField::Nutrient(NutrientKey::Sugars)));
        assert_eq!(table.field(" TOT_SERV "), Some(CanonicalField::ServingsPerContainer));
        assert_eq!(table.field("id"), None);
    }

    #[test]
    fn test_override() {
        let table = RenameTable::for_store(Store::RetailerB).with("Title", CanonicalField::Name);
        assert_eq!(table.field("title"), Some(CanonicalField::Name));
    }

    #[test]
    fn test_field_parse() {
        assert_eq!(CanonicalField::parse("name"), Some(CanonicalField::Name));
        assert_eq!(
            CanonicalField::parse("saturated_fat"),
            Some(CanonicalField::Nutrient(NutrientKey::SaturatedFat))
        );
        assert_eq!(CanonicalField::parse("Serving_Size"), Some(CanonicalField::ServingSize));
        assert!(CanonicalField::parse("price").is_none());

        for key in NutrientKey::ALL {
            let field = CanonicalField::Nutrient(key);
            assert_eq!(CanonicalField::parse(field.as_str()), Some(field));
        }
    }
}
