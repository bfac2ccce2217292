//! Nutrient module - the fixed nutrition-fact vocabulary and its table

use std::fmt;

/// One of the ten nutrition-fact categories tracked per product
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NutrientKey {
    /// Energy per serving
    Calories,
    /// Trans fat (g)
    TransFat,
    /// Saturated fat (g)
    SaturatedFat,
    /// Total fat (g)
    TotalFat,
    /// Sodium (mg)
    Sodium,
    /// Cholesterol (mg)
    Cholesterol,
    /// Total carbohydrate (g)
    TotalCarbohydrate,
    /// Dietary fiber (g)
    DietaryFiber,
    /// Protein (g)
    Protein,
    /// Sugars (g)
    Sugars,
}

impl NutrientKey {
    /// Every key, in table order
    pub const ALL: [NutrientKey; 10] = [
        NutrientKey::Calories,
        NutrientKey::TransFat,
        NutrientKey::SaturatedFat,
        NutrientKey::TotalFat,
        NutrientKey::Sodium,
        NutrientKey::Cholesterol,
        NutrientKey::TotalCarbohydrate,
        NutrientKey::DietaryFiber,
        NutrientKey::Protein,
        NutrientKey::Sugars,
    ];

    /// Column-style name of the key
    pub fn as_str(&self) -> &'static str {
        match self {
            NutrientKey::Calories => "calories",
            NutrientKey::TransFat => "trans_fat",
            NutrientKey::SaturatedFat => "saturated_fat",
            NutrientKey::TotalFat => "total_fat",
            NutrientKey::Sodium => "sodium",
            NutrientKey::Cholesterol => "cholesterol",
            NutrientKey::TotalCarbohydrate => "total_carbohydrate",
            NutrientKey::DietaryFiber => "dietary_fiber",
            NutrientKey::Protein => "protein",
            NutrientKey::Sugars => "sugars",
        }
    }

    /// Lowercase phrases that introduce this nutrient in label text.
    ///
    /// Ordered most specific first; the first phrase found wins.
    pub fn display_phrases(&self) -> &'static [&'static str] {
        match self {
            NutrientKey::Calories => &["calories"],
            NutrientKey::TransFat => &["trans fat"],
            NutrientKey::SaturatedFat => &["saturated fat"],
            NutrientKey::TotalFat => &["total fat"],
            NutrientKey::Sodium => &["sodium"],
            NutrientKey::Cholesterol => &["cholesterol"],
            NutrientKey::TotalCarbohydrate => &["total carbohydrate", "carbohydrate"],
            NutrientKey::DietaryFiber => &["dietary fiber"],
            NutrientKey::Protein => &["protein"],
            NutrientKey::Sugars => &["total sugars", "sugars"],
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }

    /// Parse a key from its column name (case-insensitive, spaces allowed)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|key| key.as_str() == normalized)
    }
}

impl fmt::Display for NutrientKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NutrientKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid nutrient: {}", s))
    }
}

/// Quantities for all ten nutrient keys
///
/// Every key is always present. A key with no recognizable value holds `0.0`,
/// so a zero here is not evidence that the nutrient was measured.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NutrientTable {
    values: [f64; 10],
}

impl NutrientTable {
    /// Create a table with every key set to zero
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Quantity for a key
    pub fn get(&self, key: NutrientKey) -> f64 {
        self.values[key.index()]
    }

    /// Set the quantity for a key
    ///
    /// Negative or non-finite quantities are stored as zero.
    pub fn set(&mut self, key: NutrientKey, value: f64) {
        self.values[key.index()] = if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        };
    }

    /// Builder-style variant of [`NutrientTable::set`]
    pub fn with(mut self, key: NutrientKey, value: f64) -> Self {
        self.set(key, value);
        self
    }

    /// Iterate over all ten keys and their quantities
    pub fn iter(&self) -> impl Iterator<Item = (NutrientKey, f64)> + '_ {
        NutrientKey::ALL.into_iter().map(move |key| (key, self.get(key)))
    }

    /// Whether no key carries a non-zero quantity
    pub fn is_all_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }
}
