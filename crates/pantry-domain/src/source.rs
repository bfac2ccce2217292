//! Source module - retailers, their collectors, and raw scraped text

use std::fmt;

/// One of the three retailer data origins
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Store {
    /// Free-text product pages with inline INGREDIENTS / NUTRITION FACTS markers
    RetailerA,
    /// Structured product pages with a nutrition table and declared diets
    RetailerB,
    /// Marketplace listings with nutrition rows and label filters
    RetailerC,
}

impl Store {
    /// Every store, in declaration order
    pub const ALL: [Store; 3] = [Store::RetailerA, Store::RetailerB, Store::RetailerC];

    /// Storage tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Store::RetailerA => "retailer_a",
            Store::RetailerB => "retailer_b",
            Store::RetailerC => "retailer_c",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            Store::RetailerA => "Retailer A",
            Store::RetailerB => "Retailer B",
            Store::RetailerC => "Retailer C",
        }
    }

    /// Parse a store from its tag or display name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|store| store.as_str() == normalized)
    }
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Store {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid store: {}", s))
    }
}

/// Internal collection strategy a retailer's records came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collector {
    /// Product pages reached by walking article indices
    ArticleIndex,
    /// Editorial posts featuring products
    EditorialPost,
    /// Curated dietary-label listing pages
    LabelListing,
    /// Category and browse pages
    Catalog,
}

impl Collector {
    /// Every collector, in default priority order
    pub const ALL: [Collector; 4] = [
        Collector::ArticleIndex,
        Collector::EditorialPost,
        Collector::LabelListing,
        Collector::Catalog,
    ];

    /// Storage/config tag
    pub fn as_str(&self) -> &'static str {
        match self {
            Collector::ArticleIndex => "article_index",
            Collector::EditorialPost => "editorial_post",
            Collector::LabelListing => "label_listing",
            Collector::Catalog => "catalog",
        }
    }

    /// Parse a collector tag (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace([' ', '-'], "_");
        Self::ALL.into_iter().find(|c| c.as_str() == normalized)
    }
}

impl fmt::Display for Collector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Collector {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid collector: {}", s))
    }
}

/// Text scraped from one product page
///
/// Produced by the fetch layer, consumed once by the extractor, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct RawProductText {
    /// Product name as shown on the page
    pub name: String,

    /// Ingredient statement, when the page layout separates it
    pub ingredient_block: Option<String>,

    /// Nutrition-facts text, when the page layout separates it
    pub nutrition_block: Option<String>,

    /// Whole page text for free-text layouts that need section splitting
    pub page_text: Option<String>,

    /// Dietary labels the retailer states on the page
    pub declared_labels: Option<Vec<String>>,

    /// Origin retailer
    pub source_id: Store,

    /// Collection strategy that produced the page
    pub collector: Collector,
}

impl RawProductText {
    /// Create raw text carrying only a name
    pub fn new(name: impl Into<String>, source_id: Store) -> Self {
        Self {
            name: name.into(),
            ingredient_block: None,
            nutrition_block: None,
            page_text: None,
            declared_labels: None,
            source_id,
            collector: Collector::Catalog,
        }
    }

    /// Set the ingredient block
    pub fn with_ingredients(mut self, text: impl Into<String>) -> Self {
        self.ingredient_block = Some(text.into());
        self
    }

    /// Set the nutrition block
    pub fn with_nutrition(mut self, text: impl Into<String>) -> Self {
        self.nutrition_block = Some(text.into());
        self
    }

    /// Set the free-text page body
    pub fn with_page_text(mut self, text: impl Into<String>) -> Self {
        self.page_text = Some(text.into());
        self
    }

    /// Set the retailer-declared labels
    pub fn with_declared_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.declared_labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    /// Set the collector
    pub fn with_collector(mut self, collector: Collector) -> Self {
        self.collector = collector;
        self
    }
}

/// A physical store location, used for zipcode search
#[derive(Debug, Clone, PartialEq)]
pub struct StoreLocation {
    /// Retailer operating the location
    pub store: Store,
    /// Street address
    pub address: String,
    /// City
    pub city: String,
    /// State or region
    pub state: String,
    /// Postal code
    pub zipcode: String,
}
