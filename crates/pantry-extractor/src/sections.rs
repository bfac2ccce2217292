//! Section splitting for free-text product pages
//!
//! Some retailers render the ingredient statement and nutrition facts inline
//! in the page body, introduced by literal markers. The splitter walks the
//! text through two states (seeking the ingredients marker, then seeking the
//! nutrition marker) and either yields both sections or names the reason the
//! page lacks usable structure.

use crate::config::SectionConfig;
use tracing::debug;

/// Why a page could not be split into sections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsufficientReason {
    /// No ingredients marker on the page
    MissingIngredientsMarker,
    /// Ingredients marker found but no nutrition marker after it
    MissingNutritionMarker,
    /// The page states its values vary by region or size
    RegionalVarianceDisclaimer,
}

/// Outcome of splitting a page
#[derive(Debug, Clone, PartialEq)]
pub enum SplitOutcome {
    /// Both sections were isolated
    Sections {
        /// Text between the ingredients and nutrition markers
        ingredients: String,
        /// Text after the nutrition marker, up to the trailer
        nutrition: String,
    },
    /// The caller must fall back to a name-only record
    Insufficient(InsufficientReason),
}

enum State<'a> {
    SeekingIngredients(&'a str),
    SeekingNutrition(&'a str),
    Done(SplitOutcome),
}

/// Splits free-text pages into ingredient and nutrition sections
#[derive(Debug, Clone)]
pub struct SectionSplitter {
    ingredients_marker: String,
    nutrition_marker: String,
    nutrition_trailer: Option<String>,
    disclaimers: Vec<String>,
}

impl SectionSplitter {
    /// Create a splitter from configuration
    pub fn new(config: &SectionConfig) -> Self {
        Self {
            ingredients_marker: config.ingredients_marker.clone(),
            nutrition_marker: config.nutrition_marker.clone(),
            nutrition_trailer: config
                .nutrition_trailer
                .as_ref()
                .map(|t| t.to_ascii_lowercase())
                .filter(|t| !t.is_empty()),
            disclaimers: config
                .disclaimer_phrases
                .iter()
                .map(|p| p.to_ascii_lowercase())
                .filter(|p| !p.is_empty())
                .collect(),
        }
    }

    /// Split a page into sections
    pub fn split(&self, page: &str) -> SplitOutcome {
        let mut state = State::SeekingIngredients(page);

        loop {
            state = match state {
                State::SeekingIngredients(text) => match text.find(&self.ingredients_marker) {
                    Some(pos) => State::SeekingNutrition(&text[pos + self.ingredients_marker.len()..]),
                    None => State::Done(SplitOutcome::Insufficient(
                        InsufficientReason::MissingIngredientsMarker,
                    )),
                },
                State::SeekingNutrition(text) => {
                    let lower = text.to_ascii_lowercase();
                    if self.disclaimers.iter().any(|d| lower.contains(d.as_str())) {
                        debug!("Page carries a regional variance disclaimer");
                        State::Done(SplitOutcome::Insufficient(
                            InsufficientReason::RegionalVarianceDisclaimer,
                        ))
                    } else {
                        match text.find(&self.nutrition_marker) {
                            Some(pos) => State::Done(SplitOutcome::Sections {
                                ingredients: tidy(&text[..pos]),
                                nutrition: tidy(self.cut_trailer(&text[pos + self.nutrition_marker.len()..])),
                            }),
                            None => State::Done(SplitOutcome::Insufficient(
                                InsufficientReason::MissingNutritionMarker,
                            )),
                        }
                    }
                }
                State::Done(outcome) => return outcome,
            };
        }
    }

    fn cut_trailer<'a>(&self, nutrition: &'a str) -> &'a str {
        match &self.nutrition_trailer {
            Some(trailer) => {
                let lower = nutrition.to_ascii_lowercase();
                match lower.find(trailer.as_str()) {
                    Some(end) => &nutrition[..end],
                    None => nutrition,
                }
            }
            None => nutrition,
        }
    }
}

impl Default for SectionSplitter {
    fn default() -> Self {
        Self::new(&SectionConfig::default())
    }
}

/// Trim and collapse whitespace within each line, dropping blank lines
fn tidy(text: &str) -> String {
    text.lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
