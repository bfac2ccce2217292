//! Nutrient Parser - typed nutrient tables from loosely formatted text
//!
//! Retailer layouts place the nutrient name, a colon, units and the value in
//! varying order ("Total Fat 12.5g", "Sodium (mg): 300", "Protein | 4 g").
//! Each key is located by phrase and parsed independently, so a broken value
//! for one nutrient never affects the others.

use once_cell::sync::Lazy;
use pantry_domain::{NutrientKey, NutrientTable};
use regex::Regex;

/// Characters that end the text belonging to one nutrient
const SEPARATORS: &[char] = &[',', ';', '|', '\n'];

/// Digits with at most one decimal point, then an optional lowercase unit
static QUANTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?|\.\d+)([a-z]*)").expect("quantity pattern is valid"));

/// A comma grouping thousands ("1,200"), not followed by a further digit
static DIGIT_GROUP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d),(\d{3})(\D|$)").expect("digit group pattern is valid"));

/// "8 servings", "about 2.5 servings"
static SERVINGS_COUNT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*servings?\b").expect("servings pattern is valid"));

/// Parse a nutrition-facts block into a table
///
/// An absent block yields the all-zero table. Keys whose phrase is missing, or
/// whose phrase is not followed by a number, are zero.
///
/// # Examples
///
/// ```
/// use pantry_extractor::parse_nutrients;
/// use pantry_domain::NutrientKey;
///
/// let table = parse_nutrients(Some("Total Fat 12.5g, Sodium 300mg"));
/// assert_eq!(table.get(NutrientKey::TotalFat), 12.5);
/// assert_eq!(table.get(NutrientKey::Sodium), 300.0);
/// assert_eq!(table.get(NutrientKey::Protein), 0.0);
/// ```
pub fn parse_nutrients(block: Option<&str>) -> NutrientTable {
    parse_nutrients_detailed(block).0
}

/// Parse a nutrition block, also reporting keys whose phrase had no number
pub fn parse_nutrients_detailed(block: Option<&str>) -> (NutrientTable, Vec<NutrientKey>) {
    let mut table = NutrientTable::zeroed();
    let mut unparseable = Vec::new();

    let Some(block) = block else {
        return (table, unparseable);
    };
    let lower = strip_digit_grouping(&block.to_ascii_lowercase());

    for key in NutrientKey::ALL {
        let Some(segment) = segment_after_phrase(&lower, key.display_phrases()) else {
            continue;
        };
        match first_quantity(segment) {
            Some(value) => table.set(key, value),
            None => unparseable.push(key),
        }
    }

    (table, unparseable)
}

/// First numeric token in a text, ignoring any prefix and unit suffix
///
/// ```
/// use pantry_extractor::first_quantity;
///
/// assert_eq!(first_quantity(": 12.5g"), Some(12.5));
/// assert_eq!(first_quantity("(mg) 300"), Some(300.0));
/// assert_eq!(first_quantity("n/a"), None);
/// ```
pub fn first_quantity(text: &str) -> Option<f64> {
    QUANTITY_RE
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())
}

/// Drop thousands separators so "1,200mg" is one quantity
fn strip_digit_grouping(text: &str) -> String {
    let mut current = text.to_string();
    // "1,200,000" needs two passes since matches cannot overlap
    loop {
        let next = DIGIT_GROUP_RE.replace_all(&current, "${1}${2}${3}").into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Text between the first matching phrase and the next separator
///
/// An occurrence directly after "added" belongs to the added-sugars line and
/// is skipped.
fn segment_after_phrase<'a>(lower: &'a str, phrases: &[&str]) -> Option<&'a str> {
    phrases.iter().find_map(|phrase| {
        lower
            .match_indices(phrase)
            .find(|(pos, _)| !lower[..*pos].trim_end().ends_with("added"))
            .map(|(pos, _)| {
                let rest = &lower[pos + phrase.len()..];
                let end = rest.find(SEPARATORS).unwrap_or(rest.len());
                &rest[..end]
            })
    })
}

/// Serving information printed alongside nutrition facts
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ServingInfo {
    /// Serving size as printed ("2 oz", "1 cup (30g)")
    pub serving_size: Option<String>,

    /// Servings per container
    pub servings_per_container: Option<f64>,
}

/// Extract serving size and servings per container from a nutrition block
///
/// Servings per container is left unset when the block says servings vary.
pub fn parse_serving_info(block: Option<&str>) -> ServingInfo {
    let Some(block) = block else {
        return ServingInfo::default();
    };
    let lower = block.to_ascii_lowercase();

    let serving_size = ["serv. size:", "serving size"]
        .iter()
        .find_map(|phrase| {
            lower.find(phrase).map(|pos| {
                let start = pos + phrase.len();
                let rest = &block[start..];
                let end = rest.find(SEPARATORS).unwrap_or(rest.len());
                rest[..end].trim_start_matches(':').trim().to_string()
            })
        })
        .filter(|size| !size.is_empty());

    let varies = lower.contains("varies") || lower.contains("varied");
    let servings_per_container = if varies {
        None
    } else {
        SERVINGS_COUNT_RE
            .captures(&lower)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<f64>().ok())
            .or_else(|| {
                segment_after_phrase(&lower, &["servings per container"]).and_then(first_quantity)
            })
    };

    ServingInfo {
        serving_size,
        servings_per_container,
    }
}
