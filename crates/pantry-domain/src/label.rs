//! Label module - inferred dietary-attribute tags

use std::collections::btree_set;
use std::collections::BTreeSet;
use std::fmt;

/// A dietary label drawn from the canonical vocabulary
///
/// The vocabulary is the union of what the individual retailers use; a label
/// is inferred evidence, never an authoritative certification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    /// Certified or declared organic
    Organic,
    /// No animal products
    Vegan,
    /// No gluten-containing ingredients
    GlutenFree,
    /// Kosher
    Kosher,
    /// No dairy ingredients
    DairyFree,
    /// No added sugar
    SugarFree,
    /// No fat
    FatFree,
}

impl Label {
    /// Every label, in vocabulary order
    pub const ALL: [Label; 7] = [
        Label::Organic,
        Label::Vegan,
        Label::GlutenFree,
        Label::Kosher,
        Label::DairyFree,
        Label::SugarFree,
        Label::FatFree,
    ];

    /// Storage tag (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Organic => "organic",
            Label::Vegan => "vegan",
            Label::GlutenFree => "gluten_free",
            Label::Kosher => "kosher",
            Label::DairyFree => "dairy_free",
            Label::SugarFree => "sugar_free",
            Label::FatFree => "fat_free",
        }
    }

    /// Lowercase keyword as it appears in product names ("gluten free")
    pub fn keyword(&self) -> &'static str {
        match self {
            Label::Organic => "organic",
            Label::Vegan => "vegan",
            Label::GlutenFree => "gluten free",
            Label::Kosher => "kosher",
            Label::DairyFree => "dairy free",
            Label::SugarFree => "sugar free",
            Label::FatFree => "fat free",
        }
    }

    /// Hyphenated keyword for "X-free" labels ("gluten-free")
    pub fn hyphenated(&self) -> Option<&'static str> {
        match self {
            Label::GlutenFree => Some("gluten-free"),
            Label::DairyFree => Some("dairy-free"),
            Label::SugarFree => Some("sugar-free"),
            Label::FatFree => Some("fat-free"),
            _ => None,
        }
    }

    /// Parse a label from a tag, keyword or hyphenated form (any case)
    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s
            .trim()
            .to_lowercase()
            .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join("_");
        Self::ALL.into_iter().find(|label| label.as_str() == normalized)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Label {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid label: {}", s))
    }
}

/// A set of labels, iterated in vocabulary order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LabelSet(BTreeSet<Label>);

impl LabelSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a label; returns whether it was newly inserted
    pub fn insert(&mut self, label: Label) -> bool {
        self.0.insert(label)
    }

    /// Whether the set contains a label
    pub fn contains(&self, label: Label) -> bool {
        self.0.contains(&label)
    }

    /// Number of labels
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate over labels in vocabulary order
    pub fn iter(&self) -> impl Iterator<Item = Label> + '_ {
        self.0.iter().copied()
    }

    /// Add every label from another set
    pub fn extend_from(&mut self, other: &LabelSet) {
        self.0.extend(other.iter());
    }

    /// Comma-joined storage form ("vegan,dairy_free")
    pub fn tags(&self) -> String {
        self.iter().map(|l| l.as_str()).collect::<Vec<_>>().join(",")
    }

    /// Parse the comma-joined storage form, skipping unknown tags
    pub fn parse_tags(s: &str) -> Self {
        s.split(',').filter_map(Label::parse).collect()
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for LabelSet {
    type Item = Label;
    type IntoIter = btree_set::IntoIter<Label>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_all_forms() {
        assert_eq!(Label::parse("gluten_free"), Some(Label::GlutenFree));
        assert_eq!(Label::parse("Gluten Free"), Some(Label::GlutenFree));
        assert_eq!(Label::parse("gluten-free"), Some(Label::GlutenFree));
        assert_eq!(Label::parse("  VEGAN "), Some(Label::Vegan));
        assert!(Label::parse("paleo").is_none());
        assert!(Label::parse("").is_none());
    }

    #[test]
    fn test_hyphenated_only_for_free_labels() {
        assert_eq!(Label::DairyFree.hyphenated(), Some("dairy-free"));
        assert!(Label::Organic.hyphenated().is_none());
        assert!(Label::Kosher.hyphenated().is_none());
    }

    #[test]
    fn test_tags_round_trip() {
        let set: LabelSet = [Label::DairyFree, Label::Vegan, Label::Organic].into_iter().collect();
        assert_eq!(set.tags(), "organic,vegan,dairy_free");
        assert_eq!(LabelSet::parse_tags(&set.tags()), set);
    }

    #[test]
    fn test_parse_tags_skips_unknown() {
        let set = LabelSet::parse_tags("vegan,,keto, kosher");
        assert_eq!(set.len(), 2);
        assert!(set.contains(Label::Vegan));
        assert!(set.contains(Label::Kosher));
    }

    #[test]
    fn test_empty_set_tags() {
        assert_eq!(LabelSet::new().tags(), "");
        assert!(LabelSet::parse_tags("").is_empty());
    }
}
