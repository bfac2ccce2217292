//! Reference label index - retailer-curated exemplar lists

use crate::label::Label;
use std::collections::BTreeMap;

/// Retailer-curated product names known to carry a label
///
/// Built once per crawl run and read-only afterwards. Pass it by reference
/// (or behind an `Arc`) to every consumer; there is no way to mutate an index
/// after [`ReferenceIndexBuilder::build`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReferenceLabelIndex {
    lists: BTreeMap<Label, Vec<String>>,
}

impl ReferenceLabelIndex {
    /// Start building an index
    pub fn builder() -> ReferenceIndexBuilder {
        ReferenceIndexBuilder::default()
    }

    /// An index without any curated lists
    pub fn empty() -> Self {
        Self::default()
    }

    /// Exemplar names for a label, in curated order (empty if not curated)
    pub fn exemplars(&self, label: Label) -> &[String] {
        self.lists.get(&label).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Labels that have a curated list
    pub fn labels(&self) -> impl Iterator<Item = Label> + '_ {
        self.lists.keys().copied()
    }

    /// Total number of exemplar names across all lists
    pub fn len(&self) -> usize {
        self.lists.values().map(Vec::len).sum()
    }

    /// Whether no label has any exemplar
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels whose curated list contains exactly this name
    pub fn labels_listing(&self, name: &str) -> Vec<Label> {
        let name = normalize_whitespace(name);
        self.lists
            .iter()
            .filter(|(_, names)| names.iter().any(|n| *n == name))
            .map(|(label, _)| *label)
            .collect()
    }
}

/// Builder for [`ReferenceLabelIndex`]
#[derive(Debug, Default)]
pub struct ReferenceIndexBuilder {
    lists: BTreeMap<Label, Vec<String>>,
}

impl ReferenceIndexBuilder {
    /// Append exemplar names to a label's list
    ///
    /// Names are whitespace-normalized; blank names are skipped.
    pub fn exemplars<I, S>(mut self, label: Label, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list = self.lists.entry(label).or_default();
        for name in names {
            let name = normalize_whitespace(name.as_ref());
            if !name.is_empty() {
                list.push(name);
            }
        }
        self
    }

    /// Finish building
    pub fn build(self) -> ReferenceLabelIndex {
        ReferenceLabelIndex { lists: self.lists }
    }
}

/// Collapse runs of whitespace into single spaces and trim the ends
pub fn normalize_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
