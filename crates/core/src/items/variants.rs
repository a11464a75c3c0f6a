//! Variant Selections
//!
//! The options a shopper picked for a line item, as an option-group name to
//! chosen value mapping (e.g., `"size" -> "250ml"`). Selections are kept
//! sorted by group name and deduplicated so that two selections compare
//! structurally regardless of the order the shopper picked them in.

use smallvec::SmallVec;

/// Chosen variant options for a line item, sorted by option-group name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct VariantSelections {
    selections: SmallVec<[(String, String); 4]>,
}

impl VariantSelections {
    /// Create an empty selection set (no variant chosen).
    #[must_use]
    pub fn none() -> Self {
        Self {
            selections: SmallVec::new(),
        }
    }

    /// Create a selection set from `(group, option)` pairs.
    ///
    /// A group named more than once keeps the last value given.
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut collection = Self::none();

        for (group, option) in pairs {
            collection.select(group, option);
        }

        collection
    }

    /// Record the chosen option for a group, replacing any previous choice.
    pub fn select(&mut self, group: impl Into<String>, option: impl Into<String>) {
        let group = group.into();
        let option = option.into();

        if let Some(existing) = self
            .selections
            .iter_mut()
            .find(|(name, _)| *name == group)
        {
            existing.1 = option;
        } else {
            let at = self
                .selections
                .partition_point(|(name, _)| *name < group);
            self.selections.insert(at, (group, option));
        }
    }

    /// Return the chosen option for a group, if one was picked.
    pub fn get(&self, group: &str) -> Option<&str> {
        self.selections
            .iter()
            .find(|(name, _)| name == group)
            .map(|(_, option)| option.as_str())
    }

    /// Iterate over `(group, option)` pairs in group-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.selections
            .iter()
            .map(|(group, option)| (group.as_str(), option.as_str()))
    }

    /// Number of groups with a chosen option.
    #[must_use]
    pub fn len(&self) -> usize {
        self.selections.len()
    }

    /// Whether no variant option was chosen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.selections.is_empty()
    }
}
