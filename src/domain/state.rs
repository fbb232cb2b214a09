use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Identifiers of items the user marked as favorite.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesSet {
    ids: BTreeSet<String>,
}

impl FavoritesSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if the id was not already a favorite.
    pub fn add(&mut self, id: impl Into<String>) -> bool {
        self.ids.insert(id.into())
    }

    /// Returns `true` if the id was a favorite.
    pub fn remove(&mut self, id: &str) -> bool {
        self.ids.remove(id)
    }

    /// Flip membership; returns the new state.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }
}

impl FromIterator<String> for FavoritesSet {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}
