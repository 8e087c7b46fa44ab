//! Label sets attached to resources.

mod well_known;

use std::collections::btree_map;
use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

pub use well_known::*;

/// Read access to a string-keyed label set.
///
/// Selector matching only needs key lookups, so it works against any map
/// that implements this trait.
pub trait LabelLookup {
    fn label(&self, key: &str) -> Option<&str>;

    fn has_label(&self, key: &str) -> bool {
        self.label(key).is_some()
    }
}

/// An ordered set of labels (`key -> value`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Returns the value for `key`, or an empty string when the label is absent.
    pub fn get(&self, key: &str) -> &str {
        self.0.get(key).map(String::as_str).unwrap_or_default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Merges two label sets. Labels from `right` win on conflicting keys.
    pub fn merge(left: &Labels, right: &Labels) -> Labels {
        let mut merged = left.clone();
        for (key, value) in right.iter() {
            merged.insert(key.clone(), value.clone());
        }
        merged
    }

    /// Returns the labels managed by the platform (`urth/` prefix).
    pub fn managed(&self) -> Labels {
        self.iter()
            .filter(|(key, _)| is_managed_key(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }
}

impl LabelLookup for Labels {
    fn label(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl LabelLookup for BTreeMap<String, String> {
    fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<S: std::hash::BuildHasher> LabelLookup for HashMap<String, String, S> {
    fn label(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str)
    }
}

impl<T: LabelLookup + ?Sized> LabelLookup for &T {
    fn label(&self, key: &str) -> Option<&str> {
        (**self).label(key)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a Labels {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<BTreeMap<String, String>> for Labels {
    fn from(map: BTreeMap<String, String>) -> Self {
        Self(map)
    }
}
