//! Case-insensitive string-keyed map.
//!
//! Template variables, collection names and evaluation-context fields are
//! all looked up without regard to case. Every read and write goes through
//! [`fold_key`], so the comparison policy lives in exactly one place.

use std::collections::BTreeMap;

/// Normalize a key for case-insensitive comparison.
pub fn fold_key(key: &str) -> String {
    key.trim().to_lowercase()
}

/// Compare two keys under the same policy as [`CaseInsensitiveMap`].
pub fn keys_equal(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// A map whose keys compare case-insensitively while remembering the
/// spelling used on insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseInsensitiveMap<V> {
    entries: BTreeMap<String, (String, V)>,
}

impl<V> Default for CaseInsensitiveMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CaseInsensitiveMap<V> {
    pub fn new() -> Self {
        CaseInsensitiveMap {
            entries: BTreeMap::new(),
        }
    }

    /// Insert a value. A later insert under a differently-cased key replaces
    /// the earlier one and takes over its spelling.
    pub fn insert(&mut self, key: impl Into<String>, value: V) -> Option<V> {
        let key = key.into();
        self.entries
            .insert(fold_key(&key), (key, value))
            .map(|(_, old)| old)
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(&fold_key(key)).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&fold_key(key))
    }

    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(&fold_key(key)).map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries with their original key spelling, ordered by folded key.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.entries.values().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(k, _)| k.as_str())
    }
}

impl<K: Into<String>, V> FromIterator<(K, V)> for CaseInsensitiveMap<V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = CaseInsensitiveMap::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

/// Flat string dictionary produced by item mappers and used for placeholder
/// substitution.
pub type Replacements = CaseInsensitiveMap<String>;
