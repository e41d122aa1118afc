//! Parsed representation of a Service-Component header.

use serde::{Deserialize, Serialize};

/// Insertion-ordered attribute map of a component clause.
///
/// Reference elements are emitted in input order, so the map preserves the
/// order in which attributes appeared in the header. Keys are unique;
/// inserting an existing key replaces its value in place. An empty map is
/// cheap to construct and serves as the shared sentinel for clauses without
/// attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttrMap {
    entries: Vec<(String, String)>,
}

impl AttrMap {
    /// Creates an empty attribute map.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the value for `key`, if present.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` when `key` is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Inserts `key` with `value`, replacing the value in place when the key
    /// already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| *k == key) {
            entry.1 = value;
        } else {
            self.entries.push((key, value));
        }
    }

    /// Removes `key` and returns its value, if present.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        let pos = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(pos).1)
    }

    /// Returns `true` when the map holds no attributes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of attributes in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for AttrMap {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

/// One clause of the Service-Component header.
///
/// The key is either a literal resource path (pass-through), an explicit
/// component name, or a class-name pattern subject to annotation discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentClause {
    /// Clause key as it appeared in the header.
    pub key: String,
    /// Ordered attribute map; directive keys carry a trailing `:`.
    pub attrs: AttrMap,
}

/// Splits a comma-separated header value into trimmed, non-empty parts.
///
/// `None` yields an empty list.
#[must_use]
pub fn split_list(value: Option<&str>) -> Vec<String> {
    value
        .map(|v| {
            v.split(',')
                .map(str::trim)
                .filter(|part| !part.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default()
}
