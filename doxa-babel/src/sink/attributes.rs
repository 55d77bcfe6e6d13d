//! Attribute bag carried by sink events.

use serde::{Deserialize, Serialize};

/// Alternative text of an image.
pub const ALT: &str = "alt";
/// Horizontal alignment of a table cell (`left`, `right`, `center`).
pub const ALIGN: &str = "align";
/// Element identifier.
pub const ID: &str = "id";
/// Source language of a verbatim block.
pub const LANGUAGE: &str = "language";
/// Semantic meaning of an inline span (`code`, `em`, `strong`, ...).
pub const SEMANTICS: &str = "semantics";
/// Presentational style of an inline span (`bold`, `italic`, `monospaced`).
pub const STYLE: &str = "style";

/// Ordered set of key/value attributes attached to an event.
///
/// Keys are unique; setting an existing key replaces its value but keeps its
/// original position, so attribute order is stable across round trips.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style variant of [`Attributes::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether `key` is present with exactly `value`.
    ///
    /// Values holding a whitespace separated list (like HTML `class`) match
    /// if any of their tokens equals `value`.
    pub fn contains(&self, key: &str, value: &str) -> bool {
        self.get(key)
            .is_some_and(|v| v == value || v.split_whitespace().any(|token| token == value))
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Attributes marking an inline span with the given semantics.
    pub fn semantics(value: &str) -> Self {
        Self::new().with(SEMANTICS, value)
    }
}

impl<K, V> FromIterator<(K, V)> for Attributes
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in iter {
            attributes.set(key, value);
        }
        attributes
    }
}
