// SPDX-License-Identifier: MIT OR Apache-2.0

//! The generic configuration document.
//!
//! A [`Document`] is the keyed tree every parser produces and every merge
//! consumes. Key order carries no meaning, so the map is kept sorted to make
//! debug output and test comparisons deterministic.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::value::Value;
use serde::{Deserialize, Serialize};
use std::collections::btree_map::{self, BTreeMap};

/// A nested mapping from string keys to [`Value`]s.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::{Document, Value};
///
/// let doc: Document = [("server", Value::from(Document::from_iter([("port", 8080i64)])))]
///     .into_iter()
///     .collect();
///
/// assert_eq!(doc.get_path("server.port"), Some(&Value::from(8080i64)));
/// ```
#[derive(Clone, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(BTreeMap<String, Value>);

impl Document {
    /// Creates an empty document.
    pub fn new() -> Self {
        Document(BTreeMap::new())
    }

    /// Returns the number of top-level keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the document has no keys.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the value stored directly under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Returns a mutable reference to the value stored directly under `key`.
    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.0.get_mut(key)
    }

    /// Returns true if `key` is present at the top level.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Inserts a value at the top level, returning the previous one.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a top-level key.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.0.remove(key)
    }

    /// Iterates over the top-level entries in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, Value> {
        self.0.iter()
    }

    /// Iterates over the top-level keys in order.
    pub fn keys(&self) -> btree_map::Keys<'_, String, Value> {
        self.0.keys()
    }

    /// Looks up a value by dot path, descending through nested mappings.
    ///
    /// The empty path is never present.
    pub fn get_path(&self, path: &str) -> Option<&Value> {
        let mut segments = path.split('.');
        let mut current = self.get(segments.next()?)?;
        for segment in segments {
            current = current.as_document()?.get(segment)?;
        }
        Some(current)
    }

    /// Looks up a nested document by dot path.
    pub fn get_document(&self, path: &str) -> Option<&Document> {
        self.get_path(path).and_then(Value::as_document)
    }

    /// Returns the string stored at a dot path, if it is a string.
    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get_path(path).and_then(Value::as_str)
    }

    /// Wraps this document under a dot path, producing `{a: {b: self}}` for `a.b`.
    pub fn nest_under(self, path: &str) -> Document {
        path.rsplit('.').fold(self, |inner, segment| {
            let mut outer = Document::new();
            outer.insert(segment, Value::Mapping(inner));
            outer
        })
    }

    /// Converts the document into a JSON object.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.0
                .iter()
                .map(|(k, v)| (k.clone(), v.to_json()))
                .collect(),
        )
    }

    /// Builds a document from a JSON value, which must be an object.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        match Value::from_json(value) {
            Value::Mapping(doc) => Ok(doc),
            other => Err(ConfigError::Parse {
                message: format!("expected a JSON object, found '{}'", other),
                source: None,
            }),
        }
    }

    /// Consumes the document, returning the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Value> {
        self.0
    }
}

impl<K, V> FromIterator<(K, V)> for Document
where
    K: Into<String>,
    V: Into<Value>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Document(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl IntoIterator for Document {
    type Item = (String, Value);
    type IntoIter = btree_map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = (&'a String, &'a Value);
    type IntoIter = btree_map::Iter<'a, String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<BTreeMap<String, Value>> for Document {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Document(map)
    }
}
