// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dot-path keys and the flat/nested document conversions.
//!
//! Property files, environment tables and remote responses describe locations
//! with flat keys such as `spring.cloud.config.endpoint`. This module converts
//! those flat keys into nested [`Document`]s and back.

use crate::domain::document::Document;
use crate::domain::merge::merge_into;
use crate::domain::value::Value;
use std::collections::BTreeMap;
use std::fmt;

/// Separator between the segments of a dot path.
pub const SEPARATOR: char = '.';

/// A type-safe wrapper for dot-separated configuration paths.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::DotPath;
///
/// let path = DotPath::from("spring.cloud.config.endpoint");
/// assert_eq!(path.segments().collect::<Vec<_>>(), ["spring", "cloud", "config", "endpoint"]);
/// assert_eq!(path.parent().unwrap().as_str(), "spring.cloud.config");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DotPath(String);

impl DotPath {
    /// Creates a new `DotPath` from a `String`.
    pub fn new(path: String) -> Self {
        DotPath(path)
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates over the segments of the path.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split(SEPARATOR)
    }

    /// Returns true if the path has a single segment.
    pub fn is_top_level(&self) -> bool {
        !self.0.contains(SEPARATOR)
    }

    /// Returns the path without its last segment.
    pub fn parent(&self) -> Option<DotPath> {
        self.0
            .rfind(SEPARATOR)
            .map(|idx| DotPath(self.0[..idx].to_string()))
    }

    /// Returns the last segment.
    pub fn leaf(&self) -> &str {
        self.0
            .rfind(SEPARATOR)
            .map_or(self.0.as_str(), |idx| &self.0[idx + 1..])
    }

    /// Appends a segment, producing `self.segment`.
    pub fn join(&self, segment: &str) -> DotPath {
        DotPath(format!("{}{}{}", self.0, SEPARATOR, segment))
    }

    /// Converts the `DotPath` into its inner `String`.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl From<String> for DotPath {
    fn from(s: String) -> Self {
        DotPath(s)
    }
}

impl From<&str> for DotPath {
    fn from(s: &str) -> Self {
        DotPath(s.to_string())
    }
}

impl AsRef<str> for DotPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DotPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Builds a nested document from flat dot-path keys.
///
/// A key without dots lands at the top level. Keys sharing a prefix are merged
/// into the same nested mapping. A key that is both a leaf and a prefix of
/// another key is a caller contract violation; whichever comes later wins.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::to_nested;
///
/// let doc = to_nested([("spring.profiles.active", "dev"), ("spring.application.name", "orders")]);
/// assert_eq!(doc.get_str("spring.profiles.active"), Some("dev"));
/// assert_eq!(doc.get_str("spring.application.name"), Some("orders"));
/// ```
pub fn to_nested<K, V, I>(flat: I) -> Document
where
    K: AsRef<str>,
    V: Into<Value>,
    I: IntoIterator<Item = (K, V)>,
{
    let mut nested = Document::new();
    for (key, value) in flat {
        let key = key.as_ref();
        let value: Value = value.into();
        let fragment = match key.rfind(SEPARATOR) {
            Some(idx) => {
                let leaf: Document = [(&key[idx + 1..], value)].into_iter().collect();
                leaf.nest_under(&key[..idx])
            }
            None => [(key, value)].into_iter().collect(),
        };
        merge_into(&mut nested, &fragment);
    }
    nested
}

/// Expands dotted top-level keys of a parsed document into nested form.
///
/// Only the top level is expanded; dotted keys inside nested mappings are kept
/// verbatim since they commonly name packages or hosts.
pub fn normalize(document: Document) -> Document {
    if !document.keys().any(|k| k.contains(SEPARATOR)) {
        return document;
    }
    to_nested(document)
}

/// Flattens a nested document into dot-path keys.
///
/// Every non-mapping value is a leaf, and so is an empty mapping, which keeps
/// [`to_nested`] an exact inverse for documents without dotted keys.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::{flatten, to_nested, Document};
/// use serde_json::json;
///
/// let doc = Document::from_json(json!({"a": {"b": 1, "c": [true]}})).unwrap();
/// let flat = flatten(&doc);
/// assert_eq!(flat.keys().collect::<Vec<_>>(), ["a.b", "a.c"]);
/// assert_eq!(to_nested(flat), doc);
/// ```
pub fn flatten(document: &Document) -> BTreeMap<String, Value> {
    let mut flat = BTreeMap::new();
    flatten_into(document, None, &mut flat);
    flat
}

fn flatten_into(document: &Document, prefix: Option<&str>, flat: &mut BTreeMap<String, Value>) {
    for (key, value) in document {
        let path = match prefix {
            Some(prefix) => format!("{}{}{}", prefix, SEPARATOR, key),
            None => key.clone(),
        };
        match value {
            Value::Mapping(nested) if !nested.is_empty() => {
                flatten_into(nested, Some(&path), flat);
            }
            leaf => {
                flat.insert(path, leaf.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn doc(value: serde_json::Value) -> Document {
        Document::from_json(value).unwrap()
    }

    #[test]
    fn test_dot_path_segments() {
        let path = DotPath::from("a.b.c");
        assert_eq!(path.segments().collect::<Vec<_>>(), vec!["a", "b", "c"]);
        assert_eq!(path.leaf(), "c");
        assert!(!path.is_top_level());
    }

    #[test]
    fn test_dot_path_top_level() {
        let path = DotPath::from("testUrl");
        assert!(path.is_top_level());
        assert!(path.parent().is_none());
        assert_eq!(path.leaf(), "testUrl");
    }

    #[test]
    fn test_dot_path_join() {
        let path = DotPath::from("spring.cloud").join("config");
        assert_eq!(path.to_string(), "spring.cloud.config");
        assert_eq!(path.into_string(), "spring.cloud.config");
    }

    #[test]
    fn test_to_nested_single_segment() {
        let nested = to_nested([("testUrl", "http://default")]);
        assert_eq!(nested, doc(json!({"testUrl": "http://default"})));
    }

    #[test]
    fn test_to_nested_shared_prefix() {
        let nested = to_nested([
            ("spring.cloud.config.endpoint", Value::from("http://config:8888")),
            ("spring.cloud.config.auth.user", Value::from("admin")),
            ("spring.cloud.config.auth.pass", Value::from("secret")),
        ]);
        assert_eq!(
            nested,
            doc(json!({"spring": {"cloud": {"config": {
                "endpoint": "http://config:8888",
                "auth": {"user": "admin", "pass": "secret"}
            }}}}))
        );
    }

    #[test]
    fn test_normalize_merges_dotted_and_nested_keys() {
        let parsed = doc(json!({"a.b": 1, "a": {"c": 2}, "plain": true}));
        let normalized = normalize(parsed);
        assert_eq!(normalized, doc(json!({"a": {"b": 1, "c": 2}, "plain": true})));
    }

    #[test]
    fn test_normalize_keeps_nested_dotted_keys() {
        let parsed = doc(json!({"logging": {"level": {"com.example": "DEBUG"}}}));
        assert_eq!(normalize(parsed.clone()), parsed);
    }

    #[test]
    fn test_flatten_nested() {
        let flat = flatten(&doc(json!({"a": {"b": {"c": 1}}, "d": "x"})));
        assert_eq!(flat.len(), 2);
        assert_eq!(flat.get("a.b.c"), Some(&Value::from(1i64)));
        assert_eq!(flat.get("d"), Some(&Value::from("x")));
    }

    #[test]
    fn test_flatten_keeps_empty_mapping_as_leaf() {
        let original = doc(json!({"a": {}, "b": {"c": {}}}));
        let flat = flatten(&original);
        assert_eq!(flat.len(), 2);
        assert_eq!(to_nested(flat), original);
    }

    #[test]
    fn test_round_trip() {
        let original = doc(json!({
            "spring": {"cloud": {"config": {"enabled": true, "retry": {"max-attempts": 3}}}},
            "servers": ["a", "b"],
            "nothing": null
        }));
        assert_eq!(to_nested(flatten(&original)), original);
    }
}
