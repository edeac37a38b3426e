// SPDX-License-Identifier: MIT OR Apache-2.0

//! Deep merge of configuration documents.
//!
//! Documents are folded left to right: a key present in a later document
//! overrides the same key in an earlier one. When both sides hold a mapping the
//! two mappings are merged key by key; any other combination (scalar, sequence,
//! or a mapping meeting a non-mapping) is a wholesale replacement.

use crate::domain::document::Document;
use crate::domain::value::Value;

/// Merges an ordered sequence of documents into a new document.
///
/// Inputs are never mutated, so merging the same documents twice yields the
/// same result.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::{merge, Document};
/// use serde_json::json;
///
/// let base = Document::from_json(json!({"db": {"host": "localhost", "port": 5432}})).unwrap();
/// let dev = Document::from_json(json!({"db": {"host": "dev-db"}})).unwrap();
///
/// let merged = merge([&base, &dev]);
/// assert_eq!(merged.get_str("db.host"), Some("dev-db"));
/// assert_eq!(merged.get_path("db.port").unwrap().to_string(), "5432");
/// ```
pub fn merge<'a, I>(documents: I) -> Document
where
    I: IntoIterator<Item = &'a Document>,
{
    let mut merged = Document::new();
    for document in documents {
        merge_into(&mut merged, document);
    }
    merged
}

/// Merges `incoming` into `target` in place, with `incoming` taking precedence.
pub fn merge_into(target: &mut Document, incoming: &Document) {
    for (key, value) in incoming {
        if let (Some(Value::Mapping(existing)), Value::Mapping(nested)) = (target.get_mut(key), value)
        {
            merge_into(existing, nested);
            continue;
        }
        target.insert(key.clone(), value.clone());
    }
}
