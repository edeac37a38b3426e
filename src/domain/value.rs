// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration value type.
//!
//! This module provides the [`Value`] tagged variant that every node of a
//! [`Document`] holds, together with type-safe conversion helpers. Property
//! files and environment variables only carry strings, so the conversions
//! accept both native values and their string spellings.

use crate::domain::document::Document;
use crate::domain::errors::{ConfigError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A single configuration value.
///
/// Values are tree-shaped: a [`Value::Mapping`] owns a nested [`Document`] and a
/// [`Value::Sequence`] owns its items, so cycles cannot be expressed.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::Value;
///
/// let value = Value::from("42");
/// assert_eq!(value.as_str(), Some("42"));
/// assert_eq!(value.to_i64("server.port").unwrap(), 42);
///
/// let flag = Value::from(true);
/// assert_eq!(flag.to_bool("feature.enabled").unwrap(), true);
/// ```
#[derive(Clone, Debug, PartialEq, Default)]
pub enum Value {
    /// An explicit null (or an empty YAML value)
    #[default]
    Null,
    /// A boolean
    Bool(bool),
    /// An integer or floating point number
    Number(serde_json::Number),
    /// A string
    String(String),
    /// An ordered list of values
    Sequence(Vec<Value>),
    /// A nested document
    Mapping(Document),
}

impl Value {
    /// Returns the string slice if this is a [`Value::String`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the nested document if this is a [`Value::Mapping`].
    pub fn as_document(&self) -> Option<&Document> {
        match self {
            Value::Mapping(doc) => Some(doc),
            _ => None,
        }
    }

    /// Returns the items if this is a [`Value::Sequence`].
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Returns true for [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns true for [`Value::Mapping`].
    pub fn is_mapping(&self) -> bool {
        matches!(self, Value::Mapping(_))
    }

    /// Returns true for values that are neither mappings nor sequences.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Value::Mapping(_) | Value::Sequence(_))
    }

    /// Converts the value to a boolean.
    ///
    /// Native booleans are returned as-is. Strings are matched case-insensitively:
    /// - `true`: "true", "yes", "1", "on"
    /// - `false`: "false", "no", "0", "off"
    pub fn to_bool(&self, key: &str) -> Result<bool> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => {
                let text = self.scalar_text(key, "boolean")?;
                match text.to_lowercase().as_str() {
                    "true" | "yes" | "1" | "on" => Ok(true),
                    "false" | "no" | "0" | "off" => Ok(false),
                    _ => text
                        .parse::<bool>()
                        .map_err(|e| ConfigError::from_parse_bool_error(key.to_string(), e)),
                }
            }
        }
    }

    /// Converts the value to an `i64`.
    pub fn to_i64(&self, key: &str) -> Result<i64> {
        match self {
            Value::Number(n) if n.is_i64() => Ok(n.as_i64().unwrap_or_default()),
            _ => self
                .scalar_text(key, "integer")?
                .parse::<i64>()
                .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e)),
        }
    }

    /// Converts the value to a `u64`.
    pub fn to_u64(&self, key: &str) -> Result<u64> {
        match self {
            Value::Number(n) if n.is_u64() => Ok(n.as_u64().unwrap_or_default()),
            _ => self
                .scalar_text(key, "integer")?
                .parse::<u64>()
                .map_err(|e| ConfigError::from_parse_int_error(key.to_string(), e)),
        }
    }

    /// Converts the value to an `f64`.
    pub fn to_f64(&self, key: &str) -> Result<f64> {
        match self {
            Value::Number(n) => n.as_f64().ok_or_else(|| ConfigError::TypeConversion {
                key: key.to_string(),
                target_type: "float".to_string(),
                source: format!("{} is not representable as f64", n).into(),
            }),
            _ => self
                .scalar_text(key, "float")?
                .parse::<f64>()
                .map_err(|e| ConfigError::from_parse_float_error(key.to_string(), e)),
        }
    }

    /// Parses the scalar text of the value into any `FromStr` type.
    ///
    /// ```
    /// use profilecfg::domain::Value;
    /// use std::net::IpAddr;
    ///
    /// let ip: IpAddr = Value::from("127.0.0.1").parse("server.address").unwrap();
    /// assert_eq!(ip.to_string(), "127.0.0.1");
    /// ```
    pub fn parse<T>(&self, key: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let target = std::any::type_name::<T>();
        self.scalar_text(key, target)?
            .parse::<T>()
            .map_err(|e| ConfigError::TypeConversion {
                key: key.to_string(),
                target_type: target.to_string(),
                source: Box::new(e),
            })
    }

    fn scalar_text(&self, key: &str, target_type: &str) -> Result<String> {
        match self {
            Value::Mapping(_) | Value::Sequence(_) => Err(ConfigError::TypeConversion {
                key: key.to_string(),
                target_type: target_type.to_string(),
                source: "value is not a scalar".into(),
            }),
            other => Ok(other.to_string()),
        }
    }

    /// Converts a JSON value into a configuration value.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => Value::Mapping(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from_json(v)))
                    .collect(),
            ),
        }
    }

    /// Converts the value into its JSON equivalent.
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => serde_json::Value::Number(n.clone()),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Sequence(items) => {
                serde_json::Value::Array(items.iter().map(Value::to_json).collect())
            }
            Value::Mapping(doc) => doc.to_json(),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Number(n.into())
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(n.into())
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Number(n.into())
    }
}

impl From<f64> for Value {
    /// Non-finite floats have no JSON representation and become [`Value::Null`].
    fn from(n: f64) -> Self {
        serde_json::Number::from_f64(n)
            .map(Value::Number)
            .unwrap_or(Value::Null)
    }
}

impl From<Document> for Value {
    fn from(doc: Document) -> Self {
        Value::Mapping(doc)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(items)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Number(n) => write!(f, "{}", n),
            Value::String(s) => write!(f, "{}", s),
            other => write!(f, "{}", other.to_json()),
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Value {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        serde_json::Value::deserialize(deserializer).map(Value::from_json)
    }
}
