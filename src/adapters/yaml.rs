// SPDX-License-Identifier: MIT OR Apache-2.0

//! YAML configuration parser adapter.
//!
//! A YAML file may hold several documents separated by `---`; each one becomes
//! its own [`Document`] so the file reader can filter them by profile.

use crate::domain::{ConfigError, Document, Result, Value};
use crate::ports::ConfigParser;
use serde::Deserialize;

/// YAML parser implementation.
///
/// Non-string mapping keys (numbers, booleans) are converted to their string
/// spelling; YAML tags are dropped and the tagged value kept.
///
/// # Examples
///
/// ```rust
/// use profilecfg::adapters::YamlParser;
/// use profilecfg::ports::ConfigParser;
///
/// let parser = YamlParser::new();
/// let yaml_content = "database:\n  host: localhost\n---\nprofiles: dev\ndatabase:\n  host: dev-db\n";
/// let docs = parser.parse(yaml_content).unwrap();
/// assert_eq!(docs.len(), 2);
/// assert_eq!(docs[1].get_str("database.host"), Some("dev-db"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct YamlParser;

impl YamlParser {
    /// Creates a new YAML parser.
    pub fn new() -> Self {
        YamlParser
    }

    fn convert(value: serde_yaml::Value) -> Result<Value> {
        Ok(match value {
            serde_yaml::Value::Null => Value::Null,
            serde_yaml::Value::Bool(b) => Value::Bool(b),
            serde_yaml::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::from(i)
                } else if let Some(u) = n.as_u64() {
                    Value::from(u)
                } else {
                    // NaN and infinities become null
                    Value::from(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            serde_yaml::Value::String(s) => Value::String(s),
            serde_yaml::Value::Sequence(seq) => Value::Sequence(
                seq.into_iter()
                    .map(Self::convert)
                    .collect::<Result<Vec<_>>>()?,
            ),
            serde_yaml::Value::Mapping(map) => {
                let mut doc = Document::new();
                for (key, val) in map {
                    doc.insert(Self::key_to_string(key)?, Self::convert(val)?);
                }
                Value::Mapping(doc)
            }
            serde_yaml::Value::Tagged(tagged) => Self::convert(tagged.value)?,
        })
    }

    fn key_to_string(key: serde_yaml::Value) -> Result<String> {
        match key {
            serde_yaml::Value::String(s) => Ok(s),
            serde_yaml::Value::Number(n) => Ok(n.to_string()),
            serde_yaml::Value::Bool(b) => Ok(b.to_string()),
            serde_yaml::Value::Null => Ok("null".to_string()),
            serde_yaml::Value::Tagged(tagged) => Self::key_to_string(tagged.value),
            other => Err(ConfigError::Parse {
                message: format!("Unsupported YAML mapping key: {:?}", other),
                source: None,
            }),
        }
    }
}

impl ConfigParser for YamlParser {
    fn parse(&self, content: &str) -> Result<Vec<Document>> {
        let mut documents = Vec::new();

        for (index, de) in serde_yaml::Deserializer::from_str(content).enumerate() {
            let value = serde_yaml::Value::deserialize(de)
                .map_err(|e| ConfigError::parse(format!("Failed to parse YAML: {}", e), e))?;

            match Self::convert(value)? {
                // An empty document between separators
                Value::Null => continue,
                Value::Mapping(doc) => documents.push(doc),
                other => {
                    return Err(ConfigError::Parse {
                        message: format!(
                            "YAML document {} must be a mapping, found '{}'",
                            index, other
                        ),
                        source: None,
                    })
                }
            }
        }

        Ok(documents)
    }

    fn supported_extensions(&self) -> &[&str] {
        &["yml", "yaml"]
    }
}
