// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment variable source adapters.
//!
//! [`ProcessEnvironment`] reads the real process environment; [`MapEnvironment`]
//! serves a fixed map and is what tests and embedders use to avoid touching
//! process-global state.

use crate::ports::EnvironmentSource;
use std::collections::HashMap;
use std::env;

/// Maximum length for environment variable keys (prevents DoS)
const MAX_ENV_KEY_LEN: usize = 512;

/// Maximum length for environment variable values (prevents DoS)
const MAX_ENV_VALUE_LEN: usize = 1048576; // 1MB

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Environment source backed by the process environment.
///
/// Variables are read on every call, so a reload sees changes made since the
/// previous load. An optional prefix is prepended to every requested name.
///
/// # Examples
///
/// ```rust
/// use profilecfg::adapters::ProcessEnvironment;
/// use profilecfg::ports::EnvironmentSource;
///
/// // Reads CONFIG_PATH
/// let env = ProcessEnvironment::new();
///
/// // Reads MYAPP_CONFIG_PATH
/// let env = ProcessEnvironment::with_prefix("MYAPP_");
/// assert_eq!(env.name(), "process-env");
/// ```
#[derive(Debug, Clone, Default)]
pub struct ProcessEnvironment {
    /// Optional prefix prepended to variable names
    prefix: Option<String>,
}

impl ProcessEnvironment {
    /// Creates a source reading unprefixed variable names.
    pub fn new() -> Self {
        Self { prefix: None }
    }

    /// Creates a source reading `{prefix}{name}` for every requested name.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

impl EnvironmentSource for ProcessEnvironment {
    fn name(&self) -> &str {
        "process-env"
    }

    fn var(&self, name: &str) -> Option<String> {
        let key = match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, name),
            None => name.to_string(),
        };

        if key.len() > MAX_ENV_KEY_LEN {
            tracing::debug!(
                "Skipping oversized environment variable name: key_len={} (max {})",
                key.len(),
                MAX_ENV_KEY_LEN
            );
            return None;
        }

        let value = env::var(&key).ok()?;
        if value.len() > MAX_ENV_VALUE_LEN {
            tracing::debug!(
                "Skipping oversized environment variable {}: value_len={} (max {})",
                key,
                value.len(),
                MAX_ENV_VALUE_LEN
            );
            return None;
        }

        non_blank(value)
    }
}

/// Environment source backed by an in-memory map.
///
/// # Examples
///
/// ```rust
/// use profilecfg::adapters::MapEnvironment;
/// use profilecfg::ports::EnvironmentSource;
///
/// let env = MapEnvironment::new()
///     .with_var("ACTIVE_PROFILES", "dev")
///     .with_var("LOG_LEVEL", "  ");
///
/// assert_eq!(env.var("ACTIVE_PROFILES").as_deref(), Some("dev"));
/// assert!(env.var("LOG_LEVEL").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct MapEnvironment {
    values: HashMap<String, String>,
}

impl MapEnvironment {
    /// Creates an empty environment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an environment with pre-populated values.
    pub fn with_values(values: HashMap<String, String>) -> Self {
        Self { values }
    }

    /// Adds or replaces one variable.
    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }

    /// Sets one variable in place.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Removes one variable.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }
}

impl EnvironmentSource for MapEnvironment {
    fn name(&self) -> &str {
        "map-env"
    }

    fn var(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned().and_then(non_blank)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for MapEnvironment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
