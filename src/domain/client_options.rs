// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed options for the remote configuration client.
//!
//! The options are resolved as a [`Document`] (defaults, bootstrap file,
//! environment, overrides) and then read into [`ConfigClientOptions`] from
//! the `spring.cloud.config` block, where they are validated.

use crate::domain::document::Document;
use crate::domain::errors::{ConfigError, Result};
use crate::domain::lenient;
use crate::domain::retry::RetryOptions;
use crate::domain::value::Value;
use serde::{Deserialize, Serialize};
use url::Url;

/// Dot path of the client options block inside a configuration document.
pub const CLIENT_OPTIONS_PATH: &str = "spring.cloud.config";

/// Default config server endpoint.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8888";

/// Default label (branch) requested from the config server.
pub const DEFAULT_LABEL: &str = "master";

/// Basic credentials for the config server.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthOptions {
    /// User name
    #[serde(default)]
    pub user: Option<String>,
    /// Password
    #[serde(default)]
    pub pass: Option<String>,
}

/// Describes how, and whether, to contact the remote configuration source.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::{ConfigClientOptions, Document};
/// use serde_json::json;
///
/// let doc = Document::from_json(json!({
///     "spring": {"cloud": {"config": {"enabled": true, "name": "orders"}}}
/// })).unwrap();
///
/// let options = ConfigClientOptions::from_document(&doc).unwrap();
/// assert!(options.enabled);
/// assert_eq!(options.name.as_deref(), Some("orders"));
/// assert_eq!(options.endpoint, "http://localhost:8888");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ConfigClientOptions {
    /// Whether the remote source is contacted at all
    #[serde(default, deserialize_with = "lenient::bool")]
    pub enabled: bool,
    /// Profiles requested from the remote source
    #[serde(default)]
    pub profiles: Vec<String>,
    /// Escalate fetch failures instead of tolerating them
    #[serde(rename = "fail-fast", default, deserialize_with = "lenient::bool")]
    pub fail_fast: bool,
    /// Retry settings used when `fail_fast` is set
    #[serde(default)]
    pub retry: Option<RetryOptions>,
    /// Application name requested from the remote source
    #[serde(default)]
    pub name: Option<String>,
    /// Base URL of the config server
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Label (branch) requested from the config server
    #[serde(default = "default_label")]
    pub label: String,
    /// Reject invalid TLS certificates
    #[serde(
        rename = "rejectUnauthorized",
        default = "default_true",
        deserialize_with = "lenient::bool"
    )]
    pub reject_unauthorized: bool,
    /// Optional basic credentials
    #[serde(default)]
    pub auth: Option<AuthOptions>,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_label() -> String {
    DEFAULT_LABEL.to_string()
}

fn default_true() -> bool {
    true
}

impl Default for ConfigClientOptions {
    fn default() -> Self {
        Self {
            enabled: false,
            profiles: Vec::new(),
            fail_fast: false,
            retry: None,
            name: None,
            endpoint: default_endpoint(),
            label: default_label(),
            reject_unauthorized: true,
            auth: None,
        }
    }
}

impl ConfigClientOptions {
    /// The lowest-precedence options document every resolution starts from.
    pub fn defaults_document() -> Document {
        let retry: Document = [("enabled", false)].into_iter().collect();
        let config: Document = [
            ("enabled", Value::Bool(false)),
            ("profiles", Value::Sequence(Vec::new())),
            ("fail-fast", Value::Bool(false)),
            ("retry", Value::Mapping(retry)),
            ("endpoint", Value::from(DEFAULT_ENDPOINT)),
            ("label", Value::from(DEFAULT_LABEL)),
            ("rejectUnauthorized", Value::Bool(true)),
        ]
        .into_iter()
        .collect();
        config.nest_under(CLIENT_OPTIONS_PATH)
    }

    /// Reads and validates the options block of a resolved options document.
    ///
    /// A missing block yields the defaults. Unknown keys are ignored.
    pub fn from_document(document: &Document) -> Result<Self> {
        let options: ConfigClientOptions = match document.get_path(CLIENT_OPTIONS_PATH) {
            None | Some(Value::Null) => ConfigClientOptions::default(),
            Some(Value::Mapping(block)) => serde_json::from_value(block.to_json()).map_err(|e| {
                ConfigError::validation(format!("\"{}\" {}", CLIENT_OPTIONS_PATH, e))
            })?,
            Some(_) => {
                return Err(ConfigError::validation(format!(
                    "\"{}\" must be an object",
                    CLIENT_OPTIONS_PATH
                )))
            }
        };
        options.validate()?;
        Ok(options)
    }

    /// Checks the constraints serde cannot express.
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.endpoint).map_err(|e| {
            ConfigError::validation(format!(
                "\"endpoint\" must be a valid uri, got '{}': {}",
                self.endpoint, e
            ))
        })?;

        if let Some(auth) = &self.auth {
            if auth.user.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::validation("\"auth.user\" is required"));
            }
            if auth.pass.as_deref().map_or(true, str::is_empty) {
                return Err(ConfigError::validation("\"auth.pass\" is required"));
            }
        }

        if let Some(retry) = &self.retry {
            retry.validate()?;
        }

        Ok(())
    }

    /// Returns true when failed fetches should be retried.
    pub fn retry_enabled(&self) -> bool {
        self.retry.as_ref().map_or(false, |r| r.enabled)
    }

    /// Returns the retry options, or disabled defaults.
    pub fn retry_options(&self) -> RetryOptions {
        self.retry.clone().unwrap_or_default()
    }
}
