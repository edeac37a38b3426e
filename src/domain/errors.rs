// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the configuration crate.
//!
//! Every failure that can escape [`ConfigLoader::load`](crate::service::ConfigLoader::load)
//! is one of the variants below. Local file and parse errors are always fatal; remote
//! errors only surface when the fail-fast/retry policy says so.

use std::num::{ParseFloatError, ParseIntError};
use std::path::PathBuf;
use std::str::ParseBoolError;
use thiserror::Error;

/// The main error type for configuration operations.
///
/// Marked `#[non_exhaustive]` so new failure kinds can be added without breaking callers.
///
/// # Examples
///
/// ```
/// use profilecfg::domain::errors::ConfigError;
///
/// fn require_endpoint() -> Result<String, ConfigError> {
///     Err(ConfigError::Validation {
///         message: "endpoint must be a valid URL".to_string(),
///     })
/// }
/// ```
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Malformed loader options or a schema-violating bootstrap document.
    #[error("Invalid configuration: {message}")]
    Validation {
        /// The first violated constraint
        message: String,
    },

    /// A required configuration file does not exist.
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound {
        /// The path that was probed
        path: PathBuf,
    },

    /// The bootstrap file was explicitly requested but does not exist.
    #[error("Bootstrap configuration not found: {}", path.display())]
    BootstrapNotFound {
        /// The explicitly requested location
        path: PathBuf,
    },

    /// Failed to parse a configuration file or value.
    #[error("Failed to parse configuration: {message}")]
    Parse {
        /// The error message
        message: String,
        /// The underlying parsing error
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A single attempt to fetch remote configuration failed.
    #[error("Error retrieving remote configuration from '{endpoint}': {message}")]
    RemoteFetchFailed {
        /// The endpoint that was contacted
        endpoint: String,
        /// The error message
        message: String,
        /// The underlying client error, if any
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The retry budget for remote fetching was used up.
    #[error("Error retrieving remote configuration: Maximum retries exceeded ({attempts} retries)")]
    RetryExhausted {
        /// Number of retries that were registered before giving up
        attempts: u32,
    },

    /// The configuration was read before any successful load.
    #[error("Configuration hasn't been loaded yet; call `load` first")]
    NotLoaded,

    /// The requested dot path does not exist in the loaded configuration.
    #[error("Configuration key not found: {key}")]
    KeyNotFound {
        /// The dot path that was not found
        key: String,
    },

    /// Failed to convert a configuration value to the requested type.
    #[error("Failed to convert configuration value for key '{key}' to type {target_type}: {source}")]
    TypeConversion {
        /// The key being converted
        key: String,
        /// The target type name
        target_type: String,
        /// The underlying conversion error
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// An I/O error occurred while reading configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    /// Creates a validation error from anything printable.
    pub fn validation(message: impl Into<String>) -> Self {
        ConfigError::Validation {
            message: message.into(),
        }
    }

    /// Creates a parse error wrapping the underlying cause.
    pub fn parse<E>(message: impl Into<String>, err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::Parse {
            message: message.into(),
            source: Some(Box::new(err)),
        }
    }

    /// Creates a remote fetch error without an underlying cause.
    pub fn remote(endpoint: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::RemoteFetchFailed {
            endpoint: endpoint.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Creates a TypeConversion error from a ParseIntError.
    pub fn from_parse_int_error(key: String, err: ParseIntError) -> Self {
        ConfigError::TypeConversion {
            key,
            target_type: "integer".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversion error from a ParseFloatError.
    pub fn from_parse_float_error(key: String, err: ParseFloatError) -> Self {
        ConfigError::TypeConversion {
            key,
            target_type: "float".to_string(),
            source: Box::new(err),
        }
    }

    /// Creates a TypeConversion error from a ParseBoolError.
    pub fn from_parse_bool_error(key: String, err: ParseBoolError) -> Self {
        ConfigError::TypeConversion {
            key,
            target_type: "boolean".to_string(),
            source: Box::new(err),
        }
    }

    /// Returns true when the error belongs to the remote-fetch family.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            ConfigError::RemoteFetchFailed { .. } | ConfigError::RetryExhausted { .. }
        )
    }

    /// Reports any error raised while contacting `endpoint` as a remote fetch failure.
    ///
    /// Remote errors are returned unchanged; anything else is wrapped as the
    /// source of a [`ConfigError::RemoteFetchFailed`].
    pub fn into_remote(self, endpoint: impl Into<String>) -> Self {
        if self.is_remote() {
            return self;
        }
        ConfigError::RemoteFetchFailed {
            endpoint: endpoint.into(),
            message: self.to_string(),
            source: Some(Box::new(self)),
        }
    }
}

/// A specialized Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
