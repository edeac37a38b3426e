// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration service trait definition.
//!
//! This module defines the `ConfigurationService` trait, the main interface for
//! loading the merged configuration and reading values out of it.

use crate::domain::{ConfigError, Document, Result, Value};
use std::sync::Arc;

/// The main configuration service trait.
///
/// `load` recomputes the merged configuration from every source and replaces the
/// stored snapshot; the accessors read the last successful snapshot.
///
/// # Examples
///
/// ```rust
/// use profilecfg::domain::{to_nested, ConfigurationService, Document, Result};
/// use std::sync::Arc;
///
/// struct FixedService(Arc<Document>);
///
/// impl ConfigurationService for FixedService {
///     fn load(&self) -> Result<Arc<Document>> {
///         Ok(self.0.clone())
///     }
///
///     fn instance(&self) -> Result<Arc<Document>> {
///         Ok(self.0.clone())
///     }
/// }
///
/// let doc = to_nested([("database.host", "localhost")]);
/// let service = FixedService(Arc::new(doc));
/// assert!(service.has("database.host"));
/// assert_eq!(service.get_or_default("database.port", "5432").to_string(), "5432");
/// ```
pub trait ConfigurationService {
    /// Recomputes the merged configuration and stores it as the current snapshot.
    ///
    /// On failure the previously stored snapshot is left untouched.
    fn load(&self) -> Result<Arc<Document>>;

    /// Returns the last successfully loaded configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Arc<Document>)` - The current snapshot
    /// * `Err(ConfigError::NotLoaded)` - `load` has never succeeded
    fn instance(&self) -> Result<Arc<Document>>;

    /// Retrieves the value at a dot path of the current snapshot.
    fn get(&self, path: &str) -> Result<Value> {
        self.instance()?
            .get_path(path)
            .cloned()
            .ok_or_else(|| ConfigError::KeyNotFound {
                key: path.to_string(),
            })
    }

    /// Retrieves a value or returns `default` if it is missing or nothing is loaded.
    fn get_or_default(&self, path: &str, default: &str) -> Value {
        self.get(path).unwrap_or_else(|_| Value::from(default))
    }

    /// Checks whether a dot path exists in the current snapshot.
    fn has(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }
}
