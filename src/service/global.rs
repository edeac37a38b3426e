// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide convenience loader.
//!
//! Applications that want a single configuration reachable from anywhere can
//! install one [`ConfigLoader`] here. The loader is created once and never
//! replaced; use owned loaders when several independent configurations must
//! coexist.

use crate::domain::{ConfigError, Document, Result};
use crate::service::ConfigLoader;
use once_cell::sync::OnceCell;
use std::sync::Arc;

static GLOBAL: OnceCell<ConfigLoader> = OnceCell::new();

/// Installs the process-wide loader.
///
/// Fails with a validation error if a loader was already installed.
pub fn init(loader: ConfigLoader) -> Result<&'static ConfigLoader> {
    GLOBAL
        .set(loader)
        .map_err(|_| ConfigError::validation("global configuration loader already initialized"))?;
    GLOBAL
        .get()
        .ok_or_else(|| ConfigError::validation("global configuration loader unavailable"))
}

/// Returns the process-wide loader, building it from the process environment
/// on first use.
pub fn loader() -> Result<&'static ConfigLoader> {
    GLOBAL.get_or_try_init(ConfigLoader::from_env)
}

/// Loads the process-wide configuration.
pub fn load() -> Result<Arc<Document>> {
    loader()?.load()
}

/// Returns the last configuration loaded by the process-wide loader.
///
/// Fails with [`ConfigError::NotLoaded`] before the first successful load.
pub fn instance() -> Result<Arc<Document>> {
    GLOBAL.get().ok_or(ConfigError::NotLoaded)?.instance()
}
