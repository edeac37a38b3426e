// SPDX-License-Identifier: MIT OR Apache-2.0

//! Log output setup.
//!
//! The crate itself only emits `tracing` events. Applications that do not
//! install their own subscriber can call [`init`] with the `LOG_LEVEL` option.

use crate::domain::{ConfigError, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Filter used when no level is given.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Builds the filter for a level directive such as `debug` or `profilecfg=trace`.
pub fn filter(level: Option<&str>) -> Result<EnvFilter> {
    let directive = level
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .unwrap_or(DEFAULT_LOG_LEVEL);
    EnvFilter::try_new(directive)
        .map_err(|e| ConfigError::validation(format!("invalid log level '{}': {}", directive, e)))
}

/// Installs a stderr fmt subscriber filtered by `level`.
///
/// Returns `Ok(false)` when a global subscriber was already installed.
///
/// # Examples
///
/// ```rust
/// use profilecfg::domain::LoaderOptions;
///
/// let options = LoaderOptions::new("/etc/orders").with_log_level("debug");
/// profilecfg::logging::init(options.log_level.as_deref()).unwrap();
/// ```
pub fn init(level: Option<&str>) -> Result<bool> {
    let filter = filter(level)?;
    let installed = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init()
        .is_ok();
    Ok(installed)
}
