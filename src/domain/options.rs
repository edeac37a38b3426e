// SPDX-License-Identifier: MIT OR Apache-2.0

//! Options controlling where and how the loader reads configuration.

use crate::domain::errors::{ConfigError, Result};
use crate::domain::profiles::ProfileSet;
use crate::ports::EnvironmentSource;
use directories::ProjectDirs;
use std::path::{Path, PathBuf};

/// Environment variable naming the directory holding `application.<ext>`.
pub const CONFIG_PATH_VAR: &str = "CONFIG_PATH";

/// Environment variable naming the directory holding `bootstrap.<ext>`.
pub const CONFIG_BOOTSTRAP_PATH_VAR: &str = "CONFIG_BOOTSTRAP_PATH";

/// Environment variable listing the active profiles, comma-separated.
pub const ACTIVE_PROFILES_VAR: &str = "ACTIVE_PROFILES";

/// Environment variable holding the log filter directive.
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";

/// Options for a [`ConfigLoader`](crate::service::ConfigLoader).
///
/// # Examples
///
/// ```
/// use profilecfg::domain::{LoaderOptions, ProfileSet};
///
/// let options = LoaderOptions::new("/etc/orders")
///     .with_bootstrap_path("/etc/orders/boot")
///     .with_profiles(ProfileSet::parse("dev,east"));
///
/// assert_eq!(options.active_profiles.len(), 2);
/// assert!(options.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoaderOptions {
    /// Directory containing `application.<ext>` and the profile files
    pub config_path: PathBuf,
    /// Directory containing `bootstrap.<ext>`, when it differs from `config_path`
    pub bootstrap_path: Option<PathBuf>,
    /// Active profiles, in caller order
    pub active_profiles: ProfileSet,
    /// Log filter directive, e.g. `debug` or `profilecfg=trace`
    pub log_level: Option<String>,
}

impl LoaderOptions {
    /// Creates options reading from `config_path` with no active profile.
    pub fn new(config_path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: config_path.into(),
            ..Self::default()
        }
    }

    /// Sets an explicit bootstrap directory.
    pub fn with_bootstrap_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.bootstrap_path = Some(path.into());
        self
    }

    /// Replaces the active profiles.
    pub fn with_profiles(mut self, profiles: ProfileSet) -> Self {
        self.active_profiles = profiles;
        self
    }

    /// Adds one active profile.
    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.active_profiles.push(profile);
        self
    }

    /// Sets the log filter directive.
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = Some(level.into());
        self
    }

    /// Reads the options from environment variables.
    ///
    /// `CONFIG_PATH` is required. A missing `ACTIVE_PROFILES` means no profile
    /// is active.
    pub fn from_env(env: &dyn EnvironmentSource) -> Result<Self> {
        let config_path = env.var(CONFIG_PATH_VAR).ok_or_else(|| {
            ConfigError::validation(format!("\"{}\" is required", CONFIG_PATH_VAR))
        })?;

        let options = Self {
            config_path: PathBuf::from(config_path),
            bootstrap_path: env.var(CONFIG_BOOTSTRAP_PATH_VAR).map(PathBuf::from),
            active_profiles: env
                .var(ACTIVE_PROFILES_VAR)
                .map(|list| ProfileSet::parse(&list))
                .unwrap_or_default(),
            log_level: env.var(LOG_LEVEL_VAR),
        };

        tracing::debug!(
            "Loader options from environment source '{}': path={}, profiles=[{}]",
            env.name(),
            options.config_path.display(),
            options.active_profiles
        );

        options.validate()?;
        Ok(options)
    }

    /// Uses the OS-appropriate configuration directory of an application.
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use profilecfg::domain::LoaderOptions;
    ///
    /// let options = LoaderOptions::from_default_location("orders", "com.example").unwrap();
    /// println!("reading from {}", options.config_path.display());
    /// ```
    pub fn from_default_location(app_name: &str, qualifier: &str) -> Result<Self> {
        let proj_dirs = ProjectDirs::from(qualifier, "", app_name).ok_or_else(|| {
            ConfigError::validation("Failed to determine project directories")
        })?;
        Ok(Self::new(proj_dirs.config_dir()))
    }

    /// Returns the directory the bootstrap file is searched in.
    pub fn bootstrap_dir(&self) -> &Path {
        self.bootstrap_path.as_deref().unwrap_or(&self.config_path)
    }

    /// Checks the options, returning the first violated constraint.
    pub fn validate(&self) -> Result<()> {
        if self.config_path.as_os_str().is_empty() {
            return Err(ConfigError::validation("\"config_path\" must not be empty"));
        }
        if matches!(&self.bootstrap_path, Some(p) if p.as_os_str().is_empty()) {
            return Err(ConfigError::validation(
                "\"bootstrap_path\" must not be empty when set",
            ));
        }
        if self.active_profiles.iter().any(|p| p.starts_with('!')) {
            return Err(ConfigError::validation(
                "active profile names must not start with '!'",
            ));
        }
        Ok(())
    }
}
