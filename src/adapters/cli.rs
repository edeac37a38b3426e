// SPDX-License-Identifier: MIT OR Apache-2.0

//! Command-line arguments for the loader options.
//!
//! [`LoaderArgs`] is meant to be flattened into a host application's clap
//! parser. Every flag falls back to the environment variable read by
//! [`LoaderOptions::from_env`].

use crate::domain::options::{
    ACTIVE_PROFILES_VAR, CONFIG_BOOTSTRAP_PATH_VAR, CONFIG_PATH_VAR, LOG_LEVEL_VAR,
};
use crate::domain::{LoaderOptions, ProfileSet, Result};
use clap::Args;
use std::path::PathBuf;

/// Loader flags for a clap command line.
///
/// # Examples
///
/// ```rust
/// use clap::Parser;
/// use profilecfg::adapters::LoaderArgs;
///
/// #[derive(Parser)]
/// struct Cli {
///     #[command(flatten)]
///     config: LoaderArgs,
/// }
///
/// let cli = Cli::parse_from(["app", "--config-path", "/etc/orders", "--profiles", "dev,east"]);
/// let options = cli.config.into_options().unwrap();
/// assert_eq!(options.active_profiles.as_slice(), ["dev", "east"]);
/// ```
#[derive(Debug, Clone, Args)]
pub struct LoaderArgs {
    /// Directory containing application.<ext> and the profile files
    #[arg(long, value_name = "DIR", env = CONFIG_PATH_VAR)]
    pub config_path: PathBuf,

    /// Directory containing bootstrap.<ext>
    #[arg(long, value_name = "DIR", env = CONFIG_BOOTSTRAP_PATH_VAR)]
    pub bootstrap_path: Option<PathBuf>,

    /// Active profiles, comma-separated
    #[arg(
        short = 'p',
        long,
        value_name = "PROFILES",
        value_delimiter = ',',
        env = ACTIVE_PROFILES_VAR
    )]
    pub profiles: Vec<String>,

    /// Log filter directive, e.g. debug
    #[arg(long, value_name = "LEVEL", env = LOG_LEVEL_VAR)]
    pub log_level: Option<String>,
}

impl LoaderArgs {
    /// Converts the parsed flags into validated loader options.
    pub fn into_options(self) -> Result<LoaderOptions> {
        let options = LoaderOptions {
            config_path: self.config_path,
            bootstrap_path: self.bootstrap_path,
            active_profiles: self.profiles.into_iter().collect::<ProfileSet>(),
            log_level: self.log_level,
        };
        options.validate()?;
        Ok(options)
    }
}

impl TryFrom<LoaderArgs> for LoaderOptions {
    type Error = crate::domain::ConfigError;

    fn try_from(args: LoaderArgs) -> Result<Self> {
        args.into_options()
    }
}
