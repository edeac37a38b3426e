// SPDX-License-Identifier: MIT OR Apache-2.0

//! Profile-aware hierarchical configuration loading.
//!
//! This crate reads an application's local YAML or properties files, keeps the
//! documents that apply to the active profiles, layers environment overrides
//! and an optional remote configuration server on top, and produces one merged,
//! immutable configuration document with deterministic precedence.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain Layer**: The document model and the pure algorithms (deep merge,
//!   dot-path normalization, profile selection, retry state machine)
//! - **Ports**: Trait definitions for collaborators (`ConfigParser`,
//!   `EnvironmentSource`, `RemoteConfigClient`)
//! - **Adapters**: Parsers, environment sources, the file reader and the
//!   Spring Cloud Config HTTP client
//! - **Service**: The loader that sequences everything and owns the snapshot
//!
//! # Precedence
//!
//! Lowest first, by default:
//!
//! 1. `application.<ext>`, then `application-{profile}.<ext>` per active profile
//! 2. The `APPLICATION_JSON` environment variable
//! 3. The remote configuration, including the resolved client options
//!
//! # Feature Flags
//!
//! - `yaml`: Enable YAML file support (default)
//! - `cli`: Enable the clap `LoaderArgs` flags (default)
//! - `http`: Enable the Spring Cloud Config HTTP client
//! - `full`: Enable all features
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use profilecfg::prelude::*;
//!
//! # fn main() -> Result<()> {
//! let loader = ConfigLoader::new(LoaderOptions::new("/etc/orders").with_profile("dev"))?;
//! let config = loader.load()?;
//!
//! let port = loader.get("server.port")?.to_u64("server.port")?;
//! println!("listening on {} with {} top-level keys", port, config.len());
//! # Ok(())
//! # }
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod logging;
pub mod ports;
pub mod service;

/// Commonly used types and traits.
///
/// This module re-exports the most commonly used types and traits for convenient access.
pub mod prelude {
    pub use crate::domain::{
        ConfigError, ConfigurationService, Document, LoaderOptions, ProfileSet, Result, Value,
    };
    pub use crate::ports::{ConfigParser, EnvironmentSource, RemoteConfigClient};
    pub use crate::service::{ConfigLoader, SourceLayer};

    pub use crate::adapters::{MapEnvironment, ProcessEnvironment, PropertiesParser};
    // Re-export adapters based on feature flags
    #[cfg(feature = "cli")]
    pub use crate::adapters::LoaderArgs;
    #[cfg(feature = "http")]
    pub use crate::adapters::SpringCloudConfigClient;
    #[cfg(feature = "yaml")]
    pub use crate::adapters::YamlParser;
}
