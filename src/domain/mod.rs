// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain layer containing core business logic and types.
//!
//! This module holds the document model and the pure algorithms of the loader:
//! deep merge, dot-path normalization, profile selection and the retry state
//! machine. Nothing here touches the file system or the network.

pub mod client_options;
pub mod document;
pub mod dot_path;
pub mod errors;
pub(crate) mod lenient;
pub mod merge;
pub mod options;
pub mod profiles;
pub mod retry;
pub mod service;
pub mod value;

// Re-export commonly used types
pub use client_options::{AuthOptions, ConfigClientOptions};
pub use document::Document;
pub use dot_path::{flatten, normalize, to_nested, DotPath};
pub use errors::{ConfigError, Result};
pub use merge::{merge, merge_into};
pub use options::{
    LoaderOptions, ACTIVE_PROFILES_VAR, CONFIG_BOOTSTRAP_PATH_VAR, CONFIG_PATH_VAR, LOG_LEVEL_VAR,
};
pub use profiles::{should_include, ProfileDirective, ProfileSet, ProfileToken};
pub use retry::{retry_with_state, RetryOptions, RetryState};
pub use service::ConfigurationService;
pub use value::Value;
