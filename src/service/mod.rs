// SPDX-License-Identifier: MIT OR Apache-2.0

//! Service layer containing the configuration loader.
//!
//! This module contains [`ConfigLoader`], the implementation of the
//! `ConfigurationService` trait, together with the remote reader it drives and
//! an optional process-wide instance.

pub mod global;
pub mod loader;
pub mod remote_reader;

// Re-export commonly used types
pub use loader::{
    ConfigLoader, ConfigLoaderBuilder, SourceLayer, APPLICATION_JSON_VAR, DEFAULT_PRECEDENCE,
};
pub use remote_reader::{RemoteConfigReader, Sleeper};
