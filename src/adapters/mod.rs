// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapters layer containing the concrete parser, environment, file and remote
//! client implementations.
//!
//! Each adapter implements one of the traits defined in the ports layer, except
//! [`DocumentFileReader`], which drives the registered parsers over local files.

#[cfg(feature = "cli")]
pub mod cli;
pub mod env_var;
pub mod files;
#[cfg(feature = "http")]
pub mod http;
pub mod properties;
#[cfg(feature = "yaml")]
pub mod yaml;

// Re-export adapters based on feature flags
#[cfg(feature = "cli")]
pub use cli::LoaderArgs;
pub use env_var::{MapEnvironment, ProcessEnvironment};
pub use files::DocumentFileReader;
#[cfg(feature = "http")]
pub use http::SpringCloudConfigClient;
pub use properties::PropertiesParser;
#[cfg(feature = "yaml")]
pub use yaml::YamlParser;
