// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ports layer containing trait definitions.
//!
//! This module contains the trait definitions (ports) for the collaborators the
//! loader talks to: file parsers, the environment, and the remote configuration
//! client. Implementations live in the adapters layer.

pub mod environment;
pub mod parser;
pub mod remote;

// Re-export commonly used types
pub use environment::{mapped_properties, EnvMapping, EnvironmentSource};
pub use parser::ConfigParser;
pub use remote::RemoteConfigClient;
