// SPDX-License-Identifier: MIT OR Apache-2.0

//! Environment source trait definition.
//!
//! The loader never reads `std::env` directly. It asks an [`EnvironmentSource`]
//! for the handful of variables it understands, which keeps tests free of
//! process-global state.

use crate::domain::{to_nested, Document};

/// A read-only view of environment variables.
///
/// Implementations should report empty or whitespace-only values as unset.
///
/// # Examples
///
/// ```rust
/// use profilecfg::ports::EnvironmentSource;
///
/// struct Fixed;
///
/// impl EnvironmentSource for Fixed {
///     fn name(&self) -> &str {
///         "fixed"
///     }
///
///     fn var(&self, name: &str) -> Option<String> {
///         (name == "ACTIVE_PROFILES").then(|| "dev".to_string())
///     }
/// }
///
/// assert_eq!(Fixed.var("ACTIVE_PROFILES").as_deref(), Some("dev"));
/// assert!(Fixed.var("CONFIG_PATH").is_none());
/// ```
pub trait EnvironmentSource: Send + Sync {
    /// Returns the name of this source, used in log messages.
    fn name(&self) -> &str;

    /// Returns the value of a variable, or `None` if it is unset or blank.
    fn var(&self, name: &str) -> Option<String>;
}

/// Maps one environment variable onto a dot-path property.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnvMapping {
    /// Name of the environment variable
    pub env_var: &'static str,
    /// Dot path the value is placed at
    pub property: &'static str,
}

impl EnvMapping {
    /// Creates a mapping.
    pub const fn new(env_var: &'static str, property: &'static str) -> Self {
        Self { env_var, property }
    }
}

/// Reads every mapped variable that is set and nests the values by property path.
///
/// # Examples
///
/// ```rust
/// use profilecfg::adapters::MapEnvironment;
/// use profilecfg::ports::{mapped_properties, EnvMapping};
///
/// const TABLE: &[EnvMapping] = &[EnvMapping::new("DB_HOST", "database.host")];
///
/// let env = MapEnvironment::new().with_var("DB_HOST", "db.internal");
/// let doc = mapped_properties(&env, TABLE);
/// assert_eq!(doc.get_str("database.host"), Some("db.internal"));
/// ```
pub fn mapped_properties(env: &dyn EnvironmentSource, table: &[EnvMapping]) -> Document {
    let found: Vec<(&str, String)> = table
        .iter()
        .filter_map(|m| env.var(m.env_var).map(|value| (m.property, value)))
        .collect();

    if !found.is_empty() {
        tracing::debug!(
            "Read {} mapped variables from environment source '{}'",
            found.len(),
            env.name()
        );
    }

    to_nested(found)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    struct TestEnvironment(HashMap<&'static str, &'static str>);

    impl EnvironmentSource for TestEnvironment {
        fn name(&self) -> &str {
            "test"
        }

        fn var(&self, name: &str) -> Option<String> {
            self.0.get(name).map(|v| v.to_string())
        }
    }

    const TABLE: &[EnvMapping] = &[
        EnvMapping::new("APP_ENDPOINT", "spring.cloud.config.endpoint"),
        EnvMapping::new("APP_USER", "spring.cloud.config.auth.user"),
        EnvMapping::new("APP_PASS", "spring.cloud.config.auth.pass"),
    ];

    #[test]
    fn test_mapped_properties_nests_values() {
        let env = TestEnvironment(HashMap::from([
            ("APP_ENDPOINT", "http://config:8888"),
            ("APP_USER", "admin"),
        ]));
        let doc = mapped_properties(&env, TABLE);
        assert_eq!(
            doc.get_str("spring.cloud.config.endpoint"),
            Some("http://config:8888")
        );
        assert_eq!(doc.get_str("spring.cloud.config.auth.user"), Some("admin"));
        assert!(doc.get_path("spring.cloud.config.auth.pass").is_none());
    }

    #[test]
    fn test_mapped_properties_empty_environment() {
        let env = TestEnvironment(HashMap::new());
        assert!(mapped_properties(&env, TABLE).is_empty());
    }
}
