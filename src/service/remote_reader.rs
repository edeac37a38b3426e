// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote configuration reader.
//!
//! Resolves the client options from the bootstrap file, the environment and the
//! local application configuration, then fetches the remote configuration under
//! the fail-fast and retry policy:
//!
//! | fetch   | `fail-fast` | `retry.enabled` | result                          |
//! |---------|-------------|-----------------|---------------------------------|
//! | ok      | any         | any             | fetched data under the options  |
//! | failed  | false       | any             | options document, warning logged|
//! | failed  | true        | false           | `RemoteFetchFailed`             |
//! | failed  | true        | true            | retried until ok or exhausted   |

use crate::adapters::files::BOOTSTRAP_STEM;
use crate::adapters::DocumentFileReader;
use crate::domain::client_options::CLIENT_OPTIONS_PATH;
use crate::domain::{
    merge, normalize, retry_with_state, ConfigClientOptions, ConfigError, Document, ProfileSet,
    Result, RetryState,
};
use crate::ports::{mapped_properties, EnvMapping, EnvironmentSource, RemoteConfigClient};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Environment variable naming an explicit bootstrap file.
pub const SPRING_CONFIG_BOOTSTRAP_FILE_VAR: &str = "SPRING_CONFIG_BOOTSTRAP_FILE";

/// Environment variables overriding individual client options.
pub const SPRING_CLOUD_ENV_TABLE: &[EnvMapping] = &[
    EnvMapping::new("SPRING_CONFIG_ENDPOINT", "spring.cloud.config.endpoint"),
    EnvMapping::new("SPRING_CONFIG_AUTH_USER", "spring.cloud.config.auth.user"),
    EnvMapping::new("SPRING_CONFIG_AUTH_PASS", "spring.cloud.config.auth.pass"),
];

/// Blocking sleep used between retries.
pub type Sleeper = Arc<dyn Fn(Duration) + Send + Sync>;

/// Returns the sleeper backed by [`std::thread::sleep`].
pub fn thread_sleeper() -> Sleeper {
    Arc::new(std::thread::sleep)
}

/// Reads remote configuration for one load.
///
/// # Examples
///
/// ```rust
/// use profilecfg::adapters::{DocumentFileReader, MapEnvironment};
/// use profilecfg::domain::{Document, ProfileSet};
/// use profilecfg::service::RemoteConfigReader;
/// use std::sync::Arc;
///
/// let dir = tempfile::tempdir().unwrap();
/// let reader = RemoteConfigReader::new(
///     DocumentFileReader::with_default_parsers(),
///     Arc::new(MapEnvironment::new()),
/// );
///
/// // Without a bootstrap file the remote source is disabled.
/// let remote = reader.invoke(&ProfileSet::new(), &Document::new(), dir.path()).unwrap();
/// assert!(remote.is_empty());
/// ```
#[derive(Clone)]
pub struct RemoteConfigReader {
    files: DocumentFileReader,
    environment: Arc<dyn EnvironmentSource>,
    client: Option<Arc<dyn RemoteConfigClient>>,
    bootstrap_path: Option<PathBuf>,
    sleeper: Sleeper,
}

impl fmt::Debug for RemoteConfigReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RemoteConfigReader")
            .field("files", &self.files)
            .field("environment", &self.environment.name())
            .field("client", &self.client.as_ref().map(|c| c.name().to_string()))
            .field("bootstrap_path", &self.bootstrap_path)
            .finish()
    }
}

impl RemoteConfigReader {
    /// Creates a reader with no remote client and a thread-sleeping retry loop.
    pub fn new(files: DocumentFileReader, environment: Arc<dyn EnvironmentSource>) -> Self {
        Self {
            files,
            environment,
            client: None,
            bootstrap_path: None,
            sleeper: thread_sleeper(),
        }
    }

    /// Sets the client used to fetch remote configuration.
    pub fn with_client(mut self, client: Arc<dyn RemoteConfigClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets an explicit bootstrap directory, which then must contain a bootstrap file.
    pub fn with_bootstrap_path(mut self, path: Option<PathBuf>) -> Self {
        self.bootstrap_path = path;
        self
    }

    /// Replaces the sleeper called between retries.
    pub fn with_sleeper(mut self, sleeper: Sleeper) -> Self {
        self.sleeper = sleeper;
        self
    }

    /// Locates the bootstrap file.
    ///
    /// Returns `Ok(None)` when the bootstrap directory has no bootstrap file,
    /// and `BootstrapNotFound` when the file named by
    /// `SPRING_CONFIG_BOOTSTRAP_FILE` is missing.
    pub fn bootstrap_file(&self, default_config_path: &Path) -> Result<Option<PathBuf>> {
        if let Some(file) = self.environment.var(SPRING_CONFIG_BOOTSTRAP_FILE_VAR) {
            let file = PathBuf::from(file);
            return if file.is_file() {
                Ok(Some(file))
            } else {
                Err(ConfigError::BootstrapNotFound { path: file })
            };
        }

        let dir = self.bootstrap_path.as_deref().unwrap_or(default_config_path);
        let found = self.files.find(dir, BOOTSTRAP_STEM);
        if found.is_none() {
            if self.bootstrap_path.is_some() {
                tracing::warn!(
                    "Bootstrap file not found: {}; remote configuration disabled",
                    self.files.expected_path(dir, BOOTSTRAP_STEM).display()
                );
            } else {
                tracing::debug!(
                    "No bootstrap file found in {}; remote configuration disabled",
                    dir.display()
                );
            }
        }
        Ok(found)
    }

    /// Builds and validates the client options document from a bootstrap file.
    ///
    /// Layers, lowest first: defaults, bootstrap file, environment table, then
    /// the active profiles and the application name from `application_config`.
    pub fn resolve_options(
        &self,
        bootstrap_file: &Path,
        profiles: &ProfileSet,
        application_config: &Document,
    ) -> Result<(Document, ConfigClientOptions)> {
        let bootstrap = self.files.read(bootstrap_file, profiles)?;
        let env_overrides = mapped_properties(self.environment.as_ref(), SPRING_CLOUD_ENV_TABLE);

        let mut overrides = Document::new();
        overrides.insert("profiles", profiles.to_value());
        if let Some(name) = application_config.get_str(&format!("{}.name", CLIENT_OPTIONS_PATH)) {
            overrides.insert("name", name);
        }
        let overrides = overrides.nest_under(CLIENT_OPTIONS_PATH);

        let options_doc = merge(&[
            ConfigClientOptions::defaults_document(),
            bootstrap,
            env_overrides,
            overrides,
        ]);
        let options = ConfigClientOptions::from_document(&options_doc)?;
        Ok((options_doc, options))
    }

    /// Produces the remote layer of a load.
    pub fn invoke(
        &self,
        profiles: &ProfileSet,
        application_config: &Document,
        default_config_path: &Path,
    ) -> Result<Document> {
        let bootstrap_file = match self.bootstrap_file(default_config_path)? {
            Some(file) => file,
            None => return Ok(Document::new()),
        };

        let (options_doc, options) =
            self.resolve_options(&bootstrap_file, profiles, application_config)?;

        if !options.enabled {
            tracing::debug!("Remote configuration disabled by {}", bootstrap_file.display());
            return Ok(options_doc);
        }

        tracing::debug!(
            "Remote config options: endpoint={}, name={:?}, label={}, profiles={:?}",
            options.endpoint,
            options.name,
            options.label,
            options.profiles
        );

        let fetched = match self.fetch(&options) {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Error reading remote configuration: {}", e);
                if !options.fail_fast {
                    return Ok(options_doc);
                }
                if !options.retry_enabled() {
                    return Err(e);
                }
                let mut state = RetryState::new(&options.retry_options());
                retry_with_state(|| self.fetch(&options), &mut state, |d| (self.sleeper)(d))?
            }
        };

        Ok(merge(&[fetched, options_doc]))
    }

    fn fetch(&self, options: &ConfigClientOptions) -> Result<Document> {
        let client = self.client.as_ref().ok_or_else(|| {
            ConfigError::remote(options.endpoint.clone(), "no remote client configured")
        })?;
        let fetched = client
            .fetch(options)
            .map_err(|e| e.into_remote(options.endpoint.clone()))?;
        tracing::debug!(
            "Fetched {} top-level keys from remote client '{}'",
            fetched.len(),
            client.name()
        );
        Ok(normalize(fetched))
    }
}
