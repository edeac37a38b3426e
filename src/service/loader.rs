// SPDX-License-Identifier: MIT OR Apache-2.0

//! The configuration loader.
//!
//! [`ConfigLoader`] sequences the local files, the `APPLICATION_JSON`
//! environment blob and the remote reader into one merged document, and keeps
//! the result of the last successful load as an immutable snapshot.

use crate::adapters::{DocumentFileReader, ProcessEnvironment};
use crate::domain::{
    merge, merge_into, normalize, ConfigError, ConfigurationService, Document, LoaderOptions,
    Result, Value,
};
use crate::ports::{ConfigParser, EnvironmentSource, RemoteConfigClient};
use crate::service::remote_reader::{thread_sleeper, RemoteConfigReader, Sleeper};
use std::collections::HashSet;
use std::fmt;
use std::sync::{Arc, RwLock};
use std::time::Duration;

/// Environment variable holding a JSON document of overrides.
pub const APPLICATION_JSON_VAR: &str = "APPLICATION_JSON";

/// One layer of the final merge.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceLayer {
    /// `application.<ext>` merged with the active profile files
    LocalFiles,
    /// The `APPLICATION_JSON` environment variable
    EnvironmentJson,
    /// The remote reader's result, including the resolved client options
    Remote,
}

impl fmt::Display for SourceLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SourceLayer::LocalFiles => "local-files",
            SourceLayer::EnvironmentJson => "environment-json",
            SourceLayer::Remote => "remote",
        };
        write!(f, "{}", name)
    }
}

/// Default merge order, lowest precedence first.
pub const DEFAULT_PRECEDENCE: [SourceLayer; 3] = [
    SourceLayer::LocalFiles,
    SourceLayer::EnvironmentJson,
    SourceLayer::Remote,
];

/// Loads and holds the merged configuration.
///
/// Each [`load`](ConfigLoader::load) recomputes everything from scratch and
/// replaces the stored snapshot only on success. Concurrent loads are not
/// serialized; the last one to finish wins.
///
/// When [`LoaderOptions::log_level`] is set, building the loader installs the
/// crate's stderr subscriber through [`crate::logging::init`] with that level.
/// An application that already installed a global subscriber keeps its own.
///
/// # Examples
///
/// ```rust
/// use profilecfg::adapters::MapEnvironment;
/// use profilecfg::domain::LoaderOptions;
/// use profilecfg::service::ConfigLoader;
///
/// # fn main() -> profilecfg::domain::Result<()> {
/// let dir = tempfile::tempdir()?;
/// std::fs::write(dir.path().join("application.properties"), "server.port=8080\n")?;
///
/// let loader = ConfigLoader::builder()
///     .with_options(LoaderOptions::new(dir.path()))
///     .with_environment(MapEnvironment::new())
///     .build()?;
///
/// let config = loader.load()?;
/// assert_eq!(config.get_str("server.port"), Some("8080"));
/// assert_eq!(loader.get("server.port")?.to_u64("server.port")?, 8080);
/// # Ok(())
/// # }
/// ```
pub struct ConfigLoader {
    options: LoaderOptions,
    files: DocumentFileReader,
    environment: Arc<dyn EnvironmentSource>,
    remote: RemoteConfigReader,
    precedence: Vec<SourceLayer>,
    current: RwLock<Option<Arc<Document>>>,
}

impl fmt::Debug for ConfigLoader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConfigLoader")
            .field("options", &self.options)
            .field("files", &self.files)
            .field("environment", &self.environment.name())
            .field("remote", &self.remote)
            .field("precedence", &self.precedence)
            .finish()
    }
}

impl ConfigLoader {
    /// Creates a new loader builder.
    pub fn builder() -> ConfigLoaderBuilder {
        ConfigLoaderBuilder::new()
    }

    /// Creates a loader for `options` reading the process environment.
    pub fn new(options: LoaderOptions) -> Result<Self> {
        Self::builder().with_options(options).build()
    }

    /// Creates a loader whose options come from the process environment.
    ///
    /// See [`LoaderOptions::from_env`] for the variables read.
    pub fn from_env() -> Result<Self> {
        Self::builder().build()
    }

    /// Returns the loader options.
    pub fn options(&self) -> &LoaderOptions {
        &self.options
    }

    /// Returns the merge order, lowest precedence first.
    pub fn precedence(&self) -> &[SourceLayer] {
        &self.precedence
    }

    /// Reads `application.<ext>` and then each active profile file in order.
    pub fn read_application_config(&self) -> Result<Document> {
        let dir = &self.options.config_path;
        let profiles = &self.options.active_profiles;

        let mut config = self.files.read_application(dir, profiles)?;
        for profile in profiles {
            if let Some(profile_config) = self.files.read_profile(dir, profile, profiles)? {
                merge_into(&mut config, &profile_config);
            }
        }
        Ok(config)
    }

    /// Reads the `APPLICATION_JSON` environment variable.
    ///
    /// Unset means no overrides; a value that is not a JSON object is a
    /// [`ConfigError::Parse`].
    pub fn read_environment_json(&self) -> Result<Document> {
        let raw = match self.environment.var(APPLICATION_JSON_VAR) {
            Some(raw) => raw,
            None => return Ok(Document::new()),
        };

        let json: serde_json::Value = serde_json::from_str(&raw).map_err(|e| {
            ConfigError::parse(format!("{} is not valid JSON", APPLICATION_JSON_VAR), e)
        })?;
        let doc = Document::from_json(json).map_err(|_| ConfigError::Parse {
            message: format!("{} must hold a JSON object", APPLICATION_JSON_VAR),
            source: None,
        })?;

        tracing::debug!(
            "Read {} top-level keys from {}",
            doc.len(),
            APPLICATION_JSON_VAR
        );
        Ok(normalize(doc))
    }

    /// Recomputes the merged configuration and stores it.
    ///
    /// Any error propagates and leaves the previous snapshot untouched.
    pub fn load(&self) -> Result<Arc<Document>> {
        let profiles = &self.options.active_profiles;
        tracing::debug!(
            "Loading configuration from {} for profiles [{}]",
            self.options.config_path.display(),
            profiles
        );

        let local = self.read_application_config()?;
        let environment_json = if self.precedence.contains(&SourceLayer::EnvironmentJson) {
            self.read_environment_json()?
        } else {
            Document::new()
        };
        let remote = if self.precedence.contains(&SourceLayer::Remote) {
            self.remote
                .invoke(profiles, &local, &self.options.config_path)?
        } else {
            Document::new()
        };

        let layers: Vec<&Document> = self
            .precedence
            .iter()
            .map(|layer| {
                let doc = match layer {
                    SourceLayer::LocalFiles => &local,
                    SourceLayer::EnvironmentJson => &environment_json,
                    SourceLayer::Remote => &remote,
                };
                tracing::debug!("Merging layer {} ({} top-level keys)", layer, doc.len());
                doc
            })
            .collect();

        let merged = Arc::new(merge(layers));
        self.store(merged.clone());

        tracing::info!(
            "Configuration loaded from {} ({} top-level keys, profiles [{}])",
            self.options.config_path.display(),
            merged.len(),
            profiles
        );
        Ok(merged)
    }

    /// Returns the last successfully loaded configuration.
    ///
    /// Fails with [`ConfigError::NotLoaded`] before the first successful load.
    pub fn instance(&self) -> Result<Arc<Document>> {
        let current = self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        current.clone().ok_or(ConfigError::NotLoaded)
    }

    /// Retrieves the value at a dot path of the current snapshot.
    pub fn get(&self, path: &str) -> Result<Value> {
        ConfigurationService::get(self, path)
    }

    fn store(&self, config: Arc<Document>) {
        let mut current = self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *current = Some(config);
    }
}

impl ConfigurationService for ConfigLoader {
    fn load(&self) -> Result<Arc<Document>> {
        ConfigLoader::load(self)
    }

    fn instance(&self) -> Result<Arc<Document>> {
        ConfigLoader::instance(self)
    }
}

/// Builder for constructing a [`ConfigLoader`].
///
/// Unset pieces default to: options from the process environment, the process
/// environment itself, the YAML and properties parsers, [`DEFAULT_PRECEDENCE`],
/// a thread-sleeping retry loop and, with the `http` feature, the Spring Cloud
/// Config HTTP client.
pub struct ConfigLoaderBuilder {
    options: Option<LoaderOptions>,
    environment: Option<Arc<dyn EnvironmentSource>>,
    client: Option<Arc<dyn RemoteConfigClient>>,
    default_parsers: bool,
    parsers: Vec<Arc<dyn ConfigParser>>,
    precedence: Vec<SourceLayer>,
    sleeper: Option<Sleeper>,
}

impl ConfigLoaderBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            options: None,
            environment: None,
            client: None,
            default_parsers: true,
            parsers: Vec::new(),
            precedence: DEFAULT_PRECEDENCE.to_vec(),
            sleeper: None,
        }
    }

    /// Sets the loader options instead of reading them from the environment.
    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Sets the environment source.
    pub fn with_environment(mut self, environment: impl EnvironmentSource + 'static) -> Self {
        self.environment = Some(Arc::new(environment));
        self
    }

    /// Sets a shared environment source.
    pub fn with_shared_environment(mut self, environment: Arc<dyn EnvironmentSource>) -> Self {
        self.environment = Some(environment);
        self
    }

    /// Sets the remote configuration client.
    pub fn with_remote_client(mut self, client: impl RemoteConfigClient + 'static) -> Self {
        self.client = Some(Arc::new(client));
        self
    }

    /// Sets a shared remote configuration client.
    pub fn with_shared_remote_client(mut self, client: Arc<dyn RemoteConfigClient>) -> Self {
        self.client = Some(client);
        self
    }

    /// Registers a parser, probed after the ones already registered.
    pub fn with_parser(mut self, parser: impl ConfigParser + 'static) -> Self {
        self.parsers.push(Arc::new(parser));
        self
    }

    /// Leaves out the built-in YAML and properties parsers.
    pub fn without_default_parsers(mut self) -> Self {
        self.default_parsers = false;
        self
    }

    /// Sets the merge order, lowest precedence first.
    ///
    /// A layer left out of the list is not read at all. Local files are always
    /// read since the remote reader needs them.
    pub fn with_precedence(mut self, precedence: impl Into<Vec<SourceLayer>>) -> Self {
        self.precedence = precedence.into();
        self
    }

    /// Replaces the sleep between remote retries.
    pub fn with_sleeper(mut self, sleeper: impl Fn(Duration) + Send + Sync + 'static) -> Self {
        self.sleeper = Some(Arc::new(sleeper));
        self
    }

    /// Builds the loader.
    pub fn build(self) -> Result<ConfigLoader> {
        let environment: Arc<dyn EnvironmentSource> = match self.environment {
            Some(environment) => environment,
            None => Arc::new(ProcessEnvironment::new()),
        };

        let options = match self.options {
            Some(options) => {
                options.validate()?;
                options
            }
            None => LoaderOptions::from_env(environment.as_ref())?,
        };

        if let Some(level) = options.log_level.as_deref() {
            if !crate::logging::init(Some(level))? {
                tracing::debug!("Subscriber already installed; ignoring log level '{}'", level);
            }
        }

        let mut seen = HashSet::new();
        if let Some(dup) = self.precedence.iter().find(|layer| !seen.insert(**layer)) {
            return Err(ConfigError::validation(format!(
                "source layer '{}' listed more than once",
                dup
            )));
        }

        let mut files = if self.default_parsers {
            DocumentFileReader::with_default_parsers()
        } else {
            DocumentFileReader::new()
        };
        for parser in self.parsers {
            files.add_parser(parser);
        }
        if files.extensions().is_empty() {
            return Err(ConfigError::validation("no configuration parser registered"));
        }

        let mut remote = RemoteConfigReader::new(files.clone(), environment.clone())
            .with_bootstrap_path(options.bootstrap_path.clone())
            .with_sleeper(self.sleeper.unwrap_or_else(thread_sleeper));
        if let Some(client) = self.client.or_else(default_client) {
            remote = remote.with_client(client);
        }

        Ok(ConfigLoader {
            options,
            files,
            environment,
            remote,
            precedence: self.precedence,
            current: RwLock::new(None),
        })
    }
}

impl Default for ConfigLoaderBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
fn default_client() -> Option<Arc<dyn RemoteConfigClient>> {
    Some(Arc::new(crate::adapters::SpringCloudConfigClient::new()))
}

#[cfg(not(feature = "http"))]
fn default_client() -> Option<Arc<dyn RemoteConfigClient>> {
    None
}
