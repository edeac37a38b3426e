// SPDX-License-Identifier: MIT OR Apache-2.0

//! Local configuration file reader.
//!
//! Locates `{dir}/{stem}.<ext>` using the extensions of the registered parsers,
//! parses every document in the file, keeps the ones whose profile directive
//! matches, and merges them into a single nested [`Document`].

use crate::domain::profiles::PROFILES_KEY;
use crate::domain::{merge, normalize, should_include, ConfigError, Document, ProfileSet, Result};
use crate::ports::ConfigParser;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Maximum allowed size for configuration files (10MB)
/// This prevents denial of service attacks via extremely large files
pub const MAX_CONFIG_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// File stem of the base application configuration.
pub const APPLICATION_STEM: &str = "application";

/// File stem of the bootstrap configuration.
pub const BOOTSTRAP_STEM: &str = "bootstrap";

/// Reads configuration files with a set of registered parsers.
///
/// Extensions are probed in registration order, so with the default parsers
/// `application.yml` wins over `application.yaml`, which wins over
/// `application.properties`.
///
/// # Examples
///
/// ```rust,no_run
/// use profilecfg::adapters::DocumentFileReader;
/// use profilecfg::domain::ProfileSet;
/// use std::path::Path;
///
/// let reader = DocumentFileReader::with_default_parsers();
/// let app = reader
///     .read_application(Path::new("/etc/orders"), &ProfileSet::parse("dev"))
///     .unwrap();
/// println!("{:?}", app.get_path("server.port"));
/// ```
#[derive(Clone, Default)]
pub struct DocumentFileReader {
    parsers: Vec<Arc<dyn ConfigParser>>,
}

impl fmt::Debug for DocumentFileReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentFileReader")
            .field("extensions", &self.extensions())
            .finish()
    }
}

impl DocumentFileReader {
    /// Creates a reader with no parser registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reader with the YAML (feature `yaml`) and properties parsers.
    pub fn with_default_parsers() -> Self {
        let reader = Self::new();
        #[cfg(feature = "yaml")]
        let reader = reader.with_parser(Arc::new(crate::adapters::YamlParser::new()));
        reader.with_parser(Arc::new(crate::adapters::PropertiesParser::new()))
    }

    /// Registers a parser after the existing ones.
    pub fn with_parser(mut self, parser: Arc<dyn ConfigParser>) -> Self {
        self.add_parser(parser);
        self
    }

    /// Registers a parser after the existing ones.
    pub fn add_parser(&mut self, parser: Arc<dyn ConfigParser>) {
        self.parsers.push(parser);
    }

    /// Returns every probed extension in probing order.
    pub fn extensions(&self) -> Vec<&str> {
        self.parsers
            .iter()
            .flat_map(|p| p.supported_extensions().iter().copied())
            .collect()
    }

    /// Returns the path `{dir}/{stem}.<ext>` is expected at for the first extension.
    pub fn expected_path(&self, dir: &Path, stem: &str) -> PathBuf {
        let ext = self.extensions().first().copied().unwrap_or("yml");
        dir.join(format!("{}.{}", stem, ext))
    }

    /// Finds the first existing `{dir}/{stem}.<ext>`.
    pub fn find(&self, dir: &Path, stem: &str) -> Option<PathBuf> {
        self.extensions()
            .into_iter()
            .map(|ext| dir.join(format!("{}.{}", stem, ext)))
            .find(|candidate| candidate.is_file())
    }

    fn parser_for(&self, path: &Path) -> Option<&dyn ConfigParser> {
        let ext = path.extension()?.to_str()?;
        self.parsers
            .iter()
            .find(|p| p.supported_extensions().contains(&ext))
            .map(|p| p.as_ref())
    }

    /// Reads one file, keeping the documents that apply to `profiles`.
    ///
    /// The `profiles` directive is removed from the kept documents and dotted
    /// top-level keys are expanded before merging in file order.
    pub fn read(&self, path: &Path, profiles: &ProfileSet) -> Result<Document> {
        let parser = self.parser_for(path).ok_or_else(|| ConfigError::Parse {
            message: format!("No parser registered for {}", path.display()),
            source: None,
        })?;

        let metadata = fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Io(e),
        })?;

        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Parse {
                message: format!(
                    "Configuration file too large: {} bytes (max {} bytes)",
                    metadata.len(),
                    MAX_CONFIG_FILE_SIZE
                ),
                source: None,
            });
        }

        tracing::debug!("Loading config file from: {}", path.display());
        let content = fs::read_to_string(path)?;
        let documents = parser.parse(&content).map_err(|e| match e {
            ConfigError::Parse { message, source } => ConfigError::Parse {
                message: format!("{}: {}", path.display(), message),
                source,
            },
            other => other,
        })?;

        let total = documents.len();
        let kept: Vec<Document> = documents
            .into_iter()
            .filter(|doc| should_include(doc, profiles))
            .map(|mut doc| {
                doc.remove(PROFILES_KEY);
                normalize(doc)
            })
            .collect();

        tracing::debug!(
            "Using {} of {} documents from {} for profiles [{}]",
            kept.len(),
            total,
            path.display(),
            profiles
        );

        Ok(merge(&kept))
    }

    /// Reads the required `{dir}/application.<ext>`.
    pub fn read_application(&self, dir: &Path, profiles: &ProfileSet) -> Result<Document> {
        match self.find(dir, APPLICATION_STEM) {
            Some(path) => self.read(&path, profiles),
            None => Err(ConfigError::FileNotFound {
                path: self.expected_path(dir, APPLICATION_STEM),
            }),
        }
    }

    /// Reads `{dir}/application-{profile}.<ext>` if it exists.
    pub fn read_profile(
        &self,
        dir: &Path,
        profile: &str,
        profiles: &ProfileSet,
    ) -> Result<Option<Document>> {
        let stem = format!("{}-{}", APPLICATION_STEM, profile);
        match self.find(dir, &stem) {
            Some(path) => self.read(&path, profiles).map(Some),
            None => {
                tracing::debug!(
                    "Profile-specific config not found: {}",
                    self.expected_path(dir, &stem).display()
                );
                Ok(None)
            }
        }
    }
}
