// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared fixtures for the integration tests.

use profilecfg::adapters::MapEnvironment;
use profilecfg::domain::{to_nested, ConfigClientOptions, ConfigError, Document, LoaderOptions, Result};
use profilecfg::ports::RemoteConfigClient;
use profilecfg::service::ConfigLoader;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// A temporary configuration directory.
pub struct ConfigDir {
    dir: TempDir,
}

#[allow(dead_code)]
impl ConfigDir {
    /// Creates an empty directory.
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    /// Writes a file into the directory, creating parent directories.
    pub fn write(&self, name: &str, content: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&path, content).unwrap();
        path
    }

    /// Removes a file from the directory.
    pub fn remove(&self, name: &str) {
        fs::remove_file(self.dir.path().join(name)).unwrap();
    }

    /// Returns the directory path.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }
}

/// A remote client that fails a fixed number of times before answering.
pub struct ScriptedRemoteClient {
    failures_before_success: u32,
    response: Document,
    calls: AtomicU32,
    seen: Mutex<Vec<ConfigClientOptions>>,
}

#[allow(dead_code)]
impl ScriptedRemoteClient {
    /// Creates a client answering `response` after `failures_before_success` failures.
    pub fn new<'a>(
        failures_before_success: u32,
        response: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Arc<Self> {
        Arc::new(Self {
            failures_before_success,
            response: to_nested(response),
            calls: AtomicU32::new(0),
            seen: Mutex::new(Vec::new()),
        })
    }

    /// Creates a client that always fails.
    pub fn unreachable() -> Arc<Self> {
        Self::new(u32::MAX, [])
    }

    /// Returns how many fetches were attempted.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    /// Returns the options of the most recent fetch.
    pub fn last_options(&self) -> Option<ConfigClientOptions> {
        self.seen.lock().unwrap().last().cloned()
    }
}

impl RemoteConfigClient for ScriptedRemoteClient {
    fn name(&self) -> &str {
        "scripted"
    }

    fn fetch(&self, options: &ConfigClientOptions) -> Result<Document> {
        self.seen.lock().unwrap().push(options.clone());
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.failures_before_success {
            Err(ConfigError::remote(options.endpoint.clone(), "connection refused"))
        } else {
            Ok(self.response.clone())
        }
    }
}

/// Records every retry sleep instead of sleeping.
#[derive(Clone, Default)]
pub struct SleepRecorder(Arc<Mutex<Vec<Duration>>>);

#[allow(dead_code)]
impl SleepRecorder {
    /// Returns the recorded intervals.
    pub fn intervals(&self) -> Vec<Duration> {
        self.0.lock().unwrap().clone()
    }

    /// Returns a sleeper closure feeding this recorder.
    pub fn sleeper(&self) -> impl Fn(Duration) + Send + Sync + 'static {
        let inner = self.0.clone();
        move |d| inner.lock().unwrap().push(d)
    }
}

/// Builds a loader over `dir` with the given profiles, environment and remote client.
#[allow(dead_code)]
pub fn loader(
    dir: &ConfigDir,
    profiles: &str,
    env: MapEnvironment,
    client: Option<Arc<ScriptedRemoteClient>>,
) -> ConfigLoader {
    let options = LoaderOptions::new(dir.path())
        .with_profiles(profilecfg::domain::ProfileSet::parse(profiles));
    let mut builder = ConfigLoader::builder()
        .with_options(options)
        .with_environment(env)
        .with_sleeper(|_: Duration| {});
    if let Some(client) = client {
        builder = builder.with_shared_remote_client(client);
    }
    builder.build().unwrap()
}
