// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests for the configuration loader.
//!
//! Every test builds a temporary configuration directory, a map-backed
//! environment and, where needed, a scripted remote client.

#![cfg(feature = "yaml")]

mod common;

use common::{loader, ConfigDir, ScriptedRemoteClient, SleepRecorder};
use profilecfg::adapters::MapEnvironment;
use profilecfg::prelude::*;
use std::time::Duration;

const APPLICATION: &str = "\
testUrl: http://default
server:
  port: 8080
  host: 0.0.0.0
";

const APPLICATION_DEV: &str = "\
testUrl: http://dev
server:
  port: 9090
";

#[test]
fn test_profile_file_overrides_base() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write("application-dev.yml", APPLICATION_DEV);

    let config = loader(&dir, "dev", MapEnvironment::new(), None).load().unwrap();
    assert_eq!(config.get_str("testUrl"), Some("http://dev"));
    assert_eq!(config.get_path("server.port"), Some(&Value::from(9090i64)));
    assert_eq!(config.get_str("server.host"), Some("0.0.0.0"));
}

#[test]
fn test_no_profile_uses_base() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write("application-dev.yml", APPLICATION_DEV);

    let config = loader(&dir, "", MapEnvironment::new(), None).load().unwrap();
    assert_eq!(config.get_str("testUrl"), Some("http://default"));
}

#[test]
fn test_profile_documents_in_one_file() {
    let dir = ConfigDir::new();
    dir.write(
        "application.yml",
        "testUrl: http://default\n---\nprofiles: dev\ntestUrl: http://dev\n---\nprofiles: dev,!east\nregion: not-east\n",
    );

    let dev = loader(&dir, "dev", MapEnvironment::new(), None).load().unwrap();
    assert_eq!(dev.get_str("testUrl"), Some("http://dev"));
    assert_eq!(dev.get_str("region"), Some("not-east"));
    assert!(dev.get("profiles").is_none());

    let dev_east = loader(&dir, "dev,east", MapEnvironment::new(), None).load().unwrap();
    assert_eq!(dev_east.get_str("testUrl"), Some("http://dev"));
    assert!(dev_east.get("region").is_none());
}

#[test]
fn test_later_profile_wins() {
    let dir = ConfigDir::new();
    dir.write("application.yml", "color: base\n");
    dir.write("application-dev.yml", "color: dev\n");
    dir.write("application-east.yml", "color: east\n");

    let config = loader(&dir, "dev,east", MapEnvironment::new(), None).load().unwrap();
    assert_eq!(config.get_str("color"), Some("east"));

    let config = loader(&dir, "east,dev", MapEnvironment::new(), None).load().unwrap();
    assert_eq!(config.get_str("color"), Some("dev"));
}

#[test]
fn test_missing_profile_file_is_skipped() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);

    let config = loader(&dir, "qa", MapEnvironment::new(), None).load().unwrap();
    assert_eq!(config.get_str("testUrl"), Some("http://default"));
}

#[test]
fn test_missing_application_file() {
    let dir = ConfigDir::new();
    let err = loader(&dir, "", MapEnvironment::new(), None).load().unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound { .. }));
}

#[test]
fn test_instance_before_and_after_load() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    let loader = loader(&dir, "", MapEnvironment::new(), None);

    assert!(matches!(loader.instance(), Err(ConfigError::NotLoaded)));
    assert!(matches!(loader.get("testUrl"), Err(ConfigError::NotLoaded)));

    let loaded = loader.load().unwrap();
    assert_eq!(loader.instance().unwrap(), loaded);
    assert_eq!(loader.get("testUrl").unwrap().as_str(), Some("http://default"));
    assert!(matches!(
        loader.get("missing.key"),
        Err(ConfigError::KeyNotFound { .. })
    ));
}

#[test]
fn test_reload_picks_up_changes() {
    let dir = ConfigDir::new();
    dir.write("application.yml", "feature: off\n");
    let loader = loader(&dir, "", MapEnvironment::new(), None);
    assert_eq!(loader.load().unwrap().get_str("feature"), Some("off"));

    dir.write("application.yml", "feature: on\n");
    let first = loader.instance().unwrap();
    let second = loader.load().unwrap();
    assert_eq!(first.get_str("feature"), Some("off"));
    assert_eq!(second.get_str("feature"), Some("on"));
}

#[test]
fn test_remote_disabled() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write("bootstrap.yml", "spring:\n  cloud:\n    config:\n      enabled: false\n");
    let client = ScriptedRemoteClient::new(0, [("remote.key", "value")]);

    let config = loader(&dir, "dev", MapEnvironment::new(), Some(client.clone()))
        .load()
        .unwrap();

    assert_eq!(client.calls(), 0);
    assert!(config.get("remote").is_none());
    assert_eq!(
        config.get_path("spring.cloud.config.enabled"),
        Some(&Value::Bool(false))
    );
    assert_eq!(config.get_str("testUrl"), Some("http://default"));
}

#[test]
fn test_no_bootstrap_means_no_remote() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    let client = ScriptedRemoteClient::new(0, [("remote.key", "value")]);

    let config = loader(&dir, "", MapEnvironment::new(), Some(client.clone()))
        .load()
        .unwrap();
    assert_eq!(client.calls(), 0);
    assert!(config.get("spring").is_none());
}

#[test]
fn test_remote_success_overrides_local() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write("bootstrap.yml", "spring.cloud.config.enabled: true\n");
    let client = ScriptedRemoteClient::new(0, [("testUrl", "http://remote"), ("remote.key", "value")]);

    let config = loader(&dir, "", MapEnvironment::new(), Some(client.clone()))
        .load()
        .unwrap();
    assert_eq!(client.calls(), 1);
    assert_eq!(config.get_str("testUrl"), Some("http://remote"));
    assert_eq!(config.get_str("remote.key"), Some("value"));
    assert_eq!(config.get_path("server.port"), Some(&Value::from(8080i64)));
}

#[test]
fn test_remote_fail_once_then_succeed() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write(
        "bootstrap.yml",
        "spring:\n  cloud:\n    config:\n      enabled: true\n      fail-fast: true\n      retry:\n        enabled: true\n",
    );
    let client = ScriptedRemoteClient::new(1, [("remote.key", "value")]);
    let sleeps = SleepRecorder::default();

    let loader = ConfigLoader::builder()
        .with_options(LoaderOptions::new(dir.path()))
        .with_environment(MapEnvironment::new())
        .with_shared_remote_client(client.clone())
        .with_sleeper(sleeps.sleeper())
        .build()
        .unwrap();
    let config = loader.load().unwrap();

    assert_eq!(config.get_str("remote.key"), Some("value"));
    assert_eq!(client.calls(), 2);
    assert_eq!(sleeps.intervals(), vec![Duration::from_millis(1000)]);
}

#[test]
fn test_remote_retry_exhausted() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write(
        "bootstrap.yml",
        "spring:\n  cloud:\n    config:\n      enabled: true\n      fail-fast: true\n      retry:\n        enabled: true\n        max-attempts: 3\n",
    );
    let client = ScriptedRemoteClient::unreachable();
    let sleeps = SleepRecorder::default();

    let loader = ConfigLoader::builder()
        .with_options(LoaderOptions::new(dir.path()))
        .with_environment(MapEnvironment::new())
        .with_shared_remote_client(client.clone())
        .with_sleeper(sleeps.sleeper())
        .build()
        .unwrap();
    let err = loader.load().unwrap_err();

    assert!(matches!(err, ConfigError::RetryExhausted { .. }));
    assert_eq!(client.calls(), 3);
    assert_eq!(
        sleeps.intervals(),
        vec![Duration::from_millis(1000), Duration::from_millis(1100)]
    );
    assert!(matches!(loader.instance(), Err(ConfigError::NotLoaded)));
}

#[test]
fn test_remote_fail_fast_without_retry() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write(
        "bootstrap.yml",
        "spring:\n  cloud:\n    config:\n      enabled: true\n      fail-fast: true\n",
    );
    let client = ScriptedRemoteClient::unreachable();

    let err = loader(&dir, "", MapEnvironment::new(), Some(client.clone()))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigError::RemoteFetchFailed { .. }));
    assert_eq!(client.calls(), 1);
}

#[test]
fn test_remote_failure_tolerated_without_fail_fast() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write("bootstrap.yml", "spring.cloud.config.enabled: true\n");
    let client = ScriptedRemoteClient::unreachable();

    let config = loader(&dir, "", MapEnvironment::new(), Some(client.clone()))
        .load()
        .unwrap();
    assert_eq!(client.calls(), 1);
    assert_eq!(config.get_str("testUrl"), Some("http://default"));
    assert!(config.get_document("spring.cloud.config").is_some());
}

#[test]
fn test_application_name_and_profiles_reach_remote() {
    let dir = ConfigDir::new();
    dir.write(
        "application.yml",
        "spring:\n  cloud:\n    config:\n      name: orders\n",
    );
    dir.write(
        "bootstrap.yml",
        "spring:\n  cloud:\n    config:\n      enabled: true\n      name: bootstrap-name\n",
    );
    let env = MapEnvironment::new().with_var("SPRING_CONFIG_ENDPOINT", "http://config.internal:8888");
    let client = ScriptedRemoteClient::new(0, []);

    loader(&dir, "dev,east", env, Some(client.clone())).load().unwrap();

    let options = client.last_options().unwrap();
    assert_eq!(options.name.as_deref(), Some("orders"));
    assert_eq!(options.profiles, vec!["dev".to_string(), "east".to_string()]);
    assert_eq!(options.endpoint, "http://config.internal:8888");
}

#[test]
fn test_bootstrap_documents_filtered_by_profile() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write(
        "bootstrap.yml",
        "spring.cloud.config.enabled: false\n---\nprofiles: cloud\nspring.cloud.config.enabled: true\n",
    );

    let client = ScriptedRemoteClient::new(0, [("remote.key", "value")]);
    loader(&dir, "", MapEnvironment::new(), Some(client.clone())).load().unwrap();
    assert_eq!(client.calls(), 0);

    let config = loader(&dir, "cloud", MapEnvironment::new(), Some(client.clone()))
        .load()
        .unwrap();
    assert_eq!(client.calls(), 1);
    assert_eq!(config.get_str("remote.key"), Some("value"));
}

#[test]
fn test_bootstrap_path_without_file_disables_remote() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    let client = ScriptedRemoteClient::new(0, [("remote.key", "value")]);

    let loader = ConfigLoader::builder()
        .with_options(LoaderOptions::new(dir.path()).with_bootstrap_path(dir.path().join("boot")))
        .with_environment(MapEnvironment::new())
        .with_shared_remote_client(client.clone())
        .build()
        .unwrap();
    let config = loader.load().unwrap();

    assert_eq!(client.calls(), 0);
    assert_eq!(config.get_str("testUrl"), Some("http://default"));
    assert!(config.get("spring").is_none());
    assert!(config.get("remote").is_none());
}

#[test]
fn test_missing_bootstrap_file_override() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    let env = MapEnvironment::new().with_var(
        "SPRING_CONFIG_BOOTSTRAP_FILE",
        dir.path().join("custom-bootstrap.yml").display().to_string(),
    );

    let err = loader(&dir, "", env, None).load().unwrap_err();
    assert!(matches!(err, ConfigError::BootstrapNotFound { .. }));
}

#[test]
fn test_explicit_bootstrap_path_used() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write("boot/bootstrap.yml", "spring.cloud.config.label: release\n");

    let loader = ConfigLoader::builder()
        .with_options(LoaderOptions::new(dir.path()).with_bootstrap_path(dir.path().join("boot")))
        .with_environment(MapEnvironment::new())
        .build()
        .unwrap();
    let config = loader.load().unwrap();
    assert_eq!(config.get_str("spring.cloud.config.label"), Some("release"));
}

#[test]
fn test_invalid_bootstrap_auth() {
    let dir = ConfigDir::new();
    dir.write("application.yml", APPLICATION);
    dir.write(
        "bootstrap.yml",
        "spring:\n  cloud:\n    config:\n      enabled: true\n      auth:\n        user: admin\n",
    );

    let err = loader(&dir, "", MapEnvironment::new(), None).load().unwrap_err();
    assert!(matches!(err, ConfigError::Validation { .. }));
    assert!(err.to_string().contains("auth.pass"));
}

#[test]
fn test_invalid_yaml_is_fatal() {
    let dir = ConfigDir::new();
    dir.write("application.yml", "server: [unclosed\n");
    let err = loader(&dir, "", MapEnvironment::new(), None).load().unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}
