// SPDX-License-Identifier: MIT OR Apache-2.0

//! Spring Cloud Config server client.
//!
//! Fetches `GET {endpoint}/{name}/{profiles}/{label}` and folds the returned
//! property sources into one nested document.

use crate::domain::{
    merge_into, to_nested, ConfigClientOptions, ConfigError, Document, Result, Value,
};
use crate::ports::RemoteConfigClient;
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Application name requested when the options do not carry one.
pub const DEFAULT_APPLICATION_NAME: &str = "application";

/// Profile requested when no profile is active.
pub const DEFAULT_PROFILE: &str = "default";

#[derive(Debug, Deserialize)]
struct EnvironmentResponse {
    #[serde(rename = "propertySources", default)]
    property_sources: Vec<PropertySource>,
}

#[derive(Debug, Deserialize)]
struct PropertySource {
    #[serde(default)]
    name: String,
    #[serde(default)]
    source: serde_json::Map<String, serde_json::Value>,
}

/// Blocking HTTP client for a Spring Cloud Config server.
///
/// # Examples
///
/// ```rust,no_run
/// use profilecfg::adapters::SpringCloudConfigClient;
/// use profilecfg::domain::ConfigClientOptions;
/// use profilecfg::ports::RemoteConfigClient;
///
/// let client = SpringCloudConfigClient::new();
/// let mut options = ConfigClientOptions::default();
/// options.name = Some("orders".to_string());
/// let remote = client.fetch(&options).unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SpringCloudConfigClient {
    timeout: Duration,
}

impl Default for SpringCloudConfigClient {
    fn default() -> Self {
        Self::new()
    }
}

impl SpringCloudConfigClient {
    /// Creates a client with the default timeout.
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds the environment URL for the given options.
    pub fn request_url(options: &ConfigClientOptions) -> Result<Url> {
        let mut url = Url::parse(&options.endpoint).map_err(|e| ConfigError::RemoteFetchFailed {
            endpoint: options.endpoint.clone(),
            message: "invalid endpoint".to_string(),
            source: Some(Box::new(e)),
        })?;

        let name = options.name.as_deref().unwrap_or(DEFAULT_APPLICATION_NAME);
        let profiles = if options.profiles.is_empty() {
            DEFAULT_PROFILE.to_string()
        } else {
            options.profiles.join(",")
        };

        url.path_segments_mut()
            .map_err(|_| ConfigError::remote(options.endpoint.clone(), "endpoint cannot be a base URL"))?
            .pop_if_empty()
            .push(name)
            .push(&profiles)
            .push(&options.label);

        Ok(url)
    }

    /// Folds a server response body into one nested document.
    ///
    /// The server lists the highest-priority source first, so sources are
    /// merged from the end of the list.
    pub fn document_from_response(body: serde_json::Value) -> Result<Document> {
        let response: EnvironmentResponse = serde_json::from_value(body)
            .map_err(|e| ConfigError::parse("Unexpected config server response", e))?;

        let mut merged = Document::new();
        for source in response.property_sources.iter().rev() {
            tracing::debug!(
                "Merging property source '{}' ({} keys)",
                source.name,
                source.source.len()
            );
            let nested = to_nested(
                source
                    .source
                    .iter()
                    .map(|(k, v)| (k.as_str(), Value::from_json(v.clone()))),
            );
            merge_into(&mut merged, &nested);
        }
        Ok(merged)
    }

    fn http_client(&self, options: &ConfigClientOptions) -> Result<reqwest::blocking::Client> {
        let mut builder = reqwest::blocking::Client::builder().timeout(self.timeout);

        if !options.reject_unauthorized {
            if options.endpoint.starts_with("https://") {
                builder = builder.danger_accept_invalid_certs(true);
            } else {
                tracing::warn!(
                    "rejectUnauthorized=false has no effect on HTTP endpoints. TLS verification only applies to HTTPS connections."
                );
            }
        }

        builder.build().map_err(|e| ConfigError::RemoteFetchFailed {
            endpoint: options.endpoint.clone(),
            message: "failed to build HTTP client".to_string(),
            source: Some(Box::new(e)),
        })
    }
}

impl RemoteConfigClient for SpringCloudConfigClient {
    fn name(&self) -> &str {
        "spring-cloud-config"
    }

    fn fetch(&self, options: &ConfigClientOptions) -> Result<Document> {
        let url = Self::request_url(options)?;
        let client = self.http_client(options)?;

        let mut request = client.get(url.clone()).header("Accept", "application/json");
        if let Some(auth) = &options.auth {
            request = request.basic_auth(auth.user.clone().unwrap_or_default(), auth.pass.clone());
        }

        tracing::debug!("Fetching remote configuration from {}", url);
        let fetch_error = |message: &str, e: reqwest::Error| ConfigError::RemoteFetchFailed {
            endpoint: options.endpoint.clone(),
            message: message.to_string(),
            source: Some(Box::new(e)),
        };

        let response = request.send().map_err(|e| fetch_error("request failed", e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ConfigError::remote(
                options.endpoint.clone(),
                format!("config server answered {}", status),
            ));
        }

        let body: serde_json::Value = response
            .json()
            .map_err(|e| fetch_error("invalid response body", e))?;
        Self::document_from_response(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_url_defaults() {
        let url = SpringCloudConfigClient::request_url(&ConfigClientOptions::default()).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8888/application/default/master");
    }

    #[test]
    fn test_request_url_with_options() {
        let mut options = ConfigClientOptions::default();
        options.endpoint = "https://config.example.com/base/".to_string();
        options.name = Some("orders".to_string());
        options.profiles = vec!["dev".to_string(), "east".to_string()];
        options.label = "release".to_string();
        let url = SpringCloudConfigClient::request_url(&options).unwrap();
        assert_eq!(
            url.as_str(),
            "https://config.example.com/base/orders/dev,east/release"
        );
    }

    #[test]
    fn test_document_from_response_priority() {
        let body = json!({
            "name": "orders",
            "profiles": ["dev"],
            "propertySources": [
                {"name": "orders-dev.yml", "source": {"db.host": "dev-db", "db.port": 5433}},
                {"name": "orders.yml", "source": {"db.host": "db", "db.user": "orders"}}
            ]
        });
        let doc = SpringCloudConfigClient::document_from_response(body).unwrap();
        assert_eq!(
            doc,
            Document::from_json(json!({"db": {"host": "dev-db", "port": 5433, "user": "orders"}}))
                .unwrap()
        );
    }

    #[test]
    fn test_document_from_response_without_sources() {
        let doc = SpringCloudConfigClient::document_from_response(json!({"name": "x"})).unwrap();
        assert!(doc.is_empty());
    }

    #[test]
    fn test_document_from_response_invalid() {
        let result = SpringCloudConfigClient::document_from_response(json!({"propertySources": 3}));
        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }
}
