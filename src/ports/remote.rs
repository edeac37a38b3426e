// SPDX-License-Identifier: MIT OR Apache-2.0

//! Remote configuration client trait definition.
//!
//! The crate does not depend on any particular wire protocol. The remote reader
//! only needs something that turns resolved [`ConfigClientOptions`] into a
//! [`Document`], and wraps it with the fail-fast and retry policy.

use crate::domain::{ConfigClientOptions, Document, Result};

/// A client able to fetch configuration from a remote source.
///
/// Returned documents may use nested keys or flat dot-path keys; the reader
/// normalizes them before merging. Failures should be reported as
/// [`ConfigError::RemoteFetchFailed`](crate::domain::ConfigError::RemoteFetchFailed).
///
/// # Examples
///
/// ```rust
/// use profilecfg::domain::{ConfigClientOptions, Document, Result};
/// use profilecfg::ports::RemoteConfigClient;
///
/// struct StaticClient;
///
/// impl RemoteConfigClient for StaticClient {
///     fn fetch(&self, options: &ConfigClientOptions) -> Result<Document> {
///         Ok([("served_by", options.endpoint.as_str())].into_iter().collect())
///     }
/// }
///
/// let doc = StaticClient.fetch(&ConfigClientOptions::default()).unwrap();
/// assert_eq!(doc.get_str("served_by"), Some("http://localhost:8888"));
/// ```
pub trait RemoteConfigClient: Send + Sync {
    /// Returns the name of this client, used in log messages.
    fn name(&self) -> &str {
        "remote"
    }

    /// Fetches the remote configuration once.
    fn fetch(&self, options: &ConfigClientOptions) -> Result<Document>;
}
