//! Remote content fetching on the server's behalf.
//!
//! The analysis server cannot reach the network through the editor's proxy
//! configuration, so it asks the client to fetch remote schema content via
//! the `vscode/content` request. [`ContentFetcher`] is the seam; the
//! production implementation uses a blocking HTTP client with gzip/deflate
//! response decompression, and tests substitute an in-memory fake.

use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};

use yamlhost_config::HttpSettings;

/// Log target for content fetches.
const FETCH_TARGET: &str = "yamlhost_client::fetch";

/// Timeout applied to each content fetch.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches the content behind a URI for the server.
pub trait ContentFetcher: Send + Sync {
    /// Returns the body behind `uri` as text.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] when the fetch fails or the server answers
    /// with a non-success status.
    fn fetch(&self, uri: &str) -> Result<String, FetchError>;
}

/// Errors raised while fetching remote content.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The request could not be performed.
    #[error("failed to fetch '{uri}': {source}")]
    Http {
        /// URI that was requested.
        uri: String,
        /// Underlying HTTP client error.
        #[source]
        source: reqwest::Error,
    },

    /// The remote answered with a non-success status.
    #[error("fetch of '{uri}' returned status {status}")]
    Status {
        /// URI that was requested.
        uri: String,
        /// HTTP status code.
        status: u16,
    },
}

/// HTTP-backed content fetcher.
#[derive(Debug, Clone)]
pub struct HttpContentFetcher {
    client: reqwest::blocking::Client,
}

impl HttpContentFetcher {
    /// Builds a fetcher with a request timeout and compressed transfer
    /// support.
    #[must_use]
    pub fn new() -> Self {
        Self::with_proxy(&HttpSettings::default())
    }

    /// Builds a fetcher honouring the host's proxy settings.
    ///
    /// An unparseable proxy URL is logged and skipped rather than failing
    /// activation.
    #[must_use]
    pub fn with_proxy(http: &HttpSettings) -> Self {
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .danger_accept_invalid_certs(!http.proxy_strict_ssl);

        if let Some(proxy_url) = &http.proxy {
            match reqwest::Proxy::all(proxy_url) {
                Ok(proxy) => builder = builder.proxy(proxy),
                Err(error) => {
                    warn!(
                        target: FETCH_TARGET,
                        proxy = %proxy_url,
                        error = %error,
                        "ignoring invalid proxy URL"
                    );
                }
            }
        }

        let client = builder
            .build()
            .unwrap_or_else(|_| reqwest::blocking::Client::new());
        Self { client }
    }
}

impl Default for HttpContentFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentFetcher for HttpContentFetcher {
    fn fetch(&self, uri: &str) -> Result<String, FetchError> {
        debug!(target: FETCH_TARGET, uri, "fetching remote content");

        let response = self
            .client
            .get(uri)
            .send()
            .map_err(|source| FetchError::Http {
                uri: uri.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                uri: uri.to_owned(),
                status: status.as_u16(),
            });
        }

        response.text().map_err(|source| FetchError::Http {
            uri: uri.to_owned(),
            source,
        })
    }
}
