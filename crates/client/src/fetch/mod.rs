//! HTTP fetch client for scrap upstreams.
//!
//! ### Behavior
//! - Bounded timeout (configurable per definition via its fetch context)
//! - Limited redirects, rustls TLS, compressed transfer
//! - Max body bytes guard
//! - Non-success status is a fetch failure; no retries
//!
//! Fetch URLs come from operator-declared definition templates, not from
//! callers, and are used verbatim so they stay identical to the cache key.

use std::time::{Duration, Instant};

use bytes::Bytes;
use reqwest::{Client, header};
use scrapi_core::definitions::FetchContext;

/// Errors from a fetch attempt.
///
/// The pipeline collapses all of these into its "resource page not found"
/// outcome; the variants exist for logs.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("invalid fetch url: {0}")]
    InvalidUrl(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("{0} bytes exceeds the {1} byte limit")]
    TooLarge(usize, usize),

    #[error("failed to build HTTP client: {0}")]
    ClientBuild(String),
}

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "scrapi/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Default request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "scrapi/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(20_000),
            max_redirects: 5,
        }
    }
}

/// HTTP fetch client shared by all scrap requests.
pub struct FetchClient {
    http: Client,
    /// Same configuration with certificate verification disabled, for
    /// definitions whose fetch context asks for it.
    http_insecure: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let http = Self::builder(&config)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        let http_insecure = Self::builder(&config)
            .danger_accept_invalid_certs(true)
            .build()
            .map_err(|e| FetchError::ClientBuild(e.to_string()))?;

        Ok(Self { http, http_insecure, config })
    }

    fn builder(config: &FetchConfig) -> reqwest::ClientBuilder {
        Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
    }

    /// Fetch a URL with an optional definition fetch context, returning the
    /// raw body bytes.
    ///
    /// Any failure (bad URL, network error, non-success status, oversized
    /// body) is an error; the caller decides what an empty body means.
    pub async fn fetch(&self, url_str: &str, context: Option<&FetchContext>) -> Result<Bytes, FetchError> {
        let start = Instant::now();
        let url = url::Url::parse(url_str).map_err(|e| FetchError::InvalidUrl(e.to_string()))?;

        let client = match context {
            Some(ctx) if ctx.accept_invalid_certs => &self.http_insecure,
            _ => &self.http,
        };

        let mut request = client.get(url.as_str()).header(
            header::ACCEPT,
            "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
        );

        if let Some(ctx) = context {
            for (name, value) in &ctx.headers {
                request = request.header(name.as_str(), value.as_str());
            }
            if let Some(ms) = ctx.timeout_ms {
                request = request.timeout(Duration::from_millis(ms));
            }
        }

        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(FetchError::TooLarge(len as usize, self.config.max_bytes));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        if bytes.len() > self.config.max_bytes {
            return Err(FetchError::TooLarge(bytes.len(), self.config.max_bytes));
        }

        tracing::debug!(
            url = url_str,
            bytes = bytes.len(),
            ms = start.elapsed().as_millis() as u64,
            "fetched"
        );

        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_config_default() {
        let config = FetchConfig::default();
        assert_eq!(config.user_agent, "scrapi/0.1");
        assert_eq!(config.max_bytes, 5 * 1024 * 1024);
        assert_eq!(config.timeout, Duration::from_millis(20_000));
        assert_eq!(config.max_redirects, 5);
    }

    #[tokio::test]
    async fn test_fetch_client_new() {
        let client = FetchClient::new(FetchConfig::default());
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_fetch_invalid_url() {
        let client = FetchClient::new(FetchConfig::default()).unwrap();
        let result = client.fetch("not a url", None).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl(_))));
    }
}
