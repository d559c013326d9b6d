//! HTTP resource fetcher backed by `reqwest`.
//!
//! One `GET` per call. No retry; no timeout unless one is configured, in
//! which case it is the only deadline applied.

use std::time::Duration;

use async_trait::async_trait;
use contractloader_core::{RawResponse, ResourceFetcher, TransportError};

/// Longest error body kept in [`TransportError::Status`].
const MAX_ERROR_BODY: usize = 512;

/// Configuration for [`HttpFetcher`].
#[derive(Debug, Clone)]
pub struct HttpFetcherConfig {
    /// Whole-request timeout. `None` leaves reqwest's default (no timeout).
    pub request_timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            request_timeout: None,
            user_agent: format!("contractloader/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Fetches contract definitions over HTTP(S).
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
    request_timeout: Option<Duration>,
}

impl HttpFetcher {
    pub fn new(config: HttpFetcherConfig) -> Result<Self, TransportError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| TransportError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            request_timeout: config.request_timeout,
        })
    }

    /// Create with default configuration.
    pub fn with_defaults() -> Result<Self, TransportError> {
        Self::new(HttpFetcherConfig::default())
    }

    /// Wrap an existing `reqwest::Client` (shared connection pool, custom TLS, …).
    pub fn from_client(http: reqwest::Client) -> Self {
        Self {
            http,
            request_timeout: None,
        }
    }

    /// Apply a whole-request deadline to every fetch.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }

    fn transport_error(&self, e: reqwest::Error) -> TransportError {
        match self.request_timeout {
            Some(timeout) if e.is_timeout() => TransportError::Timeout {
                ms: timeout.as_millis() as u64,
            },
            _ => TransportError::Http(e.to_string()),
        }
    }
}

#[async_trait]
impl ResourceFetcher for HttpFetcher {
    async fn fetch(&self, resource: &str) -> Result<RawResponse, TransportError> {
        tracing::debug!(url = resource, "fetching resource");

        let mut request = self.http.get(resource);
        if let Some(timeout) = self.request_timeout {
            request = request.timeout(timeout);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let mut body = resp.text().await.unwrap_or_default();
            truncate_body(&mut body);
            tracing::debug!(url = resource, status, "non-success status");
            return Err(TransportError::Status { status, body });
        }

        resp.bytes().await.map_err(|e| self.transport_error(e))
    }
}

fn truncate_body(body: &mut String) {
    if body.len() > MAX_ERROR_BODY {
        let mut cut = MAX_ERROR_BODY;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        body.truncate(cut);
        body.push('…');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_no_timeout() {
        let config = HttpFetcherConfig::default();
        assert!(config.request_timeout.is_none());
        assert!(config.user_agent.starts_with("contractloader/"));
        assert!(HttpFetcher::new(config).unwrap().request_timeout().is_none());
    }

    #[test]
    fn configured_timeout_is_kept() {
        let fetcher = HttpFetcher::new(HttpFetcherConfig {
            request_timeout: Some(Duration::from_millis(250)),
            ..HttpFetcherConfig::default()
        })
        .unwrap();
        assert_eq!(fetcher.request_timeout(), Some(Duration::from_millis(250)));
    }

    #[test]
    fn truncates_long_bodies_on_char_boundary() {
        let mut body = "é".repeat(MAX_ERROR_BODY);
        truncate_body(&mut body);
        assert!(body.ends_with('…'));
        assert!(body.len() <= MAX_ERROR_BODY + '…'.len_utf8());

        let mut short = "not found".to_string();
        truncate_body(&mut short);
        assert_eq!(short, "not found");
    }
}
