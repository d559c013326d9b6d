//! The `ResourceFetcher` trait — the network boundary of the loader.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;
use thiserror::Error;

/// Undecoded response body.
pub type RawResponse = Bytes;

/// Transport-level failures. The message is the bare cause; the loader adds
/// the contract context.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request could not be completed (connection refused, DNS, bad URL, …).
    #[error("{0}")]
    Http(String),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// Request timed out after the configured duration.
    #[error("Request timed out after {ms}ms")]
    Timeout { ms: u64 },

    #[error("{0}")]
    Other(String),
}

/// Failure of [`ResourceFetcher::fetch_json`]: either the fetch itself or the
/// JSON decoding of its body.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

/// Performs a single fetch of a resource.
///
/// Implementations must not retry: one call is one request.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so one loader can serve concurrent
/// `load` calls.
#[async_trait]
pub trait ResourceFetcher: Send + Sync {
    /// Fetch the raw body at `resource`.
    async fn fetch(&self, resource: &str) -> Result<RawResponse, TransportError>;

    /// Fetch `resource` and decode its body as JSON.
    async fn fetch_json(&self, resource: &str) -> Result<Value, FetchError> {
        let body = self.fetch(resource).await?;
        Ok(serde_json::from_slice(&body)?)
    }
}

#[async_trait]
impl<T: ResourceFetcher + ?Sized> ResourceFetcher for Arc<T> {
    async fn fetch(&self, resource: &str) -> Result<RawResponse, TransportError> {
        (**self).fetch(resource).await
    }

    async fn fetch_json(&self, resource: &str) -> Result<Value, FetchError> {
        (**self).fetch_json(resource).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct StaticFetcher(&'static str);

    #[async_trait]
    impl ResourceFetcher for StaticFetcher {
        async fn fetch(&self, _resource: &str) -> Result<RawResponse, TransportError> {
            Ok(Bytes::from_static(self.0.as_bytes()))
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl ResourceFetcher for FailingFetcher {
        async fn fetch(&self, _resource: &str) -> Result<RawResponse, TransportError> {
            Err(TransportError::Http("connection refused".into()))
        }
    }

    #[tokio::test]
    async fn fetch_json_decodes_body() {
        let value = StaticFetcher(r#"{"abi":[]}"#).fetch_json("x").await.unwrap();
        assert_eq!(value["abi"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn decode_and_transport_failures_are_distinct() {
        let err = StaticFetcher("not a json response").fetch_json("x").await.unwrap_err();
        assert!(matches!(err, FetchError::Decode(_)));

        let err = FailingFetcher.fetch_json("x").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport(TransportError::Http(_))));
        assert_eq!(err.to_string(), "connection refused");
    }

    #[tokio::test]
    async fn arc_forwards() {
        let fetcher: Arc<dyn ResourceFetcher> = Arc::new(StaticFetcher("[]"));
        assert_eq!(fetcher.fetch_json("x").await.unwrap(), serde_json::json!([]));
    }

    #[test]
    fn status_message() {
        let err = TransportError::Status {
            status: 404,
            body: "not found".into(),
        };
        assert_eq!(err.to_string(), "HTTP 404: not found");
    }
}
