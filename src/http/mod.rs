//! Lightweight HTTP transport abstraction.
//!
//! The adapter only ever issues JSON POST requests, buffered or streamed,
//! so the surface here is deliberately small. Decoupling the pipeline from
//! the concrete client keeps every component testable with in-memory
//! transports.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures_core::Stream;
use serde::Serialize;

use crate::error::LlmError;

/// One JSON POST request.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
    /// Optional deadline enforced by the transport; this layer imposes no
    /// timeout of its own.
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Builds a POST request carrying a JSON body.
    ///
    /// # Examples
    ///
    /// ```
    /// use tsunagi::http::HttpRequest;
    ///
    /// let request = HttpRequest::post_json("https://example.com", br#"{}"#.to_vec());
    /// assert_eq!(
    ///     request.headers.get("Content-Type"),
    ///     Some(&"application/json".to_string())
    /// );
    /// ```
    pub fn post_json(url: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            url: url.into(),
            headers: HashMap::from([(
                "Content-Type".to_string(),
                "application/json".to_string(),
            )]),
            body,
            timeout: None,
        }
    }

    /// Replaces the request headers wholesale.
    pub fn with_headers(mut self, headers: HashMap<String, String>) -> Self {
        self.headers = headers;
        self
    }
}

/// Fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Decodes the body as UTF-8.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Transport`] when the payload is not valid UTF-8.
    pub fn into_string(self) -> Result<String, LlmError> {
        String::from_utf8(self.body).map_err(|err| LlmError::transport(err.to_string()))
    }
}

/// Byte-chunk stream delivered by a streaming response body.
pub type HttpBodyStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>, LlmError>> + Send>>;

/// HTTP response whose body arrives incrementally.
pub struct HttpStreamResponse {
    pub status: u16,
    pub body: HttpBodyStream,
}

/// Transport contract consumed by the provider adapter.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Sends a request and resolves once the full response is buffered.
    ///
    /// # Errors
    ///
    /// Implementations map networking failures to [`LlmError::Transport`].
    /// Non-2xx statuses are returned as responses, not errors; the adapter
    /// decides how to surface them.
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, LlmError>;

    /// Sends a request and returns the response body as a chunk stream.
    ///
    /// # Errors
    ///
    /// Implementations map networking failures to [`LlmError::Transport`].
    async fn send_stream(&self, request: HttpRequest) -> Result<HttpStreamResponse, LlmError>;
}

/// Thread-safe handle to a transport implementation.
pub type DynHttpTransport = Arc<dyn HttpTransport>;

/// Serializes a body to JSON, attaches headers, and issues a buffered POST.
///
/// # Errors
///
/// Returns [`LlmError::InvalidRequest`] if serialization fails, otherwise
/// forwards the transport's error.
pub async fn post_json_with_headers<T: Serialize>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    body: &T,
) -> Result<HttpResponse, LlmError> {
    let payload = serde_json::to_vec(body).map_err(|err| LlmError::InvalidRequest {
        message: format!("failed to serialize request: {err}"),
    })?;
    let request = HttpRequest::post_json(url, payload).with_headers(headers);
    transport.send(request).await
}

/// Streaming counterpart of [`post_json_with_headers`].
///
/// # Errors
///
/// Returns [`LlmError::InvalidRequest`] if serialization fails, otherwise
/// forwards the transport's error.
pub async fn post_json_stream_with_headers<T: Serialize>(
    transport: &dyn HttpTransport,
    url: impl Into<String>,
    headers: HashMap<String, String>,
    body: &T,
) -> Result<HttpStreamResponse, LlmError> {
    let payload = serde_json::to_vec(body).map_err(|err| LlmError::InvalidRequest {
        message: format!("failed to serialize request: {err}"),
    })?;
    let request = HttpRequest::post_json(url, payload).with_headers(headers);
    transport.send_stream(request).await
}

pub mod reqwest;

#[cfg(test)]
mod tests {
    use super::*;
    use serde::ser;

    struct PanicTransport;

    #[async_trait]
    impl HttpTransport for PanicTransport {
        async fn send(&self, _request: HttpRequest) -> Result<HttpResponse, LlmError> {
            panic!("send should not be called");
        }

        async fn send_stream(
            &self,
            _request: HttpRequest,
        ) -> Result<HttpStreamResponse, LlmError> {
            panic!("send_stream should not be called");
        }
    }

    /// Body that intentionally fails serialization.
    struct NonSerializableBody;

    impl Serialize for NonSerializableBody {
        fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
        where
            S: serde::Serializer,
        {
            Err(ser::Error::custom("intentional failure for test"))
        }
    }

    #[tokio::test]
    async fn serialization_failure_never_reaches_the_transport() {
        let result = post_json_with_headers(
            &PanicTransport,
            "http://example.com",
            HashMap::new(),
            &NonSerializableBody,
        )
        .await;

        match result {
            Err(LlmError::InvalidRequest { message }) => {
                assert!(message.contains("failed to serialize request"));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn with_headers_replaces_the_defaults() {
        let request = HttpRequest::post_json("https://example.com", Vec::new())
            .with_headers(HashMap::from([("X-Test".to_string(), "ok".to_string())]));
        assert_eq!(request.headers.len(), 1);
        assert_eq!(request.headers.get("X-Test"), Some(&"ok".to_string()));
    }
}
