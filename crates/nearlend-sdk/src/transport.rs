//! Transport layer for the contract REST API

use async_trait::async_trait;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::SdkError;

/// REST endpoint of the contract API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// Read-only function call
    View,
    /// Signed, state-mutating function call
    Call,
    /// Hash of the code deployed to an account
    CodeHash,
    /// Contract installation
    Deploy,
}

impl Endpoint {
    /// Path segment of the endpoint
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::View => "view",
            Endpoint::Call => "call",
            Endpoint::CodeHash => "code_hash",
            Endpoint::Deploy => "deploy",
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw response as received from the remote side, before classification
#[derive(Debug, Clone, PartialEq)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Decoded body; non-JSON bodies are kept as a string, empty bodies as null
    pub body: Value,
}

impl RawResponse {
    /// Create a response
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    /// 200 OK with the given body
    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport trait for the contract API (object-safe)
///
/// Implementations perform exactly one request per call and never retry.
/// Only failures that prevent a response from being received (connection
/// errors, timeouts) are returned as `Err`; every received response, whatever
/// its status, is returned as a [`RawResponse`] for classification.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send a JSON request to an endpoint
    async fn request_json(&self, endpoint: Endpoint, body: Value) -> Result<RawResponse, SdkError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn request_json(&self, endpoint: Endpoint, body: Value) -> Result<RawResponse, SdkError> {
        (**self).request_json(endpoint, body).await
    }
}

/// Decode a response body, keeping non-JSON text as a string
pub fn decode_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// HTTP transport for a contract REST API server
#[cfg(feature = "http")]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

#[cfg(feature = "http")]
impl HttpTransport {
    /// Create a transport without a request timeout
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Create a transport whose requests time out after `timeout`
    pub fn with_timeout(base_url: &str, timeout: std::time::Duration) -> Result<Self, SdkError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| SdkError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL of the API server
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: Endpoint) -> String {
        format!("{}/{}", self.base_url, endpoint.as_str())
    }
}

#[cfg(feature = "http")]
#[async_trait]
impl Transport for HttpTransport {
    async fn request_json(&self, endpoint: Endpoint, body: Value) -> Result<RawResponse, SdkError> {
        let response = self
            .client
            .post(self.url(endpoint))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    SdkError::Transport(format!("{} request timed out: {}", endpoint, e))
                } else {
                    SdkError::Transport(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| SdkError::Transport(e.to_string()))?;

        Ok(RawResponse::new(status, decode_body(&text)))
    }
}
