//! Blocking HTTP plumbing shared by the remote model boundaries.

use crate::{Error, Result};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// HTTP client configuration for inference endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InferenceHttpConfig {
    /// Request timeout in milliseconds (0 to disable).
    pub timeout_ms: u64,
    /// Connect timeout in milliseconds (0 to disable).
    pub connect_timeout_ms: u64,
}

impl Default for InferenceHttpConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            connect_timeout_ms: 3_000,
        }
    }
}

/// Builds a blocking HTTP client with configured timeouts.
#[must_use]
pub fn build_http_client(config: InferenceHttpConfig) -> reqwest::blocking::Client {
    let mut builder = reqwest::blocking::Client::builder();
    if config.timeout_ms > 0 {
        builder = builder.timeout(Duration::from_millis(config.timeout_ms));
    }
    if config.connect_timeout_ms > 0 {
        builder = builder.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
    }

    builder.build().unwrap_or_else(|err| {
        tracing::warn!("Failed to build inference HTTP client: {err}");
        reqwest::blocking::Client::new()
    })
}

/// A configured inference endpoint.
pub struct Endpoint {
    /// Boundary name used in logs, metrics and error operations.
    boundary: &'static str,
    /// Endpoint URL.
    url: String,
    /// Optional bearer token.
    token: Option<SecretString>,
    /// HTTP client.
    client: reqwest::blocking::Client,
}

impl Endpoint {
    /// Creates an endpoint for `boundary` at `url`.
    #[must_use]
    pub fn new(boundary: &'static str, url: impl Into<String>, config: InferenceHttpConfig) -> Self {
        Self {
            boundary,
            url: url.into(),
            token: None,
            client: build_http_client(config),
        }
    }

    /// Sets the bearer token sent with every request.
    #[must_use]
    pub fn with_token(mut self, token: Option<SecretString>) -> Self {
        self.token = token;
        self
    }

    /// Returns the endpoint URL.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// POSTs `body` as JSON and decodes the JSON response.
    ///
    /// # Errors
    ///
    /// Returns `OperationFailed` on transport errors, non-success statuses,
    /// and undecodable bodies.
    pub fn post_json<B, R>(&self, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let mut request = self.client.post(&self.url).json(body);
        if let Some(token) = &self.token {
            request = request.bearer_auth(token.expose_secret());
        }

        let response = request.send().map_err(|e| {
            let error_kind = if e.is_timeout() {
                "timeout"
            } else if e.is_connect() {
                "connect"
            } else if e.is_request() {
                "request"
            } else {
                "unknown"
            };
            tracing::error!(
                boundary = self.boundary,
                endpoint = %self.url,
                error = %e,
                error_kind = error_kind,
                "Inference request failed"
            );
            self.record(error_kind);
            Error::OperationFailed {
                operation: format!("{}_request", self.boundary),
                cause: format!("{error_kind} error: {e}"),
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            // Never log or return the body: it can echo the unmasked input.
            let body_len = response.bytes().map_or(0, |body| body.len());
            self.record("status");
            return Err(self.status_error(status, body_len));
        }

        let decoded = response.json::<R>().map_err(|e| {
            tracing::error!(
                boundary = self.boundary,
                endpoint = %self.url,
                error = %e,
                "Failed to decode inference response"
            );
            self.record("decode");
            Error::OperationFailed {
                operation: format!("{}_response", self.boundary),
                cause: e.to_string(),
            }
        })?;

        self.record("ok");
        Ok(decoded)
    }

    fn status_error(&self, status: reqwest::StatusCode, body_len: usize) -> Error {
        tracing::error!(
            boundary = self.boundary,
            endpoint = %self.url,
            status = %status,
            body_len = body_len,
            "Inference endpoint returned error status"
        );
        Error::OperationFailed {
            operation: format!("{}_request", self.boundary),
            cause: format!("API returned status: {status} ({body_len} byte body omitted)"),
        }
    }

    fn record(&self, status: &'static str) {
        metrics::counter!(
            "model_requests_total",
            "boundary" => self.boundary,
            "status" => status
        )
        .increment(1);
    }
}

impl std::fmt::Debug for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Endpoint")
            .field("boundary", &self.boundary)
            .field("url", &self.url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish_non_exhaustive()
    }
}
