// ABOUTME: Client for the MiniTwit backend's HTTP API.
// ABOUTME: Schema-agnostic: returns status and raw body, leaving decoding to the handlers.

use std::time::Duration;

use async_trait::async_trait;
use axum::body::Bytes;
use http::{Method, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Failures that prevented the backend from producing a status code at all.
/// A backend-reported error status is not a `BackendError`.
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("backend did not answer within {0:?}")]
    Timeout(Duration),

    #[error("backend unreachable: {0}")]
    Transport(String),

    #[error("failed to build backend client: {0}")]
    Build(String),
}

/// Raw backend answer.
#[derive(Debug, Clone)]
pub struct BackendResponse {
    pub status: StatusCode,
    pub body: Bytes,
}

impl BackendResponse {
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// Decode the body as JSON into `T`.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// One outbound call to the backend: a path relative to the backend's base
/// URL, a verb, and an optional pre-serialized JSON body. No retries.
#[async_trait]
pub trait BackendClient: Send + Sync {
    async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<BackendResponse, BackendError>;
}

/// reqwest-backed [`BackendClient`] with a fixed per-call timeout.
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpBackendClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, BackendError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Build(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn transport_error(&self, err: reqwest::Error) -> BackendError {
        if err.is_timeout() {
            BackendError::Timeout(self.timeout)
        } else {
            BackendError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn call(
        &self,
        path: &str,
        method: Method,
        body: Option<Vec<u8>>,
    ) -> Result<BackendResponse, BackendError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .header(reqwest::header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(%method, path, error = %e, "backend call failed");
            self.transport_error(e)
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|e| self.transport_error(e))?;

        tracing::debug!(%method, path, status = status.as_u16(), "backend call");

        Ok(BackendResponse { status, body })
    }
}
