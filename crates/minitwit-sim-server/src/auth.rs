// ABOUTME: Shared-secret authorization for the protected simulator routes.
// ABOUTME: AuthGate does the header comparison; AuthLayer applies it as tower middleware on route groups.

use axum::body::Body;
use axum::http::header::AUTHORIZATION;
use axum::http::{HeaderMap, Request, Response};
use axum::response::IntoResponse;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};

use crate::error::ApiError;

/// Compares the `Authorization` header against one fixed expected value.
#[derive(Debug, Clone)]
pub struct AuthGate {
    expected: Arc<str>,
}

impl AuthGate {
    /// `expected` is the complete header value, e.g. `Basic <token>`.
    pub fn new(expected: impl Into<Arc<str>>) -> Self {
        Self {
            expected: expected.into(),
        }
    }

    pub fn check(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let provided = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok());
        match provided {
            Some(value) if value == &*self.expected => Ok(()),
            _ => Err(ApiError::Unauthorized),
        }
    }
}

/// A tower Layer that rejects requests failing the [`AuthGate`] check with
/// the 403 payload and never calls the inner service for them.
#[derive(Clone)]
pub struct AuthLayer {
    gate: AuthGate,
}

impl AuthLayer {
    pub fn new(gate: AuthGate) -> Self {
        Self { gate }
    }
}

impl<S> Layer<S> for AuthLayer {
    type Service = AuthMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        AuthMiddleware {
            inner,
            gate: self.gate.clone(),
        }
    }
}

#[derive(Clone)]
pub struct AuthMiddleware<S> {
    inner: S,
    gate: AuthGate,
}

impl<S> Service<Request<Body>> for AuthMiddleware<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request<Body>) -> Self::Future {
        match self.gate.check(req.headers()) {
            Ok(()) => {
                let mut inner = self.inner.clone();
                Box::pin(async move { inner.call(req).await })
            }
            Err(err) => {
                tracing::debug!(
                    path = req.uri().path(),
                    "rejected request without valid credentials"
                );
                Box::pin(async move { Ok(err.into_response()) })
            }
        }
    }
}
