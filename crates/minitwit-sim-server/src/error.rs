// ABOUTME: Unified error type for the simulator endpoints and its HTTP rendering.
// ABOUTME: Every variant becomes `{status, error_msg}` except not-found, which has an empty body.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use minitwit_sim_core::{ErrorBody, ValidationError};
use thiserror::Error;

use crate::backend::BackendError;

pub const INTERNAL_MESSAGE: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("You are not authorized to use this resource!")]
    Unauthorized,

    #[error("user not found: {0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    /// The backend answered with an unexpected status.
    #[error("{message} (backend status {status})")]
    Backend { status: StatusCode, message: String },

    #[error(transparent)]
    Transport(#[from] BackendError),

    #[error("could not decode backend response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("could not encode backend request: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ApiError {
    /// Map an unexpected backend status. A backend 500 is reported as our own
    /// internal error; anything else keeps the backend's status.
    pub fn backend(status: StatusCode, message: impl Into<String>) -> Self {
        Self::Backend {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Backend { status, .. } => *status,
            Self::Transport(_) | Self::Decode(_) | Self::Encode(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn client_message(&self) -> String {
        match self {
            Self::Backend { status, .. } if *status == StatusCode::INTERNAL_SERVER_ERROR => {
                INTERNAL_MESSAGE.to_string()
            }
            Self::Backend { message, .. } => message.clone(),
            Self::Transport(_) | Self::Decode(_) | Self::Encode(_) => INTERNAL_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "request failed");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "request rejected");
        }

        if matches!(self, Self::NotFound(_)) {
            return status.into_response();
        }

        let body = ErrorBody::new(status.as_u16(), self.client_message());
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn validation_error_is_400_with_message() {
        let resp = ApiError::from(ValidationError::MissingPassword).into_response();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["status"], 400);
        assert_eq!(json["error_msg"], "You have to enter a password");
    }

    #[tokio::test]
    async fn unauthorized_has_fixed_payload() {
        let resp = ApiError::Unauthorized.into_response();

        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
        let json = body_json(resp).await;
        assert_eq!(
            json,
            serde_json::json!({
                "status": 403,
                "error_msg": "You are not authorized to use this resource!"
            })
        );
    }

    #[tokio::test]
    async fn not_found_has_empty_body() {
        let resp = ApiError::NotFound("ghost".to_string()).into_response();

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }

    #[tokio::test]
    async fn backend_status_is_carried() {
        let resp = ApiError::backend(StatusCode::BAD_GATEWAY, "Could not fetch tweets")
            .into_response();

        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
        let json = body_json(resp).await;
        assert_eq!(json["status"], 502);
        assert_eq!(json["error_msg"], "Could not fetch tweets");
    }

    #[tokio::test]
    async fn backend_500_becomes_internal_error() {
        let resp = ApiError::backend(StatusCode::INTERNAL_SERVER_ERROR, "Could not follow")
            .into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["error_msg"], "Internal Server Error");
    }

    #[tokio::test]
    async fn transport_failure_is_500() {
        let resp = ApiError::from(BackendError::Transport("connection refused".to_string()))
            .into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let json = body_json(resp).await;
        assert_eq!(json["status"], 500);
        assert_eq!(json["error_msg"], "Internal Server Error");
    }
}
