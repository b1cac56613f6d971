// ABOUTME: Handler modules for the simulator endpoints plus the backend helpers they share.
// ABOUTME: Helpers turn raw backend responses into typed records or ApiErrors; nothing is decoded silently.

pub mod fllws;
pub mod latest;
pub mod msgs;
pub mod register;

use std::collections::HashMap;

use http::{Method, StatusCode};
use minitwit_sim_core::{BackendUser, parse_result_count};
use serde::Serialize;

use crate::backend::{BackendClient, BackendResponse};
use crate::error::ApiError;

/// Query string as a plain map. Extraction never fails for this shape.
pub type QueryParams = HashMap<String, String>;

pub(crate) fn result_count(params: &QueryParams) -> usize {
    parse_result_count(params.get("no").map(String::as_str))
}

pub(crate) async fn backend_get(
    backend: &dyn BackendClient,
    path: &str,
) -> Result<BackendResponse, ApiError> {
    Ok(backend.call(path, Method::GET, None).await?)
}

pub(crate) async fn backend_post<T: Serialize>(
    backend: &dyn BackendClient,
    path: &str,
    body: &T,
) -> Result<BackendResponse, ApiError> {
    let bytes = serde_json::to_vec(body).map_err(ApiError::Encode)?;
    Ok(backend.call(path, Method::POST, Some(bytes)).await?)
}

/// Fail with `message` and the backend's status unless it answered 2xx.
pub(crate) fn ensure_success(resp: &BackendResponse, message: &str) -> Result<(), ApiError> {
    if resp.is_success() {
        Ok(())
    } else {
        Err(ApiError::backend(resp.status, message))
    }
}

/// Fetch the backend's user record. `None` when the backend answers 404; any
/// other non-2xx status is an error. The body is not inspected.
async fn get_user(
    backend: &dyn BackendClient,
    username: &str,
) -> Result<Option<BackendResponse>, ApiError> {
    let path = format!("/user/get-user/{}", urlencoding::encode(username));
    let resp = backend_get(backend, &path).await?;

    if resp.status == StatusCode::NOT_FOUND {
        return Ok(None);
    }
    ensure_success(&resp, "Could not look up user")?;
    Ok(Some(resp))
}

/// Existence is decided by the lookup status alone: 404 absent, 2xx present.
pub(crate) async fn user_exists(
    backend: &dyn BackendClient,
    username: &str,
) -> Result<bool, ApiError> {
    Ok(get_user(backend, username).await?.is_some())
}

/// Like [`user_exists`] but absence is a 404 for the caller.
pub(crate) async fn require_user(
    backend: &dyn BackendClient,
    username: &str,
) -> Result<(), ApiError> {
    if user_exists(backend, username).await? {
        Ok(())
    } else {
        Err(ApiError::NotFound(username.to_string()))
    }
}

/// Fetch and decode the user record, for callers that read its fields.
pub(crate) async fn fetch_user(
    backend: &dyn BackendClient,
    username: &str,
) -> Result<BackendUser, ApiError> {
    let resp = get_user(backend, username)
        .await?
        .ok_or_else(|| ApiError::NotFound(username.to_string()))?;
    resp.decode().map_err(ApiError::Decode)
}
