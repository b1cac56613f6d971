// ABOUTME: Message handlers: the global feed, a user's feed, and posting a new message.
// ABOUTME: Backend messages are decoded strictly and translated into the wire shape, truncated to `no`.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use minitwit_sim_core::{
    BackendNewTweet, ExternalMessage, Message, TweetBody, decode_body, translate,
};

use crate::api::{
    QueryParams, backend_get, backend_post, ensure_success, require_user, result_count,
};
use crate::app_state::SharedState;
use crate::backend::BackendResponse;
use crate::error::ApiError;

const FETCH_FAILED: &str = "Could not fetch tweets";

fn translate_feed(resp: &BackendResponse, limit: usize) -> Result<Vec<ExternalMessage>, ApiError> {
    ensure_success(resp, FETCH_FAILED)?;
    let messages: Vec<Message> = resp.decode().map_err(ApiError::Decode)?;
    Ok(translate(&messages, limit))
}

/// GET /msgs - The most recent `no` messages across all users.
pub async fn list_messages(
    State(state): State<SharedState>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<ExternalMessage>>, ApiError> {
    let limit = result_count(&params);

    let resp = backend_get(
        state.backend.as_ref(),
        &format!("/tweet/get-all-tweets/{limit}/0"),
    )
    .await?;

    Ok(Json(translate_feed(&resp, limit)?))
}

/// GET /msgs/{username} - The most recent `no` messages of one user.
pub async fn user_messages(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<ExternalMessage>>, ApiError> {
    let backend = state.backend.as_ref();
    require_user(backend, &username).await?;

    let limit = result_count(&params);
    let resp = backend_get(
        backend,
        &format!("/tweet/get-user-tweets/{}", urlencoding::encode(&username)),
    )
    .await?;

    Ok(Json(translate_feed(&resp, limit)?))
}

/// POST /msgs/{username} - Post a message as `username`. The `username`
/// key in the body is ignored in favor of the path.
pub async fn post_message(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let backend = state.backend.as_ref();
    require_user(backend, &username).await?;

    let TweetBody { content, .. } = decode_body(&body)?;
    let tweet = BackendNewTweet::now(username, content);
    let resp = backend_post(backend, "/tweet/add-tweet", &tweet).await?;
    ensure_success(&resp, "Could not create tweet")?;

    tracing::debug!(username = %tweet.username, "posted message");
    Ok(StatusCode::NO_CONTENT)
}
