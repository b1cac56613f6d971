// ABOUTME: Follow handlers: list whom a user follows, and follow or unfollow another user.
// ABOUTME: Both the acting user and the target must exist; the existence checks are not atomic with the action.

use axum::Json;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use minitwit_sim_core::{
    BackendFollowCommand, FollowAction, FollowBody, FollowsResponse, decode_body, truncate_follows,
};

use crate::api::{QueryParams, backend_post, ensure_success, fetch_user, require_user, result_count};
use crate::app_state::SharedState;
use crate::error::ApiError;

/// GET /fllws/{username} - Up to `no` users that `username` follows.
pub async fn list_follows(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    Query(params): Query<QueryParams>,
) -> Result<Json<FollowsResponse>, ApiError> {
    let user = fetch_user(state.backend.as_ref(), &username).await?;

    Ok(Json(FollowsResponse {
        follows: truncate_follows(user.following, result_count(&params)),
    }))
}

/// POST /fllws/{username} - Body `{"follow": name}` or `{"unfollow": name}`.
pub async fn change_follow(
    State(state): State<SharedState>,
    Path(username): Path<String>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let backend = state.backend.as_ref();
    require_user(backend, &username).await?;

    let request = decode_body::<FollowBody>(&body)?.into_request(&username)?;
    require_user(backend, &request.target_username).await?;

    let failure = match request.action {
        FollowAction::Follow => "Could not follow",
        FollowAction::Unfollow => "Could not unfollow",
    };
    let command = BackendFollowCommand {
        current_username: request.current_username,
        target_username: request.target_username,
    };
    let resp = backend_post(
        backend,
        &format!("/user/{}", request.action.as_str()),
        &command,
    )
    .await?;
    ensure_success(&resp, failure)?;

    tracing::debug!(
        user = %command.current_username,
        target = %command.target_username,
        action = request.action.as_str(),
        "updated follow"
    );
    Ok(StatusCode::NO_CONTENT)
}
