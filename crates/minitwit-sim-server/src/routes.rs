// ABOUTME: Route definitions for the simulator API.
// ABOUTME: Layers sequence tracking over every tracked route and the auth gate over the protected ones.

use axum::Router;
use axum::middleware;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;
use crate::auth::AuthLayer;
use crate::sequence::track_latest;

/// Build the complete Axum router with all routes and shared state.
///
/// `route_layer` only wraps routes registered before it, so the tracker
/// covers `/register` and the protected routes but not `/latest` or
/// `/health`, and it runs before the auth gate.
pub fn create_router(state: SharedState) -> Router {
    let protected = Router::new()
        .route("/msgs", get(api::msgs::list_messages))
        .route(
            "/msgs/{username}",
            get(api::msgs::user_messages).post(api::msgs::post_message),
        )
        .route(
            "/fllws/{username}",
            get(api::fllws::list_follows).post(api::fllws::change_follow),
        )
        .route_layer(AuthLayer::new(state.auth.clone()));

    Router::new()
        .route("/register", post(api::register::register))
        .merge(protected)
        .route_layer(middleware::from_fn_with_state(state.clone(), track_latest))
        .route("/latest", get(api::latest::latest))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check handler. Returns 200 OK with a simple JSON body.
async fn health() -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "status": "ok" }))
}
