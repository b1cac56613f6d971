// ABOUTME: POST /register handler: validates the new user and forwards it to the backend.
// ABOUTME: Availability is checked with a backend lookup first; the gap before creation is left to the backend.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use minitwit_sim_core::{BackendRegistration, RegistrationRequest, decode_body};

use crate::api::{backend_post, ensure_success, user_exists};
use crate::app_state::SharedState;
use crate::error::ApiError;

/// POST /register - Create a user. 204 on success.
pub async fn register(
    State(state): State<SharedState>,
    body: Bytes,
) -> Result<StatusCode, ApiError> {
    let req: RegistrationRequest = decode_body(&body)?;
    req.validate()?;

    let backend = state.backend.as_ref();
    if user_exists(backend, &req.username).await? {
        return Err(ApiError::Conflict("The username is already taken".to_string()));
    }

    let payload = BackendRegistration {
        username: req.username,
        email: req.email,
        password: req.password,
        is_admin: false,
    };
    let resp = backend_post(backend, "/user/register", &payload).await?;
    ensure_success(&resp, "User could not be created")?;

    tracing::info!(username = %payload.username, "registered user");
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::StatusCode;
    use tower::ServiceExt;

    use crate::api::test_support::*;
    use crate::testing::FakeBackend;

    fn registration(username: &str, email: &str, pwd: &str) -> serde_json::Value {
        serde_json::json!({"username": username, "email": email, "pwd": pwd})
    }

    async fn post_register(
        fake: &Arc<FakeBackend>,
        body: serde_json::Value,
    ) -> axum::response::Response {
        let state = state_with(fake);
        router_with(&state)
            .oneshot(json_request("POST", "/register?latest=1", body))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn register_creates_user() {
        let fake = Arc::new(FakeBackend::new());

        let resp = post_register(&fake, registration("a", "a@a", "a")).await;

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(resp).await.is_empty());
        assert!(fake.has_user("a"));
    }

    #[tokio::test]
    async fn register_rejects_empty_username() {
        let fake = Arc::new(FakeBackend::new());

        let resp = post_register(&fake, registration("", "a@a", "a")).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let json = body_json(resp).await;
        assert_eq!(json["status"], 400);
        assert_eq!(json["error_msg"], "You have to enter a username");
        assert_eq!(fake.call_count(), 0);
    }

    #[tokio::test]
    async fn register_rejects_email_without_at() {
        let fake = Arc::new(FakeBackend::new());

        let resp = post_register(&fake, registration("a", "nope", "a")).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await["error_msg"],
            "You have to enter a valid email address"
        );
    }

    #[tokio::test]
    async fn register_rejects_empty_password() {
        let fake = Arc::new(FakeBackend::new());

        let resp = post_register(&fake, registration("a", "a@a", "")).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(resp).await["error_msg"],
            "You have to enter a password"
        );
    }

    #[tokio::test]
    async fn register_rejects_taken_username() {
        let fake = Arc::new(FakeBackend::new().with_user("a"));

        let resp = post_register(&fake, registration("a", "a@a", "a")).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        let json = body_json(resp).await;
        assert_eq!(json["status"], 409);
        assert_eq!(json["error_msg"], "The username is already taken");
    }

    #[tokio::test]
    async fn register_treats_any_2xx_lookup_as_taken() {
        let fake = Arc::new(FakeBackend::new());
        fake.override_path("/user/get-user/a", StatusCode::OK, "");

        let resp = post_register(&fake, registration("a", "a@a", "a")).await;

        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(
            body_json(resp).await["error_msg"],
            "The username is already taken"
        );
        assert!(!fake.calls().iter().any(|c| c.path == "/user/register"));
    }

    #[tokio::test]
    async fn register_maps_failed_lookup() {
        let fake = Arc::new(FakeBackend::new());
        fake.fail_path("/user/get-user/a", StatusCode::SERVICE_UNAVAILABLE);

        let resp = post_register(&fake, registration("a", "a@a", "a")).await;

        assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
        let json = body_json(resp).await;
        assert_eq!(json["status"], 503);
        assert_eq!(json["error_msg"], "Could not look up user");

        fake.fail_path("/user/get-user/a", StatusCode::INTERNAL_SERVER_ERROR);
        let resp = post_register(&fake, registration("a", "a@a", "a")).await;
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error_msg"], "Internal Server Error");
        assert!(!fake.has_user("a"));
    }

    #[tokio::test]
    async fn register_needs_no_auth_header() {
        let fake = Arc::new(FakeBackend::new());
        let state = state_with(&fake);

        let resp = router_with(&state)
            .oneshot(
                http::Request::post("/register")
                    .header("content-type", "application/json")
                    .body(axum::body::Body::from(
                        serde_json::to_vec(&registration("b", "b@b", "b")).unwrap(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert_eq!(state.sequence.read(), -1);
    }

    #[tokio::test]
    async fn register_maps_backend_refusal_to_400() {
        let fake = Arc::new(FakeBackend::new());
        fake.fail_path("/user/register", StatusCode::BAD_REQUEST);

        let resp = post_register(&fake, registration("a", "a@a", "a")).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error_msg"], "User could not be created");
    }

    #[tokio::test]
    async fn register_maps_backend_500_to_500() {
        let fake = Arc::new(FakeBackend::new());
        fake.fail_path("/user/register", StatusCode::INTERNAL_SERVER_ERROR);

        let resp = post_register(&fake, registration("a", "a@a", "a")).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["error_msg"], "Internal Server Error");
    }

    #[tokio::test]
    async fn register_surfaces_unreachable_backend_as_500() {
        let fake = Arc::new(FakeBackend::new());
        fake.set_unreachable(true);

        let resp = post_register(&fake, registration("a", "a@a", "a")).await;

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await["status"], 500);
    }

    #[tokio::test]
    async fn register_rejects_malformed_json() {
        let fake = Arc::new(FakeBackend::new());
        let state = state_with(&fake);

        let resp = router_with(&state)
            .oneshot(
                http::Request::post("/register")
                    .body(axum::body::Body::from("{username:"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await["error_msg"], "Malformed request body");
    }
}
