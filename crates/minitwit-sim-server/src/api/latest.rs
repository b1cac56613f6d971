// ABOUTME: GET /latest handler reporting the sequence tracker's current value.

use axum::Json;
use axum::extract::State;
use minitwit_sim_core::LatestResponse;

use crate::app_state::SharedState;

/// GET /latest - No auth; does not itself update the tracker.
pub async fn latest(State(state): State<SharedState>) -> Json<LatestResponse> {
    Json(LatestResponse {
        latest: state.sequence.read(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::StatusCode;
    use http::Request;
    use tower::ServiceExt;

    use crate::api::test_support::*;
    use crate::testing::FakeBackend;

    #[tokio::test]
    async fn latest_starts_at_zero() {
        let fake = Arc::new(FakeBackend::new());
        let state = state_with(&fake);

        let resp = router_with(&state)
            .oneshot(Request::get("/latest").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(body_json(resp).await, serde_json::json!({"latest": 0}));
    }

    #[tokio::test]
    async fn latest_reports_last_tracked_value() {
        let fake = Arc::new(FakeBackend::new());
        let state = state_with(&fake);

        router_with(&state)
            .oneshot(get_request("/msgs?latest=1337"))
            .await
            .unwrap();

        let resp = router_with(&state)
            .oneshot(Request::get("/latest?latest=5").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(body_json(resp).await["latest"], 1337);
    }

    #[tokio::test]
    async fn latest_is_minus_one_after_request_without_parameter() {
        let fake = Arc::new(FakeBackend::new());
        let state = state_with(&fake);

        router_with(&state)
            .oneshot(get_request("/msgs?latest=7"))
            .await
            .unwrap();
        router_with(&state)
            .oneshot(get_request("/msgs"))
            .await
            .unwrap();

        let resp = router_with(&state)
            .oneshot(Request::get("/latest").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(body_json(resp).await["latest"], -1);
    }

    #[tokio::test]
    async fn latest_is_tracked_even_when_auth_fails() {
        let fake = Arc::new(FakeBackend::new());
        let state = state_with(&fake);

        let resp = router_with(&state)
            .oneshot(
                Request::get("/msgs?latest=99")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);

        assert_eq!(state.sequence.read(), 99);
        assert_eq!(fake.call_count(), 0);
    }
}
