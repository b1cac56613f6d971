// ABOUTME: Tracks the most recent `latest` query parameter seen by any simulator request.
// ABOUTME: Provides the counter itself and the axum middleware that feeds it before any handler runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use axum::extract::{Query, Request, State};
use axum::middleware::Next;
use axum::response::Response;
use minitwit_sim_core::parse_latest;

use crate::app_state::SharedState;

/// Service-wide "latest processed request" counter.
///
/// Accesses are `Relaxed`: when requests race, whichever store lands last
/// wins. The harness only needs the value after it stops sending, so that
/// nondeterminism is accepted rather than serialized away.
#[derive(Debug, Default)]
pub struct SequenceTracker {
    latest: AtomicI64,
}

impl SequenceTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the raw `latest` value. Missing or non-integer input is stored as -1.
    pub fn update(&self, raw: Option<&str>) -> i64 {
        let value = parse_latest(raw);
        self.latest.store(value, Ordering::Relaxed);
        value
    }

    pub fn read(&self) -> i64 {
        self.latest.load(Ordering::Relaxed)
    }
}

/// Middleware that updates the tracker exactly once per request, ahead of
/// authorization and body extraction, so error paths are counted too.
pub async fn track_latest(State(state): State<SharedState>, req: Request, next: Next) -> Response {
    let params = Query::<HashMap<String, String>>::try_from_uri(req.uri())
        .map(|Query(params)| params)
        .unwrap_or_default();

    let value = state
        .sequence
        .update(params.get("latest").map(String::as_str));
    tracing::trace!(latest = value, path = req.uri().path(), "tracked latest");

    next.run(req).await
}
