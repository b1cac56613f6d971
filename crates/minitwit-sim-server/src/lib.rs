// ABOUTME: HTTP facade exposing the MiniTwit simulator contract on top of the MiniTwit backend API.
// ABOUTME: Uses Axum with a shared backend client, sequence tracker and shared-secret gate.

pub mod api;
pub mod app_state;
pub mod auth;
pub mod backend;
pub mod config;
pub mod error;
pub mod routes;
pub mod sequence;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use app_state::{AppState, SharedState};
pub use auth::{AuthGate, AuthLayer};
pub use backend::{BackendClient, BackendError, BackendResponse, HttpBackendClient};
pub use config::{ConfigError, SimConfig};
pub use error::ApiError;
pub use routes::create_router;
pub use sequence::SequenceTracker;
