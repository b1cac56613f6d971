// ABOUTME: Shared application state for the simulator API server.
// ABOUTME: Holds the backend client, the sequence tracker and the auth gate, with constructors for prod and test use.

use std::sync::Arc;

use crate::auth::AuthGate;
use crate::backend::{BackendClient, BackendError, HttpBackendClient};
use crate::config::SimConfig;
use crate::sequence::SequenceTracker;

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub backend: Arc<dyn BackendClient>,
    pub sequence: SequenceTracker,
    pub auth: AuthGate,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create state around any backend client. The tracker starts at 0.
    pub fn new(backend: Arc<dyn BackendClient>, auth: AuthGate) -> Self {
        Self {
            backend,
            sequence: SequenceTracker::new(),
            auth,
        }
    }

    /// Build production state: a reqwest client pointed at the configured backend.
    pub fn from_config(config: &SimConfig) -> Result<Self, BackendError> {
        let client = HttpBackendClient::new(config.backend_base_url(), config.backend_timeout)?;
        Ok(Self::new(
            Arc::new(client),
            AuthGate::new(config.auth_token.as_str()),
        ))
    }
}
