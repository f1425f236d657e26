//! Shared application state injected into all Axum handlers.

use std::sync::Arc;

use crate::chain::JsonRpcClient;
use crate::service::VerificationService;

/// Verification service over the live JSON-RPC client.
pub type Verifier = VerificationService<JsonRpcClient>;

/// Shared application state available to all handlers via Axum's
/// `State` extractor.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Verification service for all business logic.
    pub verifier: Arc<Verifier>,
}

impl AppState {
    /// Wraps a verifier.
    #[must_use]
    pub fn new(verifier: Verifier) -> Self {
        Self {
            verifier: Arc::new(verifier),
        }
    }
}
