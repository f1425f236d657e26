//! REST endpoint handlers organized by resource.

pub mod contracts;
pub mod system;
pub mod verification;
pub mod wallet;

use axum::Router;

use crate::app_state::AppState;

/// Composes all resource routes under `/api/v1`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .merge(verification::routes())
        .merge(wallet::routes())
        .merge(contracts::routes())
}
