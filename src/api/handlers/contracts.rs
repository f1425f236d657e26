//! Contract configuration handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::ContractInfoResponse;
use crate::app_state::AppState;

/// `GET /contracts` — Contracts and events used for verification.
#[utoipa::path(
    get,
    path = "/api/v1/contracts",
    tag = "Contracts",
    summary = "Contract configuration",
    description = "Returns the UBI proxy, its current implementation (read from the ERC-1967 slot), the G$ token, the chain id and the scanned event table.",
    responses(
        (status = 200, description = "Contract configuration", body = ContractInfoResponse),
    )
)]
pub async fn get_contracts(State(state): State<AppState>) -> impl IntoResponse {
    let info = state.verifier.contract_info().await;
    (StatusCode::OK, Json(ContractInfoResponse::from(&info)))
}

/// Contract routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/contracts", get(get_contracts))
}
