//! UBI verification handler.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};

use crate::api::dto::{VerificationResponse, VerifyRequest};
use crate::app_state::AppState;
use crate::domain::WalletAddress;
use crate::error::{ErrorResponse, GatewayError};

/// `POST /ubi/verify` — Check for a recent UBI claim.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidAddress`] if `wallet_address` is
/// malformed. Verification outcomes, including upstream failures, are
/// reported in the body with HTTP 200.
#[utoipa::path(
    post,
    path = "/api/v1/ubi/verify",
    tag = "UBI",
    summary = "Verify a recent UBI claim",
    description = "Scans the lookback window for G$ transfers from the UBI proxy and UBI events involving the wallet. Verdicts are cached per wallet for five minutes.",
    request_body = VerifyRequest,
    responses(
        (status = 200, description = "Verification verdict", body = VerificationResponse),
        (status = 400, description = "Malformed wallet address", body = ErrorResponse),
    )
)]
pub async fn verify_ubi(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> Result<impl IntoResponse, GatewayError> {
    let wallet = WalletAddress::parse(&req.wallet_address)?;
    let result = state.verifier.verify(&wallet).await;
    Ok((StatusCode::OK, Json(VerificationResponse::new(&wallet, &result))))
}

/// Verification routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/ubi/verify", post(verify_ubi))
}
