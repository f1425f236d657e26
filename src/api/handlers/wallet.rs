//! Wallet handlers: G$ balance and per-contract activity.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};

use crate::api::dto::{ActivityDto, ActivityListResponse, ActivityQuery, BalanceResponse};
use crate::app_state::AppState;
use crate::domain::WalletAddress;
use crate::error::{ErrorResponse, GatewayError};

/// `GET /wallets/{wallet}/balance` — G$ balance.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidAddress`] on a malformed address and
/// [`GatewayError::Rpc`] or [`GatewayError::Decode`] if the node call fails.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{wallet}/balance",
    tag = "Wallets",
    summary = "G$ balance",
    description = "Reads the wallet's G$ balance with an ERC-20 `balanceOf` call.",
    params(("wallet" = String, Path, description = "Wallet address")),
    responses(
        (status = 200, description = "Current balance", body = BalanceResponse),
        (status = 400, description = "Malformed wallet address", body = ErrorResponse),
        (status = 502, description = "Chain node unavailable", body = ErrorResponse),
    )
)]
pub async fn get_balance(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
) -> Result<impl IntoResponse, GatewayError> {
    let wallet = WalletAddress::parse(&wallet)?;
    let balance = state.verifier.balance(&wallet).await?;
    Ok((StatusCode::OK, Json(BalanceResponse::from(&balance))))
}

/// `GET /wallets/{wallet}/activity` — Activity attributed to one contract.
///
/// # Errors
///
/// Returns [`GatewayError::InvalidAddress`] on a malformed wallet or
/// contract address and [`GatewayError::Rpc`] if the chain is unreachable.
#[utoipa::path(
    get,
    path = "/api/v1/wallets/{wallet}/activity",
    tag = "Wallets",
    summary = "Contract activity",
    description = "Lists G$ transfers from the contract to the wallet and UBI events on the contract naming the wallet, newest first. Not cached.",
    params(("wallet" = String, Path, description = "Wallet address"), ActivityQuery),
    responses(
        (status = 200, description = "Activities", body = ActivityListResponse),
        (status = 400, description = "Malformed address", body = ErrorResponse),
        (status = 502, description = "Chain node unavailable", body = ErrorResponse),
    )
)]
pub async fn get_activity(
    State(state): State<AppState>,
    Path(wallet): Path<String>,
    Query(query): Query<ActivityQuery>,
) -> Result<impl IntoResponse, GatewayError> {
    let wallet = WalletAddress::parse(&wallet)?;
    let contract = query
        .contract
        .as_deref()
        .map(WalletAddress::parse)
        .transpose()?;
    let contract_shown = contract.unwrap_or(state.verifier.contracts().ubi_proxy);

    let activities = state
        .verifier
        .contract_activity(&wallet, contract, query.label.as_deref())
        .await?;

    let response = ActivityListResponse {
        wallet_address: wallet.to_lower_hex(),
        contract: contract_shown.to_lower_hex(),
        search_hours: state.verifier.search_hours(),
        count: activities.len(),
        activities: activities.iter().map(ActivityDto::from).collect(),
    };
    Ok((StatusCode::OK, Json(response)))
}

/// Wallet routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wallets/{wallet}/balance", get(get_balance))
        .route("/wallets/{wallet}/activity", get(get_activity))
}
