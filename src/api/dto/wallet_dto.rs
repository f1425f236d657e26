//! Wallet balance and activity DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use super::common_dto::ActivityDto;
use crate::service::WalletBalance;

/// Response body for `GET /wallets/{wallet}/balance`.
#[derive(Debug, Serialize, ToSchema)]
pub struct BalanceResponse {
    /// Holder, lower-case hex.
    pub wallet_address: String,
    /// G$ token contract queried.
    pub token_contract: String,
    /// Raw balance in 10^-18 G$ (string-encoded).
    pub balance_raw: String,
    /// Balance with six decimals and the `G$` suffix.
    pub balance: String,
}

impl From<&WalletBalance> for BalanceResponse {
    fn from(balance: &WalletBalance) -> Self {
        Self {
            wallet_address: balance.wallet.to_lower_hex(),
            token_contract: balance.token.to_lower_hex(),
            balance_raw: balance.raw.to_string(),
            balance: balance.formatted(),
        }
    }
}

/// Query parameters for `GET /wallets/{wallet}/activity`.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ActivityQuery {
    /// Contract to inspect. Defaults to the UBI proxy.
    #[serde(default)]
    pub contract: Option<String>,
    /// Label attached to the records. Defaults to the known contract name.
    #[serde(default)]
    pub label: Option<String>,
}

/// Response body for `GET /wallets/{wallet}/activity`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityListResponse {
    /// Wallet inspected.
    pub wallet_address: String,
    /// Contract inspected.
    pub contract: String,
    /// Lookback window in hours.
    pub search_hours: u64,
    /// Number of activities.
    pub count: usize,
    /// Activities, newest first.
    pub activities: Vec<ActivityDto>,
}
