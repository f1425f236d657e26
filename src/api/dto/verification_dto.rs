//! UBI verification request and response.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::common_dto::{ActivityDto, SummaryDto};
use crate::domain::{VerificationResult, WalletAddress};

/// Request body for `POST /ubi/verify`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct VerifyRequest {
    /// Wallet to verify, `0x`-prefixed or bare hex in any case.
    pub wallet_address: String,
}

/// Response body for `POST /ubi/verify`.
///
/// Returned with HTTP 200 whether or not a claim was found; clients gate
/// on `status`.
#[derive(Debug, Serialize, ToSchema)]
pub struct VerificationResponse {
    /// Normalized wallet address.
    pub wallet_address: String,
    /// `"success"` or `"error"`.
    pub status: String,
    /// Human-readable explanation.
    pub message: String,
    /// Activities, newest first.
    pub activities: Vec<ActivityDto>,
    /// Present only on success.
    pub summary: Option<SummaryDto>,
}

impl VerificationResponse {
    /// Builds the response for `wallet` from a verdict.
    #[must_use]
    pub fn new(wallet: &WalletAddress, result: &VerificationResult) -> Self {
        Self {
            wallet_address: wallet.to_lower_hex(),
            status: result.status.as_str().to_string(),
            message: result.message.clone(),
            activities: result.activities.iter().map(ActivityDto::from).collect(),
            summary: result.summary.as_ref().map(SummaryDto::from),
        }
    }
}
