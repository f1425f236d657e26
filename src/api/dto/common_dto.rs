//! Shared DTO types used across multiple endpoints.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::{ActivityRecord, VerificationSummary};

/// One on-chain activity as shown to clients.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ActivityDto {
    /// Contract label (e.g. `"UBI Proxy"`).
    pub contract: String,
    /// Contract address, lower-case hex.
    pub contract_address: String,
    /// Block number.
    pub block: u64,
    /// Transaction hash, or `"Unknown"`.
    pub tx_hash: String,
    /// Relative and absolute block time, or `"Block #N"`.
    pub timestamp: String,
    /// Method label (e.g. `"UBI claim"`).
    pub method: String,
    /// Always `"success"`.
    pub status: String,
    /// Amount with six decimals and the `G$` suffix, or `"Event logged"`.
    pub amount: String,
    /// `transfer`, `event`, `ubi_claim` or `ubi_event`.
    pub activity_type: String,
}

impl From<&ActivityRecord> for ActivityDto {
    fn from(record: &ActivityRecord) -> Self {
        Self {
            contract: record.contract.clone(),
            contract_address: record.contract_address.to_lower_hex(),
            block: record.block,
            tx_hash: record.tx_hash.clone(),
            timestamp: record.timestamp.clone(),
            method: record.method.clone(),
            status: record.status.clone(),
            amount: record.amount_display(),
            activity_type: record.activity_type.as_str().to_string(),
        }
    }
}

/// Aggregate counts of a successful verification.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SummaryDto {
    /// Number of activities found.
    pub total_activities: usize,
    /// Transfers and claim events.
    pub claims: usize,
    /// Bookkeeping events.
    pub events: usize,
    /// Distinct contracts involved.
    pub contracts_involved: usize,
    /// Newest activity.
    pub latest_activity: ActivityDto,
}

impl From<&VerificationSummary> for SummaryDto {
    fn from(summary: &VerificationSummary) -> Self {
        Self {
            total_activities: summary.total_activities,
            claims: summary.claims,
            events: summary.events,
            contracts_involved: summary.contracts_involved,
            latest_activity: ActivityDto::from(&summary.latest_activity),
        }
    }
}
