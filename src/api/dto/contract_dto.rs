//! Contract configuration DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::contracts::{TRANSFER, UBI_EVENTS};
use crate::domain::{EventSignature, WalletFilter};
use crate::service::ContractInfo;

/// One entry of the scanned event table.
#[derive(Debug, Serialize, ToSchema)]
pub struct EventSignatureDto {
    /// Table name (e.g. `"UBI_CLAIMED"`).
    pub name: String,
    /// Solidity signature.
    pub signature: String,
    /// First topic.
    pub topic: String,
    /// Whether the wallet is filtered in the node query.
    pub wallet_indexed: bool,
}

impl From<&EventSignature> for EventSignatureDto {
    fn from(event: &EventSignature) -> Self {
        Self {
            name: event.name.to_string(),
            signature: event.signature.to_string(),
            topic: event.topic.to_string(),
            wallet_indexed: event.wallet_filter == WalletFilter::IndexedFirst,
        }
    }
}

/// Response body for `GET /contracts`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ContractInfoResponse {
    /// Chain id.
    pub chain_id: u64,
    /// UBI proxy address.
    pub ubi_proxy: String,
    /// Implementation behind the proxy, if the ERC-1967 slot is readable.
    pub ubi_implementation: Option<String>,
    /// G$ token address.
    pub token: String,
    /// Events scanned during verification.
    pub events: Vec<EventSignatureDto>,
}

impl From<&ContractInfo> for ContractInfoResponse {
    fn from(info: &ContractInfo) -> Self {
        Self {
            chain_id: info.contracts.chain_id,
            ubi_proxy: info.contracts.ubi_proxy.to_lower_hex(),
            ubi_implementation: info.ubi_implementation.map(|a| a.to_lower_hex()),
            token: info.contracts.token.to_lower_hex(),
            events: std::iter::once(&TRANSFER)
                .chain(UBI_EVENTS.iter())
                .map(EventSignatureDto::from)
                .collect(),
        }
    }
}
