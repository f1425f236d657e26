//! Static contract configuration: addresses and the event signature table
//! scanned during verification.

use alloy_primitives::{address, hex, keccak256};

use super::{ActivityType, WalletAddress};

/// Celo mainnet chain id.
pub const CELO_CHAIN_ID: u64 = 42220;

/// ERC-1967 implementation slot: `keccak256("eip1967.proxy.implementation") - 1`.
pub const ERC1967_IMPLEMENTATION_SLOT: &str =
    "0x360894a13ba1a3210667c828492db98dca3e2076cc3735a920a3ca505d382bbc";

/// ERC-20 `balanceOf(address)` selector.
pub const BALANCE_OF_SELECTOR: &str = "0x70a08231";

/// How a named event is matched against the wallet being verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletFilter {
    /// The wallet is the first indexed parameter; filter in the node query.
    IndexedFirst,
    /// The wallet is not indexed in a fixed slot; fetch unfiltered and keep
    /// logs whose topics contain the wallet topic anywhere.
    AnyTopic,
}

/// One entry of the event signature table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventSignature {
    /// Upper-snake table name (e.g. `"UBI_CLAIMED"`).
    pub name: &'static str,
    /// Canonical Solidity signature used to derive the topic.
    pub signature: &'static str,
    /// First-topic value (`0x` + 64 hex chars).
    pub topic: &'static str,
    /// Wallet matching strategy.
    pub wallet_filter: WalletFilter,
    /// Classification of records produced from this event on the UBI proxy.
    pub activity_type: ActivityType,
}

impl EventSignature {
    /// Lower-cased name with underscores replaced by spaces.
    #[must_use]
    pub fn method_label(&self) -> String {
        self.name.to_lowercase().replace('_', " ")
    }

    /// Derives the topic of a canonical signature string.
    #[must_use]
    pub fn topic_for(signature: &str) -> String {
        format!("0x{}", hex::encode(keccak256(signature.as_bytes())))
    }

    /// Whether the configured topic equals the hash of the signature.
    #[must_use]
    pub fn topic_matches_signature(&self) -> bool {
        Self::topic_for(self.signature).eq_ignore_ascii_case(self.topic)
    }
}

/// ERC-20 `Transfer(address,address,uint256)`.
pub const TRANSFER: EventSignature = EventSignature {
    name: "TRANSFER",
    signature: "Transfer(address,address,uint256)",
    topic: "0xddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef",
    wallet_filter: WalletFilter::AnyTopic,
    activity_type: ActivityType::Transfer,
};

/// Named UBI events scanned on the proxy, in query order.
pub const UBI_EVENTS: [EventSignature; 3] = [
    EventSignature {
        name: "UBI_CLAIMED",
        signature: "UBIClaimed(address,uint256)",
        topic: "0x89ed24731df6b066e4c5186901fffdba18cd9a10f07494aff900bdee260d1304",
        wallet_filter: WalletFilter::IndexedFirst,
        activity_type: ActivityType::UbiClaim,
    },
    EventSignature {
        name: "UBI_CALCULATED",
        signature: "UBICalculated(uint256,uint256,uint256)",
        topic: "0x836fa39995340265746dfe9587d9fe5c5de35b7bce778afd9b124ce1cfeafdc4",
        wallet_filter: WalletFilter::AnyTopic,
        activity_type: ActivityType::UbiEvent,
    },
    EventSignature {
        name: "UBI_CYCLE_CALCULATED",
        signature: "UBICycleCalculated(uint256,uint256,uint256,uint256)",
        topic: "0x83e0d535b9e84324e0a25922406398d6ff5f96d0c686204ee490e16d7670566f",
        wallet_filter: WalletFilter::AnyTopic,
        activity_type: ActivityType::UbiEvent,
    },
];

/// Addresses of the contracts involved in UBI verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContractSet {
    /// ERC-1967 proxy of the UBI scheme; sender of claimed G$.
    pub ubi_proxy: WalletAddress,
    /// G$ ERC-20 token.
    pub token: WalletAddress,
    /// Chain id the addresses live on.
    pub chain_id: u64,
}

impl ContractSet {
    /// Label used for activities attributed to the UBI proxy.
    pub const UBI_PROXY_LABEL: &'static str = "UBI Proxy";

    /// Label used for the G$ token contract.
    pub const TOKEN_LABEL: &'static str = "GoodDollar Token";

    /// Checks the static event table against keccak-derived topics and logs
    /// any mismatch. Returns the names of mismatching entries.
    #[must_use]
    pub fn audit_event_table() -> Vec<&'static str> {
        std::iter::once(&TRANSFER)
            .chain(UBI_EVENTS.iter())
            .filter(|event| !event.topic_matches_signature())
            .map(|event| {
                tracing::warn!(
                    event = event.name,
                    signature = event.signature,
                    configured = event.topic,
                    derived = %EventSignature::topic_for(event.signature),
                    "event topic does not match signature hash"
                );
                event.name
            })
            .collect()
    }
}

impl Default for ContractSet {
    fn default() -> Self {
        Self {
            ubi_proxy: WalletAddress::from_address(address!(
                "43d72Ff17701B2DA814620735C39C620Ce0ea4A1"
            )),
            token: WalletAddress::from_address(address!(
                "62B8B11039FcfE5aB0C56E502b1C372A3d2a9c7A"
            )),
            chain_id: CELO_CHAIN_ID,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_topic_is_keccak_of_signature() {
        assert!(TRANSFER.topic_matches_signature());
    }

    #[test]
    fn every_table_topic_is_keccak_of_its_signature() {
        assert!(UBI_EVENTS.iter().all(EventSignature::topic_matches_signature));
        assert!(ContractSet::audit_event_table().is_empty());
    }

    #[test]
    fn method_labels() {
        let labels: Vec<String> = UBI_EVENTS.iter().map(EventSignature::method_label).collect();
        assert_eq!(
            labels,
            vec!["ubi claimed", "ubi calculated", "ubi cycle calculated"]
        );
    }

    #[test]
    fn only_claim_event_is_wallet_indexed() {
        let indexed: Vec<&str> = UBI_EVENTS
            .iter()
            .filter(|e| e.wallet_filter == WalletFilter::IndexedFirst)
            .map(|e| e.name)
            .collect();
        assert_eq!(indexed, vec!["UBI_CLAIMED"]);
    }

    #[test]
    fn default_contracts_are_celo_mainnet() {
        let contracts = ContractSet::default();
        assert_eq!(contracts.chain_id, 42220);
        assert_eq!(
            contracts.ubi_proxy.to_lower_hex(),
            "0x43d72ff17701b2da814620735c39c620ce0ea4a1"
        );
        assert_eq!(
            contracts.token.to_lower_hex(),
            "0x62b8b11039fcfe5ab0c56e502b1c372a3d2a9c7a"
        );
    }
}
