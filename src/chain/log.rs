//! `eth_getLogs` filter and log models, plus amount decoding.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::hex::{format_block_tag, parse_hex_u256, parse_hex_u64};
use crate::domain::{TokenAmount, WalletAddress};

/// Placeholder hash for logs that arrive without a transaction hash.
pub const UNKNOWN_TX_HASH: &str = "Unknown";

/// Filter for one `eth_getLogs` query.
///
/// `topics[i] == None` is a wildcard for that position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogFilter {
    /// Contract emitting the logs.
    pub address: WalletAddress,
    /// First block, inclusive.
    pub from_block: u64,
    /// Last block, inclusive.
    pub to_block: u64,
    /// Topic slots, positionally matched.
    pub topics: Vec<Option<String>>,
}

impl LogFilter {
    /// Creates a filter with no topic constraints.
    #[must_use]
    pub fn new(address: WalletAddress, from_block: u64, to_block: u64) -> Self {
        Self {
            address,
            from_block,
            to_block,
            topics: Vec::new(),
        }
    }

    /// Appends a topic slot.
    #[must_use]
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.push(Some(topic.into()));
        self
    }

    /// Appends a wildcard topic slot.
    #[must_use]
    pub fn any_topic(mut self) -> Self {
        self.topics.push(None);
        self
    }

    /// JSON-RPC parameter object.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let topics: Vec<Value> = self
            .topics
            .iter()
            .map(|t| t.as_ref().map_or(Value::Null, |s| Value::String(s.clone())))
            .collect();
        json!({
            "address": self.address.to_lower_hex(),
            "fromBlock": format_block_tag(self.from_block),
            "toBlock": format_block_tag(self.to_block),
            "topics": topics,
        })
    }

    /// First topic, if set.
    #[must_use]
    pub fn event_topic(&self) -> Option<&str> {
        self.topics.first().and_then(|t| t.as_deref())
    }
}

/// One log entry as returned by `eth_getLogs`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLog {
    /// Emitting contract.
    #[serde(default)]
    pub address: String,
    /// Indexed topics; `topics[0]` is the event signature.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Non-indexed ABI-encoded data.
    #[serde(default)]
    pub data: String,
    /// Hex block number.
    #[serde(default)]
    pub block_number: Option<String>,
    /// Transaction hash.
    #[serde(default)]
    pub transaction_hash: Option<String>,
}

impl RawLog {
    /// Block number, or `0` when missing or malformed.
    #[must_use]
    pub fn block(&self) -> u64 {
        self.block_number
            .as_deref()
            .and_then(|b| parse_hex_u64(b).ok())
            .unwrap_or(0)
    }

    /// Transaction hash, or [`UNKNOWN_TX_HASH`].
    #[must_use]
    pub fn tx_hash(&self) -> String {
        self.transaction_hash
            .clone()
            .unwrap_or_else(|| UNKNOWN_TX_HASH.to_string())
    }

    /// Whether any topic equals `topic` (case-insensitive).
    #[must_use]
    pub fn has_topic(&self, topic: &str) -> bool {
        self.topics.iter().any(|t| t.eq_ignore_ascii_case(topic))
    }
}

/// Where an amount may be read from in a log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AmountSource {
    /// The non-indexed data field.
    Data,
    /// An indexed topic slot.
    Topic(usize),
}

impl AmountSource {
    /// Attempts to read a 10^18-scaled integer from this source.
    #[must_use]
    pub fn decode(self, log: &RawLog) -> Option<U256> {
        match self {
            Self::Data => parse_hex_u256(&log.data).ok(),
            Self::Topic(index) => log
                .topics
                .get(index)
                .and_then(|t| parse_hex_u256(t).ok()),
        }
    }
}

/// Strategies tried in order for named events.
pub const EVENT_AMOUNT_SOURCES: [AmountSource; 2] = [AmountSource::Data, AmountSource::Topic(2)];

/// Decodes a named event amount: first successful source wins, otherwise
/// the event is reported as logged without an amount.
#[must_use]
pub fn decode_event_amount(log: &RawLog) -> TokenAmount {
    EVENT_AMOUNT_SOURCES
        .iter()
        .find_map(|source| source.decode(log))
        .map_or(TokenAmount::EventLogged, TokenAmount::Tokens)
}

/// Decodes an ERC-20 transfer amount from the data field; malformed data
/// decodes as zero.
#[must_use]
pub fn decode_transfer_amount(log: &RawLog) -> TokenAmount {
    AmountSource::Data
        .decode(log)
        .map_or(TokenAmount::ZERO, TokenAmount::Tokens)
}
