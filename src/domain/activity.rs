//! On-chain activity records observed while verifying a UBI claim.

use std::fmt;

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use super::WalletAddress;

/// Token decimals for G$ (10^18 scale).
const TOKEN_DECIMALS: u32 = 18;

/// Decimals shown when rendering an amount.
const DISPLAY_DECIMALS: u32 = 6;

/// Currency suffix appended to rendered amounts.
pub const TOKEN_SYMBOL: &str = "G$";

/// Placeholder used when an event carries no decodable amount.
pub const EVENT_LOGGED: &str = "Event logged";

/// Kind of activity a record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// G$ transfer into the wallet from a watched contract.
    Transfer,
    /// Named event on an arbitrary watched contract.
    Event,
    /// Claim event emitted by the UBI proxy.
    UbiClaim,
    /// Other UBI bookkeeping event emitted by the UBI proxy.
    UbiEvent,
}

impl ActivityType {
    /// Returns `true` for activities that represent tokens reaching the
    /// wallet through a claim.
    #[must_use]
    pub const fn is_claim(self) -> bool {
        matches!(self, Self::Transfer | Self::UbiClaim)
    }

    /// Returns `true` for bookkeeping events.
    #[must_use]
    pub const fn is_event(self) -> bool {
        matches!(self, Self::Event | Self::UbiEvent)
    }

    /// Wire name of the activity type.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Transfer => "transfer",
            Self::Event => "event",
            Self::UbiClaim => "ubi_claim",
            Self::UbiEvent => "ubi_event",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A G$ amount decoded from a log, or a marker that none was present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenAmount {
    /// Raw 256-bit integer in the token's smallest unit.
    Tokens(U256),
    /// The event was observed but carried no decodable amount.
    EventLogged,
}

impl TokenAmount {
    /// Zero tokens.
    pub const ZERO: Self = Self::Tokens(U256::ZERO);

    /// Returns the raw integer value, if any.
    #[must_use]
    pub const fn raw(&self) -> Option<U256> {
        match self {
            Self::Tokens(v) => Some(*v),
            Self::EventLogged => None,
        }
    }
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tokens(value) => write!(f, "{} {TOKEN_SYMBOL}", format_units(*value)),
            Self::EventLogged => f.write_str(EVENT_LOGGED),
        }
    }
}

/// Renders a 10^18-scaled integer with six decimals, rounding half up on
/// the seventh.
#[must_use]
pub fn format_units(value: U256) -> String {
    let scale = U256::from(10u64).pow(U256::from(TOKEN_DECIMALS));
    let step = 10u64.pow(TOKEN_DECIMALS - DISPLAY_DECIMALS);
    let display_max = 10u64.pow(DISPLAY_DECIMALS);

    let mut whole = value / scale;
    let remainder = u64::try_from(value % scale).unwrap_or_default();
    let mut fraction = remainder.saturating_add(step / 2) / step;
    if fraction >= display_max {
        fraction -= display_max;
        whole = whole.saturating_add(U256::from(1u64));
    }
    format!("{whole}.{fraction:0width$}", width = DISPLAY_DECIMALS as usize)
}

/// One observed on-chain event relevant to UBI verification.
///
/// Created fresh per verification call; never persisted beyond the
/// lifetime of a cache entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    /// Human label of the contract (e.g. `"UBI Proxy"`).
    pub contract: String,
    /// Address of the contract the activity is attributed to.
    pub contract_address: WalletAddress,
    /// Block the log was included in.
    pub block: u64,
    /// Transaction hash (`0x` + 64 hex chars).
    pub tx_hash: String,
    /// Human-readable block time, or `"Block #N"` when unavailable.
    pub timestamp: String,
    /// Method or event label (e.g. `"UBI claim"`, `"ubi claimed"`).
    pub method: String,
    /// Always `"success"` for decoded logs.
    pub status: String,
    /// Decoded amount.
    pub amount: TokenAmount,
    /// Activity classification.
    pub activity_type: ActivityType,
}

impl ActivityRecord {
    /// Status attached to every record built from a decoded log.
    pub const STATUS_SUCCESS: &'static str = "success";

    /// Rendered amount string (`"1.000000 G$"` or `"Event logged"`).
    #[must_use]
    pub fn amount_display(&self) -> String {
        self.amount.to_string()
    }

    /// First 16 characters of the transaction hash.
    #[must_use]
    pub fn short_tx_hash(&self) -> String {
        self.tx_hash.chars().take(16).collect()
    }
}
