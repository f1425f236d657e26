//! Type-safe wallet and contract address.
//!
//! [`WalletAddress`] is a newtype around [`alloy_primitives::Address`]
//! that always renders in lower case, so it can be used directly as a
//! cache key and as an indexed-parameter topic in log filters.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, hex};

use crate::error::GatewayError;

/// Number of zero hex characters prepended to a 40-char address to fill a
/// 32-byte topic slot.
const TOPIC_PADDING: usize = 24;

/// A 20-byte account address (wallet or contract).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WalletAddress(Address);

impl WalletAddress {
    /// Parses a hex address with or without the `0x` prefix, in any case.
    ///
    /// Checksums are not enforced.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidAddress`] unless the input is exactly
    /// 40 hex characters after the optional prefix.
    pub fn parse(input: &str) -> Result<Self, GatewayError> {
        let trimmed = input.trim();
        let clean = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        if clean.len() != 40 {
            return Err(GatewayError::InvalidAddress(format!(
                "expected 40 hex characters, got {} in {input:?}",
                clean.len()
            )));
        }
        let mut bytes = [0u8; 20];
        hex::decode_to_slice(clean, &mut bytes)
            .map_err(|e| GatewayError::InvalidAddress(format!("{input:?}: {e}")))?;
        Ok(Self(Address::from(bytes)))
    }

    /// Recovers an address from a 32-byte indexed topic (last 20 bytes).
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidAddress`] if the topic is shorter than
    /// 40 hex characters or not valid hex.
    pub fn from_topic(topic: &str) -> Result<Self, GatewayError> {
        let clean = topic.trim_start_matches("0x");
        let start = clean.len().checked_sub(40).ok_or_else(|| {
            GatewayError::InvalidAddress(format!("topic too short: {topic:?}"))
        })?;
        let tail = clean
            .get(start..)
            .ok_or_else(|| GatewayError::InvalidAddress(format!("malformed topic: {topic:?}")))?;
        Self::parse(tail)
    }

    /// Wraps an existing [`Address`].
    #[must_use]
    pub const fn from_address(address: Address) -> Self {
        Self(address)
    }

    /// Returns the inner [`Address`].
    #[must_use]
    pub const fn as_address(&self) -> &Address {
        &self.0
    }

    /// `0x` followed by 40 lower-case hex characters.
    #[must_use]
    pub fn to_lower_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0.as_slice()))
    }

    /// Left-pads the address to a 32-byte topic: `0x` + 24 zeros + address.
    #[must_use]
    pub fn topic(&self) -> String {
        format!(
            "0x{}{}",
            "0".repeat(TOPIC_PADDING),
            hex::encode(self.0.as_slice())
        )
    }

    /// Short form for log lines (`0x` + first 8 hex chars).
    #[must_use]
    pub fn short(&self) -> String {
        let full = self.to_lower_hex();
        full.chars().take(10).collect()
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_lower_hex())
    }
}

impl FromStr for WalletAddress {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Address> for WalletAddress {
    fn from(address: Address) -> Self {
        Self(address)
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    const MIXED: &str = "0xFf00A683f7bD77665754A65F2B82fdEFc4371a50";

    #[test]
    fn parse_accepts_mixed_case_and_lowers() {
        let Ok(addr) = WalletAddress::parse(MIXED) else {
            panic!("valid address");
        };
        assert_eq!(
            addr.to_lower_hex(),
            "0xff00a683f7bd77665754a65f2b82fdefc4371a50"
        );
    }

    #[test]
    fn parse_accepts_missing_prefix() {
        let Ok(addr) = WalletAddress::parse("ff00a683f7bd77665754a65f2b82fdefc4371a50") else {
            panic!("valid address");
        };
        assert_eq!(addr.to_string(), MIXED.to_lowercase());
    }

    #[test]
    fn parse_rejects_bad_input() {
        assert!(WalletAddress::parse("0x1234").is_err());
        assert!(WalletAddress::parse("").is_err());
        assert!(WalletAddress::parse("0xZZ00A683f7bD77665754A65F2B82fdEFc4371a50").is_err());
    }

    #[test]
    fn topic_is_left_padded_and_lowercase() {
        let Ok(addr) = WalletAddress::parse("0xABCDEFABCDEFABCDEFABCDEFABCDEFABCDEFABCD") else {
            panic!("valid address");
        };
        let topic = addr.topic();
        assert_eq!(topic.len(), 66);
        assert_eq!(
            topic,
            "0x000000000000000000000000abcdefabcdefabcdefabcdefabcdefabcdefabcd"
        );
    }

    #[test]
    fn from_topic_inverts_topic() {
        let Ok(addr) = WalletAddress::parse(MIXED) else {
            panic!("valid address");
        };
        let Ok(back) = WalletAddress::from_topic(&addr.topic()) else {
            panic!("valid topic");
        };
        assert_eq!(addr, back);
    }

    #[test]
    fn short_form() {
        let Ok(addr) = WalletAddress::parse(MIXED) else {
            panic!("valid address");
        };
        assert_eq!(addr.short(), "0xff00a683");
    }
}
