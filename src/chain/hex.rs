//! Hex quantity helpers for JSON-RPC values.

use alloy_primitives::U256;

use crate::error::GatewayError;

/// Width of one ABI word in hex characters.
const WORD_HEX_LEN: usize = 64;

/// Formats a block number as a JSON-RPC quantity (`0x`-prefixed, no
/// leading zeros).
#[must_use]
pub fn format_block_tag(block: u64) -> String {
    format!("0x{block:x}")
}

/// Parses a `0x`-prefixed hex quantity as `u64`.
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] if the string is empty, not hex, or
/// does not fit in 64 bits.
pub fn parse_hex_u64(value: &str) -> Result<u64, GatewayError> {
    let clean = value.trim().trim_start_matches("0x");
    if clean.is_empty() {
        return Err(GatewayError::Decode(format!("empty hex quantity {value:?}")));
    }
    u64::from_str_radix(clean, 16)
        .map_err(|e| GatewayError::Decode(format!("invalid hex quantity {value:?}: {e}")))
}

/// Parses a hex field as an unsigned 256-bit integer.
///
/// Fields longer than one ABI word are read from their first word, which
/// is where the leading non-indexed parameter of an event lives.
///
/// # Errors
///
/// Returns [`GatewayError::Decode`] if the field is empty (`0x`) or not hex.
pub fn parse_hex_u256(value: &str) -> Result<U256, GatewayError> {
    let clean = value.trim().trim_start_matches("0x");
    if clean.is_empty() {
        return Err(GatewayError::Decode("empty hex field".to_string()));
    }
    let word = clean.get(..WORD_HEX_LEN.min(clean.len())).unwrap_or(clean);
    U256::from_str_radix(word, 16)
        .map_err(|e| GatewayError::Decode(format!("invalid uint256 {value:?}: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[test]
    fn block_tag_has_no_padding() {
        assert_eq!(format_block_tag(0), "0x0");
        assert_eq!(format_block_tag(1000), "0x3e8");
    }

    #[test]
    fn parse_u64() {
        assert_eq!(assert_ok!(parse_hex_u64("0x1")), 1);
        assert_eq!(assert_ok!(parse_hex_u64("0xff")), 255);
        assert_eq!(assert_ok!(parse_hex_u64("0x3e8")), 1000);
        assert_err!(parse_hex_u64("0x"));
        assert_err!(parse_hex_u64("0xzz"));
    }

    #[test]
    fn parse_u256_full_word() {
        let data = "0x0000000000000000000000000000000000000000000000000de0b6b3a7640000";
        assert_eq!(
            assert_ok!(parse_hex_u256(data)),
            U256::from(1_000_000_000_000_000_000u64)
        );
    }

    #[test]
    fn parse_u256_short_and_multi_word() {
        assert_eq!(assert_ok!(parse_hex_u256("0x10")), U256::from(16u64));
        let two_words = format!("0x{:064x}{:064x}", 7u64, 9u64);
        assert_eq!(assert_ok!(parse_hex_u256(&two_words)), U256::from(7u64));
    }

    #[test]
    fn parse_u256_rejects_empty_and_garbage() {
        assert_err!(parse_hex_u256("0x"));
        assert_err!(parse_hex_u256(""));
        assert_err!(parse_hex_u256("0xnothex"));
    }
}
