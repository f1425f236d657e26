//! Gateway configuration loaded from environment variables.
//!
//! Follows 12-factor style: all settings come from environment variables
//! (or a `.env` file via `dotenvy`). Numeric settings fall back to their
//! defaults when unset or unparsable; contract addresses must be valid when
//! set.

use std::net::SocketAddr;
use std::time::Duration;

use crate::chain::block_range::DEFAULT_BLOCKS_PER_HOUR;
use crate::domain::contracts::CELO_CHAIN_ID;
use crate::domain::result_cache::{DEFAULT_MAX_ENTRIES, DEFAULT_TTL_SECS};
use crate::domain::{ContractSet, WalletAddress};
use crate::service::VerifierSettings;
use crate::service::verification_service::DEFAULT_SEARCH_HOURS;

/// Public Celo mainnet RPC endpoint.
pub const DEFAULT_RPC_URL: &str = "https://forno.celo.org";

/// Top-level gateway configuration.
///
/// Loaded once at startup via [`GatewayConfig::from_env`].
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Socket address to bind the HTTP server to (e.g. `0.0.0.0:3000`).
    pub listen_addr: SocketAddr,

    /// Celo JSON-RPC endpoint.
    pub rpc_url: String,

    /// UBI proxy, G$ token and chain id.
    pub contracts: ContractSet,

    /// Lookback window in hours.
    pub search_hours: u64,

    /// Approximate block production rate.
    pub blocks_per_hour: u64,

    /// Seconds a verdict stays in the result cache.
    pub cache_ttl_secs: u64,

    /// Result cache size bound.
    pub cache_max_entries: usize,

    /// Timeout for head, block, storage and call requests.
    pub rpc_timeout: Duration,

    /// Timeout for `eth_getLogs` requests.
    pub log_query_timeout: Duration,

    /// Emit logs as JSON lines instead of the human-readable format.
    pub log_json: bool,
}

impl GatewayConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to sensible defaults when a variable is not set.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns an error if `LISTEN_ADDR` cannot be parsed as a
    /// [`SocketAddr`] or a contract address variable is malformed.
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let listen_addr: SocketAddr = std::env::var("LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:3000".to_string())
            .parse()?;

        let rpc_url = std::env::var("CELO_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string());

        let defaults = ContractSet::default();
        let contracts = ContractSet {
            ubi_proxy: parse_address_env("UBI_PROXY_CONTRACT", defaults.ubi_proxy)?,
            token: parse_address_env("GOODDOLLAR_TOKEN_CONTRACT", defaults.token)?,
            chain_id: parse_env("CHAIN_ID", CELO_CHAIN_ID),
        };

        let search_hours = parse_env("UBI_SEARCH_HOURS", DEFAULT_SEARCH_HOURS);
        let blocks_per_hour = parse_env("BLOCKS_PER_HOUR", DEFAULT_BLOCKS_PER_HOUR);

        let cache_ttl_secs = parse_env("UBI_CACHE_TTL_SECS", DEFAULT_TTL_SECS);
        let cache_max_entries = parse_env("UBI_CACHE_MAX_ENTRIES", DEFAULT_MAX_ENTRIES);

        let rpc_timeout = Duration::from_secs(parse_env("RPC_TIMEOUT_SECS", 10));
        let log_query_timeout = Duration::from_secs(parse_env("LOG_QUERY_TIMEOUT_SECS", 15));

        let log_json = parse_env_bool("LOG_JSON", false);

        Ok(Self {
            listen_addr,
            rpc_url,
            contracts,
            search_hours,
            blocks_per_hour,
            cache_ttl_secs,
            cache_max_entries,
            rpc_timeout,
            log_query_timeout,
            log_json,
        })
    }

    /// Verifier tunables derived from this configuration.
    #[must_use]
    pub const fn verifier_settings(&self) -> VerifierSettings {
        VerifierSettings {
            contracts: self.contracts,
            search_hours: self.search_hours,
            blocks_per_hour: self.blocks_per_hour,
        }
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    parse_bool(std::env::var(key).ok().as_deref(), default)
}

fn parse_bool(value: Option<&str>, default: bool) -> bool {
    match value.map(str::to_ascii_lowercase).as_deref() {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}

/// Parses an address variable; unset or empty keeps `default`.
fn parse_address_env(
    key: &str,
    default: WalletAddress,
) -> Result<WalletAddress, Box<dyn std::error::Error>> {
    match std::env::var(key) {
        Ok(value) if !value.trim().is_empty() => WalletAddress::parse(value.trim())
            .map_err(|e| format!("{key}: {e}").into()),
        _ => Ok(default),
    }
}
