//! Verification service: cache-first UBI claim checks plus the read-only
//! wallet and contract queries exposed next to them.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, MutexGuard, PoisonError};

use alloy_primitives::U256;
use tokio::sync::Mutex;

use super::log_aggregator::LogAggregator;
use super::verdict::VerdictBuilder;
use crate::chain::block_range::DEFAULT_BLOCKS_PER_HOUR;
use crate::chain::hex::parse_hex_u256;
use crate::chain::{BlockRangeResolver, ChainRpc};
use crate::domain::contracts::{BALANCE_OF_SELECTOR, ERC1967_IMPLEMENTATION_SLOT};
use crate::domain::{
    ActivityRecord, Clock, ContractSet, ResultCache, SystemClock, TokenAmount, VerificationResult,
    WalletAddress,
};
use crate::error::GatewayError;

/// Default lookback window.
pub const DEFAULT_SEARCH_HOURS: u64 = 48;

/// Label for contracts that are neither the proxy nor the token.
pub const GENERIC_CONTRACT_LABEL: &str = "Contract";

/// Tunables of a [`VerificationService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierSettings {
    /// Contracts scanned.
    pub contracts: ContractSet,
    /// Lookback window in hours.
    pub search_hours: u64,
    /// Block production rate used to size the window.
    pub blocks_per_hour: u64,
}

impl Default for VerifierSettings {
    fn default() -> Self {
        Self {
            contracts: ContractSet::default(),
            search_hours: DEFAULT_SEARCH_HOURS,
            blocks_per_hour: DEFAULT_BLOCKS_PER_HOUR,
        }
    }
}

/// G$ balance of a wallet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletBalance {
    /// Holder.
    pub wallet: WalletAddress,
    /// Token contract queried.
    pub token: WalletAddress,
    /// Balance in 10^-18 G$.
    pub raw: U256,
}

impl WalletBalance {
    /// Balance rendered with six decimals.
    #[must_use]
    pub fn formatted(&self) -> String {
        TokenAmount::Tokens(self.raw).to_string()
    }
}

/// Contract addresses in use, with the proxy implementation if resolvable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractInfo {
    /// Configured addresses.
    pub contracts: ContractSet,
    /// Current implementation behind the UBI proxy.
    pub ubi_implementation: Option<WalletAddress>,
}

/// Per-wallet lock plus the number of callers holding or awaiting it.
#[derive(Debug, Default)]
struct Gate {
    lock: Arc<Mutex<()>>,
    holders: usize,
}

/// In-flight gates keyed by wallet. Never locked across an `.await`.
type GateMap = StdMutex<HashMap<WalletAddress, Gate>>;

fn lock_gates(gates: &GateMap) -> MutexGuard<'_, HashMap<WalletAddress, Gate>> {
    gates.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Registration on a wallet gate. Dropping it, including when the owning
/// future is cancelled, removes the gate once no caller holds it.
#[derive(Debug)]
struct GateLease<'a> {
    gates: &'a GateMap,
    wallet: WalletAddress,
}

impl<'a> GateLease<'a> {
    fn acquire(gates: &'a GateMap, wallet: WalletAddress) -> (Self, Arc<Mutex<()>>) {
        let mut map = lock_gates(gates);
        let gate = map.entry(wallet).or_default();
        gate.holders += 1;
        let lock = Arc::clone(&gate.lock);
        (Self { gates, wallet }, lock)
    }
}

impl Drop for GateLease<'_> {
    fn drop(&mut self) {
        let mut map = lock_gates(self.gates);
        if let Some(gate) = map.get_mut(&self.wallet) {
            gate.holders = gate.holders.saturating_sub(1);
            if gate.holders == 0 {
                map.remove(&self.wallet);
            }
        }
    }
}

/// What a fresh computation produced and whether it may be cached.
enum Computed {
    Cacheable(VerificationResult),
    Uncached(VerificationResult),
}

/// Orchestrates verification: cache, block range, log aggregation, verdict.
///
/// `verify` never returns an error. Transport and decoding failures are
/// recovered per sub-query; a verification where every sub-query failed
/// yields an error verdict that is not cached.
#[derive(Debug)]
pub struct VerificationService<R> {
    rpc: Arc<R>,
    cache: Arc<ResultCache>,
    settings: VerifierSettings,
    resolver: BlockRangeResolver,
    verdicts: VerdictBuilder,
    clock: Arc<dyn Clock>,
    inflight: GateMap,
}

impl<R: ChainRpc> VerificationService<R> {
    /// Creates a service on the system clock.
    #[must_use]
    pub fn new(rpc: Arc<R>, cache: Arc<ResultCache>, settings: VerifierSettings) -> Self {
        Self::with_clock(rpc, cache, settings, Arc::new(SystemClock))
    }

    /// Creates a service that formats block times against `clock`.
    #[must_use]
    pub fn with_clock(
        rpc: Arc<R>,
        cache: Arc<ResultCache>,
        settings: VerifierSettings,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            rpc,
            cache,
            resolver: BlockRangeResolver::new(settings.blocks_per_hour),
            verdicts: VerdictBuilder::new(settings.search_hours),
            settings,
            clock,
            inflight: StdMutex::new(HashMap::new()),
        }
    }

    /// Configured contracts.
    #[must_use]
    pub const fn contracts(&self) -> &ContractSet {
        &self.settings.contracts
    }

    /// Lookback window in hours.
    #[must_use]
    pub const fn search_hours(&self) -> u64 {
        self.settings.search_hours
    }

    /// Shared verdict cache.
    #[must_use]
    pub fn cache(&self) -> &Arc<ResultCache> {
        &self.cache
    }

    /// Number of cached verdicts, stale ones included.
    pub async fn cache_len(&self) -> usize {
        self.cache.len().await
    }

    /// Verifies that `wallet` claimed UBI within the lookback window.
    ///
    /// Served from cache when a verdict younger than the TTL exists.
    /// Concurrent calls for the same wallet are serialized so that only
    /// one of them reaches the network.
    pub async fn verify(&self, wallet: &WalletAddress) -> VerificationResult {
        let (stats, hit) = self.cache.sweep_and_lookup(wallet).await;
        if stats.expired > 0 || stats.evicted > 0 {
            tracing::debug!(
                expired = stats.expired,
                evicted = stats.evicted,
                "result cache swept"
            );
        }
        if let Some(result) = hit {
            tracing::debug!(wallet = %wallet.short(), "verification served from cache");
            return result;
        }

        let (lease, gate) = GateLease::acquire(&self.inflight, *wallet);
        let guard = gate.lock().await;

        // Another caller may have finished while we waited.
        let result = if let Some(result) = self.cache.lookup(wallet).await {
            tracing::debug!(wallet = %wallet.short(), "verification served from cache after wait");
            result
        } else {
            match self.compute(wallet).await {
                Computed::Cacheable(result) => {
                    self.cache.store(wallet, result.clone()).await;
                    result
                }
                Computed::Uncached(result) => result,
            }
        };

        drop(guard);
        drop(lease);
        result
    }

    async fn compute(&self, wallet: &WalletAddress) -> Computed {
        let range = self
            .resolver
            .resolve(self.rpc.as_ref(), self.settings.search_hours)
            .await;
        if range.is_degraded() {
            tracing::warn!(wallet = %wallet.short(), "chain head unavailable, verdict not cached");
            return Computed::Uncached(self.verdicts.build(Vec::new()));
        }

        let aggregation = LogAggregator::new(
            self.rpc.as_ref(),
            &self.settings.contracts,
            self.clock.as_ref(),
        )
        .collect_ubi_activity(wallet, range)
        .await;

        if aggregation.all_failed() {
            let error = GatewayError::Rpc(aggregation.failure_summary());
            tracing::error!(wallet = %wallet.short(), error = %error, "ubi verification failed");
            return Computed::Uncached(self.verdicts.fault(&error));
        }

        let result = self.verdicts.build(aggregation.activities);
        tracing::info!(
            wallet = %wallet.short(),
            status = result.status.as_str(),
            activities = result.activities.len(),
            from_block = range.from,
            to_block = range.to,
            "ubi verification completed"
        );
        Computed::Cacheable(result)
    }

    /// Reads the G$ balance of `wallet` via `balanceOf`.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Rpc`] if the call fails, or
    /// [`GatewayError::Decode`] if the node returns no data.
    pub async fn balance(&self, wallet: &WalletAddress) -> Result<WalletBalance, GatewayError> {
        let token = self.settings.contracts.token;
        let topic = wallet.topic();
        let argument = topic.strip_prefix("0x").unwrap_or(&topic);
        let data = format!("{BALANCE_OF_SELECTOR}{argument}");

        let output = self.rpc.call(&token, &data).await?;
        let raw = parse_hex_u256(&output)?;
        tracing::debug!(wallet = %wallet.short(), %raw, "balance read");
        Ok(WalletBalance {
            wallet: *wallet,
            token,
            raw,
        })
    }

    /// Configured contracts plus the implementation behind the UBI proxy.
    ///
    /// An unreadable or empty ERC-1967 slot yields no implementation.
    pub async fn contract_info(&self) -> ContractInfo {
        let contracts = self.settings.contracts;
        let ubi_implementation = match self
            .rpc
            .storage_at(&contracts.ubi_proxy, ERC1967_IMPLEMENTATION_SLOT)
            .await
        {
            Ok(word) => implementation_from_slot(&word),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read proxy implementation slot");
                None
            }
        };
        ContractInfo {
            contracts,
            ubi_implementation,
        }
    }

    /// Activity attributed to `contract` for `wallet`, newest first.
    ///
    /// Defaults to the UBI proxy. `label` overrides the contract name used
    /// in the records.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::Rpc`] if the chain head cannot be read or
    /// every query fails.
    pub async fn contract_activity(
        &self,
        wallet: &WalletAddress,
        contract: Option<WalletAddress>,
        label: Option<&str>,
    ) -> Result<Vec<ActivityRecord>, GatewayError> {
        let contracts = &self.settings.contracts;
        let contract = contract.unwrap_or(contracts.ubi_proxy);
        let label = label.map_or_else(|| default_label(contracts, &contract), str::to_string);

        let range = self
            .resolver
            .resolve(self.rpc.as_ref(), self.settings.search_hours)
            .await;
        if range.is_degraded() {
            return Err(GatewayError::Rpc("chain head unavailable".to_string()));
        }

        let aggregation = LogAggregator::new(self.rpc.as_ref(), contracts, self.clock.as_ref())
            .collect_contract_activity(&label, contract, wallet, range)
            .await;
        if aggregation.all_failed() {
            return Err(GatewayError::Rpc(aggregation.failure_summary()));
        }

        let mut activities = aggregation.activities;
        activities.sort_by(|a, b| b.block.cmp(&a.block));
        Ok(activities)
    }
}

fn default_label(contracts: &ContractSet, contract: &WalletAddress) -> String {
    if *contract == contracts.ubi_proxy {
        ContractSet::UBI_PROXY_LABEL.to_string()
    } else if *contract == contracts.token {
        ContractSet::TOKEN_LABEL.to_string()
    } else {
        GENERIC_CONTRACT_LABEL.to_string()
    }
}

/// Address stored in an ERC-1967 slot, or `None` when the slot is empty.
fn implementation_from_slot(word: &str) -> Option<WalletAddress> {
    match parse_hex_u256(word) {
        Ok(value) if value.is_zero() => None,
        Ok(_) => WalletAddress::from_topic(word).ok(),
        Err(_) => None,
    }
}
