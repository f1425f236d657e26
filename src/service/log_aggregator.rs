//! Collects UBI-related activity for a wallet from chain logs.
//!
//! Every sub-query is independent: a failed or timed-out query contributes
//! zero records and is reported through a [`QueryOutcome`], but never
//! aborts the aggregation. Queries are issued concurrently.

use futures_util::future::{join, join_all};

use crate::chain::log::{decode_event_amount, decode_transfer_amount};
use crate::chain::{BlockRange, ChainRpc, LogFilter, RawLog, TimestampFormatter};
use crate::domain::contracts::{TRANSFER, UBI_EVENTS};
use crate::domain::{
    ActivityRecord, ActivityType, Clock, ContractSet, EventSignature, TokenAmount, WalletAddress,
    WalletFilter,
};

/// Method label for G$ sent by the UBI proxy.
pub const UBI_CLAIM_METHOD: &str = "UBI claim";

/// Method label for G$ sent by any other watched contract.
pub const TRANSFER_METHOD: &str = "G$ transfer";

/// Result of one log query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Query name (`"TRANSFER"`, `"UBI_CLAIMED"`, ...).
    pub query: String,
    /// Logs kept after wallet filtering.
    pub logs: usize,
    /// Error text if the query failed.
    pub error: Option<String>,
}

impl QueryOutcome {
    /// Whether the query failed.
    #[must_use]
    pub const fn failed(&self) -> bool {
        self.error.is_some()
    }
}

/// Activities plus per-query outcomes of one aggregation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    /// Decoded activities, in query order (not sorted).
    pub activities: Vec<ActivityRecord>,
    /// One entry per query attempted.
    pub outcomes: Vec<QueryOutcome>,
}

impl Aggregation {
    /// `true` when at least one query ran and every query failed.
    #[must_use]
    pub fn all_failed(&self) -> bool {
        !self.outcomes.is_empty() && self.outcomes.iter().all(QueryOutcome::failed)
    }

    /// Error texts of failed queries, joined for display.
    #[must_use]
    pub fn failure_summary(&self) -> String {
        self.outcomes
            .iter()
            .filter_map(|o| o.error.as_ref().map(|e| format!("{}: {e}", o.query)))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

/// A decoded log awaiting its block time description.
#[derive(Debug)]
struct PendingRecord {
    log: RawLog,
    contract: String,
    contract_address: WalletAddress,
    method: String,
    amount: TokenAmount,
    activity_type: ActivityType,
}

/// Issues the log queries for one verification and decodes the results.
#[derive(Debug)]
pub struct LogAggregator<'a, R> {
    rpc: &'a R,
    contracts: &'a ContractSet,
    clock: &'a dyn Clock,
}

impl<'a, R: ChainRpc> LogAggregator<'a, R> {
    /// Creates an aggregator over `rpc`.
    #[must_use]
    pub fn new(rpc: &'a R, contracts: &'a ContractSet, clock: &'a dyn Clock) -> Self {
        Self {
            rpc,
            contracts,
            clock,
        }
    }

    /// Collects UBI proxy activity for `wallet` within `range`.
    ///
    /// Queries G$ transfers from the proxy to the wallet and every named
    /// UBI event on the proxy. A degraded range yields an empty
    /// aggregation without touching the network.
    pub async fn collect_ubi_activity(
        &self,
        wallet: &WalletAddress,
        range: BlockRange,
    ) -> Aggregation {
        if range.is_degraded() {
            tracing::warn!(wallet = %wallet.short(), "degraded block range, skipping log queries");
            return Aggregation::default();
        }

        let proxy = self.contracts.ubi_proxy;
        let wallet_topic = wallet.topic();

        let transfer_filter = LogFilter::new(self.contracts.token, range.from, range.to)
            .topic(TRANSFER.topic)
            .topic(proxy.topic())
            .topic(wallet_topic.clone());

        let event_queries = UBI_EVENTS.iter().map(|event| {
            let base = LogFilter::new(proxy, range.from, range.to).topic(event.topic);
            let filter = match event.wallet_filter {
                WalletFilter::IndexedFirst => base.topic(wallet_topic.clone()),
                WalletFilter::AnyTopic => base.any_topic(),
            };
            self.run_query(event.name, filter)
        });

        let (transfer, events) = join(
            self.run_query(TRANSFER.name, transfer_filter),
            join_all(event_queries),
        )
        .await;

        let mut outcomes = Vec::with_capacity(1 + UBI_EVENTS.len());
        let mut pending = Vec::new();

        let (outcome, logs) = transfer;
        outcomes.push(outcome);
        pending.extend(logs.into_iter().map(|log| PendingRecord {
            amount: decode_transfer_amount(&log),
            log,
            contract: ContractSet::UBI_PROXY_LABEL.to_string(),
            contract_address: proxy,
            method: UBI_CLAIM_METHOD.to_string(),
            activity_type: ActivityType::Transfer,
        }));

        for (event, (mut outcome, logs)) in UBI_EVENTS.iter().zip(events) {
            let kept: Vec<RawLog> = match event.wallet_filter {
                WalletFilter::IndexedFirst => logs,
                WalletFilter::AnyTopic => logs
                    .into_iter()
                    .filter(|log| log.has_topic(&wallet_topic))
                    .collect(),
            };
            outcome.logs = kept.len();
            outcomes.push(outcome);
            pending.extend(kept.into_iter().map(|log| PendingRecord {
                amount: decode_event_amount(&log),
                log,
                contract: ContractSet::UBI_PROXY_LABEL.to_string(),
                contract_address: proxy,
                method: event.method_label(),
                activity_type: event.activity_type,
            }));
        }

        let activities = self.finish(pending, range).await;
        tracing::info!(
            wallet = %wallet.short(),
            activities = activities.len(),
            failed_queries = outcomes.iter().filter(|o| o.failed()).count(),
            "ubi activity aggregated"
        );
        Aggregation {
            activities,
            outcomes,
        }
    }

    /// Collects activity attributed to an arbitrary `contract`: G$
    /// transfers from it to the wallet, and named events on it with the
    /// wallet as first indexed parameter.
    ///
    /// The transfer query is skipped when `contract` is the token itself.
    pub async fn collect_contract_activity(
        &self,
        label: &str,
        contract: WalletAddress,
        wallet: &WalletAddress,
        range: BlockRange,
    ) -> Aggregation {
        if range.is_degraded() {
            tracing::warn!(contract = %contract.short(), "degraded block range, skipping log queries");
            return Aggregation::default();
        }

        let wallet_topic = wallet.topic();
        let mut outcomes = Vec::new();
        let mut pending = Vec::new();

        if contract != self.contracts.token {
            let filter = LogFilter::new(self.contracts.token, range.from, range.to)
                .topic(TRANSFER.topic)
                .topic(contract.topic())
                .topic(wallet_topic.clone());
            let (outcome, logs) = self.run_query(TRANSFER.name, filter).await;
            outcomes.push(outcome);
            pending.extend(logs.into_iter().map(|log| PendingRecord {
                amount: decode_transfer_amount(&log),
                log,
                contract: label.to_string(),
                contract_address: contract,
                method: TRANSFER_METHOD.to_string(),
                activity_type: ActivityType::Transfer,
            }));
        }

        let event_queries = UBI_EVENTS.iter().map(|event| {
            let filter = LogFilter::new(contract, range.from, range.to)
                .topic(event.topic)
                .topic(wallet_topic.clone());
            self.run_query(event.name, filter)
        });
        for (event, (outcome, logs)) in UBI_EVENTS.iter().zip(join_all(event_queries).await) {
            outcomes.push(outcome);
            pending.extend(logs.into_iter().map(|log| PendingRecord {
                amount: decode_event_amount(&log),
                log,
                contract: label.to_string(),
                contract_address: contract,
                method: raw_event_label(event),
                activity_type: ActivityType::Event,
            }));
        }

        let activities = self.finish(pending, range).await;
        Aggregation {
            activities,
            outcomes,
        }
    }

    async fn run_query(&self, name: &str, filter: LogFilter) -> (QueryOutcome, Vec<RawLog>) {
        match self.rpc.get_logs(&filter).await {
            Ok(logs) => {
                tracing::debug!(
                    query = name,
                    address = %filter.address.short(),
                    logs = logs.len(),
                    "log query succeeded"
                );
                let outcome = QueryOutcome {
                    query: name.to_string(),
                    logs: logs.len(),
                    error: None,
                };
                (outcome, logs)
            }
            Err(e) => {
                tracing::warn!(
                    query = name,
                    address = %filter.address.short(),
                    error = %e,
                    "log query failed, contributing no records"
                );
                let outcome = QueryOutcome {
                    query: name.to_string(),
                    logs: 0,
                    error: Some(e.to_string()),
                };
                (outcome, Vec::new())
            }
        }
    }

    async fn finish(&self, pending: Vec<PendingRecord>, range: BlockRange) -> Vec<ActivityRecord> {
        let (in_range, out_of_range): (Vec<_>, Vec<_>) = pending
            .into_iter()
            .partition(|p| range.contains(p.log.block()));
        if !out_of_range.is_empty() {
            tracing::debug!(
                dropped = out_of_range.len(),
                "dropped logs outside the requested range"
            );
        }

        let formatter = TimestampFormatter::new(self.rpc, self.clock);
        let times = formatter
            .describe_all(in_range.iter().map(|p| p.log.block()))
            .await;

        in_range
            .into_iter()
            .map(|p| {
                let block = p.log.block();
                ActivityRecord {
                    timestamp: times
                        .get(&block)
                        .cloned()
                        .unwrap_or_else(|| crate::chain::timestamp::block_label(block)),
                    tx_hash: p.log.tx_hash(),
                    block,
                    contract: p.contract,
                    contract_address: p.contract_address,
                    method: p.method,
                    status: ActivityRecord::STATUS_SUCCESS.to_string(),
                    amount: p.amount,
                    activity_type: p.activity_type,
                }
            })
            .collect()
    }
}

/// Lower-cased table name, underscores kept (e.g. `"ubi_claimed"`).
fn raw_event_label(event: &EventSignature) -> String {
    event.name.to_lowercase()
}
