//! In-memory chain used by unit tests, with per-method call counters.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use super::log::{LogFilter, RawLog};
use super::rpc::ChainRpc;
use crate::domain::WalletAddress;
use crate::error::GatewayError;

#[derive(Debug, Default)]
pub struct MockChain {
    head: Option<u64>,
    logs: Vec<(WalletAddress, RawLog)>,
    failing_topics: HashSet<String>,
    block_times: HashMap<u64, u64>,
    storage: Option<String>,
    call_result: Option<String>,
    head_calls: AtomicUsize,
    log_calls: AtomicUsize,
    block_calls: AtomicUsize,
    other_calls: AtomicUsize,
}

impl MockChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_head(mut self, head: u64) -> Self {
        self.head = Some(head);
        self
    }

    pub fn with_log(mut self, emitter: WalletAddress, log: RawLog) -> Self {
        self.logs.push((emitter, log));
        self
    }

    pub fn failing_topic(mut self, topic: &str) -> Self {
        self.failing_topics.insert(topic.to_lowercase());
        self
    }

    pub fn with_block_time(mut self, block: u64, unix: u64) -> Self {
        self.block_times.insert(block, unix);
        self
    }

    pub fn with_storage(mut self, word: &str) -> Self {
        self.storage = Some(word.to_string());
        self
    }

    pub fn with_call_result(mut self, data: &str) -> Self {
        self.call_result = Some(data.to_string());
        self
    }

    pub fn head_queries(&self) -> usize {
        self.head_calls.load(Ordering::SeqCst)
    }

    pub fn log_queries(&self) -> usize {
        self.log_calls.load(Ordering::SeqCst)
    }

    pub fn block_queries(&self) -> usize {
        self.block_calls.load(Ordering::SeqCst)
    }

    pub fn total_calls(&self) -> usize {
        self.head_queries()
            + self.log_queries()
            + self.block_queries()
            + self.other_calls.load(Ordering::SeqCst)
    }

    fn matches(filter: &LogFilter, emitter: &WalletAddress, log: &RawLog) -> bool {
        if *emitter != filter.address {
            return false;
        }
        let block = log.block();
        if block < filter.from_block || block > filter.to_block {
            return false;
        }
        filter.topics.iter().enumerate().all(|(i, wanted)| match wanted {
            None => true,
            Some(t) => log.topics.get(i).is_some_and(|have| have.eq_ignore_ascii_case(t)),
        })
    }
}

impl ChainRpc for MockChain {
    async fn block_number(&self) -> Result<u64, GatewayError> {
        self.head_calls.fetch_add(1, Ordering::SeqCst);
        self.head
            .ok_or_else(|| GatewayError::Rpc("request timed out".to_string()))
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<RawLog>, GatewayError> {
        self.log_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(topic) = filter.event_topic()
            && self.failing_topics.contains(&topic.to_lowercase())
        {
            return Err(GatewayError::Rpc("request timed out".to_string()));
        }
        Ok(self
            .logs
            .iter()
            .filter(|(emitter, log)| Self::matches(filter, emitter, log))
            .map(|(_, log)| log.clone())
            .collect())
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64, GatewayError> {
        self.block_calls.fetch_add(1, Ordering::SeqCst);
        self.block_times
            .get(&block)
            .copied()
            .ok_or_else(|| GatewayError::Decode(format!("block {block}: missing timestamp")))
    }

    async fn storage_at(&self, _address: &WalletAddress, _slot: &str) -> Result<String, GatewayError> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        self.storage
            .clone()
            .ok_or_else(|| GatewayError::Rpc("connection refused".to_string()))
    }

    async fn call(&self, _to: &WalletAddress, _data: &str) -> Result<String, GatewayError> {
        self.other_calls.fetch_add(1, Ordering::SeqCst);
        self.call_result
            .clone()
            .ok_or_else(|| GatewayError::Rpc("connection refused".to_string()))
    }
}
