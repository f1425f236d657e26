//! Human-readable block times.
//!
//! Each description costs one `eth_getBlockByNumber` call. Lookups never
//! fail: any error falls back to `"Block #N"`.

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use futures_util::future::join_all;

use super::rpc::ChainRpc;
use crate::domain::Clock;

const SECONDS_PER_HOUR: i64 = 3600;
const SECONDS_PER_DAY: i64 = 86_400;

/// Absolute time layout, e.g. `Mar 04 2025 14:05:09 PM (+00:00 UTC)`.
const EXACT_FORMAT: &str = "%b %d %Y %H:%M:%S %p (+00:00 UTC)";

/// Fallback label when the block time is unavailable.
#[must_use]
pub fn block_label(block: u64) -> String {
    format!("Block #{block}")
}

/// `"{relative} | {exact}"` for a block mined at `block_time`.
///
/// Relative is whole days when at least one day has passed, otherwise
/// whole hours when the remainder exceeds an hour, otherwise minutes.
/// Block times in the future count as zero elapsed.
#[must_use]
pub fn describe_elapsed(block_time: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - block_time).num_seconds().max(0);
    let days = elapsed / SECONDS_PER_DAY;
    let remainder = elapsed % SECONDS_PER_DAY;

    let relative = if days > 0 {
        format!("{days}d ago")
    } else if remainder > SECONDS_PER_HOUR {
        format!("{}h ago", remainder / SECONDS_PER_HOUR)
    } else {
        format!("{}m ago", remainder / 60)
    };

    format!("{relative} | {}", block_time.format(EXACT_FORMAT))
}

/// Describes block times relative to a [`Clock`].
#[derive(Debug)]
pub struct TimestampFormatter<'a, R> {
    rpc: &'a R,
    clock: &'a dyn Clock,
}

impl<'a, R: ChainRpc> TimestampFormatter<'a, R> {
    /// Creates a formatter over `rpc`.
    #[must_use]
    pub fn new(rpc: &'a R, clock: &'a dyn Clock) -> Self {
        Self { rpc, clock }
    }

    /// Describes one block.
    pub async fn describe(&self, block: u64) -> String {
        let unix = match self.rpc.block_timestamp(block).await {
            Ok(unix) => unix,
            Err(e) => {
                tracing::debug!(block, error = %e, "block time unavailable");
                return block_label(block);
            }
        };
        i64::try_from(unix)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
            .map_or_else(
                || block_label(block),
                |block_time| describe_elapsed(block_time, self.clock.now()),
            )
    }

    /// Describes each distinct block once, concurrently.
    pub async fn describe_all(&self, blocks: impl IntoIterator<Item = u64>) -> HashMap<u64, String> {
        let unique: BTreeSet<u64> = blocks.into_iter().collect();
        let descriptions = join_all(unique.iter().map(|&block| self.describe(block))).await;
        unique.into_iter().zip(descriptions).collect()
    }
}
