//! Converts a "look back N hours" window into a concrete block range.

use super::rpc::ChainRpc;

/// Celo produces a block roughly every 5 seconds.
pub const DEFAULT_BLOCKS_PER_HOUR: u64 = 720;

/// Inclusive block range scanned by one verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockRange {
    /// First block, inclusive.
    pub from: u64,
    /// Last block (chain head at resolution time), inclusive.
    pub to: u64,
}

impl BlockRange {
    /// The range produced when the head could not be read.
    pub const DEGRADED: Self = Self { from: 0, to: 0 };

    /// `true` when the head query failed and the range is meaningless.
    #[must_use]
    pub const fn is_degraded(&self) -> bool {
        self.to == 0
    }

    /// Whether `block` lies inside the range.
    #[must_use]
    pub const fn contains(&self, block: u64) -> bool {
        block >= self.from && block <= self.to
    }
}

/// Resolves lookback windows against the live chain head.
#[derive(Debug, Clone, Copy)]
pub struct BlockRangeResolver {
    blocks_per_hour: u64,
}

impl BlockRangeResolver {
    /// Creates a resolver with a fixed blocks-per-hour rate.
    #[must_use]
    pub const fn new(blocks_per_hour: u64) -> Self {
        Self { blocks_per_hour }
    }

    /// Configured blocks-per-hour rate.
    #[must_use]
    pub const fn blocks_per_hour(&self) -> u64 {
        self.blocks_per_hour
    }

    /// Returns `[head - hours * blocks_per_hour, head]`.
    ///
    /// Never fails: if the head cannot be read the
    /// [`BlockRange::DEGRADED`] range is returned and callers treat it as
    /// "nothing found".
    pub async fn resolve<R: ChainRpc>(&self, rpc: &R, hours: u64) -> BlockRange {
        let head = match rpc.block_number().await {
            Ok(head) => head,
            Err(e) => {
                tracing::warn!(error = %e, "failed to read chain head, using degraded range");
                0
            }
        };
        let span = hours.saturating_mul(self.blocks_per_hour);
        let range = BlockRange {
            from: head.saturating_sub(span),
            to: head,
        };
        tracing::debug!(from = range.from, to = range.to, hours, "resolved block range");
        range
    }
}

impl Default for BlockRangeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_BLOCKS_PER_HOUR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chain::mock::MockChain;

    #[tokio::test]
    async fn range_spans_hours_back_from_head() {
        let chain = MockChain::new().with_head(100_000);
        let range = BlockRangeResolver::default().resolve(&chain, 48).await;
        assert_eq!(range, BlockRange { from: 100_000 - 48 * 720, to: 100_000 });
        assert!(!range.is_degraded());
    }

    #[tokio::test]
    async fn young_chain_saturates_at_genesis() {
        let chain = MockChain::new().with_head(500);
        let range = BlockRangeResolver::new(720).resolve(&chain, 1).await;
        assert_eq!(range, BlockRange { from: 0, to: 500 });
    }

    #[tokio::test]
    async fn failed_head_query_degrades() {
        let chain = MockChain::new();
        let range = BlockRangeResolver::default().resolve(&chain, 48).await;
        assert_eq!(range, BlockRange::DEGRADED);
        assert!(range.is_degraded());
        assert_eq!(chain.head_queries(), 1);
    }

    #[test]
    fn contains_is_inclusive() {
        let range = BlockRange { from: 10, to: 20 };
        assert!(range.contains(10));
        assert!(range.contains(20));
        assert!(!range.contains(9));
        assert!(!range.contains(21));
    }
}
