//! Chain access layer: JSON-RPC client, log models, block ranges, and
//! block time formatting.

pub mod block_range;
pub mod hex;
pub mod log;
pub mod rpc;
pub mod timestamp;

#[cfg(test)]
pub(crate) mod mock;

pub use block_range::{BlockRange, BlockRangeResolver};
pub use log::{LogFilter, RawLog};
pub use rpc::{ChainRpc, JsonRpcClient};
pub use timestamp::TimestampFormatter;
