//! JSON-RPC access to the chain.
//!
//! [`ChainRpc`] is the network seam of the verifier: every outbound call
//! goes through it, so tests can substitute a counting in-memory node.
//! [`JsonRpcClient`] is the production implementation over `reqwest`.

use std::future::Future;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Deserialize;
use serde_json::{Value, json};

use super::hex::{format_block_tag, parse_hex_u64};
use super::log::{LogFilter, RawLog};
use crate::domain::WalletAddress;
use crate::error::GatewayError;

/// Default timeout for head, block, storage, and call requests.
pub const DEFAULT_RPC_TIMEOUT: Duration = Duration::from_secs(10);

/// Default timeout for `eth_getLogs` requests.
pub const DEFAULT_LOG_QUERY_TIMEOUT: Duration = Duration::from_secs(15);

/// Read-only chain access used by the verifier.
///
/// # Errors
///
/// Every method returns [`GatewayError::Rpc`] on transport failure, timeout
/// or a node-reported error, and [`GatewayError::Decode`] when the result
/// has an unexpected shape.
pub trait ChainRpc: Send + Sync {
    /// `eth_blockNumber`.
    fn block_number(&self) -> impl Future<Output = Result<u64, GatewayError>> + Send;

    /// `eth_getLogs` for one filter.
    fn get_logs(
        &self,
        filter: &LogFilter,
    ) -> impl Future<Output = Result<Vec<RawLog>, GatewayError>> + Send;

    /// Unix timestamp (seconds) of `block` via `eth_getBlockByNumber`.
    fn block_timestamp(&self, block: u64)
    -> impl Future<Output = Result<u64, GatewayError>> + Send;

    /// `eth_getStorageAt(address, slot, "latest")`, returned as a hex word.
    fn storage_at(
        &self,
        address: &WalletAddress,
        slot: &str,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;

    /// `eth_call({to, data}, "latest")`, returned as hex return data.
    fn call(
        &self,
        to: &WalletAddress,
        data: &str,
    ) -> impl Future<Output = Result<String, GatewayError>> + Send;
}

#[derive(Debug, Deserialize)]
struct RpcErrorObject {
    #[serde(default)]
    code: i64,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// `reqwest`-backed JSON-RPC 2.0 client.
#[derive(Debug)]
pub struct JsonRpcClient {
    rpc_url: String,
    client: reqwest::Client,
    rpc_timeout: Duration,
    log_timeout: Duration,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    /// Creates a client with default timeouts.
    #[must_use]
    pub fn new(rpc_url: &str) -> Self {
        Self::with_timeouts(rpc_url, DEFAULT_RPC_TIMEOUT, DEFAULT_LOG_QUERY_TIMEOUT)
    }

    /// Creates a client with explicit timeouts.
    #[must_use]
    pub fn with_timeouts(rpc_url: &str, rpc_timeout: Duration, log_timeout: Duration) -> Self {
        Self {
            rpc_url: rpc_url.to_string(),
            client: reqwest::Client::new(),
            rpc_timeout,
            log_timeout,
            next_id: AtomicU64::new(1),
        }
    }

    /// Endpoint this client talks to.
    #[must_use]
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    async fn rpc_call(
        &self,
        method: &str,
        params: Value,
        timeout: Duration,
    ) -> Result<Value, GatewayError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": id,
        });

        let response = self
            .client
            .post(&self.rpc_url)
            .timeout(timeout)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let parsed: RpcResponse = response.json().await?;

        if let Some(error) = parsed.error {
            return Err(GatewayError::Rpc(format!(
                "{method} failed ({}): {}",
                error.code, error.message
            )));
        }

        parsed
            .result
            .ok_or_else(|| GatewayError::Decode(format!("{method}: missing result")))
    }
}

impl ChainRpc for JsonRpcClient {
    async fn block_number(&self) -> Result<u64, GatewayError> {
        let result = self
            .rpc_call("eth_blockNumber", json!([]), self.rpc_timeout)
            .await?;
        let hex = result
            .as_str()
            .ok_or_else(|| GatewayError::Decode("eth_blockNumber: not a string".to_string()))?;
        parse_hex_u64(hex)
    }

    async fn get_logs(&self, filter: &LogFilter) -> Result<Vec<RawLog>, GatewayError> {
        let result = self
            .rpc_call("eth_getLogs", json!([filter.to_json()]), self.log_timeout)
            .await?;
        serde_json::from_value(result)
            .map_err(|e| GatewayError::Decode(format!("eth_getLogs: {e}")))
    }

    async fn block_timestamp(&self, block: u64) -> Result<u64, GatewayError> {
        let result = self
            .rpc_call(
                "eth_getBlockByNumber",
                json!([format_block_tag(block), false]),
                self.rpc_timeout,
            )
            .await?;
        let timestamp = result
            .get("timestamp")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::Decode(format!("block {block}: missing timestamp")))?;
        parse_hex_u64(timestamp)
    }

    async fn storage_at(&self, address: &WalletAddress, slot: &str) -> Result<String, GatewayError> {
        let result = self
            .rpc_call(
                "eth_getStorageAt",
                json!([address.to_lower_hex(), slot, "latest"]),
                self.rpc_timeout,
            )
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::Decode("eth_getStorageAt: not a string".to_string()))
    }

    async fn call(&self, to: &WalletAddress, data: &str) -> Result<String, GatewayError> {
        let result = self
            .rpc_call(
                "eth_call",
                json!([{ "to": to.to_lower_hex(), "data": data }, "latest"]),
                self.rpc_timeout,
            )
            .await?;
        result
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| GatewayError::Decode("eth_call: not a string".to_string()))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn rpc_response_with_error_object() {
        let raw = json!({"jsonrpc": "2.0", "id": 1, "error": {"code": -32005, "message": "query returned more than 10000 results"}});
        let parsed: Result<RpcResponse, _> = serde_json::from_value(raw);
        let Ok(parsed) = parsed else {
            panic!("error envelope should deserialize");
        };
        assert!(parsed.result.is_none());
        assert_eq!(parsed.error.map(|e| e.code), Some(-32005));
    }

    #[test]
    fn client_keeps_url_and_timeouts() {
        let client = JsonRpcClient::with_timeouts(
            "https://forno.celo.org",
            Duration::from_secs(3),
            Duration::from_secs(4),
        );
        assert_eq!(client.rpc_url(), "https://forno.celo.org");
        assert_eq!(client.rpc_timeout, Duration::from_secs(3));
        assert_eq!(client.log_timeout, Duration::from_secs(4));
    }

    #[tokio::test]
    async fn unreachable_node_is_an_rpc_error() {
        let client = JsonRpcClient::with_timeouts(
            "http://127.0.0.1:9",
            Duration::from_millis(200),
            Duration::from_millis(200),
        );
        let result = client.block_number().await;
        assert!(matches!(result, Err(GatewayError::Rpc(_))));
    }
}
