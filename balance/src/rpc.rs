//! Read-only ledger access: JSON-RPC `eth_call` and ERC-20 `balanceOf`.

use async_trait::async_trait;
use govdash_types::{TokenBalance, ValidationError, WalletAddress};
use serde::Deserialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use crate::error::BalanceError;
use crate::source::BalanceSource;

/// `keccak256("balanceOf(address)")[..4]`.
const BALANCE_OF_SELECTOR: &str = "70a08231";

// ── EthRpcClient ────────────────────────────────────────────────────────

/// HTTP client for a ledger node's JSON-RPC endpoint.
///
/// Holds no keys and exposes only calls that read state. One instance is
/// shared (behind an `Arc`) by every token contract the dashboard queries.
pub struct EthRpcClient {
    http: reqwest::Client,
    rpc_url: String,
    next_id: AtomicU64,
}

impl EthRpcClient {
    /// Create a client targeting the given endpoint (e.g. `https://cloudflare-eth.com`).
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self, BalanceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| BalanceError::Rpc(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            http,
            rpc_url: rpc_url.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }

    /// Execute a read-only contract call against the latest block and return
    /// the raw hex return data.
    pub async fn eth_call(&self, to: &str, data: &str) -> Result<String, BalanceError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = serde_json::json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "eth_call",
            "params": [{ "to": to, "data": data }, "latest"],
        });

        tracing::trace!(to, id, "eth_call");

        let response = self
            .http
            .post(&self.rpc_url)
            .json(&body)
            .send()
            .await
            .map_err(|e| BalanceError::Rpc(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(BalanceError::Rpc(format!(
                "node returned HTTP {}",
                response.status()
            )));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BalanceError::Rpc(format!("invalid JSON response: {e}")))?;

        parse_rpc_result(json)
    }
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
}

#[derive(Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// Extract the `result` string of a JSON-RPC 2.0 response.
fn parse_rpc_result(json: serde_json::Value) -> Result<String, BalanceError> {
    let response: RpcResponse = serde_json::from_value(json)
        .map_err(|e| ValidationError::malformed("JSON-RPC response", e))?;

    if let Some(err) = response.error {
        return Err(BalanceError::Node {
            code: err.code,
            message: err.message,
        });
    }

    response.result.ok_or_else(|| {
        ValidationError::MissingField {
            what: "JSON-RPC response",
            field: "result",
        }
        .into()
    })
}

/// ABI-encode `balanceOf(owner)` call data.
fn encode_balance_of(owner: &WalletAddress) -> Result<String, ValidationError> {
    let digits = owner
        .as_str()
        .strip_prefix("0x")
        .ok_or_else(|| ValidationError::InvalidAddress(owner.to_string()))?;
    let bytes =
        hex::decode(digits).map_err(|_| ValidationError::InvalidAddress(owner.to_string()))?;
    if bytes.len() != 20 {
        return Err(ValidationError::InvalidAddress(owner.to_string()));
    }
    // Address words are left-padded to 32 bytes.
    Ok(format!("0x{BALANCE_OF_SELECTOR}{:0>64}", hex::encode(bytes)))
}

// ── Erc20Balance ────────────────────────────────────────────────────────

/// One ERC-20 token contract, queried through a shared [`EthRpcClient`].
pub struct Erc20Balance {
    client: Arc<EthRpcClient>,
    contract: String,
}

impl Erc20Balance {
    pub fn new(client: Arc<EthRpcClient>, contract: impl AsRef<str>) -> Self {
        Self {
            client,
            contract: contract.as_ref().to_ascii_lowercase(),
        }
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }
}

#[async_trait]
impl BalanceSource for Erc20Balance {
    fn label(&self) -> &str {
        &self.contract
    }

    async fn balance_of(&self, owner: &WalletAddress) -> Result<TokenBalance, BalanceError> {
        let data = encode_balance_of(owner)?;
        let returned = self.client.eth_call(&self.contract, &data).await?;
        if returned == "0x" {
            return Err(BalanceError::EmptyReturn(self.contract.clone()));
        }
        TokenBalance::from_hex(&returned)
            .ok_or_else(|| ValidationError::InvalidQuantity(returned).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_balance_of_call() {
        let owner = WalletAddress::new("0x00000000000000000000000000000000DeaDBeef");
        let data = encode_balance_of(&owner).unwrap();
        assert_eq!(
            data,
            "0x70a0823100000000000000000000000000000000000000000000000000000000deadbeef"
        );
        assert_eq!(data.len(), 2 + 8 + 64);
    }

    #[test]
    fn rejects_addresses_that_cannot_be_encoded() {
        for bad in ["deadbeef", "0x1234", "0xzz00000000000000000000000000000000000000", "0x"] {
            let err = encode_balance_of(&WalletAddress::new(bad)).unwrap_err();
            assert!(matches!(err, ValidationError::InvalidAddress(_)), "{bad}");
        }
    }

    #[test]
    fn parses_rpc_result() {
        let json = serde_json::json!({ "jsonrpc": "2.0", "id": 1, "result": "0x2a" });
        assert_eq!(parse_rpc_result(json).unwrap(), "0x2a");
    }

    #[test]
    fn surfaces_node_errors() {
        let json = serde_json::json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32000, "message": "execution reverted" }
        });
        match parse_rpc_result(json) {
            Err(BalanceError::Node { code, message }) => {
                assert_eq!(code, -32000);
                assert_eq!(message, "execution reverted");
            }
            other => panic!("expected node error, got {other:?}"),
        }
    }

    #[test]
    fn missing_result_is_a_validation_error() {
        let json = serde_json::json!({ "jsonrpc": "2.0", "id": 1 });
        assert!(matches!(
            parse_rpc_result(json),
            Err(BalanceError::Validation(ValidationError::MissingField { .. }))
        ));
        assert!(matches!(
            parse_rpc_result(serde_json::json!([1, 2])),
            Err(BalanceError::Validation(ValidationError::Malformed { .. }))
        ));
    }

    #[test]
    fn client_keeps_its_endpoint() {
        let client = EthRpcClient::new("http://127.0.0.1:8545", Duration::from_secs(5)).unwrap();
        assert_eq!(client.rpc_url(), "http://127.0.0.1:8545");
        let token = Erc20Balance::new(Arc::new(client), "0xABCD");
        assert_eq!(token.contract(), "0xabcd");
        assert_eq!(token.label(), "0xabcd");
    }
}
