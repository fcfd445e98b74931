//! Typed helpers for common Ethereum calls

use super::ProviderManager;
use crate::core::types::{RpcCall, parse_hex_quantity, parse_hex_u128};
use crate::utils::error::{GatewayError, Result};
use serde_json::{Value, json};

const LATEST: &str = "latest";

fn not_a_quantity(method: &str, value: &Value) -> GatewayError {
    GatewayError::internal(format!("{method} returned a non-quantity result: {value}"))
}

fn quantity(method: &str, value: &Value) -> Result<u64> {
    parse_hex_quantity(value).ok_or_else(|| not_a_quantity(method, value))
}

fn data(method: &str, value: Value) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(GatewayError::internal(format!(
            "{method} returned a non-string result: {other}"
        ))),
    }
}

/// `null` means the node does not know the object yet
fn optional(value: Value) -> Option<Value> {
    if value.is_null() { None } else { Some(value) }
}

impl ProviderManager {
    /// Balance in wei at `block` (default `latest`)
    pub async fn get_balance(&self, address: &str, block: Option<&str>) -> Result<u128> {
        let call = RpcCall::new(
            "eth_getBalance",
            vec![json!(address), json!(block.unwrap_or(LATEST))],
        );
        let value = self.request(&call).await?;
        parse_hex_u128(&value).ok_or_else(|| not_a_quantity(&call.method, &value))
    }

    pub async fn get_transaction_count(&self, address: &str, block: Option<&str>) -> Result<u64> {
        let call = RpcCall::new(
            "eth_getTransactionCount",
            vec![json!(address), json!(block.unwrap_or(LATEST))],
        );
        quantity(&call.method, &self.request(&call).await?)
    }

    /// Gas price in wei
    pub async fn get_gas_price(&self) -> Result<u64> {
        let call = RpcCall::without_params("eth_gasPrice");
        quantity(&call.method, &self.request(&call).await?)
    }

    pub async fn get_block_number(&self) -> Result<u64> {
        let call = RpcCall::without_params("eth_blockNumber");
        quantity(&call.method, &self.request(&call).await?)
    }

    pub async fn get_chain_id(&self) -> Result<u64> {
        let call = RpcCall::without_params("eth_chainId");
        quantity(&call.method, &self.request(&call).await?)
    }

    pub async fn estimate_gas(&self, transaction: Value) -> Result<u64> {
        let call = RpcCall::new("eth_estimateGas", vec![transaction]);
        quantity(&call.method, &self.request(&call).await?)
    }

    /// Deployed bytecode, `0x` for accounts without code
    pub async fn get_code(&self, address: &str, block: Option<&str>) -> Result<String> {
        let call = RpcCall::new(
            "eth_getCode",
            vec![json!(address), json!(block.unwrap_or(LATEST))],
        );
        data(&call.method, self.request(&call).await?)
    }

    /// Read-only contract call returning the raw return data
    pub async fn call(&self, transaction: Value, block: Option<&str>) -> Result<String> {
        let call = RpcCall::new("eth_call", vec![transaction, json!(block.unwrap_or(LATEST))]);
        data(&call.method, self.request(&call).await?)
    }

    /// Submit a transaction for the node to sign, returning its hash
    pub async fn send_transaction(&self, transaction: Value) -> Result<String> {
        let call = RpcCall::new("eth_sendTransaction", vec![transaction]);
        data(&call.method, self.request(&call).await?)
    }

    /// Broadcast a signed transaction, returning its hash
    pub async fn send_raw_transaction(&self, raw: &str) -> Result<String> {
        let call = RpcCall::new("eth_sendRawTransaction", vec![json!(raw)]);
        data(&call.method, self.request(&call).await?)
    }

    pub async fn get_transaction(&self, hash: &str) -> Result<Option<Value>> {
        let call = RpcCall::new("eth_getTransactionByHash", vec![json!(hash)]);
        Ok(optional(self.request(&call).await?))
    }

    pub async fn get_transaction_receipt(&self, hash: &str) -> Result<Option<Value>> {
        let call = RpcCall::new("eth_getTransactionReceipt", vec![json!(hash)]);
        Ok(optional(self.request(&call).await?))
    }
}
