//! Shared JSON-RPC utilities for interacting with Ethereum endpoints.

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::DeployError;

/// Default timeout for a single RPC request.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Create an HTTP client configured for JSON-RPC requests.
pub fn create_client() -> Result<reqwest::Client, DeployError> {
    reqwest::Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .build()
        .map_err(|e| DeployError::ClientInitialization(e.to_string()))
}

/// Make a JSON-RPC call and deserialize the result.
///
/// Returns an error if the request failed, the response carried an `error`
/// object, or the result did not deserialize to `T`.
pub async fn json_rpc_call<T: DeserializeOwned>(
    client: &reqwest::Client,
    url: &str,
    method: &str,
    params: Vec<Value>,
) -> Result<T, DeployError> {
    let response = client
        .post(url)
        .json(&serde_json::json!({
            "jsonrpc": "2.0",
            "method": method,
            "params": params,
            "id": 1
        }))
        .send()
        .await
        .map_err(|e| DeployError::Rpc(format!("failed to send {} request: {}", method, e)))?;

    let result: Value = response
        .json()
        .await
        .map_err(|e| DeployError::Rpc(format!("failed to parse {} response: {}", method, e)))?;

    if let Some(error) = result.get("error") {
        return Err(DeployError::Rpc(format!(
            "{} returned an error: {}",
            method,
            error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("unknown")
        )));
    }

    let result_value = result
        .get("result")
        .ok_or_else(|| DeployError::Rpc(format!("no result in {} response", method)))?
        .clone();

    serde_json::from_value(result_value)
        .map_err(|e| DeployError::Rpc(format!("failed to deserialize {} result: {}", method, e)))
}

/// Parse a 0x-prefixed hex quantity into a u64.
pub fn parse_hex_u64(value: &str) -> Result<u64, DeployError> {
    u64::from_str_radix(value.trim_start_matches("0x"), 16)
        .map_err(|e| DeployError::Rpc(format!("invalid hex quantity '{}': {}", value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_u64() {
        assert_eq!(parse_hex_u64("0x38").unwrap(), 56);
        assert_eq!(parse_hex_u64("0x61").unwrap(), 97);
        assert_eq!(parse_hex_u64("0x0").unwrap(), 0);
        assert_eq!(parse_hex_u64("38").unwrap(), 0x38);
    }

    #[test]
    fn test_parse_hex_u64_invalid() {
        assert!(parse_hex_u64("0xzz").is_err());
        assert!(parse_hex_u64("").is_err());
    }
}
