//! Concrete [`NetworkContext`] over Ethereum JSON-RPC.
//!
//! Transactions are submitted with `eth_sendTransaction` from an account
//! managed by the node, so no local key handling happens here. Confirmation
//! polls `eth_getTransactionReceipt` on a fixed interval under an overall
//! timeout, then checks the receipt status and that code is present at the
//! deployed address.

use std::{
    str::FromStr,
    time::{Duration, Instant},
};

use alloy_core::primitives::{Address, B256, Bytes};
use serde::Deserialize;
use url::Url;

use crate::{
    context::{Confirmation, NetworkContext, PendingDeployment},
    errors::DeployError,
    rpc,
};

/// Default overall timeout when waiting for a deployment to be confirmed.
const DEFAULT_CONFIRM_TIMEOUT: Duration = Duration::from_secs(180);

/// Default interval between receipt polling attempts.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// Transaction receipt fields used for confirmation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TransactionReceipt {
    contract_address: Option<String>,
    status: Option<String>,
    block_number: String,
}

/// A [`NetworkContext`] backed by an Ethereum JSON-RPC endpoint and a
/// node-managed deployer account.
pub struct EthContext {
    client: reqwest::Client,
    rpc_url: Url,
    from: Address,
    confirm_timeout: Duration,
    poll_interval: Duration,
}

impl EthContext {
    /// Create a context for the given endpoint and deployer account address.
    pub fn new(rpc_url: &str, from: &str) -> Result<Self, DeployError> {
        let rpc_url = Url::parse(rpc_url)
            .map_err(|e| DeployError::ClientInitialization(format!("invalid RPC URL: {}", e)))?;
        let from = Address::from_str(from).map_err(|e| {
            DeployError::ClientInitialization(format!("invalid deployer address '{}': {}", from, e))
        })?;
        let client = rpc::create_client()?;

        Ok(Self {
            client,
            rpc_url,
            from,
            confirm_timeout: DEFAULT_CONFIRM_TIMEOUT,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Override the overall confirmation timeout.
    pub fn with_confirm_timeout(mut self, timeout: Duration) -> Self {
        self.confirm_timeout = timeout;
        self
    }

    /// Override the receipt polling interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// The deployer account this context submits transactions from.
    pub fn from_address(&self) -> Address {
        self.from
    }

    /// Query the endpoint's chain id (`eth_chainId`).
    pub async fn chain_id(&self) -> Result<u64, DeployError> {
        let result: String = rpc::json_rpc_call(
            &self.client,
            self.rpc_url.as_str(),
            "eth_chainId",
            vec![],
        )
        .await?;
        rpc::parse_hex_u64(&result)
    }

    async fn fetch_receipt(
        &self,
        transaction_hash: B256,
    ) -> Result<Option<TransactionReceipt>, DeployError> {
        rpc::json_rpc_call(
            &self.client,
            self.rpc_url.as_str(),
            "eth_getTransactionReceipt",
            vec![serde_json::json!(format!("{:#x}", transaction_hash))],
        )
        .await
    }

    async fn code_at(&self, address: Address) -> Result<String, DeployError> {
        rpc::json_rpc_call(
            &self.client,
            self.rpc_url.as_str(),
            "eth_getCode",
            vec![
                serde_json::json!(format!("{:#x}", address)),
                serde_json::json!("latest"),
            ],
        )
        .await
    }
}

impl NetworkContext for EthContext {
    async fn deploy_contract(
        &self,
        bytecode: Bytes,
        constructor_args: Bytes,
    ) -> Result<PendingDeployment, DeployError> {
        let mut data = bytecode.to_vec();
        data.extend_from_slice(&constructor_args);

        let tx_hash: String = rpc::json_rpc_call(
            &self.client,
            self.rpc_url.as_str(),
            "eth_sendTransaction",
            vec![serde_json::json!({
                "from": format!("{:#x}", self.from),
                "data": format!("0x{}", hex::encode(&data)),
            })],
        )
        .await
        .map_err(|e| DeployError::Submission(e.to_string()))?;

        let transaction_hash = B256::from_str(&tx_hash).map_err(|e| {
            DeployError::Submission(format!("invalid transaction hash '{}': {}", tx_hash, e))
        })?;

        Ok(PendingDeployment { transaction_hash })
    }

    async fn await_confirmation(
        &self,
        pending: PendingDeployment,
    ) -> Result<Confirmation, DeployError> {
        let started = Instant::now();

        loop {
            if started.elapsed() > self.confirm_timeout {
                return Err(DeployError::Confirmation(format!(
                    "timed out after {}s waiting for transaction {:#x}",
                    self.confirm_timeout.as_secs(),
                    pending.transaction_hash
                )));
            }

            let receipt = self
                .fetch_receipt(pending.transaction_hash)
                .await
                .map_err(|e| DeployError::Confirmation(e.to_string()))?;

            if let Some(receipt) = receipt {
                return self.check_receipt(pending, receipt).await;
            }

            tracing::trace!(
                tx = %pending.transaction_hash,
                "Receipt not yet available, retrying..."
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn call(&self, address: Address, calldata: Bytes) -> Result<Bytes, DeployError> {
        let result: String = rpc::json_rpc_call(
            &self.client,
            self.rpc_url.as_str(),
            "eth_call",
            vec![
                serde_json::json!({
                    "to": format!("{:#x}", address),
                    "data": format!("0x{}", hex::encode(&calldata)),
                }),
                serde_json::json!("latest"),
            ],
        )
        .await
        .map_err(|e| DeployError::ContractQuery(e.to_string()))?;

        let bytes = hex::decode(result.trim_start_matches("0x"))
            .map_err(|e| DeployError::ContractQuery(format!("invalid call result: {}", e)))?;

        Ok(Bytes::from(bytes))
    }
}

impl EthContext {
    /// Turn a mined receipt into a [`Confirmation`], verifying the status
    /// and that the deployed address actually carries code.
    async fn check_receipt(
        &self,
        pending: PendingDeployment,
        receipt: TransactionReceipt,
    ) -> Result<Confirmation, DeployError> {
        if receipt.status.as_deref() != Some("0x1") {
            return Err(DeployError::Confirmation(format!(
                "transaction {:#x} reverted",
                pending.transaction_hash
            )));
        }

        let address_hex = receipt.contract_address.ok_or_else(|| {
            DeployError::Confirmation(format!(
                "receipt for {:#x} carries no contract address",
                pending.transaction_hash
            ))
        })?;
        let address = Address::from_str(&address_hex).map_err(|e| {
            DeployError::Confirmation(format!("invalid contract address '{}': {}", address_hex, e))
        })?;

        let code = self
            .code_at(address)
            .await
            .map_err(|e| DeployError::Confirmation(e.to_string()))?;
        if code.trim_start_matches("0x").is_empty() {
            return Err(DeployError::Confirmation(format!(
                "no code at deployed address {:#x}",
                address
            )));
        }

        Ok(Confirmation {
            address,
            block_number: rpc::parse_hex_u64(&receipt.block_number)
                .map_err(|e| DeployError::Confirmation(e.to_string()))?,
            transaction_hash: pending.transaction_hash,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_receipt_deserialization() {
        let receipt: TransactionReceipt = serde_json::from_str(
            r#"{
                "transactionHash": "0x0101010101010101010101010101010101010101010101010101010101010101",
                "contractAddress": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                "status": "0x1",
                "blockNumber": "0x2a",
                "gasUsed": "0x5208"
            }"#,
        )
        .unwrap();

        assert_eq!(receipt.status.as_deref(), Some("0x1"));
        assert_eq!(
            receipt.contract_address.as_deref(),
            Some("0x5fbdb2315678afecb367f032d93f642f64180aa3")
        );
        assert_eq!(receipt.block_number, "0x2a");
    }

    #[test]
    fn test_pending_receipt_is_none() {
        let receipt: Option<TransactionReceipt> = serde_json::from_str("null").unwrap();
        assert!(receipt.is_none());
    }

    #[test]
    fn test_new_rejects_bad_inputs() {
        assert!(matches!(
            EthContext::new("not a url", "0x0000000000000000000000000000000000000001"),
            Err(DeployError::ClientInitialization(_))
        ));
        assert!(matches!(
            EthContext::new("http://localhost:8545", "0x1234"),
            Err(DeployError::ClientInitialization(_))
        ));
    }
}
