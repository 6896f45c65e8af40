//! The network context seam between the pipeline and a chain.
//!
//! The pipeline never talks to a chain directly. It goes through a
//! [`NetworkContext`], an injected collaborator that owns connectivity, the
//! deployer account, and the gas/nonce policy. The concrete implementation
//! used by the CLI is [`crate::EthContext`]; tests inject an in-memory one.

use std::future::Future;

use alloy_core::primitives::{Address, B256, Bytes};

use crate::errors::DeployError;

/// Handle to a submitted, not yet confirmed contract-creation transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingDeployment {
    /// Hash of the submitted transaction.
    pub transaction_hash: B256,
}

/// Outcome of a confirmed contract deployment.
#[derive(Debug, Clone)]
pub struct Confirmation {
    /// Address of the deployed contract.
    pub address: Address,
    /// Block in which the deployment was mined.
    pub block_number: u64,
    /// Hash of the contract-creation transaction.
    pub transaction_hash: B256,
}

/// Abstraction over a blockchain connection, signer, and transaction
/// submission/confirmation.
pub trait NetworkContext: Send + Sync {
    /// Submit a contract-creation transaction for the given bytecode with
    /// the ABI-encoded constructor arguments appended.
    fn deploy_contract(
        &self,
        bytecode: Bytes,
        constructor_args: Bytes,
    ) -> impl Future<Output = Result<PendingDeployment, DeployError>> + Send;

    /// Suspend until the deployment is confirmed: the transaction is mined
    /// and the contract's code is available on chain.
    ///
    /// Any confirmation timeout is enforced here, not by the pipeline.
    fn await_confirmation(
        &self,
        pending: PendingDeployment,
    ) -> impl Future<Output = Result<Confirmation, DeployError>> + Send;

    /// Perform a read-only call against a deployed contract, returning the
    /// raw result bytes.
    fn call(
        &self,
        address: Address,
        calldata: Bytes,
    ) -> impl Future<Output = Result<Bytes, DeployError>> + Send;
}
