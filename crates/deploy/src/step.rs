//! Deployment step and result types.

use std::{collections::BTreeMap, path::PathBuf, str::FromStr};

use alloy_core::primitives::{Address, B256};
use serde::{Deserialize, Serialize};

use crate::errors::DeployError;

/// A constructor argument: a literal value, or a reference to the output of
/// an earlier step in the plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ArgValue {
    /// An address literal, e.g. a treasury or wrapped-native token address.
    ///
    /// Kept as a string so that validation happens at resolution time,
    /// before any transaction is submitted.
    Address { value: String },
    /// An unsigned integer literal, e.g. a fee in tenths of a percent.
    Uint { value: u64 },
    /// The contract address deployed by an earlier step.
    AddressOf { step: String },
    /// A named auxiliary output of an earlier step.
    OutputOf { step: String, output: String },
}

/// A zero-argument read-only query run against a freshly deployed contract.
///
/// The raw return bytes are hex-encoded into the step's auxiliary outputs
/// under `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepQuery {
    /// Name under which the result is recorded (and referenced by later steps).
    pub name: String,
    /// Solidity function signature, e.g. `pairCodeHash()`.
    pub signature: String,
}

/// One contract instantiation in a deployment plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStep {
    /// Unique name of this step within the plan.
    pub name: String,
    /// Display name of the compiled contract.
    pub contract: String,
    /// Path to the compiled bytecode (`.bin` hex or artifact JSON).
    pub artifact: PathBuf,
    /// Ordered constructor arguments.
    pub constructor_args: Vec<ArgValue>,
    /// Read-only queries to run once the contract is deployed.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub queries: Vec<StepQuery>,
}

/// Outcome of a single executed deployment step.
///
/// Results are held in process memory for the duration of a run and are
/// never persisted.
#[derive(Debug, Clone)]
pub struct DeploymentResult {
    /// Name of the step that produced this result.
    pub step_name: String,
    /// Address of the deployed contract.
    pub contract_address: Address,
    /// Hash of the contract-creation transaction.
    pub transaction_hash: B256,
    /// Block in which the deployment was mined.
    pub block_number: u64,
    /// Named auxiliary outputs, hex-encoded (e.g. a derived pair code hash).
    pub auxiliary_outputs: BTreeMap<String, String>,
}

/// Parse and validate an address literal.
pub fn parse_address(value: &str) -> Result<Address, DeployError> {
    Address::from_str(value).map_err(|_| {
        DeployError::ArgumentValidation(format!(
            "malformed address literal '{}': expected 0x-prefixed 40 hex chars",
            value
        ))
    })
}
