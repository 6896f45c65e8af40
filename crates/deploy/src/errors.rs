//! Definitions of errors that can occur while running a deployment pipeline.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
};

/// Errors that can occur while running a deployment pipeline.
#[derive(Debug)]
pub enum DeployError {
    /// Error initializing the RPC client
    ClientInitialization(String),
    /// Error reading a deployment plan file
    ReadPlan(String),
    /// Error writing a deployment plan file
    WritePlan(String),
    /// Error loading a compiled contract artifact
    Artifact(String),
    /// Structurally invalid deployment plan (duplicate or empty step names)
    PlanValidation(String),
    /// Malformed constructor argument (e.g. a bad address literal)
    ArgumentValidation(String),
    /// A step referenced the output of a step that has not been deployed yet
    UnresolvedReference {
        /// The step whose argument could not be resolved.
        step: String,
        /// The referenced step or output.
        reference: String,
    },
    /// Error submitting a contract-creation transaction
    Submission(String),
    /// Deployment not confirmed (reverted, timed out, or no code on chain)
    Confirmation(String),
    /// Error performing a read-only call against a deployed contract
    ContractQuery(String),
    /// Transport-level JSON-RPC error
    Rpc(String),
}

impl Display for DeployError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            DeployError::ClientInitialization(s) => {
                write!(f, "error initializing the RPC client: {}", s)
            }
            DeployError::ReadPlan(s) => write!(f, "error reading deployment plan: {}", s),
            DeployError::WritePlan(s) => write!(f, "error writing deployment plan: {}", s),
            DeployError::Artifact(s) => write!(f, "error loading contract artifact: {}", s),
            DeployError::PlanValidation(s) => write!(f, "invalid deployment plan: {}", s),
            DeployError::ArgumentValidation(s) => {
                write!(f, "invalid constructor argument: {}", s)
            }
            DeployError::UnresolvedReference { step, reference } => write!(
                f,
                "step '{}' references '{}', which has not been deployed yet",
                step, reference
            ),
            DeployError::Submission(s) => {
                write!(f, "error submitting deployment transaction: {}", s)
            }
            DeployError::Confirmation(s) => write!(f, "deployment not confirmed: {}", s),
            DeployError::ContractQuery(s) => {
                write!(f, "error querying deployed contract: {}", s)
            }
            DeployError::Rpc(s) => write!(f, "rpc error: {}", s),
        }
    }
}

impl Error for DeployError {}
