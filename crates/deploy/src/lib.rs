//! swapkit-deploy - Sequential contract deployment pipeline.
//!
//! This crate deploys an ordered sequence of already-compiled contracts,
//! wiring each step's constructor arguments to the outputs of the steps
//! before it and waiting for on-chain confirmation between steps.

pub mod abi;
pub mod artifact;
mod context;
mod errors;
mod eth;
pub mod pipeline;
mod plan;
pub mod rpc;
mod step;

pub use context::{Confirmation, NetworkContext, PendingDeployment};
pub use errors::DeployError;
pub use eth::EthContext;
pub use pipeline::{LogObserver, PipelineObserver, run};
pub use plan::{DeploymentPlan, PLAN_FILENAME, SuiteParams, suite_plan};
pub use step::{ArgValue, DeploymentResult, DeploymentStep, StepQuery};
