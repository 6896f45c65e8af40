//! The sequential deployment engine.
//!
//! Steps execute strictly in order: each step's constructor arguments may
//! reference outputs of the steps before it, so at most one deployment is
//! ever in flight. On the first failure the run aborts immediately; steps
//! already executed stay deployed and their results have already been
//! emitted to the observer.

use std::collections::BTreeMap;

use alloy_core::primitives::{B256, Bytes};

use crate::{
    abi::{self, ResolvedArg},
    artifact,
    context::NetworkContext,
    errors::DeployError,
    step::{self, ArgValue, DeploymentResult, DeploymentStep},
};

/// Observer notified as the pipeline progresses.
///
/// Each result is emitted before the next step starts.
pub trait PipelineObserver {
    /// A step's arguments resolved; its deployment is about to be submitted.
    fn step_started(&self, _step: &DeploymentStep, _resolved: &[ResolvedArg]) {}

    /// A step completed and its result was recorded.
    fn step_completed(&self, _result: &DeploymentResult) {}
}

/// Observer that reports progress through tracing, one line per constructor
/// argument and per deployed contract.
pub struct LogObserver;

impl PipelineObserver for LogObserver {
    fn step_started(&self, step: &DeploymentStep, resolved: &[ResolvedArg]) {
        for (index, value) in resolved.iter().enumerate() {
            tracing::info!(step = %step.name, index, value = %value, "Constructor argument");
        }
        tracing::info!(
            step = %step.name,
            contract = %step.contract,
            "Deploying contract..."
        );
    }

    fn step_completed(&self, result: &DeploymentResult) {
        tracing::info!(
            step = %result.step_name,
            address = %result.contract_address,
            tx = %result.transaction_hash,
            block = result.block_number,
            "Contract deployed"
        );
        for (name, value) in &result.auxiliary_outputs {
            tracing::info!(step = %result.step_name, output = %name, value = %value, "Auxiliary output");
        }
    }
}

/// Run the given steps in order against a network context.
///
/// Produces exactly one [`DeploymentResult`] per step, in input order. Fails
/// with the first step error; the results of the steps completed before the
/// failure have already been passed to `observer`.
pub async fn run<C: NetworkContext>(
    steps: &[DeploymentStep],
    ctx: &C,
    observer: &dyn PipelineObserver,
) -> Result<Vec<DeploymentResult>, DeployError> {
    let mut results: Vec<DeploymentResult> = Vec::with_capacity(steps.len());

    for step in steps {
        // Resolution and artifact loading both happen before anything is
        // submitted, so a bad argument or artifact costs no transaction.
        let resolved = resolve_args(step, &results)?;
        let bytecode = artifact::load_bytecode(&step.artifact)?;

        observer.step_started(step, &resolved);

        let pending = ctx
            .deploy_contract(bytecode, abi::encode_args(&resolved))
            .await?;
        tracing::debug!(
            step = %step.name,
            tx = %pending.transaction_hash,
            "Deployment transaction submitted"
        );

        let confirmation = ctx.await_confirmation(pending).await?;

        let mut auxiliary_outputs = BTreeMap::new();
        for query in &step.queries {
            let calldata = Bytes::from(abi::selector(&query.signature).to_vec());
            let output = ctx.call(confirmation.address, calldata).await?;
            auxiliary_outputs.insert(query.name.clone(), format!("0x{}", hex::encode(&output)));
        }

        let result = DeploymentResult {
            step_name: step.name.clone(),
            contract_address: confirmation.address,
            transaction_hash: confirmation.transaction_hash,
            block_number: confirmation.block_number,
            auxiliary_outputs,
        };
        observer.step_completed(&result);
        results.push(result);
    }

    Ok(results)
}

/// Resolve a step's constructor arguments against the results accumulated
/// so far.
fn resolve_args(
    step: &DeploymentStep,
    results: &[DeploymentResult],
) -> Result<Vec<ResolvedArg>, DeployError> {
    step.constructor_args
        .iter()
        .map(|arg| resolve_arg(step, arg, results))
        .collect()
}

fn resolve_arg(
    step: &DeploymentStep,
    arg: &ArgValue,
    results: &[DeploymentResult],
) -> Result<ResolvedArg, DeployError> {
    match arg {
        ArgValue::Address { value } => step::parse_address(value).map(ResolvedArg::Address),
        ArgValue::Uint { value } => Ok(ResolvedArg::Uint(*value)),
        ArgValue::AddressOf { step: target } => results
            .iter()
            .find(|result| result.step_name == *target)
            .map(|result| ResolvedArg::Address(result.contract_address))
            .ok_or_else(|| DeployError::UnresolvedReference {
                step: step.name.clone(),
                reference: target.clone(),
            }),
        ArgValue::OutputOf {
            step: target,
            output,
        } => {
            let value = results
                .iter()
                .find(|result| result.step_name == *target)
                .and_then(|result| result.auxiliary_outputs.get(output))
                .ok_or_else(|| DeployError::UnresolvedReference {
                    step: step.name.clone(),
                    reference: format!("{}.{}", target, output),
                })?;

            let word = value
                .trim_start_matches("0x")
                .parse::<B256>()
                .map_err(|e| {
                    DeployError::ArgumentValidation(format!(
                        "output '{}.{}' is not a 32-byte word: {}",
                        target, output, e
                    ))
                })?;
            Ok(ResolvedArg::Word(word))
        }
    }
}
