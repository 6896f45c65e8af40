//! Deployment plans: an ordered step sequence bound to a target chain.
//!
//! The per-network differences of the swap suite live in a literal table
//! ([`SuiteParams`]), so one plan builder serves every network instead of a
//! copy of the control flow per network.

use std::{
    collections::{BTreeMap, HashSet},
    path::Path,
};

use serde::{Deserialize, Serialize};

use crate::{
    errors::DeployError,
    step::{self, ArgValue, DeploymentStep, StepQuery},
};

/// The default file name for a saved deployment plan.
pub const PLAN_FILENAME: &str = "Swapkit.toml";

/// An ordered sequence of deployment steps targeting one network.
///
/// Serializable to/from TOML so a plan can be inspected or edited before a
/// run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPlan {
    /// Human-readable network name, e.g. `bsc-testnet`.
    pub network: String,
    /// Chain id the plan is meant for; checked against the endpoint before
    /// anything is submitted.
    pub chain_id: u64,
    /// The steps, in deployment order.
    pub steps: Vec<DeploymentStep>,
}

impl DeploymentPlan {
    /// Save the plan to a TOML file.
    pub fn save_to_file(&self, path: &Path) -> Result<(), DeployError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DeployError::WritePlan(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| {
            DeployError::WritePlan(format!("failed to write {}: {}", path.display(), e))
        })?;
        tracing::info!(path = %path.display(), "Deployment plan saved");
        Ok(())
    }

    /// Load a plan from a TOML file, or from `Swapkit.toml` inside a
    /// directory.
    pub fn load_from_file(path: &Path) -> Result<Self, DeployError> {
        let plan_path = if path.is_dir() {
            path.join(PLAN_FILENAME)
        } else {
            path.to_path_buf()
        };

        let content = std::fs::read_to_string(&plan_path).map_err(|e| {
            DeployError::ReadPlan(format!("failed to read {}: {}", plan_path.display(), e))
        })?;
        let plan: Self =
            toml::from_str(&content).map_err(|e| DeployError::ReadPlan(e.to_string()))?;
        tracing::info!(path = %plan_path.display(), "Deployment plan loaded");
        Ok(plan)
    }

    /// Statically validate the plan: step names must be unique and
    /// non-empty, address literals must parse, and every reference must
    /// target a strictly earlier step (and, for outputs, one of its declared
    /// queries).
    pub fn validate(&self) -> Result<(), DeployError> {
        let mut earlier: BTreeMap<&str, &DeploymentStep> = BTreeMap::new();

        for step in &self.steps {
            if step.name.is_empty() {
                return Err(DeployError::PlanValidation(
                    "step with empty name".to_string(),
                ));
            }
            if earlier.contains_key(step.name.as_str()) {
                return Err(DeployError::PlanValidation(format!(
                    "duplicate step name '{}'",
                    step.name
                )));
            }

            let query_names: HashSet<&str> =
                step.queries.iter().map(|q| q.name.as_str()).collect();
            if query_names.len() != step.queries.len() {
                return Err(DeployError::PlanValidation(format!(
                    "step '{}' declares duplicate query names",
                    step.name
                )));
            }

            for arg in &step.constructor_args {
                match arg {
                    ArgValue::Address { value } => {
                        step::parse_address(value)?;
                    }
                    ArgValue::Uint { .. } => {}
                    ArgValue::AddressOf { step: target } => {
                        if !earlier.contains_key(target.as_str()) {
                            return Err(DeployError::UnresolvedReference {
                                step: step.name.clone(),
                                reference: target.clone(),
                            });
                        }
                    }
                    ArgValue::OutputOf {
                        step: target,
                        output,
                    } => {
                        let declared = earlier
                            .get(target.as_str())
                            .is_some_and(|t| t.queries.iter().any(|q| q.name == *output));
                        if !declared {
                            return Err(DeployError::UnresolvedReference {
                                step: step.name.clone(),
                                reference: format!("{}.{}", target, output),
                            });
                        }
                    }
                }
            }

            earlier.insert(&step.name, step);
        }

        Ok(())
    }
}

/// Per-network literal constructor values for the swap suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteParams {
    /// Account allowed to update the factory's fee recipient.
    pub fee_to_setter: String,
    /// Wrapped native token the router pairs against (WBNB).
    pub wrapped_native: String,
    /// Treasury receiving the management contract's fees.
    pub treasury: String,
    /// Swap fee in tenths of a percent (10 = 0.1%).
    pub swap_fee: u64,
    /// 0x-route swap fee in tenths of a percent (5 = 0.05%).
    pub swap_fee_0x: u64,
}

impl SuiteParams {
    /// Literal table for BNB Smart Chain mainnet.
    pub fn bsc_mainnet() -> Self {
        Self {
            fee_to_setter: "0xd078bd7bb85EC4F57340cE8C84ae647474AC12bf".to_string(),
            wrapped_native: "0xbb4cdb9cbd36b01bd1cbaebf2de08d9173bc095c".to_string(),
            treasury: "0xc227D09Cc73d4845871FA095A6C1Fa3c4b5b0fE1".to_string(),
            swap_fee: 10,
            swap_fee_0x: 5,
        }
    }

    /// Literal table for BNB Smart Chain testnet.
    pub fn bsc_testnet() -> Self {
        Self {
            fee_to_setter: "0x36285fDa2bE8a96fEb1d763CA77531D696Ae3B0b".to_string(),
            wrapped_native: "0xae13d989daC2f0dEbFf460aC112a837C89BAa7cd".to_string(),
            treasury: "0x821965C1fD8B60D4B33E23C5832E2A7662faAADC".to_string(),
            swap_fee: 10,
            swap_fee_0x: 5,
        }
    }
}

/// Build the three-step swap suite plan: factory, then router, then the
/// management contract, each wired to the address of the step before it.
pub fn suite_plan(
    network: &str,
    chain_id: u64,
    params: &SuiteParams,
    artifacts_dir: &Path,
) -> DeploymentPlan {
    let artifact = |contract: &str| artifacts_dir.join(format!("{}.json", contract));

    DeploymentPlan {
        network: network.to_string(),
        chain_id,
        steps: vec![
            DeploymentStep {
                name: "factory".to_string(),
                contract: "SwapFactory".to_string(),
                artifact: artifact("SwapFactory"),
                constructor_args: vec![ArgValue::Address {
                    value: params.fee_to_setter.clone(),
                }],
                queries: vec![StepQuery {
                    name: "pair_code_hash".to_string(),
                    signature: "pairCodeHash()".to_string(),
                }],
            },
            DeploymentStep {
                name: "router".to_string(),
                contract: "SwapRouter02".to_string(),
                artifact: artifact("SwapRouter02"),
                constructor_args: vec![
                    ArgValue::AddressOf {
                        step: "factory".to_string(),
                    },
                    ArgValue::Address {
                        value: params.wrapped_native.clone(),
                    },
                ],
                queries: vec![],
            },
            DeploymentStep {
                name: "management".to_string(),
                contract: "DexManagement".to_string(),
                artifact: artifact("DexManagement"),
                constructor_args: vec![
                    ArgValue::AddressOf {
                        step: "router".to_string(),
                    },
                    ArgValue::Address {
                        value: params.treasury.clone(),
                    },
                    ArgValue::Uint {
                        value: params.swap_fee,
                    },
                    ArgValue::Uint {
                        value: params.swap_fee_0x,
                    },
                ],
                queries: vec![],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn test_plan() -> DeploymentPlan {
        suite_plan(
            "bsc-testnet",
            97,
            &SuiteParams::bsc_testnet(),
            &PathBuf::from("artifacts"),
        )
    }

    #[test]
    fn test_suite_plan_shape() {
        let plan = test_plan();

        assert_eq!(plan.chain_id, 97);
        assert_eq!(plan.steps.len(), 3);
        assert_eq!(plan.steps[0].name, "factory");
        assert_eq!(plan.steps[1].name, "router");
        assert_eq!(plan.steps[2].name, "management");

        // Router's first argument is the factory address, management's first
        // is the router address.
        assert_eq!(
            plan.steps[1].constructor_args[0],
            ArgValue::AddressOf {
                step: "factory".to_string()
            }
        );
        assert_eq!(
            plan.steps[2].constructor_args[0],
            ArgValue::AddressOf {
                step: "router".to_string()
            }
        );
    }

    #[test]
    fn test_builtin_plans_validate() {
        test_plan().validate().unwrap();
        suite_plan(
            "bsc-mainnet",
            56,
            &SuiteParams::bsc_mainnet(),
            &PathBuf::from("artifacts"),
        )
        .validate()
        .unwrap();
    }

    #[test]
    fn test_plan_toml_round_trip() {
        let plan = test_plan();
        let toml = toml::to_string_pretty(&plan).unwrap();
        let back: DeploymentPlan = toml::from_str(&toml).unwrap();
        assert_eq!(back, plan);
    }

    #[test]
    fn test_validate_rejects_duplicate_step_names() {
        let mut plan = test_plan();
        plan.steps[1].name = "factory".to_string();

        assert!(matches!(
            plan.validate(),
            Err(DeployError::PlanValidation(_))
        ));
    }

    #[test]
    fn test_validate_rejects_forward_reference() {
        let mut plan = test_plan();
        // Factory referencing the router, which deploys after it.
        plan.steps[0].constructor_args = vec![ArgValue::AddressOf {
            step: "router".to_string(),
        }];

        assert!(matches!(
            plan.validate(),
            Err(DeployError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_query_output() {
        let mut plan = test_plan();
        plan.steps[1].constructor_args.push(ArgValue::OutputOf {
            step: "factory".to_string(),
            output: "no_such_output".to_string(),
        });

        assert!(matches!(
            plan.validate(),
            Err(DeployError::UnresolvedReference { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_malformed_address_literal() {
        let mut plan = test_plan();
        plan.steps[0].constructor_args = vec![ArgValue::Address {
            value: "0x1234".to_string(),
        }];

        assert!(matches!(
            plan.validate(),
            Err(DeployError::ArgumentValidation(_))
        ));
    }
}
