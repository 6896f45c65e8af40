//! swapkit deploys the swap contract suite (factory, router, management) to
//! a BNB Smart Chain network in one sequential run.

mod cli;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use comfy_table::Table;

use cli::Cli;
use swapkit_deploy::{DeploymentPlan, DeploymentResult, EthContext, LogObserver, run, suite_plan};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize the logger.
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    // If a plan file is provided, run it; otherwise build the built-in
    // per-network suite plan from the literal table.
    let plan = match &cli.plan {
        Some(path) => DeploymentPlan::load_from_file(path)?,
        None => suite_plan(
            &cli.network.to_string(),
            cli.network.chain_id(),
            &cli.network.suite_params(),
            &cli.artifacts,
        ),
    };
    plan.validate()?;

    if let Some(path) = &cli.plan_out {
        plan.save_to_file(path)?;
    }

    let rpc_url = cli.rpc_provider.to_rpc_url(cli.network)?;
    let ctx = EthContext::new(&rpc_url, &cli.from)?
        .with_confirm_timeout(Duration::from_secs(cli.confirm_timeout));

    // Refuse to run a plan against an endpoint on a different chain.
    let chain_id = ctx.chain_id().await?;
    if chain_id != plan.chain_id {
        anyhow::bail!(
            "endpoint reports chain id {} but the plan targets {} ({})",
            chain_id,
            plan.chain_id,
            plan.network
        );
    }

    tracing::info!(
        network = %plan.network,
        chain_id,
        steps = plan.steps.len(),
        from = %ctx.from_address(),
        "Starting contract deployment..."
    );

    let results = run(&plan.steps, &ctx, &LogObserver).await?;

    tracing::info!("Deployment complete!");
    println!("{}", summary_table(&results));

    Ok(())
}

/// Render the deployed addresses and auxiliary outputs as a table.
fn summary_table(results: &[DeploymentResult]) -> Table {
    let mut table = Table::new();
    table.set_header(["Step", "Address", "Transaction", "Block", "Outputs"]);

    for result in results {
        let outputs = result
            .auxiliary_outputs
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row([
            result.step_name.clone(),
            format!("{}", result.contract_address),
            format!("{}", result.transaction_hash),
            result.block_number.to_string(),
            outputs,
        ]);
    }

    table
}
