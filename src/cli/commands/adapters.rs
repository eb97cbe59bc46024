use super::load_deployment;
use crate::cli::{display::RouteDisplay, AdaptersArgs};
use crate::core::{Config, SwapResult};
use colored::*;

pub async fn execute(args: AdaptersArgs, config: Config) -> SwapResult<()> {
    let deployment = load_deployment(&args.scenario, &config)?;

    println!(
        "{} {}",
        "📋 Scenario:".bold().cyan(),
        deployment.name.bold()
    );
    println!(
        "Trusted adapters: {} of {} | Execution policy: {}",
        deployment.router.trusted_adapters_count(),
        deployment.adapters.len(),
        deployment.router.policy()
    );

    RouteDisplay::display_adapters(&deployment, args.detailed);

    Ok(())
}
