use super::load_deployment;
use crate::cli::{display::RouteDisplay, BalancesArgs};
use crate::core::{Config, SwapResult};

pub async fn execute(args: BalancesArgs, config: Config) -> SwapResult<()> {
    let deployment = load_deployment(&args.scenario, &config)?;

    let accounts = match &args.account {
        Some(name) => vec![(name.clone(), deployment.account(name)?)],
        None => deployment
            .accounts
            .iter()
            .map(|(name, address)| (name.clone(), *address))
            .collect(),
    };

    RouteDisplay::display_balances(&deployment, &accounts);

    Ok(())
}
