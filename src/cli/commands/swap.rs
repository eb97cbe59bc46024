use super::quote::slippage_bps;
use super::{load_deployment, resolve_amount, resolve_side};
use crate::cli::{display::RouteDisplay, SwapArgs};
use crate::core::{Config, SwapError, SwapParams, SwapResult};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Confirm};
use log::{info, warn};

pub async fn execute(args: SwapArgs, config: Config) -> SwapResult<()> {
    println!("{}", "🚀 Multi-Hop Swap".bold().cyan());

    let pb = RouteDisplay::create_progress_bar("Deploying scenario...");
    let deployment = load_deployment(&args.scenario, &config)?;

    let side_in = resolve_side(&deployment, &args.token_in)?;
    let side_out = resolve_side(&deployment, &args.token_out)?;

    if side_in.mint == side_out.mint {
        pb.finish_and_clear();
        println!("{}", "❌ Cannot swap token to itself".red().bold());
        return Ok(());
    }

    let trader = deployment.account(&args.from)?;
    let recipient = match &args.to {
        Some(to) => deployment.account(to)?,
        None => trader,
    };

    let amount_in = resolve_amount(&side_in, &args.amount)?;
    let slippage = slippage_bps(args.slippage, &config)?;
    let gas_price = args.gas_price.unwrap_or(config.gas_price);
    let max_hops = args.max_hops.unwrap_or(config.max_hops);

    pb.set_message("Finding best route...");
    let quote = deployment.quoter.find_best_path_with_gas(
        amount_in,
        &side_in.mint,
        &side_out.mint,
        max_hops,
        gas_price,
    );
    pb.finish_and_clear();

    if quote.is_empty() {
        println!("{}", "❌ No route found for this token pair".red().bold());
        return Err(SwapError::NoRouteFound(side_in.mint, side_out.mint));
    }

    let min_amount_out = quote.min_amount_out(slippage);
    RouteDisplay::display_quote(&deployment, &quote, slippage, true);
    RouteDisplay::display_swap_confirmation(
        &deployment,
        &quote,
        min_amount_out,
        side_in.native,
        side_out.native,
        &recipient,
    );

    let proceed = if args.yes {
        true
    } else {
        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt("Do you want to proceed with this swap?")
            .default(false)
            .interact()?
    };

    if !proceed {
        println!("{}", "❌ Swap cancelled".yellow());
        return Ok(());
    }

    let params = SwapParams::from_quote(&quote, min_amount_out, recipient);
    let router = &deployment.router;

    info!(
        "Executing {}-hop swap for {} (native in: {}, native out: {})",
        quote.path.hops(),
        trader,
        side_in.native,
        side_out.native
    );

    let result = match (side_in.native, side_out.native) {
        (true, false) => router.swap_from_gas(&trader, &params),
        (false, true) => router.swap_to_gas(&trader, &params),
        (false, false) => router.swap(&trader, &params),
        (true, true) => {
            return Err(SwapError::InvalidPath(
                "native currency on both sides".to_string(),
            ))
        }
    };

    let receipt = match result {
        Ok(receipt) => receipt,
        Err(e) => {
            warn!("Swap failed: {}", e);
            println!("{} {}", "❌ Swap failed:".red().bold(), e);
            return Err(e);
        }
    };

    RouteDisplay::display_receipt(&deployment, &quote, &receipt);

    let mut accounts = vec![(args.from.clone(), trader)];
    if recipient != trader {
        accounts.push((args.to.clone().unwrap_or_default(), recipient));
    }
    RouteDisplay::display_balances(&deployment, &accounts);

    Ok(())
}
