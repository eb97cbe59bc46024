use super::{load_deployment, resolve_amount, resolve_side};
use crate::cli::{display::RouteDisplay, QuoteArgs};
use crate::core::{Config, PathQuote, SwapError, SwapResult};
use colored::*;
use console::style;
use futures::future::join_all;
use log::info;

pub async fn execute(args: QuoteArgs, config: Config) -> SwapResult<()> {
    println!("{}", "🚀 Multi-Hop Route Quote".bold().cyan());

    let pb = RouteDisplay::create_progress_bar("Deploying scenario...");
    let deployment = load_deployment(&args.scenario, &config)?;

    let side_in = resolve_side(&deployment, &args.token_in)?;
    let side_out = resolve_side(&deployment, &args.token_out)?;

    if side_in.mint == side_out.mint {
        pb.finish_and_clear();
        println!("{}", "❌ Cannot swap token to itself".red().bold());
        return Ok(());
    }

    let amount_in = resolve_amount(&side_in, &args.amount)?;
    let slippage = slippage_bps(args.slippage, &config)?;
    let gas_price = args.gas_price.unwrap_or(config.gas_price);
    let max_hops = args.max_hops.unwrap_or(config.max_hops);

    info!(
        "Quoting {} {} -> {} (max hops: {}, gas price: {})",
        amount_in,
        deployment.symbol(&side_in.mint),
        deployment.symbol(&side_out.mint),
        max_hops,
        gas_price
    );

    if args.all {
        pb.set_message("Searching every hop budget...");

        let searches = (1..=max_hops.min(deployment.quoter.max_hops())).map(|budget| {
            let quoter = deployment.quoter.clone();
            let (token_in, token_out) = (side_in.mint, side_out.mint);
            tokio::task::spawn_blocking(move || {
                let quote = quoter.find_best_path_with_gas(
                    amount_in, &token_in, &token_out, budget, gas_price,
                );
                (budget, quote)
            })
        });

        let results = join_all(searches)
            .await
            .into_iter()
            .collect::<Result<Vec<(usize, PathQuote)>, _>>()
            .map_err(|e| SwapError::Other(format!("Search task failed: {}", e)))?;

        pb.finish_and_clear();

        if results.iter().all(|(_, q)| q.is_empty()) {
            println!("{}", "❌ No route found for this token pair".red().bold());
            return Ok(());
        }

        RouteDisplay::display_hop_budgets(&deployment, &results, slippage);
    } else {
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
            return Ok(());
        }

        println!("\n{}", "🏆 Best Route Found".bold().green());
        RouteDisplay::display_quote(&deployment, &quote, slippage, true);
    }

    println!(
        "{}",
        style("💡 Tip: Use --all flag to compare hop budgets").dim()
    );

    Ok(())
}

/// Requested slippage, falling back to the configured default.
pub(crate) fn slippage_bps(requested: Option<u16>, config: &Config) -> SwapResult<u16> {
    let slippage = requested.unwrap_or(config.default_slippage_bps);
    if slippage > config.max_slippage_bps {
        return Err(SwapError::InvalidAmount(format!(
            "slippage {} bps exceeds maximum {} bps",
            slippage, config.max_slippage_bps
        )));
    }
    Ok(slippage)
}
