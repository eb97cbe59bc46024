use crate::adapters::Adapter;
use crate::core::{PathQuote, SwapReceipt, TokenInfo, VenueKind};
use crate::scenario::Deployment;
use crate::utils::{format_number, format_units, short_address};
use colored::*;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use solana_sdk::pubkey::Pubkey;

/// Display helpers for routes, receipts and registry state
pub struct RouteDisplay;

impl RouteDisplay {
    /// Display a quoted path hop by hop
    pub fn display_quote(
        deployment: &Deployment,
        quote: &PathQuote,
        slippage_bps: u16,
        is_best: bool,
    ) {
        let best_marker = if is_best {
            " ⭐ BEST".bright_green().bold()
        } else {
            "".normal()
        };

        println!(
            "{} {}-hop route{}",
            style("►").cyan(),
            quote.path.hops(),
            best_marker
        );

        let tokens = &quote.path.tokens;
        for (i, adapter) in quote.path.adapters.iter().enumerate() {
            println!(
                "  {}. {} {} → {} {} via {}",
                i + 1,
                format_amount(deployment, quote.amounts[i], &tokens[i]),
                deployment.symbol(&tokens[i]),
                format_amount(deployment, quote.amounts[i + 1], &tokens[i + 1]),
                deployment.symbol(&tokens[i + 1]),
                venue_label(adapter.as_ref())
            );
        }

        let token_out = &tokens[tokens.len() - 1];
        println!(
            "  Output: {} {} | Min Output: {} {} ({:.2}% slippage)",
            format_amount(deployment, quote.amount_out(), token_out).bold(),
            deployment.symbol(token_out),
            format_amount(deployment, quote.min_amount_out(slippage_bps), token_out),
            deployment.symbol(token_out),
            slippage_bps as f64 / 100.0
        );
        println!(
            "  Gas Estimate: {} units ≈ {} {}",
            style(format_number(quote.gas_estimate)).dim(),
            format_amount(deployment, quote.gas_cost, token_out),
            deployment.symbol(token_out)
        );
        println!();
    }

    /// Display the best path found for each hop budget
    pub fn display_hop_budgets(
        deployment: &Deployment,
        results: &[(usize, PathQuote)],
        slippage_bps: u16,
    ) {
        println!("\n{}", style("📊 Best Route per Hop Budget").bold().underlined());

        let best_net = best_net_amount(results);

        for (budget, quote) in results {
            println!("{}", style(format!("max_hops = {}", budget)).bold().blue());
            if quote.is_empty() {
                println!("  {}\n", "no route".dimmed());
                continue;
            }
            let is_best = Some(quote.net_amount_out()) == best_net;
            Self::display_quote(deployment, quote, slippage_bps, is_best);
        }
    }

    /// Create a progress bar for operations
    pub fn create_progress_bar(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }

    /// Display swap details before execution
    pub fn display_swap_confirmation(
        deployment: &Deployment,
        quote: &PathQuote,
        min_amount_out: u64,
        native_in: bool,
        native_out: bool,
        recipient: &Pubkey,
    ) {
        println!("\n{}", style("💱 Swap Confirmation").bold().underlined());

        let token_in = &quote.path.tokens[0];
        let token_out = &quote.path.tokens[quote.path.tokens.len() - 1];
        let symbol_in = if native_in {
            crate::core::NATIVE_SYMBOL.to_string()
        } else {
            deployment.symbol(token_in)
        };
        let symbol_out = if native_out {
            crate::core::NATIVE_SYMBOL.to_string()
        } else {
            deployment.symbol(token_out)
        };

        println!(
            "Swap: {} {} → {} {}",
            format_amount(deployment, quote.amount_in(), token_in),
            symbol_in.bold(),
            format_amount(deployment, quote.amount_out(), token_out),
            symbol_out.bold()
        );
        println!(
            "Route: {}",
            quote
                .path
                .tokens
                .iter()
                .map(|t| deployment.symbol(t))
                .collect::<Vec<_>>()
                .join(" → ")
        );
        println!(
            "Min Output: {} {}",
            format_amount(deployment, min_amount_out, token_out),
            symbol_out
        );
        println!("Recipient: {}", style(recipient.to_string()).dim());
    }

    /// Display a completed swap
    pub fn display_receipt(deployment: &Deployment, quote: &PathQuote, receipt: &SwapReceipt) {
        println!("\n{}", style("✅ Swap Executed").bold().green());

        let token_out = &quote.path.tokens[quote.path.tokens.len() - 1];
        let expected = quote.amount_out();
        let diff = receipt.amount_out as i128 - expected as i128;
        let diff_str = format!("{:+}", diff);
        let diff_colored = if diff >= 0 {
            diff_str.green()
        } else {
            diff_str.red()
        };

        println!(
            "Quoted Output: {} | Actual Output: {} | Difference: {} base units",
            format_amount(deployment, expected, token_out),
            format_amount(deployment, receipt.amount_out, token_out).bold(),
            diff_colored
        );
        println!(
            "Hop Amounts: {}",
            receipt
                .hop_amounts
                .iter()
                .map(|a| format_number(*a))
                .collect::<Vec<_>>()
                .join(" → ")
        );
        println!(
            "Timestamp: {}",
            style(
                chrono::DateTime::<chrono::Utc>::from_timestamp(receipt.timestamp, 0)
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| receipt.timestamp.to_string())
            )
            .dim()
        );
    }

    /// Display every deployed adapter with its trust flag
    pub fn display_adapters(deployment: &Deployment, detailed: bool) {
        println!("\n{}", style("🏊 Adapters").bold().underlined());

        let ledger = deployment.ledger.read();
        for (i, adapter) in deployment.adapters.iter().enumerate() {
            let trusted = if deployment.router.is_trusted_adapter(&adapter.address()) {
                "trusted".green()
            } else {
                "untrusted".red()
            };
            let symbols: Vec<String> = adapter
                .tokens()
                .iter()
                .map(|t| deployment.symbol(t))
                .collect();

            println!(
                "{}. {} [{}] {}",
                i + 1,
                venue_label(adapter.as_ref()),
                symbols.join("/"),
                trusted
            );

            if detailed {
                println!(
                    "   Adapter: {} | Pool: {}",
                    style(adapter.address().to_string()).dim(),
                    style(adapter.pool_address().to_string()).dim()
                );
                println!(
                    "   Gas: {} units | Underquote tolerance: {}",
                    format_number(adapter.gas_estimate()),
                    adapter.underquote_tolerance()
                );
                let reserves: Vec<String> = adapter
                    .tokens()
                    .iter()
                    .map(|t| {
                        format!(
                            "{} {}",
                            format_amount(deployment, ledger.reserve_of(&adapter.pool_address(), t), t),
                            deployment.symbol(t)
                        )
                    })
                    .collect();
                println!("   Reserves: {}", reserves.join(" | "));
                println!();
            }
        }

        let trusted_tokens: Vec<String> = deployment
            .quoter
            .trusted_tokens()
            .iter()
            .map(|t| deployment.symbol(t))
            .collect();
        println!(
            "\nTrusted intermediate tokens: {}",
            trusted_tokens.join(", ").bold()
        );
    }

    /// Display balances of the named accounts
    pub fn display_balances(deployment: &Deployment, accounts: &[(String, Pubkey)]) {
        println!("\n{}", style("👛 Balances").bold().underlined());

        let native_decimals = native_decimals(deployment);
        let ledger = deployment.ledger.read();
        for (name, address) in accounts {
            println!(
                "{} {}",
                name.bold(),
                style(short_address(address)).dim()
            );
            println!(
                "   {}: {}",
                crate::core::NATIVE_SYMBOL,
                format_units(ledger.native_balance_of(address), native_decimals)
            );
            for token in &deployment.tokens {
                let balance = ledger.balance_of(address, &token.mint);
                if balance > 0 {
                    println!("   {}: {}", token.symbol, format_token(balance, token));
                }
            }
        }
    }
}

/// Highest gas-adjusted output among the non-empty quotes.
fn best_net_amount(results: &[(usize, PathQuote)]) -> Option<i128> {
    results
        .iter()
        .filter(|(_, q)| !q.is_empty())
        .map(|(_, q)| q.net_amount_out())
        .max()
}

fn venue_label(adapter: &dyn Adapter) -> ColoredString {
    let label = format!("{} ({})", adapter.name(), adapter.kind());
    match adapter.kind() {
        VenueKind::ConstantProduct => label.blue(),
        VenueKind::StableSwap => label.green(),
        VenueKind::ConstantSum => label.yellow(),
    }
}

fn native_decimals(deployment: &Deployment) -> u8 {
    deployment
        .token_by_mint(&deployment.wrapped_native())
        .map(|t| t.decimals)
        .unwrap_or(9)
}

fn format_token(amount: u64, token: &TokenInfo) -> String {
    format_units(amount, token.decimals)
}

/// Format token amount with decimals
fn format_amount(deployment: &Deployment, amount: u64, mint: &Pubkey) -> String {
    match deployment.token_by_mint(mint) {
        Some(token) => format_token(amount, token),
        None => format_number(amount),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::commands::load_deployment;
    use crate::core::Config;
    use pretty_assertions::assert_eq;
    use std::path::PathBuf;

    fn sample() -> Deployment {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios/sample.json");
        load_deployment(&path, &Config::default()).unwrap()
    }

    #[test]
    fn test_best_marker_ranks_net_of_gas() {
        let deployment = sample();
        let (usdc, wsol) = (
            deployment.token("USDC").unwrap().mint,
            deployment.token("WSOL").unwrap().mint,
        );
        let quote = deployment.quoter.find_best_path(1_000_000, &usdc, &wsol, 3);
        assert!(!quote.is_empty());

        let mut pricier = quote.clone();
        *pricier.amounts.last_mut().unwrap() += 10;
        pricier.gas_cost = 100;
        let cheaper = quote.clone();

        let results = vec![(1, pricier), (2, PathQuote::empty()), (3, cheaper.clone())];
        assert_eq!(best_net_amount(&results), Some(cheaper.net_amount_out()));
        assert_eq!(best_net_amount(&[(1, PathQuote::empty())]), None);
    }

    #[test]
    fn test_balances_render_while_ledger_is_shared() {
        let deployment = sample();
        let accounts: Vec<(String, Pubkey)> = deployment
            .accounts
            .iter()
            .map(|(name, address)| (name.clone(), *address))
            .collect();

        // A second reader elsewhere must not stall rendering.
        let _reader = deployment.ledger.read();
        RouteDisplay::display_balances(&deployment, &accounts);
        RouteDisplay::display_adapters(&deployment, true);
    }
}
