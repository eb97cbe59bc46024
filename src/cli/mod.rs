use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod commands;
pub mod display;

#[derive(Parser)]
#[command(name = "adapter-router")]
#[command(about = "Multi-hop swap routing across pluggable venue adapters", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Find the best path between two tokens
    Quote(QuoteArgs),

    /// Quote and execute a swap through the Router
    Swap(SwapArgs),

    /// List deployed adapters and their trust status
    Adapters(AdaptersArgs),

    /// Show account balances
    Balances(BalancesArgs),
}

#[derive(Parser)]
pub struct QuoteArgs {
    /// Scenario file describing the market
    pub scenario: PathBuf,

    /// Input token symbol or address (NATIVE for the native currency)
    pub token_in: String,

    /// Amount to swap, in token units (e.g. 1.5)
    pub amount: String,

    /// Output token symbol or address
    pub token_out: String,

    /// Maximum hops (capped by ROUTER_MAX_HOPS)
    #[arg(long)]
    pub max_hops: Option<usize>,

    /// Gas price in native base units per gas unit
    #[arg(long, env = "ROUTER_GAS_PRICE")]
    pub gas_price: Option<u64>,

    /// Slippage tolerance in basis points
    #[arg(short, long)]
    pub slippage: Option<u16>,

    /// Show the best path for every hop budget, not just the overall best
    #[arg(short, long)]
    pub all: bool,
}

#[derive(Parser)]
pub struct SwapArgs {
    /// Scenario file describing the market
    pub scenario: PathBuf,

    /// Input token symbol or address (NATIVE for the native currency)
    pub token_in: String,

    /// Amount to swap, in token units (e.g. 1.5)
    pub amount: String,

    /// Output token symbol or address (NATIVE for the native currency)
    pub token_out: String,

    /// Account paying the input
    #[arg(long, default_value = "alice")]
    pub from: String,

    /// Account receiving the output (defaults to --from)
    #[arg(long)]
    pub to: Option<String>,

    /// Slippage tolerance in basis points
    #[arg(short, long)]
    pub slippage: Option<u16>,

    /// Maximum hops (capped by ROUTER_MAX_HOPS)
    #[arg(long)]
    pub max_hops: Option<usize>,

    /// Gas price in native base units per gas unit
    #[arg(long, env = "ROUTER_GAS_PRICE")]
    pub gas_price: Option<u64>,

    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

#[derive(Parser)]
pub struct AdaptersArgs {
    /// Scenario file describing the market
    pub scenario: PathBuf,

    /// Show reserves and venue parameters
    #[arg(short, long)]
    pub detailed: bool,
}

#[derive(Parser)]
pub struct BalancesArgs {
    /// Scenario file describing the market
    pub scenario: PathBuf,

    /// Only show this account
    #[arg(long)]
    pub account: Option<String>,
}
