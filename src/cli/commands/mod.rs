pub mod adapters;
pub mod balances;
pub mod quote;
pub mod swap;

use crate::core::{Config, SwapResult, NATIVE_SYMBOL};
use crate::scenario::{deploy, Deployment, ScenarioConfig};
use crate::utils::parse_amount;
use log::info;
use solana_sdk::pubkey::Pubkey;
use std::path::Path;

/// Load a scenario file and deploy it against a fresh ledger.
pub fn load_deployment(path: &Path, config: &Config) -> SwapResult<Deployment> {
    let scenario = ScenarioConfig::from_file(path)?;
    let deployment = deploy(&scenario, config)?;
    info!(
        "Deployed scenario '{}' with {} adapters",
        deployment.name,
        deployment.adapters.len()
    );
    Ok(deployment)
}

/// One side of a swap as given on the command line.
#[derive(Debug, Clone, Copy)]
pub struct TokenSide {
    pub mint: Pubkey,
    pub decimals: u8,
    /// The user named the native currency; routing uses the wrapped mint.
    pub native: bool,
}

pub fn resolve_side(deployment: &Deployment, input: &str) -> SwapResult<TokenSide> {
    if input.trim().eq_ignore_ascii_case(NATIVE_SYMBOL) {
        let mint = deployment.wrapped_native();
        let token = deployment.token(&mint.to_string())?;
        return Ok(TokenSide {
            mint,
            decimals: token.decimals,
            native: true,
        });
    }

    let token = deployment.token(input)?;
    Ok(TokenSide {
        mint: token.mint,
        decimals: token.decimals,
        native: false,
    })
}

/// Parse a human amount against the side's decimals.
pub fn resolve_amount(side: &TokenSide, amount: &str) -> SwapResult<u64> {
    parse_amount(amount, side.decimals)
}
