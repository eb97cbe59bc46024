use crate::adapters::Adapter;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VenueKind {
    ConstantProduct,
    StableSwap,
    ConstantSum,
}

impl fmt::Display for VenueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VenueKind::ConstantProduct => write!(f, "ConstantProduct"),
            VenueKind::StableSwap => write!(f, "StableSwap"),
            VenueKind::ConstantSum => write!(f, "ConstantSum"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenInfo {
    pub mint: Pubkey,
    pub symbol: String,
    pub decimals: u8,
}

/// Ordered tokens and the adapters hopping between them.
///
/// Holds adapter handles rather than registry references, so removing an
/// adapter from the registry never affects a path already built.
#[derive(Clone, Default)]
pub struct SwapPath {
    pub tokens: Vec<Pubkey>,
    pub adapters: Vec<Arc<dyn Adapter>>,
}

impl SwapPath {
    pub fn new(tokens: Vec<Pubkey>, adapters: Vec<Arc<dyn Adapter>>) -> Self {
        Self { tokens, adapters }
    }

    pub fn hops(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    pub fn token_in(&self) -> Option<&Pubkey> {
        self.tokens.first()
    }

    pub fn token_out(&self) -> Option<&Pubkey> {
        self.tokens.last()
    }

    pub fn adapter_addresses(&self) -> Vec<Pubkey> {
        self.adapters.iter().map(|a| a.address()).collect()
    }

    /// Sum of the per-hop gas estimates.
    pub fn gas_estimate(&self) -> u64 {
        self.adapters
            .iter()
            .fold(0u64, |acc, a| acc.saturating_add(a.gas_estimate()))
    }
}

impl fmt::Debug for SwapPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SwapPath")
            .field("tokens", &self.tokens)
            .field("adapters", &self.adapter_addresses())
            .finish()
    }
}

/// Result of a path search. `amounts[i]` is the quoted amount at `tokens[i]`.
#[derive(Debug, Clone, Default)]
pub struct PathQuote {
    pub path: SwapPath,
    pub amounts: Vec<u64>,
    pub gas_estimate: u64,
    /// Gas charged against this path during ranking, in output-token units.
    pub gas_cost: u64,
}

impl PathQuote {
    /// The "no route found" result.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    pub fn amount_in(&self) -> u64 {
        self.amounts.first().copied().unwrap_or(0)
    }

    pub fn amount_out(&self) -> u64 {
        if self.is_empty() {
            return 0;
        }
        self.amounts.last().copied().unwrap_or(0)
    }

    /// Output net of gas, the value the search ranks paths by.
    pub fn net_amount_out(&self) -> i128 {
        self.amount_out() as i128 - self.gas_cost as i128
    }

    /// Minimum output after applying a slippage tolerance in basis points.
    pub fn min_amount_out(&self, slippage_bps: u16) -> u64 {
        let out = self.amount_out() as u128;
        let kept = 10_000u128.saturating_sub(slippage_bps as u128);
        (out * kept / 10_000) as u64
    }
}

#[derive(Debug, Clone)]
pub struct SwapParams {
    pub amount_in: u64,
    pub min_amount_out: u64,
    pub path: SwapPath,
    pub recipient: Pubkey,
}

impl SwapParams {
    pub fn from_quote(quote: &PathQuote, min_amount_out: u64, recipient: Pubkey) -> Self {
        Self {
            amount_in: quote.amount_in(),
            min_amount_out,
            path: quote.path.clone(),
            recipient,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapReceipt {
    pub amount_in: u64,
    pub amount_out: u64,
    /// Amount held at each token of the path, as realized by the adapters.
    pub hop_amounts: Vec<u64>,
    pub recipient: Pubkey,
    pub native_in: bool,
    pub native_out: bool,
    pub timestamp: i64,
}
