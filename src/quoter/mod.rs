pub mod search;

use crate::adapters::Adapter;
use crate::core::{
    Ledger, PathQuote, SharedLedger, SwapError, SwapPath, SwapResult, GAS_CONVERSION_MAX_HOPS,
    MAX_HOPS_LIMIT,
};
use crate::registry::{RegistryView, SharedRegistry, TrustRegistry};
use log::{debug, warn};
use search::{for_each_path, SearchSpace, SearchState};
use solana_sdk::pubkey::Pubkey;
use std::collections::HashMap;
use std::sync::Arc;

/// Finds the best-yielding path between two tokens. Owns the trust
/// registry the Router reads.
#[derive(Debug)]
pub struct Quoter {
    address: Pubkey,
    owner: Pubkey,
    ledger: SharedLedger,
    registry: SharedRegistry,
    max_hops: usize,
}

impl Quoter {
    /// Create a Quoter with an empty registry it alone may write.
    /// `max_hops` caps every search and is itself capped at the hard limit.
    pub fn new(address: Pubkey, owner: Pubkey, ledger: SharedLedger, max_hops: usize) -> Self {
        Self {
            address,
            owner,
            ledger,
            registry: TrustRegistry::shared(address),
            max_hops: max_hops.min(MAX_HOPS_LIMIT),
        }
    }

    pub fn address(&self) -> Pubkey {
        self.address
    }

    pub fn owner(&self) -> Pubkey {
        self.owner
    }

    pub fn max_hops(&self) -> usize {
        self.max_hops
    }

    /// Read-only handle for the paired Router.
    pub fn registry_view(&self) -> RegistryView {
        RegistryView::new(self.registry.clone())
    }

    /// Best path by output amount alone.
    pub fn find_best_path(
        &self,
        amount_in: u64,
        token_in: &Pubkey,
        token_out: &Pubkey,
        max_hops: usize,
    ) -> PathQuote {
        self.find_best_path_with_gas(amount_in, token_in, token_out, max_hops, 0)
    }

    /// Best path by output amount net of gas, where gas is priced in native
    /// currency per gas unit and converted into `token_out`.
    ///
    /// Returns [`PathQuote::empty`] when no route exists.
    pub fn find_best_path_with_gas(
        &self,
        amount_in: u64,
        token_in: &Pubkey,
        token_out: &Pubkey,
        max_hops: usize,
        gas_price: u64,
    ) -> PathQuote {
        let max_hops = max_hops.min(self.max_hops);
        let space = self.snapshot();
        let ledger = self.ledger.read();

        let best = best_path(
            &ledger, &space, amount_in, token_in, token_out, max_hops, gas_price,
        );

        match best {
            Some((score, state)) => {
                let path = SwapPath::new(state.tokens, state.adapters);
                debug!(
                    "Best path {} -> {}: {} hop(s), out {}",
                    token_in,
                    token_out,
                    path.hops(),
                    state.amount
                );
                PathQuote {
                    gas_estimate: path.gas_estimate(),
                    gas_cost: (state.amount as i128 - score) as u64,
                    path,
                    amounts: state.amounts,
                }
            }
            None => {
                debug!("No path {} -> {} within {} hops", token_in, token_out, max_hops);
                PathQuote::empty()
            }
        }
    }

    fn snapshot(&self) -> SearchSpace {
        let registry = self.registry.read();
        SearchSpace {
            adapters: registry.adapters().to_vec(),
            tokens: registry.tokens().to_vec(),
        }
    }

    fn ensure_owner(&self, caller: &Pubkey, action: &'static str) -> SwapResult<()> {
        if *caller != self.owner {
            warn!("Rejected {} by {}", action, caller);
            return Err(SwapError::Unauthorized {
                caller: *caller,
                action,
            });
        }
        Ok(())
    }

    pub fn add_trusted_adapter(&self, caller: &Pubkey, adapter: Arc<dyn Adapter>) -> SwapResult<bool> {
        self.ensure_owner(caller, "add trusted adapter")?;
        self.registry.write().add_adapter(&self.address, adapter)
    }

    pub fn remove_adapter(&self, caller: &Pubkey, address: &Pubkey) -> SwapResult<bool> {
        self.ensure_owner(caller, "remove trusted adapter")?;
        self.registry.write().remove_adapter(&self.address, address)
    }

    pub fn set_adapters(&self, caller: &Pubkey, adapters: Vec<Arc<dyn Adapter>>) -> SwapResult<()> {
        self.ensure_owner(caller, "set trusted adapters")?;
        self.registry.write().set_adapters(&self.address, adapters)
    }

    pub fn add_trusted_token(&self, caller: &Pubkey, token: Pubkey) -> SwapResult<bool> {
        self.ensure_owner(caller, "add trusted token")?;
        self.registry.write().add_token(&self.address, token)
    }

    pub fn remove_token(&self, caller: &Pubkey, token: &Pubkey) -> SwapResult<bool> {
        self.ensure_owner(caller, "remove trusted token")?;
        self.registry.write().remove_token(&self.address, token)
    }

    pub fn set_tokens(&self, caller: &Pubkey, tokens: Vec<Pubkey>) -> SwapResult<()> {
        self.ensure_owner(caller, "set trusted tokens")?;
        self.registry.write().set_tokens(&self.address, tokens)
    }

    pub fn trusted_adapters(&self) -> Vec<Arc<dyn Adapter>> {
        self.registry.read().adapters().to_vec()
    }

    pub fn trusted_tokens(&self) -> Vec<Pubkey> {
        self.registry.read().tokens().to_vec()
    }

    pub fn trusted_adapters_count(&self) -> usize {
        self.registry.read().adapters().len()
    }

    pub fn trusted_tokens_count(&self) -> usize {
        self.registry.read().tokens().len()
    }

    pub fn is_trusted_adapter(&self, address: &Pubkey) -> bool {
        self.registry.read().is_trusted_adapter(address)
    }

    pub fn is_trusted_token(&self, token: &Pubkey) -> bool {
        self.registry.read().is_trusted_token(token)
    }
}

/// Highest scoring path with its score, first found on ties.
fn best_path(
    ledger: &Ledger,
    space: &SearchSpace,
    amount_in: u64,
    token_in: &Pubkey,
    token_out: &Pubkey,
    max_hops: usize,
    gas_price: u64,
) -> Option<(i128, SearchState)> {
    let mut gas_costs: HashMap<u64, u64> = HashMap::new();
    let mut best: Option<(i128, SearchState)> = None;

    for_each_path(
        ledger,
        space,
        amount_in,
        token_in,
        token_out,
        max_hops,
        |state| {
            let gas_cost = if gas_price == 0 {
                0
            } else {
                let gas_units = state
                    .adapters
                    .iter()
                    .fold(0u64, |acc, a| acc.saturating_add(a.gas_estimate()));
                *gas_costs.entry(gas_units).or_insert_with(|| {
                    gas_in_output_token(ledger, space, gas_units, gas_price, token_out)
                })
            };

            let score = state.amount as i128 - gas_cost as i128;
            debug!(
                "Candidate {} hop(s): out {}, gas cost {}, score {}",
                state.adapters.len(),
                state.amount,
                gas_cost,
                score
            );
            if best.as_ref().map_or(true, |(top, _)| score > *top) {
                best = Some((score, state.clone()));
            }
        },
    );

    best
}

/// Native cost of `gas_units` at `gas_price`, expressed in `token_out`.
/// Zero when no short route from the wrapped native token exists.
fn gas_in_output_token(
    ledger: &Ledger,
    space: &SearchSpace,
    gas_units: u64,
    gas_price: u64,
    token_out: &Pubkey,
) -> u64 {
    let native = gas_units.saturating_mul(gas_price);
    let wrapped = ledger.wrapped_native();
    if native == 0 || *token_out == wrapped {
        return native;
    }

    match best_path(
        ledger,
        space,
        native,
        &wrapped,
        token_out,
        GAS_CONVERSION_MAX_HOPS,
        0,
    ) {
        Some((_, state)) => state.amount,
        None => {
            debug!("No route to price gas in {}, ignoring gas", token_out);
            0
        }
    }
}
