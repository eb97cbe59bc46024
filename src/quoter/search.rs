use crate::adapters::Adapter;
use crate::core::Ledger;
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

/// Snapshot of the trust registry a search runs against.
#[derive(Debug, Clone, Default)]
pub struct SearchSpace {
    pub adapters: Vec<Arc<dyn Adapter>>,
    pub tokens: Vec<Pubkey>,
}

/// One frontier entry: a partial path ending at `token` with `hops_left`
/// hops of budget remaining.
#[derive(Debug, Clone)]
pub struct SearchState {
    pub token: Pubkey,
    pub hops_left: usize,
    pub amount: u64,
    pub tokens: Vec<Pubkey>,
    pub adapters: Vec<Arc<dyn Adapter>>,
    pub amounts: Vec<u64>,
}

impl SearchState {
    fn root(token_in: Pubkey, amount_in: u64, max_hops: usize) -> Self {
        Self {
            token: token_in,
            hops_left: max_hops,
            amount: amount_in,
            tokens: vec![token_in],
            adapters: Vec::new(),
            amounts: vec![amount_in],
        }
    }

    fn visited(&self, token: &Pubkey) -> bool {
        self.tokens.contains(token)
    }

    fn extend(&self, adapter: &Arc<dyn Adapter>, token: Pubkey, amount: u64) -> Self {
        let mut tokens = self.tokens.clone();
        tokens.push(token);
        let mut adapters = self.adapters.clone();
        adapters.push(adapter.clone());
        let mut amounts = self.amounts.clone();
        amounts.push(amount);

        Self {
            token,
            hops_left: self.hops_left - 1,
            amount,
            tokens,
            adapters,
            amounts,
        }
    }
}

/// Visit every path of at most `max_hops` hops from `token_in` to
/// `token_out`, in depth-first order.
///
/// At each state every adapter is tried against `token_out` first and then
/// against each trusted token not yet on the path. Only positive quotes
/// extend a path. Completed paths are handed to `visit` in the order a
/// recursive search would find them.
pub fn for_each_path<F>(
    ledger: &Ledger,
    space: &SearchSpace,
    amount_in: u64,
    token_in: &Pubkey,
    token_out: &Pubkey,
    max_hops: usize,
    mut visit: F,
) where
    F: FnMut(&SearchState),
{
    if max_hops == 0 || amount_in == 0 || token_in == token_out {
        return;
    }

    let mut stack = vec![SearchState::root(*token_in, amount_in, max_hops)];
    let mut children = Vec::new();

    while let Some(state) = stack.pop() {
        if state.token == *token_out {
            visit(&state);
            continue;
        }

        for adapter in &space.adapters {
            let targets = std::iter::once(token_out).chain(
                space
                    .tokens
                    .iter()
                    .filter(|t| *t != token_out && !state.visited(t)),
            );
            for next in targets {
                if next != token_out && state.hops_left <= 1 {
                    continue;
                }
                let amount = adapter.query(ledger, state.amount, &state.token, next);
                if amount == 0 {
                    continue;
                }
                children.push(state.extend(adapter, *next, amount));
            }
        }

        // Reverse so the first child is popped first.
        stack.extend(children.drain(..).rev());
    }
}
