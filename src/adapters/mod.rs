pub mod constant_product;
pub mod constant_sum;
pub mod math;
pub mod stable_swap;

use crate::core::{Ledger, SwapError, SwapResult, VenueKind, POOL_SEED};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use std::fmt;

pub use constant_product::ConstantProductAdapter;
pub use constant_sum::ConstantSumAdapter;
pub use stable_swap::StableSwapAdapter;

/// Identity and ranking metadata shared by every adapter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdapterInfo {
    pub name: String,
    pub address: Pubkey,
    pub owner: Pubkey,
    pub program_id: Pubkey,
    /// Approximate gas units for one swap. Used for ranking only.
    pub gas_estimate: u64,
    /// Maximum amount by which `query` may understate the `swap` output.
    pub underquote_tolerance: u64,
}

impl AdapterInfo {
    /// Program-derived pool account of this adapter's venue.
    pub fn pool_address(&self) -> Pubkey {
        Pubkey::find_program_address(&[POOL_SEED, self.address.as_ref()], &self.program_id).0
    }
}

/// Uniform facade over one swap venue.
///
/// Settlement is pull-based. A caller moves `token_in` to
/// [`Adapter::deposit_address`] and then calls [`Adapter::swap`]. The deposit
/// address is the venue's pool account and is the same for every caller, so
/// whatever sits there unsynced belongs to whoever next swaps successfully.
/// Overpaying is never withdrawable.
pub trait Adapter: Send + Sync + fmt::Debug {
    fn info(&self) -> &AdapterInfo;

    fn kind(&self) -> VenueKind;

    /// Tokens held by the venue, in index order.
    fn tokens(&self) -> &[Pubkey];

    /// Read-only output estimate. Returns 0 for unsupported pairs and
    /// degenerate amounts. Never overquotes: a later `swap` with the same
    /// inputs delivers between `query` and `query + underquote_tolerance`.
    fn query(&self, ledger: &Ledger, amount_in: u64, token_in: &Pubkey, token_out: &Pubkey) -> u64;

    /// Execute one hop using funds already sitting at the deposit address,
    /// delivering the output to `recipient`.
    fn swap(
        &self,
        ledger: &mut Ledger,
        amount_in: u64,
        token_in: &Pubkey,
        token_out: &Pubkey,
        recipient: &Pubkey,
    ) -> SwapResult<u64>;

    fn address(&self) -> Pubkey {
        self.info().address
    }

    fn name(&self) -> &str {
        &self.info().name
    }

    fn owner(&self) -> Pubkey {
        self.info().owner
    }

    fn gas_estimate(&self) -> u64 {
        self.info().gas_estimate
    }

    fn underquote_tolerance(&self) -> u64 {
        self.info().underquote_tolerance
    }

    fn pool_address(&self) -> Pubkey {
        self.info().pool_address()
    }

    /// Where `token_in` must be sent before calling `swap`.
    fn deposit_address(&self, _token_in: &Pubkey, _token_out: &Pubkey) -> Pubkey {
        self.pool_address()
    }

    fn is_pool_token(&self, token: &Pubkey) -> bool {
        self.tokens().contains(token)
    }

    fn token_index(&self, token: &Pubkey) -> Option<usize> {
        self.tokens().iter().position(|t| t == token)
    }

    /// Owner-only rescue of tokens held by the adapter's own address.
    fn recover_token(
        &self,
        ledger: &mut Ledger,
        caller: &Pubkey,
        token: &Pubkey,
        amount: u64,
    ) -> SwapResult<()> {
        ensure_owner(self.info(), caller, "recover adapter tokens")?;
        ledger.transfer(&self.address(), &self.owner(), token, amount)?;
        info!("{} recovered {} of {} to owner", self.name(), amount, token);
        Ok(())
    }

    /// Owner-only rescue of native currency held by the adapter's own address.
    fn recover_native(&self, ledger: &mut Ledger, caller: &Pubkey, amount: u64) -> SwapResult<()> {
        ensure_owner(self.info(), caller, "recover adapter native currency")?;
        ledger.transfer_native(&self.address(), &self.owner(), amount)?;
        info!("{} recovered {} native to owner", self.name(), amount);
        Ok(())
    }

    /// Mint `amounts` (in `tokens()` order) into the pool and sync reserves.
    fn seed_liquidity(&self, ledger: &mut Ledger, amounts: &[u64]) -> SwapResult<()> {
        if amounts.len() != self.tokens().len() {
            return Err(SwapError::InvalidPoolState(format!(
                "{} expects {} reserves, got {}",
                self.name(),
                self.tokens().len(),
                amounts.len()
            )));
        }
        let pool = self.pool_address();
        for (token, amount) in self.tokens().iter().zip(amounts) {
            ledger.mint(&pool, token, *amount)?;
            let reserve = ledger
                .reserve_of(&pool, token)
                .checked_add(*amount)
                .ok_or(SwapError::MathOverflow)?;
            ledger.set_reserve(&pool, token, reserve);
        }
        Ok(())
    }
}

fn ensure_owner(info: &AdapterInfo, caller: &Pubkey, action: &'static str) -> SwapResult<()> {
    if *caller != info.owner {
        return Err(SwapError::Unauthorized {
            caller: *caller,
            action,
        });
    }
    Ok(())
}

/// Index pair for a supported, distinct `token_in -> token_out`.
pub(crate) fn pair_indices(
    tokens: &[Pubkey],
    token_in: &Pubkey,
    token_out: &Pubkey,
) -> Option<(usize, usize)> {
    if token_in == token_out {
        return None;
    }
    let i = tokens.iter().position(|t| t == token_in)?;
    let j = tokens.iter().position(|t| t == token_out)?;
    Some((i, j))
}

/// Synced reserves of every pool token, in `tokens` order.
pub(crate) fn pool_reserves(ledger: &Ledger, pool: &Pubkey, tokens: &[Pubkey]) -> Vec<u64> {
    tokens.iter().map(|t| ledger.reserve_of(pool, t)).collect()
}

/// Claim `amount_in` of the pool's unsynced `token_in` balance and pay
/// `amount_out` of `token_out` to `recipient`, keeping reserves in sync.
/// The deposit must already have been checked by [`check_swap_request`].
pub(crate) fn settle_swap(
    ledger: &mut Ledger,
    info: &AdapterInfo,
    token_in: &Pubkey,
    amount_in: u64,
    token_out: &Pubkey,
    amount_out: u64,
    recipient: &Pubkey,
) -> SwapResult<()> {
    let pool = info.pool_address();

    let reserve_out = ledger.reserve_of(&pool, token_out);
    if amount_out > reserve_out {
        return Err(SwapError::InsufficientLiquidity {
            venue: info.name.clone(),
            available: reserve_out,
            required: amount_out,
        });
    }

    let reserve_in = ledger
        .reserve_of(&pool, token_in)
        .checked_add(amount_in)
        .ok_or(SwapError::MathOverflow)?;
    ledger.set_reserve(&pool, token_in, reserve_in);
    ledger.set_reserve(&pool, token_out, reserve_out - amount_out);
    ledger.transfer(&pool, recipient, token_out, amount_out)?;

    debug!(
        "{}: settled {} {} -> {} {} to {}",
        info.name, amount_in, token_in, amount_out, token_out, recipient
    );
    Ok(())
}

/// Turn a priced output into the amount to pay, or the reason nothing can
/// be paid.
pub(crate) fn require_output(
    ledger: &Ledger,
    info: &AdapterInfo,
    amount_in: u64,
    token_in: &Pubkey,
    token_out: &Pubkey,
    priced: Option<u64>,
) -> SwapResult<u64> {
    match priced {
        Some(0) => Err(SwapError::InvalidAmount(format!(
            "{} of {} is too small to buy any {} on {}",
            amount_in, token_in, token_out, info.name
        ))),
        Some(amount_out) => Ok(amount_out),
        None if ledger.reserve_of(&info.pool_address(), token_out) == 0 => {
            Err(SwapError::InsufficientLiquidity {
                venue: info.name.clone(),
                available: 0,
                required: 1,
            })
        }
        None => Err(SwapError::InvalidPoolState(format!(
            "{} cannot price {} of {}",
            info.name, amount_in, token_in
        ))),
    }
}

/// Common precondition checks for `swap`: a supported pair, a positive
/// amount and at least `amount_in` of `token_in` waiting at the deposit.
pub(crate) fn check_swap_request(
    ledger: &Ledger,
    info: &AdapterInfo,
    tokens: &[Pubkey],
    amount_in: u64,
    token_in: &Pubkey,
    token_out: &Pubkey,
) -> SwapResult<(usize, usize)> {
    let indices = pair_indices(tokens, token_in, token_out).ok_or(SwapError::UnsupportedPair {
        adapter: info.address,
        token_in: *token_in,
        token_out: *token_out,
    })?;
    if amount_in == 0 {
        return Err(SwapError::InvalidAmount(
            "Swap amount must be positive".to_string(),
        ));
    }

    let pool = info.pool_address();
    let deposited = ledger.unsynced_balance(&pool, token_in);
    if deposited < amount_in {
        return Err(SwapError::InsufficientDeposit {
            deposit: pool,
            available: deposited,
            required: amount_in,
        });
    }
    Ok(indices)
}

#[cfg(test)]
mod tests;
