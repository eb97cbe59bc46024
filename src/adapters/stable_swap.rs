use crate::adapters::math::{self, U256};
use crate::adapters::{
    check_swap_request, pair_indices, pool_reserves, require_output, settle_swap, Adapter,
    AdapterInfo,
};
use crate::core::{
    Ledger, SwapError, SwapResult, VenueKind, BPS_DENOMINATOR, MAX_TOKEN_DECIMALS,
};
use log::debug;
use solana_sdk::pubkey::Pubkey;

/// StableSwap pool for correlated assets.
///
/// Balances are normalized to the largest decimals in the pool before the
/// invariant is solved, so a 6-decimal and a 9-decimal dollar trade 1:1.
/// Quotes are shaded down by the adapter's underquote tolerance to cover the
/// rounding drift of the Newton solve.
#[derive(Debug, Clone)]
pub struct StableSwapAdapter {
    info: AdapterInfo,
    tokens: Vec<Pubkey>,
    multipliers: Vec<U256>,
    amp_factor: u64,
    fee_bps: u64,
}

impl StableSwapAdapter {
    pub fn new(
        info: AdapterInfo,
        tokens: Vec<Pubkey>,
        decimals: &[u8],
        amp_factor: u64,
        fee_bps: u64,
    ) -> SwapResult<Self> {
        if tokens.len() < 2 {
            return Err(SwapError::InvalidPoolState(
                "Stable pool must have at least 2 tokens".to_string(),
            ));
        }
        if tokens.len() != decimals.len() {
            return Err(SwapError::InvalidPoolState(
                "Stable pool needs decimals for every token".to_string(),
            ));
        }
        for (k, token) in tokens.iter().enumerate() {
            if tokens[..k].contains(token) {
                return Err(SwapError::InvalidPoolState(format!(
                    "Token {} listed twice",
                    token
                )));
            }
        }
        if let Some(d) = decimals.iter().find(|d| **d > MAX_TOKEN_DECIMALS) {
            return Err(SwapError::InvalidPoolState(format!(
                "{} decimals exceeds the supported {}",
                d, MAX_TOKEN_DECIMALS
            )));
        }
        if amp_factor == 0 {
            return Err(SwapError::InvalidPoolState(
                "Amplification factor must be positive".to_string(),
            ));
        }
        if fee_bps >= BPS_DENOMINATOR {
            return Err(SwapError::InvalidPoolState(format!(
                "Fee of {} bps leaves nothing to swap",
                fee_bps
            )));
        }

        Ok(Self {
            info,
            tokens,
            multipliers: math::precision_multipliers(decimals),
            amp_factor,
            fee_bps,
        })
    }

    pub fn amp_factor(&self) -> u64 {
        self.amp_factor
    }

    pub fn fee_bps(&self) -> u64 {
        self.fee_bps
    }

    /// Exact output the pool pays for `amount_in`, after fees.
    fn output_amount(&self, ledger: &Ledger, amount_in: u64, i: usize, j: usize) -> Option<u64> {
        if amount_in == 0 {
            return None;
        }

        let reserves = pool_reserves(ledger, &self.pool_address(), &self.tokens);
        let xp = reserves
            .iter()
            .zip(&self.multipliers)
            .map(|(reserve, multiplier)| U256::from(*reserve).checked_mul(*multiplier))
            .collect::<Option<Vec<_>>>()?;

        let dx = U256::from(amount_in).checked_mul(self.multipliers[i])?;
        let dy = math::stable_swap_out(i, j, dx, &xp, self.amp_factor)?;
        let dy = math::deduct_fee(dy, self.fee_bps)?;
        math::to_u64(dy / self.multipliers[j])
    }
}

impl Adapter for StableSwapAdapter {
    fn info(&self) -> &AdapterInfo {
        &self.info
    }

    fn kind(&self) -> VenueKind {
        VenueKind::StableSwap
    }

    fn tokens(&self) -> &[Pubkey] {
        &self.tokens
    }

    fn query(&self, ledger: &Ledger, amount_in: u64, token_in: &Pubkey, token_out: &Pubkey) -> u64 {
        let Some((i, j)) = pair_indices(&self.tokens, token_in, token_out) else {
            return 0;
        };
        self.output_amount(ledger, amount_in, i, j)
            .map(|out| out.saturating_sub(self.info.underquote_tolerance))
            .unwrap_or(0)
    }

    fn swap(
        &self,
        ledger: &mut Ledger,
        amount_in: u64,
        token_in: &Pubkey,
        token_out: &Pubkey,
        recipient: &Pubkey,
    ) -> SwapResult<u64> {
        let (i, j) =
            check_swap_request(ledger, &self.info, &self.tokens, amount_in, token_in, token_out)?;

        let priced = self.output_amount(ledger, amount_in, i, j);
        let amount_out =
            require_output(ledger, &self.info, amount_in, token_in, token_out, priced)?;

        debug!(
            "{}: stable swap {} -> {} (amp {}, fee {} bps)",
            self.info.name, amount_in, amount_out, self.amp_factor, self.fee_bps
        );

        settle_swap(ledger, &self.info, token_in, amount_in, token_out, amount_out, recipient)?;
        Ok(amount_out)
    }
}
