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

/// Two-token pool that trades 1:1 after decimal normalization, minus a fee,
/// until the output side runs dry.
#[derive(Debug, Clone)]
pub struct ConstantSumAdapter {
    info: AdapterInfo,
    tokens: [Pubkey; 2],
    multipliers: Vec<U256>,
    fee_bps: u64,
}

impl ConstantSumAdapter {
    pub fn new(
        info: AdapterInfo,
        tokens: [Pubkey; 2],
        decimals: [u8; 2],
        fee_bps: u64,
    ) -> SwapResult<Self> {
        if tokens[0] == tokens[1] {
            return Err(SwapError::InvalidPoolState(
                "Constant sum pool needs two distinct tokens".to_string(),
            ));
        }
        if fee_bps >= BPS_DENOMINATOR {
            return Err(SwapError::InvalidPoolState(format!(
                "Fee of {} bps leaves nothing to swap",
                fee_bps
            )));
        }
        if let Some(d) = decimals.iter().find(|d| **d > MAX_TOKEN_DECIMALS) {
            return Err(SwapError::InvalidPoolState(format!(
                "{} decimals exceeds the supported {}",
                d, MAX_TOKEN_DECIMALS
            )));
        }
        Ok(Self {
            info,
            tokens,
            multipliers: math::precision_multipliers(&decimals),
            fee_bps,
        })
    }

    pub fn fee_bps(&self) -> u64 {
        self.fee_bps
    }

    /// 1:1 output after normalization and fees, ignoring the reserve.
    fn raw_output(&self, amount_in: u64, i: usize, j: usize) -> Option<u64> {
        if amount_in == 0 {
            return None;
        }
        let normalized = U256::from(amount_in).checked_mul(self.multipliers[i])?;
        let after_fee = math::deduct_fee(normalized, self.fee_bps)?;
        math::to_u64(after_fee / self.multipliers[j])
    }

    fn output_amount(&self, ledger: &Ledger, amount_in: u64, i: usize, j: usize) -> Option<u64> {
        let amount_out = self.raw_output(amount_in, i, j)?;
        let reserves = pool_reserves(ledger, &self.pool_address(), &self.tokens);
        (amount_out <= reserves[j]).then_some(amount_out)
    }
}

impl Adapter for ConstantSumAdapter {
    fn info(&self) -> &AdapterInfo {
        &self.info
    }

    fn kind(&self) -> VenueKind {
        VenueKind::ConstantSum
    }

    fn tokens(&self) -> &[Pubkey] {
        &self.tokens
    }

    fn query(&self, ledger: &Ledger, amount_in: u64, token_in: &Pubkey, token_out: &Pubkey) -> u64 {
        let Some((i, j)) = pair_indices(&self.tokens, token_in, token_out) else {
            return 0;
        };
        self.output_amount(ledger, amount_in, i, j).unwrap_or(0)
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

        // Settlement reports a shortfall against the output reserve.
        let priced = self.raw_output(amount_in, i, j);
        let amount_out =
            require_output(ledger, &self.info, amount_in, token_in, token_out, priced)?;

        debug!("{}: constant sum {} -> {}", self.info.name, amount_in, amount_out);

        settle_swap(ledger, &self.info, token_in, amount_in, token_out, amount_out, recipient)?;
        Ok(amount_out)
    }
}
