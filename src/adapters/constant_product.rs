use crate::adapters::{
    check_swap_request, math, pair_indices, pool_reserves, require_output, settle_swap, Adapter,
    AdapterInfo,
};
use crate::core::{Ledger, SwapError, SwapResult, VenueKind, BPS_DENOMINATOR};
use log::debug;
use solana_sdk::pubkey::Pubkey;

/// Two-token pool using the constant product formula: x * y = k
#[derive(Debug, Clone)]
pub struct ConstantProductAdapter {
    info: AdapterInfo,
    tokens: [Pubkey; 2],
    fee_bps: u64,
}

impl ConstantProductAdapter {
    pub fn new(info: AdapterInfo, token_a: Pubkey, token_b: Pubkey, fee_bps: u64) -> SwapResult<Self> {
        if token_a == token_b {
            return Err(SwapError::InvalidPoolState(
                "Constant product pool needs two distinct tokens".to_string(),
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
            tokens: [token_a, token_b],
            fee_bps,
        })
    }

    pub fn fee_bps(&self) -> u64 {
        self.fee_bps
    }

    fn output_amount(&self, ledger: &Ledger, amount_in: u64, i: usize, j: usize) -> Option<u64> {
        let reserves = pool_reserves(ledger, &self.pool_address(), &self.tokens);
        math::constant_product_out(amount_in, reserves[i], reserves[j], self.fee_bps)
    }
}

impl Adapter for ConstantProductAdapter {
    fn info(&self) -> &AdapterInfo {
        &self.info
    }

    fn kind(&self) -> VenueKind {
        VenueKind::ConstantProduct
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

        let priced = self.output_amount(ledger, amount_in, i, j);
        let amount_out =
            require_output(ledger, &self.info, amount_in, token_in, token_out, priced)?;

        debug!(
            "{}: constant product {} -> {} (fee {} bps)",
            self.info.name, amount_in, amount_out, self.fee_bps
        );

        settle_swap(ledger, &self.info, token_in, amount_in, token_out, amount_out, recipient)?;
        Ok(amount_out)
    }
}
