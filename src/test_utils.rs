use crate::adapters::{
    Adapter, AdapterInfo, ConstantProductAdapter, ConstantSumAdapter, StableSwapAdapter,
};
use crate::core::{
    Ledger, CONSTANT_PRODUCT_FEE_BPS, CONSTANT_PRODUCT_PROGRAM, CONSTANT_SUM_FEE_BPS,
    CONSTANT_SUM_PROGRAM, DEFAULT_AMP_FACTOR, STABLE_SWAP_FEE_BPS, STABLE_SWAP_PROGRAM,
};
use solana_sdk::pubkey::Pubkey;
use std::sync::Arc;

pub fn adapter_info(
    name: &str,
    program_id: Pubkey,
    gas_estimate: u64,
    underquote_tolerance: u64,
) -> AdapterInfo {
    AdapterInfo {
        name: name.to_string(),
        address: Pubkey::new_unique(),
        owner: Pubkey::new_unique(),
        program_id,
        gas_estimate,
        underquote_tolerance,
    }
}

pub fn constant_product_with_gas(
    ledger: &mut Ledger,
    token_a: Pubkey,
    token_b: Pubkey,
    reserves: [u64; 2],
    gas_estimate: u64,
) -> Arc<dyn Adapter> {
    let info = adapter_info("cp", *CONSTANT_PRODUCT_PROGRAM, gas_estimate, 0);
    let adapter =
        ConstantProductAdapter::new(info, token_a, token_b, CONSTANT_PRODUCT_FEE_BPS).unwrap();
    adapter.seed_liquidity(ledger, &reserves).unwrap();
    Arc::new(adapter)
}

pub fn constant_product(
    ledger: &mut Ledger,
    token_a: Pubkey,
    token_b: Pubkey,
    reserves: [u64; 2],
) -> Arc<dyn Adapter> {
    constant_product_with_gas(ledger, token_a, token_b, reserves, 100_000)
}

pub fn stable_swap(
    ledger: &mut Ledger,
    tokens: Vec<Pubkey>,
    decimals: &[u8],
    reserves: &[u64],
    underquote_tolerance: u64,
) -> Arc<StableSwapAdapter> {
    let info = adapter_info("stable", *STABLE_SWAP_PROGRAM, 160_000, underquote_tolerance);
    let adapter = StableSwapAdapter::new(
        info,
        tokens,
        decimals,
        DEFAULT_AMP_FACTOR,
        STABLE_SWAP_FEE_BPS,
    )
    .unwrap();
    adapter.seed_liquidity(ledger, reserves).unwrap();
    Arc::new(adapter)
}

pub fn constant_sum(
    ledger: &mut Ledger,
    tokens: [Pubkey; 2],
    decimals: [u8; 2],
    reserves: [u64; 2],
) -> Arc<ConstantSumAdapter> {
    let info = adapter_info("sum", *CONSTANT_SUM_PROGRAM, 60_000, 0);
    let adapter = ConstantSumAdapter::new(info, tokens, decimals, CONSTANT_SUM_FEE_BPS).unwrap();
    adapter.seed_liquidity(ledger, &reserves).unwrap();
    Arc::new(adapter)
}

/// Send `amount` of `token_in` to the adapter's deposit address and swap it.
pub fn deposit_and_swap(
    ledger: &mut Ledger,
    adapter: &dyn Adapter,
    from: &Pubkey,
    amount: u64,
    token_in: &Pubkey,
    token_out: &Pubkey,
) -> crate::core::SwapResult<u64> {
    let deposit = adapter.deposit_address(token_in, token_out);
    ledger.transfer(from, &deposit, token_in, amount)?;
    adapter.swap(ledger, amount, token_in, token_out, from)
}
