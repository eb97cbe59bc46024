use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

// Canonical wrapped-native token (wSOL)
pub const WRAPPED_NATIVE_MINT: &str = "So11111111111111111111111111111111111111112";

// Venue program IDs used to derive pool accounts
pub const CONSTANT_PRODUCT_PROGRAM_ID: &str = "CPMDWBwJDtYax9qW7AyRuVC19Cc4L4Vcy4n2BHAbHkCW";
pub const STABLE_SWAP_PROGRAM_ID: &str = "5quBtoiQqxF9Jv6KYKctB59NT3gtJD2Y65kdnB1Uev3h";
pub const CONSTANT_SUM_PROGRAM_ID: &str = "routeUGWgWzqBWFcrCfv8tritsqukccJPu3q5GPP3xS";

lazy_static::lazy_static! {
    pub static ref WRAPPED_NATIVE: Pubkey = Pubkey::from_str(WRAPPED_NATIVE_MINT).unwrap();
    pub static ref CONSTANT_PRODUCT_PROGRAM: Pubkey = Pubkey::from_str(CONSTANT_PRODUCT_PROGRAM_ID).unwrap();
    pub static ref STABLE_SWAP_PROGRAM: Pubkey = Pubkey::from_str(STABLE_SWAP_PROGRAM_ID).unwrap();
    pub static ref CONSTANT_SUM_PROGRAM: Pubkey = Pubkey::from_str(CONSTANT_SUM_PROGRAM_ID).unwrap();
}

// Seed for program-derived pool accounts
pub const POOL_SEED: &[u8] = b"pool";

// Fees are expressed in basis points
pub const BPS_DENOMINATOR: u64 = 10_000;
pub const CONSTANT_PRODUCT_FEE_BPS: u64 = 30; // 0.3%
pub const STABLE_SWAP_FEE_BPS: u64 = 4; // 0.04%
pub const CONSTANT_SUM_FEE_BPS: u64 = 10; // 0.1%

// Gas estimates per hop, in gas units
pub const CONSTANT_PRODUCT_GAS_ESTIMATE: u64 = 90_000;
pub const STABLE_SWAP_GAS_ESTIMATE: u64 = 160_000;
pub const CONSTANT_SUM_GAS_ESTIMATE: u64 = 60_000;

// StableSwap defaults
pub const DEFAULT_AMP_FACTOR: u64 = 200;
pub const STABLE_SWAP_UNDERQUOTE: u64 = 1;
pub const NEWTON_ITERATIONS: usize = 255;

// Path search
pub const DEFAULT_MAX_HOPS: usize = 3;
pub const MAX_HOPS_LIMIT: usize = 4;
pub const GAS_CONVERSION_MAX_HOPS: usize = 2;

// Slippage
pub const DEFAULT_SLIPPAGE_BPS: u16 = 50; // 0.5%
pub const MAX_SLIPPAGE_BPS: u16 = 1000; // 10%

// Largest token precision amounts can be scaled and displayed at
pub const MAX_TOKEN_DECIMALS: u8 = 28;

// Sentinel symbol for the chain's native currency in scenarios and CLI input
pub const NATIVE_SYMBOL: &str = "NATIVE";
