use crate::core::{SwapError, SwapResult, TokenInfo, MAX_TOKEN_DECIMALS};
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};
use solana_sdk::pubkey::Pubkey;
use std::str::FromStr;

/// Resolve a token symbol (case-insensitive) or base58 address.
pub fn parse_token_identifier(input: &str, tokens: &[TokenInfo]) -> Option<Pubkey> {
    if let Some(token) = tokens
        .iter()
        .find(|t| t.symbol.eq_ignore_ascii_case(input.trim()))
    {
        return Some(token.mint);
    }
    Pubkey::from_str(input.trim()).ok()
}

/// Deterministic identifier for a named entity within a namespace.
pub fn derive_address(namespace: &str, label: &str) -> Pubkey {
    let mut hasher = Sha256::new();
    hasher.update(namespace.as_bytes());
    hasher.update(b":");
    hasher.update(label.as_bytes());
    Pubkey::new_from_array(hasher.finalize().into())
}

/// Render a base-unit amount with the token's decimals, e.g. 1500000 at 6
/// decimals is "1.5". Precision beyond what `Decimal` holds falls back to
/// exponent notation.
pub fn format_units(amount: u64, decimals: u8) -> String {
    match Decimal::try_from_i128_with_scale(amount as i128, decimals as u32) {
        Ok(value) => value.normalize().to_string(),
        Err(_) => format!("{}e-{}", amount, decimals),
    }
}

/// Parse a human amount such as "1.5" into base units.
pub fn parse_amount(input: &str, decimals: u8) -> SwapResult<u64> {
    if decimals > MAX_TOKEN_DECIMALS {
        return Err(SwapError::InvalidAmount(format!(
            "{} decimals exceeds the supported {}",
            decimals, MAX_TOKEN_DECIMALS
        )));
    }
    let value = Decimal::from_str(input.trim())
        .map_err(|e| SwapError::InvalidAmount(format!("{}: {}", input, e)))?
        .normalize();

    if value.is_sign_negative() {
        return Err(SwapError::InvalidAmount(format!(
            "{} is negative",
            input
        )));
    }
    if value.scale() > decimals as u32 {
        return Err(SwapError::InvalidAmount(format!(
            "{} has more than {} decimals",
            input, decimals
        )));
    }

    let mut scaled = value;
    scaled.rescale(decimals as u32);
    if scaled.scale() != decimals as u32 {
        return Err(SwapError::InvalidAmount(format!("{} is too large", input)));
    }
    u64::try_from(scaled.mantissa())
        .map_err(|_| SwapError::InvalidAmount(format!("{} is too large", input)))
}

/// Format large numbers with thousands separators
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();

    for (count, ch) in s.chars().rev().enumerate() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }

    result.chars().rev().collect()
}

/// Short form of an address for tables.
pub fn short_address(address: &Pubkey) -> String {
    let s = address.to_string();
    if s.len() <= 10 {
        return s;
    }
    format!("{}..{}", &s[..4], &s[s.len() - 4..])
}
