use crate::core::{BPS_DENOMINATOR, NEWTON_ITERATIONS};

uint::construct_uint! {
    /// 256-bit unsigned integer all pool math runs on. Math helpers return
    /// `None` instead of overflowing or dividing by zero.
    pub struct U256(4);
}

pub fn to_u64(value: U256) -> Option<u64> {
    if value > U256::from(u64::MAX) {
        None
    } else {
        Some(value.low_u64())
    }
}

/// Remove a basis-point fee from `amount`, rounding the fee down.
pub fn deduct_fee(amount: U256, fee_bps: u64) -> Option<U256> {
    let fee = amount.checked_mul(U256::from(fee_bps))? / U256::from(BPS_DENOMINATOR);
    amount.checked_sub(fee)
}

/// Scale factors that lift every token of a pool to the largest decimals
/// in the pool. Callers keep decimals within `MAX_TOKEN_DECIMALS`.
pub fn precision_multipliers(decimals: &[u8]) -> Vec<U256> {
    let max = decimals.iter().copied().max().unwrap_or(0);
    decimals
        .iter()
        .map(|d| U256::exp10((max - d) as usize))
        .collect()
}

/// x * y = k output with the fee charged on the input.
///
/// out = (in * (1 - fee) * reserve_out) / (reserve_in + in * (1 - fee))
pub fn constant_product_out(
    amount_in: u64,
    reserve_in: u64,
    reserve_out: u64,
    fee_bps: u64,
) -> Option<u64> {
    if amount_in == 0 || reserve_in == 0 || reserve_out == 0 {
        return None;
    }

    let fee_multiplier = U256::from(BPS_DENOMINATOR.checked_sub(fee_bps)?);
    let amount_in_with_fee = U256::from(amount_in).checked_mul(fee_multiplier)?;
    let numerator = amount_in_with_fee.checked_mul(U256::from(reserve_out))?;
    let denominator = U256::from(reserve_in)
        .checked_mul(U256::from(BPS_DENOMINATOR))?
        .checked_add(amount_in_with_fee)?;

    if denominator.is_zero() {
        return None;
    }
    to_u64(numerator / denominator)
}

/// StableSwap invariant D for normalized balances `xp`.
///
/// A·n·Σx + D = A·n·D + D^(n+1) / (n^n · Πx), solved with Newton's method.
pub fn stable_invariant(xp: &[U256], amp: u64) -> Option<U256> {
    let n = U256::from(xp.len() as u64);
    let sum = xp
        .iter()
        .try_fold(U256::zero(), |acc, x| acc.checked_add(*x))?;
    if sum.is_zero() {
        return Some(U256::zero());
    }
    if amp == 0 || xp.iter().any(|x| x.is_zero()) {
        return None;
    }

    let ann = U256::from(amp).checked_mul(n)?;
    let mut d = sum;

    for _ in 0..NEWTON_ITERATIONS {
        let mut d_product = d;
        for x in xp {
            d_product = d_product.checked_mul(d)? / x.checked_mul(n)?;
        }

        let d_prev = d;
        let numerator = ann
            .checked_mul(sum)?
            .checked_add(d_product.checked_mul(n)?)?
            .checked_mul(d)?;
        let denominator = ann
            .checked_sub(U256::one())?
            .checked_mul(d)?
            .checked_add(n.checked_add(U256::one())?.checked_mul(d_product)?)?;
        if denominator.is_zero() {
            return None;
        }
        d = numerator / denominator;

        if abs_diff(d, d_prev) <= U256::one() {
            return Some(d);
        }
    }

    Some(d)
}

/// Balance of coin `j` that keeps the invariant when coin `i` holds `x`.
pub fn stable_balance_after(i: usize, j: usize, x: U256, xp: &[U256], amp: u64) -> Option<U256> {
    let n_coins = xp.len();
    if i == j || i >= n_coins || j >= n_coins {
        return None;
    }

    let n = U256::from(n_coins as u64);
    let d = stable_invariant(xp, amp)?;
    let ann = U256::from(amp).checked_mul(n)?;

    let mut c = d;
    let mut sum = U256::zero();
    for (k, balance) in xp.iter().enumerate() {
        let xk = if k == i {
            x
        } else if k != j {
            *balance
        } else {
            continue;
        };
        if xk.is_zero() {
            return None;
        }
        sum = sum.checked_add(xk)?;
        c = c.checked_mul(d)? / xk.checked_mul(n)?;
    }
    c = c.checked_mul(d)? / ann.checked_mul(n)?;
    let b = sum.checked_add(d / ann)?;

    let mut y = d;
    for _ in 0..NEWTON_ITERATIONS {
        let y_prev = y;
        let numerator = y.checked_mul(y)?.checked_add(c)?;
        let denominator = y
            .checked_mul(U256::from(2u64))?
            .checked_add(b)?
            .checked_sub(d)?;
        if denominator.is_zero() {
            return None;
        }
        y = numerator / denominator;

        if abs_diff(y, y_prev) <= U256::one() {
            return Some(y);
        }
    }

    Some(y)
}

/// Normalized output of coin `j` for `dx` of coin `i`, before fees.
/// One unit is held back to absorb the rounding of the Newton solve.
pub fn stable_swap_out(i: usize, j: usize, dx: U256, xp: &[U256], amp: u64) -> Option<U256> {
    let x = xp.get(i)?.checked_add(dx)?;
    let y = stable_balance_after(i, j, x, xp, amp)?;
    xp.get(j)?.checked_sub(y)?.checked_sub(U256::one())
}

fn abs_diff(a: U256, b: U256) -> U256 {
    if a > b {
        a - b
    } else {
        b - a
    }
}
