use super::*;
use crate::core::{CONSTANT_PRODUCT_PROGRAM, STABLE_SWAP_PROGRAM};
use crate::test_utils::{adapter_info, constant_product, constant_sum, deposit_and_swap, stable_swap};
use std::sync::Arc;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use test_case::test_case;

fn funded(ledger: &mut Ledger, token: &Pubkey, amount: u64) -> Pubkey {
    let account = Pubkey::new_unique();
    ledger.mint(&account, token, amount).unwrap();
    account
}

#[test]
fn test_stable_quote_underquotes_by_tolerance() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (usdc, usdt) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = stable_swap(
        &mut ledger,
        vec![usdc, usdt],
        &[6, 6],
        &[1_000_000_000_000, 1_000_000_000_000],
        1,
    );
    let trader = funded(&mut ledger, &usdc, 100_000_000);

    let quoted = pool.query(&ledger, 100_000_000, &usdc, &usdt);
    assert!(quoted > 99_900_000);

    let received = deposit_and_swap(&mut ledger, pool.as_ref(), &trader, 100_000_000, &usdc, &usdt)
        .unwrap();

    assert_eq!(received, quoted + 1);
    assert_eq!(ledger.balance_of(&trader, &usdt), received);
    assert_eq!(ledger.balance_of(&trader, &usdc), 0);
}

#[test]
fn test_stable_swap_normalizes_decimals() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (six, nine) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = stable_swap(
        &mut ledger,
        vec![six, nine],
        &[6, 9],
        &[1_000_000_000_000, 1_000_000_000_000_000],
        1,
    );

    let out = pool.query(&ledger, 1_000_000, &six, &nine);
    assert!(out > 999_000_000 && out < 1_000_000_000, "got {}", out);

    let back = pool.query(&ledger, 1_000_000_000, &nine, &six);
    assert!(back > 999_000 && back < 1_000_000, "got {}", back);
}

#[test]
fn test_stable_swap_three_coins() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let tokens = vec![Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique()];
    let pool = stable_swap(&mut ledger, tokens.clone(), &[6, 6, 6], &[5_000_000; 3], 1);

    assert!(pool.query(&ledger, 10_000, &tokens[0], &tokens[2]) > 9_900);
    assert!(pool.query(&ledger, 10_000, &tokens[2], &tokens[1]) > 9_900);
    assert_eq!(pool.token_index(&tokens[2]), Some(2));
}

#[test]
fn test_constant_product_quote_is_exact() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000_000, 1_000_000]);
    let trader = funded(&mut ledger, &a, 1_000);

    let quoted = pool.query(&ledger, 1_000, &a, &b);
    assert_eq!(quoted, 996);

    let received = deposit_and_swap(&mut ledger, pool.as_ref(), &trader, 1_000, &a, &b).unwrap();
    assert_eq!(received, quoted);

    let reserves = pool_reserves(&ledger, &pool.pool_address(), pool.tokens());
    assert_eq!(reserves, vec![1_001_000, 999_004]);
}

#[test]
fn test_constant_sum_normalizes_decimals() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (six, nine) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_sum(
        &mut ledger,
        [six, nine],
        [6, 9],
        [1_000_000_000_000, 1_000_000_000_000_000],
    );

    assert_eq!(pool.query(&ledger, 1_000_000, &six, &nine), 999_000_000);
    assert_eq!(pool.query(&ledger, 1_000_000_000, &nine, &six), 999_000);
}

#[test]
fn test_constant_sum_bounded_by_reserve() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_sum(&mut ledger, [a, b], [6, 6], [1_000, 1_000]);
    let trader = funded(&mut ledger, &a, 5_000);

    assert_eq!(pool.query(&ledger, 5_000, &a, &b), 0);

    let err = deposit_and_swap(&mut ledger, pool.as_ref(), &trader, 5_000, &a, &b).unwrap_err();
    assert_eq!(
        err,
        SwapError::InsufficientLiquidity {
            venue: "sum".to_string(),
            available: 1_000,
            required: 4_995,
        }
    );
    assert_eq!(ledger.unsynced_balance(&pool.pool_address(), &a), 5_000);
    assert_eq!(ledger.reserve_of(&pool.pool_address(), &b), 1_000);
}

#[test]
fn test_unsupported_pair_quotes_zero_and_swap_fails() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b, stranger) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000_000, 1_000_000]);

    assert_eq!(pool.query(&ledger, 1_000, &a, &stranger), 0);
    assert_eq!(pool.query(&ledger, 1_000, &a, &a), 0);
    assert_eq!(pool.query(&ledger, 0, &a, &b), 0);

    let err = pool
        .swap(&mut ledger, 1_000, &a, &stranger, &Pubkey::new_unique())
        .unwrap_err();
    assert_eq!(
        err,
        SwapError::UnsupportedPair {
            adapter: pool.address(),
            token_in: a,
            token_out: stranger,
        }
    );
}

#[test]
fn test_zero_amount_swap_rejected() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000_000, 1_000_000]);

    let err = pool
        .swap(&mut ledger, 0, &a, &b, &Pubkey::new_unique())
        .unwrap_err();
    assert!(matches!(err, SwapError::InvalidAmount(_)));
}

#[test]
fn test_swap_without_enough_deposit_fails() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000_000, 1_000_000]);
    let trader = funded(&mut ledger, &a, 50);

    ledger
        .transfer(&trader, &pool.deposit_address(&a, &b), &a, 50)
        .unwrap();
    let err = pool.swap(&mut ledger, 100, &a, &b, &trader).unwrap_err();

    assert_eq!(
        err,
        SwapError::InsufficientDeposit {
            deposit: pool.pool_address(),
            available: 50,
            required: 100,
        }
    );
    assert_eq!(ledger.balance_of(&trader, &b), 0);
}

#[test]
fn test_missing_deposit_reported_before_pricing() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let venues: Vec<Arc<dyn Adapter>> = vec![
        constant_product(&mut ledger, a, b, [1_000_000, 1_000_000]),
        stable_swap(&mut ledger, vec![a, b], &[6, 6], &[1_000_000, 1_000_000], 1) as Arc<dyn Adapter>,
        constant_sum(&mut ledger, [a, b], [6, 6], [1_000_000, 1_000_000]) as Arc<dyn Adapter>,
    ];

    for venue in venues {
        let err = venue
            .swap(&mut ledger, 1_000, &a, &b, &Pubkey::new_unique())
            .unwrap_err();
        assert_eq!(
            err,
            SwapError::InsufficientDeposit {
                deposit: venue.pool_address(),
                available: 0,
                required: 1_000,
            },
            "{}",
            venue.kind()
        );
    }
}

#[test]
fn test_dust_amount_buys_nothing() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000_000, 1_000]);
    let trader = funded(&mut ledger, &a, 1);

    assert_eq!(pool.query(&ledger, 1, &a, &b), 0);
    let err = deposit_and_swap(&mut ledger, pool.as_ref(), &trader, 1, &a, &b).unwrap_err();

    assert!(matches!(err, SwapError::InvalidAmount(_)), "got {:?}", err);
    assert_eq!(ledger.reserve_of(&pool.pool_address(), &a), 1_000_000);
    assert_eq!(ledger.reserve_of(&pool.pool_address(), &b), 1_000);
    assert_eq!(ledger.unsynced_balance(&pool.pool_address(), &a), 1);
}

#[test]
fn test_excess_deposit_goes_to_next_swapper() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000_000, 1_000_000]);
    let alice = funded(&mut ledger, &a, 2_000);
    let bob = Pubkey::new_unique();
    let deposit = pool.deposit_address(&a, &b);

    // Alice sends twice what she swaps.
    ledger.transfer(&alice, &deposit, &a, 2_000).unwrap();
    let alice_out = pool.swap(&mut ledger, 1_000, &a, &b, &alice).unwrap();
    assert_eq!(alice_out, 996);
    assert_eq!(ledger.unsynced_balance(&deposit, &a), 1_000);

    // Bob deposits nothing and claims the surplus.
    let bob_out = pool.swap(&mut ledger, 1_000, &a, &b, &bob).unwrap();
    assert!(bob_out > 0 && bob_out < alice_out);
    assert_eq!(ledger.balance_of(&bob, &b), bob_out);
    assert_eq!(ledger.unsynced_balance(&deposit, &a), 0);

    let err = pool.swap(&mut ledger, 1, &a, &b, &alice).unwrap_err();
    assert!(matches!(err, SwapError::InsufficientDeposit { .. }));
}

#[test]
fn test_recover_token_is_owner_only() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000_000, 1_000_000]);
    ledger.mint(&pool.address(), &a, 500).unwrap();
    let stranger = Pubkey::new_unique();

    let err = pool.recover_token(&mut ledger, &stranger, &a, 500).unwrap_err();
    assert!(matches!(err, SwapError::Unauthorized { .. }));
    assert_eq!(ledger.balance_of(&pool.address(), &a), 500);

    pool.recover_token(&mut ledger, &pool.owner(), &a, 500).unwrap();
    assert_eq!(ledger.balance_of(&pool.owner(), &a), 500);
    assert_eq!(ledger.balance_of(&pool.address(), &a), 0);

    // The pool account is the venue's custody, not the adapter's.
    assert!(pool.recover_token(&mut ledger, &pool.owner(), &a, 1).is_err());
    assert_eq!(ledger.balance_of(&pool.pool_address(), &a), 1_000_000);
}

#[test]
fn test_recover_native_is_owner_only() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000, 1_000]);
    ledger.credit_native(&pool.address(), 70).unwrap();

    assert!(pool
        .recover_native(&mut ledger, &Pubkey::new_unique(), 70)
        .is_err());
    pool.recover_native(&mut ledger, &pool.owner(), 70).unwrap();
    assert_eq!(ledger.native_balance_of(&pool.owner()), 70);
}

#[test]
fn test_introspection() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b, c) = (Pubkey::new_unique(), Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000, 1_000]);

    assert!(pool.is_pool_token(&a));
    assert!(!pool.is_pool_token(&c));
    assert_eq!(pool.token_index(&b), Some(1));
    assert_eq!(pool.token_index(&c), None);
    assert_eq!(pool.kind(), VenueKind::ConstantProduct);
    assert_eq!(pool.deposit_address(&a, &b), pool.pool_address());
    assert_ne!(pool.pool_address(), pool.address());
}

#[test]
fn test_seed_liquidity_checks_length() {
    let mut ledger = Ledger::new(Pubkey::new_unique());
    let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
    let pool = constant_product(&mut ledger, a, b, [1_000, 2_000]);

    assert!(pool.seed_liquidity(&mut ledger, &[1]).is_err());

    pool.seed_liquidity(&mut ledger, &[10, 20]).unwrap();
    assert_eq!(ledger.reserve_of(&pool.pool_address(), &a), 1_010);
    assert_eq!(ledger.reserve_of(&pool.pool_address(), &b), 2_020);
}

#[test_case(vec![] ; "no tokens")]
#[test_case(vec![9] ; "single token")]
#[test_case(vec![6, 6, 6] ; "decimals mismatch")]
#[test_case(vec![0, 29] ; "decimals beyond supported precision")]
fn test_stable_swap_rejects_bad_layout(decimals: Vec<u8>) {
    let info = adapter_info("bad", *STABLE_SWAP_PROGRAM, 1, 0);
    let tokens: Vec<Pubkey> = decimals.iter().take(2).map(|_| Pubkey::new_unique()).collect();
    assert!(StableSwapAdapter::new(info, tokens, &decimals, 100, 4).is_err());
}

#[test]
fn test_constructors_reject_duplicate_tokens_and_full_fee() {
    let token = Pubkey::new_unique();
    let info = adapter_info("bad", *CONSTANT_PRODUCT_PROGRAM, 1, 0);

    assert!(ConstantProductAdapter::new(info.clone(), token, token, 30).is_err());
    assert!(ConstantProductAdapter::new(info.clone(), token, Pubkey::new_unique(), 10_000).is_err());
    assert!(ConstantSumAdapter::new(info.clone(), [token, token], [6, 6], 10).is_err());
    assert!(matches!(
        ConstantSumAdapter::new(info.clone(), [token, Pubkey::new_unique()], [0, 80], 10),
        Err(SwapError::InvalidPoolState(_))
    ));
    assert!(StableSwapAdapter::new(info, vec![token, token], &[6, 6], 100, 4).is_err());
}

proptest! {
    #[test]
    fn prop_stable_swap_within_underquote_bound(
        reserve_a in 1_000_000u64..1_000_000_000_000,
        reserve_b in 1_000_000u64..1_000_000_000_000,
        amount in 1u64..10_000_000_000,
        tolerance in 0u64..5,
    ) {
        let mut ledger = Ledger::new(Pubkey::new_unique());
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let pool = stable_swap(&mut ledger, vec![a, b], &[6, 6], &[reserve_a, reserve_b], tolerance);
        let trader = funded(&mut ledger, &a, amount);

        let quoted = pool.query(&ledger, amount, &a, &b);
        match deposit_and_swap(&mut ledger, pool.as_ref(), &trader, amount, &a, &b) {
            Ok(received) => {
                prop_assert!(received >= quoted);
                prop_assert!(received <= quoted + tolerance);
            }
            Err(_) => prop_assert_eq!(quoted, 0),
        }
    }

    #[test]
    fn prop_constant_product_quote_matches_swap(
        reserve_a in 1_000u64..1_000_000_000_000,
        reserve_b in 1_000u64..1_000_000_000_000,
        amount in 1u64..1_000_000_000,
    ) {
        let mut ledger = Ledger::new(Pubkey::new_unique());
        let (a, b) = (Pubkey::new_unique(), Pubkey::new_unique());
        let pool = constant_product(&mut ledger, a, b, [reserve_a, reserve_b]);
        let trader = funded(&mut ledger, &a, amount);

        let quoted = pool.query(&ledger, amount, &a, &b);
        match deposit_and_swap(&mut ledger, pool.as_ref(), &trader, amount, &a, &b) {
            Ok(received) => prop_assert_eq!(received, quoted),
            Err(_) => prop_assert_eq!(quoted, 0),
        }
    }
}
