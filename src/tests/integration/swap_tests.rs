use proptest::{collection::vec, prop_assert, prop_assert_eq, proptest};

use super::*;
use crate::{
    ledger::LedgerTransferError,
    libraries::{constants::MIN_TICK, tick_math::TickMath},
};

///////////////////////////////////////////////////////////////
// EXACT INPUT
///////////////////////////////////////////////////////////////
#[test]
fn test_zero_fee_pool_swaps_without_fee_growth() {
    let pool = create_test_pool(0, 60);
    pool.initialize(sqrt_price_at(0)).unwrap();
    pool.mint(sender_principal(), FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, ONE_ETHER)
        .unwrap();

    let result = swap(&pool, 1000, true).unwrap();

    assert_eq!(result.amount0(), I256::from(1000));
    assert!(result.amount1() < I256::ZERO && result.amount1() >= I256::from(-1000));
    assert_eq!(pool.fee_growth_global(), (U256::ZERO, U256::ZERO));
}

#[test]
fn test_exact_input_across_empty_gap() {
    let pool = set_up(0);
    let owner = sender_principal();
    assert_eq!(
        pool.mint(owner, -120, -60, ONE_ETHER),
        Ok((U256::ZERO, U256::from(2986382804598882_u128)))
    );
    assert_eq!(
        pool.mint(owner, 60, 120, ONE_ETHER),
        Ok((U256::from(2986382804598882_u128), U256::ZERO))
    );
    assert_eq!(pool.liquidity(), 0);

    let result = swap(&pool, 1_000_000_000_000_000, true);

    assert_eq!(result, Ok(delta(1_000_000_000_000_000, -990052082187569)));
    let slot0 = pool.slot0();
    assert_eq!(
        slot0.sqrt_price_x96,
        U256::from(78912406037764388593390245602_u128)
    );
    assert_eq!(slot0.tick, -80);
    assert_eq!(pool.liquidity(), ONE_ETHER);
}

#[test]
fn test_exact_input_stops_at_price_limit_inside_gap() {
    let pool = set_up(0);
    let (amount0, amount1) = pool.mint(sender_principal(), 180, 240, ONE_ETHER).unwrap();
    assert_eq!((amount0, amount1), (U256::from(2968519045809276_u128), U256::ZERO));

    let result = swap_to(&pool, ONE_ETHER as i128, false, sqrt_price_at(210));

    // partial fill, the rest of the input is never taken
    assert_eq!(result, Ok(delta(-1485372661682101, 1519177736239823)));
    let slot0 = pool.slot0();
    assert_eq!(slot0.sqrt_price_x96, sqrt_price_at(210));
    assert_eq!(slot0.tick, 210);
    assert_eq!(pool.liquidity(), ONE_ETHER);
}

#[test]
fn test_exact_input_stops_at_price_limit_full_range() {
    let pool = set_up(0);
    assert_eq!(
        pool.mint(
            sender_principal(),
            FULL_RANGE_MIN_TICK,
            FULL_RANGE_MAX_TICK,
            ONE_ETHER
        ),
        Ok((U256::from(ONE_ETHER), U256::from(ONE_ETHER)))
    );

    let result = swap_to(
        &pool,
        1_000_000 * ONE_ETHER as i128,
        true,
        sqrt_price_at(-30),
    );

    assert_eq!(result, Ok(delta(1505567156606351, -1498800679694116)));
    assert_eq!(pool.slot0().sqrt_price_x96, sqrt_price_at(-30));
    assert_eq!(pool.slot0().tick, -30);
}

#[test]
fn test_exact_input_stops_on_initialized_boundary() {
    let pool = set_up(0);
    let owner = sender_principal();
    assert_eq!(
        pool.mint(owner, -60, 60, ONE_ETHER),
        Ok((
            U256::from(2995354955910781_u128),
            U256::from(2995354955910781_u128)
        ))
    );
    assert_eq!(
        pool.mint(owner, -120, -60, ONE_ETHER / 2),
        Ok((U256::ZERO, U256::from(1493191402299441_u128)))
    );

    let result = swap_to(
        &pool,
        1_000_000 * ONE_ETHER as i128,
        true,
        sqrt_price_at(-60),
    );

    assert_eq!(result, Ok(delta(3013394245478362, -2995354955910780)));
    // landing on the boundary while moving down crosses it
    assert_eq!(pool.slot0().sqrt_price_x96, sqrt_price_at(-60));
    assert_eq!(pool.slot0().tick, -61);
    assert_eq!(pool.liquidity(), ONE_ETHER / 2);
    assert_eq!(
        pool.tick(-60).unwrap().fee_growth_outside_0_x128,
        pool.fee_growth_global().0
    );
}

#[test]
fn test_swap_through_empty_pool_only_moves_price() {
    let pool = set_up(0);
    let history_len = pool.ledger().history().len();
    let limit = sqrt_price_at(-600);

    let result = swap_to(&pool, ONE_ETHER as i128, true, limit);

    assert_eq!(result, Ok(BalanceDelta::ZERO_DELTA));
    assert_eq!(pool.slot0().sqrt_price_x96, limit);
    assert_eq!(pool.slot0().tick, -600);
    assert_eq!(pool.ledger().history().len(), history_len);
    assert_eq!(pool.fee_growth_global(), (U256::ZERO, U256::ZERO));
}

#[test]
fn test_swap_to_the_end_of_the_domain() {
    let pool = set_up(0);

    assert_eq!(swap(&pool, ONE_ETHER as i128, true), Ok(BalanceDelta::ZERO_DELTA));
    let slot0 = pool.slot0();
    assert_eq!(slot0.sqrt_price_x96, *MIN_SQRT_RATIO + 1);
    assert_eq!(
        slot0.tick,
        TickMath::get_tick_at_sqrt_ratio(*MIN_SQRT_RATIO + 1).unwrap()
    );
    assert_eq!(slot0.tick, MIN_TICK);

    // nothing left to trade in this direction
    assert_eq!(
        swap(&pool, ONE_ETHER as i128, true),
        Err(PoolError::PriceLimit)
    );
}

///////////////////////////////////////////////////////////////
// EXACT OUTPUT
///////////////////////////////////////////////////////////////
#[test]
fn test_exact_output_single_amount() {
    let pool = set_up(0);
    pool.mint(
        sender_principal(),
        FULL_RANGE_MIN_TICK,
        FULL_RANGE_MAX_TICK,
        ONE_ETHER,
    )
    .unwrap();
    let recipient = recipient_principal();
    let balances_before = pool_balances(&pool);

    let result = pool.swap(
        sender_principal(),
        recipient,
        swap_params(-1000, false, *MAX_SQRT_RATIO - 1),
    );

    // 1000 out costs 1001 plus a rounded up fee of 4
    assert_eq!(result, Ok(delta(-1000, 1005)));
    assert_eq!(
        pool.slot0().sqrt_price_x96,
        U256::from(79228162514264416821706464601_u128)
    );
    assert_eq!(pool.slot0().tick, 0);
    assert_eq!(
        pool.ledger().balance_of(token0_principal(), recipient),
        U256::from(1000_u32)
    );
    assert_eq!(
        pool_balances(&pool),
        (
            balances_before.0 - U256::from(1000_u32),
            balances_before.1 + U256::from(1005_u32)
        )
    );
}

///////////////////////////////////////////////////////////////
// FEES
///////////////////////////////////////////////////////////////
#[test]
fn test_fee_growth_tracks_input_token() {
    let pool = set_up(0);
    pool.mint(
        sender_principal(),
        FULL_RANGE_MIN_TICK,
        FULL_RANGE_MAX_TICK,
        ONE_ETHER,
    )
    .unwrap();

    assert_eq!(swap(&pool, 1_000_000, true), Ok(delta(1_000_000, -996_999)));
    assert_eq!(
        pool.fee_growth_global(),
        (U256::from(1020847100762815390390123_u128), U256::ZERO)
    );
    assert_eq!(
        pool.slot0().sqrt_price_x96,
        U256::from(79228162514185347115517307545_u128)
    );
    assert_eq!(pool.slot0().tick, -1);

    swap(&pool, 1_000_000, false).unwrap();
    assert_eq!(
        pool.fee_growth_global(),
        (
            U256::from(1020847100762815390390123_u128),
            U256::from(1020847100762815390390123_u128)
        )
    );
}

///////////////////////////////////////////////////////////////
// VALIDATION
///////////////////////////////////////////////////////////////
#[test]
fn test_swap_rejects_invalid_arguments() {
    let pool = set_up(0);
    pool.mint(sender_principal(), -60, 60, ONE_ETHER).unwrap();
    let price = pool.slot0().sqrt_price_x96;

    assert_eq!(swap(&pool, 0, true), Err(PoolError::AmountZero));
    // the limit must lie on the side the price moves to
    assert_eq!(swap_to(&pool, 1000, true, price), Err(PoolError::PriceLimit));
    assert_eq!(swap_to(&pool, 1000, true, price + 1), Err(PoolError::PriceLimit));
    assert_eq!(swap_to(&pool, 1000, false, price), Err(PoolError::PriceLimit));
    assert_eq!(swap_to(&pool, 1000, false, price - 1), Err(PoolError::PriceLimit));
    // and strictly inside the price domain
    assert_eq!(
        swap_to(&pool, 1000, true, *MIN_SQRT_RATIO),
        Err(PoolError::PriceLimit)
    );
    assert_eq!(
        swap_to(&pool, 1000, false, *MAX_SQRT_RATIO),
        Err(PoolError::PriceLimit)
    );
    assert_eq!(pool.slot0().sqrt_price_x96, price);
}

///////////////////////////////////////////////////////////////
// ATOMICITY
///////////////////////////////////////////////////////////////
#[test]
fn test_failed_output_transfer_refunds_input() {
    let pool = set_up(0);
    pool.mint(
        sender_principal(),
        FULL_RANGE_MIN_TICK,
        FULL_RANGE_MAX_TICK,
        ONE_ETHER,
    )
    .unwrap();
    let state_before = pool.pool_state();
    let balances_before = pool_balances(&pool);
    let sender_before = pool.ledger().balance_of(token0_principal(), sender_principal());
    pool.ledger().fail_transfers_of(token1_principal());

    let result = swap(&pool, 1_000_000, true);

    assert!(matches!(
        result,
        Err(PoolError::Ledger(LedgerTransferError::TemporarilyUnavailable { .. }))
    ));
    assert_eq!(pool.pool_state(), state_before);
    assert_eq!(pool_balances(&pool), balances_before);
    assert_eq!(
        pool.ledger().balance_of(token0_principal(), sender_principal()),
        sender_before
    );
    assert!(!pool.is_locked());

    pool.ledger().restore(token1_principal());
    assert_eq!(swap(&pool, 1_000_000, true), Ok(delta(1_000_000, -996_999)));
}

#[test]
fn test_payer_without_funds_cannot_swap() {
    let pool = set_up(0);
    pool.mint(sender_principal(), -60, 60, ONE_ETHER).unwrap();
    let state_before = pool.pool_state();

    let result = pool.swap(
        recipient_principal(),
        recipient_principal(),
        swap_params(1000, true, *MIN_SQRT_RATIO + 1),
    );

    assert!(matches!(
        result,
        Err(PoolError::Ledger(LedgerTransferError::InsufficientFunds { .. }))
    ));
    assert_eq!(pool.pool_state(), state_before);
}

proptest! {
    #[test]
    fn test_exact_input_never_overspends(
        tick_lower in -100i32..0,
        width in 1i32..100,
        liquidity in 1_000_000u128..1_000_000_000_000_000_000_000u128,
        amount_in in 1_000_000i128..1_000_000_000_000_000_000i128,
        zero_for_one in proptest::bool::ANY,
    ) {
        let pool = set_up(0);
        pool.mint(sender_principal(), tick_lower * 60, (tick_lower + width) * 60, liquidity).unwrap();
        pool.mint(sender_principal(), FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, 1_000_000).unwrap();
        let price_before = pool.slot0().sqrt_price_x96;
        let balances_before = pool_balances(&pool);

        let result = swap(&pool, amount_in, zero_for_one).unwrap();

        let (paid, received) = if zero_for_one {
            (result.amount0(), result.amount1())
        } else {
            (result.amount1(), result.amount0())
        };
        prop_assert!(paid > I256::ZERO && paid <= I256::from(amount_in));
        prop_assert!(received <= I256::ZERO);

        let price_after = pool.slot0().sqrt_price_x96;
        if zero_for_one {
            prop_assert!(price_after < price_before);
        } else {
            prop_assert!(price_after > price_before);
        }
        let tick = pool.slot0().tick;
        prop_assert!(sqrt_price_at(tick) <= price_after && price_after <= sqrt_price_at(tick + 1));

        // the ledger moved exactly what the deltas claim
        let balances_after = pool_balances(&pool);
        prop_assert_eq!(
            balances_after.0.as_i256() - balances_before.0.as_i256(),
            result.amount0()
        );
        prop_assert_eq!(
            balances_after.1.as_i256() - balances_before.1.as_i256(),
            result.amount1()
        );
    }

    #[test]
    fn active_liquidity_matches_ranges_containing_the_tick(
        ranges in vec((-20i32..20, 1i32..20, 1_000_000_000_000_000u128..100_000_000_000_000_000_000u128), 1..6),
        swaps in vec((1i128..10_000_000_000_000_000i128, proptest::bool::ANY, proptest::bool::ANY), 1..8),
    ) {
        let pool = set_up(0);
        let owner = sender_principal();
        let mut positions = vec![(FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, ONE_ETHER)];
        pool.mint(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, ONE_ETHER).unwrap();
        for (lower, width, liquidity) in ranges {
            let (tick_lower, tick_upper) = (lower * 60, (lower + width) * 60);
            pool.mint(owner, tick_lower, tick_upper, liquidity).unwrap();
            positions.push((tick_lower, tick_upper, liquidity));
        }

        for (amount, exact_input, zero_for_one) in swaps {
            let amount_specified = if exact_input { amount } else { -amount };
            prop_assert!(swap(&pool, amount_specified, zero_for_one).is_ok());

            let tick = pool.slot0().tick;
            let expected: u128 = positions
                .iter()
                .filter(|(tick_lower, tick_upper, _)| *tick_lower <= tick && tick < *tick_upper)
                .map(|(_, _, liquidity)| liquidity)
                .sum();
            prop_assert_eq!(pool.liquidity(), expected);
        }
    }
}
