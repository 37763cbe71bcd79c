use super::*;

#[test]
fn test_fees_are_credited_on_poke_and_collected() {
    let pool = set_up(0);
    let owner = sender_principal();
    pool.mint(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, ONE_ETHER)
        .unwrap();

    assert_eq!(swap(&pool, 1_000_000, true), Ok(delta(1_000_000, -996_999)));
    assert_eq!(
        pool.fee_growth_global(),
        (U256::from(1020847100762815390390123_u128), U256::ZERO)
    );

    // fees are not visible on the position until it is touched
    let position = pool.position(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK);
    assert_eq!(position.tokens_owed_0, 0);

    let poked = pool.burn(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, 0);
    assert_eq!(poked, Ok((U256::ZERO, U256::ZERO)));
    let position = pool.position(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK);
    assert_eq!((position.tokens_owed_0, position.tokens_owed_1), (2999, 0));
    assert_eq!(position.liquidity, ONE_ETHER);

    // a second poke without new swaps adds nothing
    pool.burn(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, 0)
        .unwrap();
    let position = pool.position(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK);
    assert_eq!(position.tokens_owed_0, 2999);

    let recipient = recipient_principal();
    assert_eq!(
        pool.collect(
            owner,
            recipient,
            FULL_RANGE_MIN_TICK,
            FULL_RANGE_MAX_TICK,
            u128::MAX,
            u128::MAX
        ),
        Ok((2999, 0))
    );
    assert_eq!(
        pool.ledger().balance_of(token0_principal(), recipient),
        U256::from(2999_u32)
    );
    assert_eq!(
        pool.position(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK)
            .tokens_owed_0,
        0
    );
}

#[test]
fn test_fees_are_split_by_liquidity() {
    let pool = set_up(0);
    let alice = sender_principal();
    let bob = recipient_principal();
    fund(&pool, bob, U256::from(u128::MAX));

    pool.mint(alice, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, ONE_ETHER / 2)
        .unwrap();
    pool.mint(bob, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, ONE_ETHER / 2)
        .unwrap();

    swap(&pool, 1_000_000, true).unwrap();
    swap(&pool, 1_000_000, false).unwrap();

    for owner in [alice, bob] {
        pool.burn(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, 0)
            .unwrap();
        let position = pool.position(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK);
        assert_eq!((position.tokens_owed_0, position.tokens_owed_1), (1499, 1499));
    }
}

#[test]
fn test_only_active_range_earns_fees() {
    let pool = set_up(0);
    let owner = sender_principal();
    pool.mint(owner, -120, -60, ONE_ETHER).unwrap();
    pool.mint(owner, 60, 120, ONE_ETHER).unwrap();

    // crosses the empty gap, then trades inside [-120, -60)
    swap(&pool, 1_000_000_000_000_000, true).unwrap();
    assert_eq!(pool.slot0().tick, -80);

    pool.burn(owner, -120, -60, 0).unwrap();
    pool.burn(owner, 60, 120, 0).unwrap();

    let lower = pool.position(owner, -120, -60);
    let upper = pool.position(owner, 60, 120);
    assert_eq!((lower.tokens_owed_0, lower.tokens_owed_1), (2_999_999_999_999, 0));
    assert_eq!((upper.tokens_owed_0, upper.tokens_owed_1), (0, 0));

    // nothing was earned before the swap crossed -60
    assert_eq!(
        pool.tick(-60).unwrap().fee_growth_outside_0_x128,
        U256::ZERO
    );
}

#[test]
fn test_burn_and_collect_returns_liquidity_and_fees() {
    let pool = set_up(0);
    let owner = sender_principal();
    let recipient = recipient_principal();
    pool.mint(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, ONE_ETHER)
        .unwrap();
    swap(&pool, 1_000_000, true).unwrap();

    let (amount0, amount1) = pool
        .burn(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK, ONE_ETHER)
        .unwrap();
    assert_eq!(amount0, U256::from(1000000000000996999_u128));
    assert_eq!(amount1, U256::from(999999999999002999_u128));
    let position = pool.position(owner, FULL_RANGE_MIN_TICK, FULL_RANGE_MAX_TICK);
    assert_eq!(position.liquidity, 0);
    // burned amounts and fees land in the same counters
    assert_eq!(U256::from(position.tokens_owed_0), amount0 + U256::from(2999_u32));
    assert_eq!(U256::from(position.tokens_owed_1), amount1);
    assert_eq!(pool.liquidity(), 0);
    assert_eq!(pool.tick(FULL_RANGE_MIN_TICK), None);

    let (collected0, collected1) = pool
        .collect(
            owner,
            recipient,
            FULL_RANGE_MIN_TICK,
            FULL_RANGE_MAX_TICK,
            u128::MAX,
            u128::MAX,
        )
        .unwrap();
    assert_eq!(U256::from(collected0), amount0 + U256::from(2999_u32));
    assert_eq!(U256::from(collected1), amount1);

    // only rounding dust stays behind
    assert_eq!(pool_balances(&pool), (U256::from(2_u8), U256::from(2_u8)));
}

#[test]
fn test_mint_again_after_full_burn_reinitializes_ticks() {
    let pool = set_up(0);
    let owner = sender_principal();

    pool.mint(owner, -60, 60, ONE_ETHER).unwrap();
    swap(&pool, 1_000_000, true).unwrap();
    pool.burn(owner, -60, 60, ONE_ETHER).unwrap();
    assert_eq!(pool.tick(-60), None);
    assert!(pool.initialized_ticks(0, true).is_empty());

    pool.mint(owner, -60, 60, ONE_ETHER).unwrap();
    let lower = pool.tick(-60).unwrap();
    assert!(lower.initialized);
    // a tick below the current one starts with all growth counted outside
    assert_eq!(
        lower.fee_growth_outside_0_x128,
        pool.fee_growth_global().0
    );
    assert_eq!(pool.tick(60).unwrap().fee_growth_outside_0_x128, U256::ZERO);

    // owed amounts from the earlier burn are kept
    let position = pool.position(owner, -60, 60);
    assert_eq!(position.liquidity, ONE_ETHER);
    assert!(position.tokens_owed_0 > 0);
}
