// Shared fixtures: a pool over an in-memory ledger with funded test principals.

pub mod integration;

use candid::Principal;
use ethnum::U256;

use crate::{
    ledger::InMemoryLedger,
    libraries::tick_math::TickMath,
    pool::{Pool, create_pool::PoolArgs},
};

pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

// Min tick for full range with tick spacing of 60
pub const FULL_RANGE_MIN_TICK: i32 = -887220;
// Max tick for full range with tick spacing of 60
pub const FULL_RANGE_MAX_TICK: i32 = -FULL_RANGE_MIN_TICK;

pub fn create_principal(id: u8) -> Principal {
    Principal::from_slice(&[id; 29])
}

pub fn token0_principal() -> Principal {
    create_principal(1)
}

pub fn token1_principal() -> Principal {
    create_principal(2)
}

pub fn pool_principal() -> Principal {
    create_principal(100)
}

pub fn sender_principal() -> Principal {
    create_principal(7)
}

pub fn recipient_principal() -> Principal {
    create_principal(8)
}

pub fn sqrt_price_at(tick: i32) -> U256 {
    TickMath::get_sqrt_ratio_at_tick(tick).unwrap()
}

/// Uninitialized pool of the test tokens; the sender holds plenty of both.
pub fn create_test_pool(fee: u32, tick_spacing: i32) -> Pool<InMemoryLedger> {
    let args = PoolArgs::new(token1_principal(), token0_principal(), fee, tick_spacing).unwrap();
    let pool = Pool::new(args, InMemoryLedger::new(pool_principal()));
    fund(&pool, sender_principal(), U256::from(u128::MAX));
    pool
}

/// 0.3% pool with tick spacing 60, initialized at `tick`.
pub fn set_up(tick: i32) -> Pool<InMemoryLedger> {
    let pool = create_test_pool(3000, 60);
    pool.initialize(sqrt_price_at(tick)).unwrap();
    pool
}

pub fn fund(pool: &Pool<InMemoryLedger>, owner: Principal, amount: U256) {
    pool.ledger().deposit(token0_principal(), owner, amount);
    pool.ledger().deposit(token1_principal(), owner, amount);
}

pub fn pool_balances(pool: &Pool<InMemoryLedger>) -> (U256, U256) {
    let ledger = pool.ledger();
    (
        ledger.balance_of(token0_principal(), pool_principal()),
        ledger.balance_of(token1_principal(), pool_principal()),
    )
}
