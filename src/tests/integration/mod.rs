// Multi-step flows driven through the public pool operations.

mod modify_liquidity;
mod swap_tests;

use ethnum::{I256, U256};

use super::*;
use crate::{
    libraries::{
        balance_delta::BalanceDelta,
        constants::{MAX_SQRT_RATIO, MIN_SQRT_RATIO},
    },
    pool::{PoolError, swap::SwapParams},
};

pub fn swap_params(amount_specified: i128, zero_for_one: bool, sqrt_price_limit_x96: U256) -> SwapParams {
    SwapParams {
        amount_specified: I256::from(amount_specified),
        zero_for_one,
        sqrt_price_limit_x96,
    }
}

/// Swaps from and to the sender with the widest price limit.
pub fn swap(
    pool: &Pool<InMemoryLedger>,
    amount_specified: i128,
    zero_for_one: bool,
) -> Result<BalanceDelta, PoolError> {
    let limit = if zero_for_one {
        *MIN_SQRT_RATIO + 1
    } else {
        *MAX_SQRT_RATIO - 1
    };
    swap_to(pool, amount_specified, zero_for_one, limit)
}

pub fn swap_to(
    pool: &Pool<InMemoryLedger>,
    amount_specified: i128,
    zero_for_one: bool,
    sqrt_price_limit_x96: U256,
) -> Result<BalanceDelta, PoolError> {
    pool.swap(
        sender_principal(),
        sender_principal(),
        swap_params(amount_specified, zero_for_one, sqrt_price_limit_x96),
    )
}

pub fn delta(amount0: i128, amount1: i128) -> BalanceDelta {
    BalanceDelta::new(I256::from(amount0), I256::from(amount1))
}
