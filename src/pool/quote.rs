use ethnum::U256;

use crate::{
    ledger::TokenLedger,
    libraries::{
        balance_delta::BalanceDelta,
        constants::{MAX_SQRT_RATIO, MIN_SQRT_RATIO},
    },
};

use super::{
    Pool, PoolError,
    swap::{SwapParams, swap_inner},
};

/// Outcome of a simulated swap.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct QuoteResult {
    pub swap_delta: BalanceDelta,
    pub sqrt_price_x96_after: U256,
    pub tick_after: i32,
    pub liquidity_after: u128,
}

impl QuoteResult {
    /// Amount the pool would receive.
    pub fn amount_in(&self, zero_for_one: bool) -> U256 {
        self.swap_delta.input_output(zero_for_one).0.unsigned_abs()
    }

    /// Amount the pool would pay out.
    pub fn amount_out(&self, zero_for_one: bool) -> U256 {
        self.swap_delta.input_output(zero_for_one).1.unsigned_abs()
    }
}

/// Determines the widest sqrt price limit for a swap direction.
pub fn get_sqrt_price_limit(zero_for_one: bool) -> U256 {
    if zero_for_one {
        *MIN_SQRT_RATIO + 1
    } else {
        *MAX_SQRT_RATIO - 1
    }
}

impl<L: TokenLedger> Pool<L> {
    /// Runs a swap against the current state without applying it or moving tokens.
    ///
    /// Does not take the pool lock, a quote can be asked for at any time.
    pub fn quote_swap(&self, params: SwapParams) -> Result<QuoteResult, PoolError> {
        let fee = self.pool_id.fee.0;
        let success = self.read_state(|s| swap_inner(s, fee, &params))?;
        let pool_after = success.buffer_state.pool;
        Ok(QuoteResult {
            swap_delta: success.swap_delta,
            sqrt_price_x96_after: pool_after.sqrt_price_x96,
            tick_after: pool_after.tick,
            liquidity_after: pool_after.liquidity,
        })
    }
}
