use candid::Principal;
use ethnum::{I256, U256};
use ic_canister_log::log;

use crate::{
    ledger::{TokenLedger, Transfer, settle},
    libraries::{
        balance_delta::BalanceDelta,
        constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK, Q128},
        full_math::mul_div,
        liquidity_math,
        swap_math::{compute_swap_step, get_sqrt_price_target},
        tick_math::TickMath,
    },
    logs::{DEBUG, INFO},
    state::State,
    tick::{cross_tick, types::TickInfo},
};

use super::{Pool, PoolError, types::PoolState};

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SwapParams {
    // positive for exact input, negative for exact output
    pub amount_specified: I256,
    pub zero_for_one: bool,
    pub sqrt_price_limit_x96: U256,
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Default)]
pub struct StepComputations {
    // the price at the beginning of the step
    pub sqrt_price_start_x96: U256,
    // the next tick to swap to from the current tick in the swap direction
    pub tick_next: i32,
    // whether tickNext is initialized or not
    pub initialized: bool,
    // sqrt(price) for the next tick (1/0)
    pub sqrt_price_next_x96: U256,
    // how much is being swapped in in this step
    pub amount_in: U256,
    // how much is being swapped out
    pub amount_out: U256,
    // how much fee is being paid in
    pub fee_amount: U256,
    // the global fee growth of the input token. updated in storage at the end of swap
    pub fee_growth_global_x128: U256,
}

/// Keeps state changes, in case of success, state transition will be applied using this buffer
/// state, In case of failure no state transition will be triggered
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SwapBufferState {
    pub pool: PoolState,
    pub crossed_ticks: Vec<(i32, TickInfo)>,
}

// Tracks the state of a pool throughout a swap, and returns these values at the end of the swap
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct SwapResult {
    // the current sqrt(price)
    pub sqrt_price_x96: U256,
    // the tick associated with the current price
    pub tick: i32,
    // the current liquidity in range
    pub liquidity: u128,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct SwapSuccess {
    pub swap_delta: BalanceDelta,
    pub total_swap_fee_amount: U256,
    pub buffer_state: SwapBufferState,
}

/// Runs the swap loop against `state` and returns the deltas and the state it would leave.
///
/// Steps tick by tick until the specified amount is used up or the price reaches the
/// limit; reaching the limit first is a partial fill, not an error. Nothing is written,
/// the caller applies `buffer_state` once the transfers went through.
pub fn swap_inner(state: &State, fee: u32, params: &SwapParams) -> Result<SwapSuccess, PoolError> {
    let pool_state_initial = state.get_pool();
    if !pool_state_initial.is_initialized() {
        return Err(PoolError::NotInitialized);
    }
    if params.amount_specified == I256::ZERO {
        return Err(PoolError::AmountZero);
    }
    let tick_spacing = pool_state_initial.tick_spacing.0;

    validate_price_limits(
        params.zero_for_one,
        params.sqrt_price_limit_x96,
        pool_state_initial.sqrt_price_x96,
    )?;

    let exact_input = params.amount_specified > I256::ZERO;
    let mut crossed_ticks: Vec<(i32, TickInfo)> = vec![];
    let mut total_swap_fee_amount = U256::ZERO;

    // the amount remaining to be swapped in/out of the input/output asset. initially set to the amount_specified
    let mut remaining_amount = params.amount_specified;
    // the amount swapped out/in of the output/input asset. initially set to 0
    let mut calculated_amount = I256::ZERO;
    let mut swap_result = SwapResult {
        sqrt_price_x96: pool_state_initial.sqrt_price_x96,
        tick: pool_state_initial.tick,
        liquidity: pool_state_initial.liquidity,
    };
    let mut step = StepComputations {
        fee_growth_global_x128: if params.zero_for_one {
            pool_state_initial.fee_growth_global_0_x128
        } else {
            pool_state_initial.fee_growth_global_1_x128
        },
        ..Default::default()
    };

    // continue swapping as long as we haven't used the entire input/output and haven't reached the price limit
    while remaining_amount != I256::ZERO && swap_result.sqrt_price_x96 != params.sqrt_price_limit_x96
    {
        step.sqrt_price_start_x96 = swap_result.sqrt_price_x96;

        let (tick_next, initialized) = state
            .tick_bitmap()
            .next_initialized_tick_within_one_word(
                swap_result.tick,
                tick_spacing,
                params.zero_for_one,
            )?;
        step.tick_next = clamp_tick(tick_next);
        step.initialized = initialized;

        step.sqrt_price_next_x96 =
            TickMath::get_sqrt_ratio_at_tick(step.tick_next).map_err(|_| PoolError::Bounds)?;

        let sqrt_price_target_x96 = get_sqrt_price_target(
            params.zero_for_one,
            step.sqrt_price_next_x96,
            params.sqrt_price_limit_x96,
        )
        .map_err(|_| PoolError::Bounds)?;

        // Compute swap step to reach the target tick, price limit, or exhaust the amount.
        let swap_step = compute_swap_step(
            swap_result.sqrt_price_x96,
            sqrt_price_target_x96,
            swap_result.liquidity,
            remaining_amount,
            fee,
        )
        .map_err(|_| PoolError::CalculationOverflow)?;

        swap_result.sqrt_price_x96 = swap_step.sqrt_price_next_x96;
        step.amount_in = swap_step.amount_in;
        step.amount_out = swap_step.amount_out;
        step.fee_amount = swap_step.fee_amount;

        update_amounts(
            exact_input,
            &mut remaining_amount,
            &mut calculated_amount,
            &step,
        )?;

        total_swap_fee_amount = total_swap_fee_amount
            .checked_add(step.fee_amount)
            .ok_or(PoolError::CalculationOverflow)?;

        // Update global fee growth for non-zero liquidity.
        if swap_result.liquidity > 0 {
            let fee_growth_delta =
                mul_div(step.fee_amount, *Q128, U256::from(swap_result.liquidity))
                    .map_err(|_| PoolError::CalculationOverflow)?;
            step.fee_growth_global_x128 = step
                .fee_growth_global_x128
                .checked_add(fee_growth_delta)
                .ok_or(PoolError::CalculationOverflow)?;
        }

        // Shift tick if we reached the next price, and preemptively decrement for zeroForOne swaps to tickNext - 1.
        if swap_result.sqrt_price_x96 == step.sqrt_price_next_x96 {
            // if the tick is initialized, run the tick transition
            if step.initialized {
                let (fee_growth_global_0_x128, fee_growth_global_1_x128) = if params.zero_for_one {
                    (
                        step.fee_growth_global_x128,
                        pool_state_initial.fee_growth_global_1_x128,
                    )
                } else {
                    (
                        pool_state_initial.fee_growth_global_0_x128,
                        step.fee_growth_global_x128,
                    )
                };

                // a swap moves one way, so each tick is crossed at most once
                let crossed = cross_tick(
                    &state.get_tick(step.tick_next),
                    fee_growth_global_0_x128,
                    fee_growth_global_1_x128,
                );
                crossed_ticks.push((step.tick_next, crossed.updated_tick_info));

                // if we're moving leftward, we interpret liquidityNet as the opposite sign
                // safe because liquidityNet cannot be i128::MIN
                let liquidity_net = if params.zero_for_one {
                    -crossed.liquidity_net
                } else {
                    crossed.liquidity_net
                };

                swap_result.liquidity =
                    liquidity_math::add_delta(swap_result.liquidity, liquidity_net)?;

                log!(
                    DEBUG,
                    "[swap]: crossed tick {} with net liquidity {liquidity_net}, active liquidity now {}",
                    step.tick_next,
                    swap_result.liquidity
                );
            }
            swap_result.tick = if params.zero_for_one {
                step.tick_next - 1
            } else {
                step.tick_next
            };
        } else if swap_result.sqrt_price_x96 != step.sqrt_price_start_x96 {
            // recompute unless we're on a lower tick boundary (i.e. already transitioned ticks), and haven't moved
            swap_result.tick = TickMath::get_tick_at_sqrt_ratio(swap_result.sqrt_price_x96)
                .map_err(|_| PoolError::Bounds)?;
        }
    }

    let swap_delta = compute_swap_delta(
        params.zero_for_one,
        params.amount_specified,
        remaining_amount,
        calculated_amount,
    )?;

    let mut pool_state = pool_state_initial.clone();
    pool_state.sqrt_price_x96 = swap_result.sqrt_price_x96;
    pool_state.tick = swap_result.tick;
    pool_state.liquidity = swap_result.liquidity;
    if params.zero_for_one {
        pool_state.fee_growth_global_0_x128 = step.fee_growth_global_x128;
    } else {
        pool_state.fee_growth_global_1_x128 = step.fee_growth_global_x128;
    }

    Ok(SwapSuccess {
        swap_delta,
        total_swap_fee_amount,
        buffer_state: SwapBufferState {
            pool: pool_state,
            crossed_ticks,
        },
    })
}

/// Validates price limits for the swap based on direction and pool state.
fn validate_price_limits(
    zero_for_one: bool,
    sqrt_price_limit_x96: U256,
    sqrt_price_current_x96: U256,
) -> Result<(), PoolError> {
    let valid = if zero_for_one {
        sqrt_price_limit_x96 < sqrt_price_current_x96 && sqrt_price_limit_x96 > *MIN_SQRT_RATIO
    } else {
        sqrt_price_limit_x96 > sqrt_price_current_x96 && sqrt_price_limit_x96 < *MAX_SQRT_RATIO
    };
    if valid { Ok(()) } else { Err(PoolError::PriceLimit) }
}

/// Clamps the tick to ensure it stays within MIN_TICK and MAX_TICK bounds.
fn clamp_tick(tick: i32) -> i32 {
    tick.clamp(MIN_TICK, MAX_TICK)
}

fn to_i256(amount: U256) -> Result<I256, PoolError> {
    if amount > I256::MAX.as_u256() {
        return Err(PoolError::CalculationOverflow);
    }
    Ok(amount.as_i256())
}

/// Exact input spends `amount_in + fee` from the remaining amount and owes `amount_out`;
/// exact output receives `amount_out` against the remaining amount and costs `amount_in + fee`.
fn update_amounts(
    exact_input: bool,
    remaining_amount: &mut I256,
    calculated_amount: &mut I256,
    step: &StepComputations,
) -> Result<(), PoolError> {
    let amount_in_with_fee = to_i256(
        step.amount_in
            .checked_add(step.fee_amount)
            .ok_or(PoolError::CalculationOverflow)?,
    )?;
    let amount_out = to_i256(step.amount_out)?;

    let (remaining, calculated) = if exact_input {
        (
            remaining_amount.checked_sub(amount_in_with_fee),
            calculated_amount.checked_sub(amount_out),
        )
    } else {
        (
            remaining_amount.checked_add(amount_out),
            calculated_amount.checked_add(amount_in_with_fee),
        )
    };
    *remaining_amount = remaining.ok_or(PoolError::CalculationOverflow)?;
    *calculated_amount = calculated.ok_or(PoolError::CalculationOverflow)?;
    Ok(())
}

/// Computes the final swap delta based on swap direction and amounts.
fn compute_swap_delta(
    zero_for_one: bool,
    amount_specified: I256,
    remaining_amount: I256,
    calculated_amount: I256,
) -> Result<BalanceDelta, PoolError> {
    let specified_used = amount_specified
        .checked_sub(remaining_amount)
        .ok_or(PoolError::CalculationOverflow)?;
    Ok(if zero_for_one == (amount_specified > I256::ZERO) {
        BalanceDelta::new(specified_used, calculated_amount)
    } else {
        BalanceDelta::new(calculated_amount, specified_used)
    })
}

impl<L: TokenLedger> Pool<L> {
    /// Swaps against the pool. The input comes from `payer`, the output goes to `recipient`.
    ///
    /// Returns the pool's signed deltas: the input token is positive, the output negative.
    pub fn swap(
        &self,
        payer: Principal,
        recipient: Principal,
        params: SwapParams,
    ) -> Result<BalanceDelta, PoolError> {
        let _guard = self.lock("swap")?;
        self.ensure_initialized()?;

        let fee = self.pool_id.fee.0;
        let success = self.read_state(|s| swap_inner(s, fee, &params))?;
        let delta = success.swap_delta;

        let (token_in, token_out) = if params.zero_for_one {
            (self.pool_id.token0, self.pool_id.token1)
        } else {
            (self.pool_id.token1, self.pool_id.token0)
        };
        let (amount_in, amount_out) = delta.input_output(params.zero_for_one);

        settle(
            self.ledger(),
            &[
                Transfer::In {
                    token: token_in,
                    from: payer,
                    amount: amount_in.unsigned_abs(),
                },
                Transfer::Out {
                    token: token_out,
                    to: recipient,
                    amount: amount_out.unsigned_abs(),
                },
            ],
        )?;

        let SwapBufferState { pool, .. } = &success.buffer_state;
        log!(
            INFO,
            "[swap]: zero_for_one {} took {amount_in} in and paid {} out with {} fee, price now {} at tick {}",
            params.zero_for_one,
            amount_out.unsigned_abs(),
            success.total_swap_fee_amount,
            pool.sqrt_price_x96,
            pool.tick
        );

        self.mutate_state(|s| s.apply_swap_buffer_state(success.buffer_state));

        Ok(delta)
    }
}
