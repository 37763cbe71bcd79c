use ethnum::{I256, U256};

use super::{
    amount_delta::{get_amount_0_delta, get_amount_1_delta},
    constants::{MAX_SWAP_FEE, U160_MAX},
    full_math::{mul_div, mul_div_rounding_up},
    sqrt_price_math::{
        SqrtPriceMathError, get_next_sqrt_price_from_input, get_next_sqrt_price_from_output,
    },
};

/// Computes the sqrt price target for the next swap step.
///
/// For `zero_for_one` (price falling) the target is the larger of the next tick price and the
/// caller's limit, otherwise the smaller, so a step never moves past the limit.
pub fn get_sqrt_price_target(
    zero_for_one: bool,
    sqrt_price_next_x96: U256,
    sqrt_price_limit_x96: U256,
) -> Result<U256, ComputeSwapError> {
    if sqrt_price_next_x96 == U256::ZERO
        || sqrt_price_limit_x96 == U256::ZERO
        || sqrt_price_next_x96 > *U160_MAX
        || sqrt_price_limit_x96 > *U160_MAX
    {
        return Err(ComputeSwapError::InvalidPriceOrLiquidity);
    }

    Ok(if zero_for_one {
        sqrt_price_next_x96.max(sqrt_price_limit_x96)
    } else {
        sqrt_price_next_x96.min(sqrt_price_limit_x96)
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ComputeSwapError {
    PriceOverflow,
    NotEnoughLiquidity,
    InvalidPriceOrLiquidity,
    InvalidFee,
    AmountOverflow,
}

impl From<SqrtPriceMathError> for ComputeSwapError {
    fn from(value: SqrtPriceMathError) -> Self {
        match value {
            SqrtPriceMathError::PriceOverflow => Self::PriceOverflow,
            SqrtPriceMathError::NotEnoughLiquidity => Self::NotEnoughLiquidity,
            SqrtPriceMathError::InvalidPriceOrLiquidity => Self::InvalidPriceOrLiquidity,
        }
    }
}

/// Outcome of a single bounded swap step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SwapStep {
    pub sqrt_price_next_x96: U256,
    pub amount_in: U256,
    pub amount_out: U256,
    pub fee_amount: U256,
}

fn amount_in_between(
    zero_for_one: bool,
    sqrt_price_from: U256,
    sqrt_price_to: U256,
    liquidity: u128,
) -> Result<U256, ComputeSwapError> {
    let amount = if zero_for_one {
        get_amount_0_delta(sqrt_price_to, sqrt_price_from, liquidity, true)
    } else {
        get_amount_1_delta(sqrt_price_from, sqrt_price_to, liquidity, true)
    };
    amount.map_err(|_| ComputeSwapError::AmountOverflow)
}

fn amount_out_between(
    zero_for_one: bool,
    sqrt_price_from: U256,
    sqrt_price_to: U256,
    liquidity: u128,
) -> Result<U256, ComputeSwapError> {
    let amount = if zero_for_one {
        get_amount_1_delta(sqrt_price_to, sqrt_price_from, liquidity, false)
    } else {
        get_amount_0_delta(sqrt_price_from, sqrt_price_to, liquidity, false)
    };
    amount.map_err(|_| ComputeSwapError::AmountOverflow)
}

/// Computes the result of swapping some amount in or out within a single price range.
///
/// `amount_remaining` is positive for exact input and negative for exact output. The direction
/// is implied by the target: a target at or below the current price sells token0.
/// With zero liquidity the step moves straight to the target and exchanges nothing.
///
/// When the step stops short of the target the whole remaining input has been consumed, and
/// the fee is whatever part of it did not go into `amount_in`.
///
/// # Errors
/// `InvalidFee` unless `fee_pips < MAX_SWAP_FEE`; `InvalidPriceOrLiquidity` for a zero current
/// price; overflow variants when the amounts do not fit.
pub fn compute_swap_step(
    sqrt_price_current_x96: U256,
    sqrt_price_target_x96: U256,
    liquidity: u128,
    amount_remaining: I256,
    fee_pips: u32,
) -> Result<SwapStep, ComputeSwapError> {
    if sqrt_price_current_x96 == U256::ZERO {
        return Err(ComputeSwapError::InvalidPriceOrLiquidity);
    }
    if fee_pips >= MAX_SWAP_FEE {
        return Err(ComputeSwapError::InvalidFee);
    }

    let zero_for_one = sqrt_price_current_x96 >= sqrt_price_target_x96;
    let exact_in = amount_remaining >= I256::ZERO;
    let amount_remaining_abs = amount_remaining.unsigned_abs();

    let fee = U256::from(fee_pips);
    let fee_complement = U256::from(MAX_SWAP_FEE - fee_pips);

    // provisional amount for a full move to the target
    let mut amount_in = U256::ZERO;
    let mut amount_out = U256::ZERO;

    let sqrt_price_next_x96 = if exact_in {
        let amount_remaining_less_fee =
            mul_div(amount_remaining_abs, fee_complement, U256::from(MAX_SWAP_FEE))
                .map_err(|_| ComputeSwapError::AmountOverflow)?;
        amount_in = amount_in_between(
            zero_for_one,
            sqrt_price_current_x96,
            sqrt_price_target_x96,
            liquidity,
        )?;
        if amount_remaining_less_fee >= amount_in {
            sqrt_price_target_x96
        } else {
            get_next_sqrt_price_from_input(
                sqrt_price_current_x96,
                liquidity,
                amount_remaining_less_fee,
                zero_for_one,
            )?
        }
    } else {
        amount_out = amount_out_between(
            zero_for_one,
            sqrt_price_current_x96,
            sqrt_price_target_x96,
            liquidity,
        )?;
        if amount_remaining_abs >= amount_out {
            sqrt_price_target_x96
        } else {
            get_next_sqrt_price_from_output(
                sqrt_price_current_x96,
                liquidity,
                amount_remaining_abs,
                zero_for_one,
            )?
        }
    };

    let reached_target = sqrt_price_next_x96 == sqrt_price_target_x96;

    if !(reached_target && exact_in) {
        amount_in = amount_in_between(
            zero_for_one,
            sqrt_price_current_x96,
            sqrt_price_next_x96,
            liquidity,
        )?;
    }
    if !(reached_target && !exact_in) {
        amount_out = amount_out_between(
            zero_for_one,
            sqrt_price_current_x96,
            sqrt_price_next_x96,
            liquidity,
        )?;
    }

    // output can never exceed what was asked for
    if !exact_in && amount_out > amount_remaining_abs {
        amount_out = amount_remaining_abs;
    }

    let fee_amount = if exact_in && !reached_target {
        amount_remaining_abs - amount_in
    } else {
        mul_div_rounding_up(amount_in, fee, fee_complement)
            .map_err(|_| ComputeSwapError::AmountOverflow)?
    };

    Ok(SwapStep {
        sqrt_price_next_x96,
        amount_in,
        amount_out,
        fee_amount,
    })
}
