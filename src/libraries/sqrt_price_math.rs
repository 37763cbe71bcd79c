use ethnum::U256;

use super::{
    constants::{Q96, U160_MAX},
    full_math::{div_rounding_up, mul_div, mul_div_rounding_up},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqrtPriceMathError {
    PriceOverflow,
    NotEnoughLiquidity,
    InvalidPriceOrLiquidity,
}

fn ensure_u160(price: U256) -> Result<U256, SqrtPriceMathError> {
    if price > *U160_MAX {
        return Err(SqrtPriceMathError::PriceOverflow);
    }
    Ok(price)
}

/// Gets the next sqrt price given a delta of token0, rounding up.
///
/// Rounding up moves the price far enough for exact output (price increases) and
/// not too far for exact input (price decreases).
/// Computes liquidity * sqrtP / (liquidity ± amount * sqrtP), falling back to
/// liquidity / (liquidity / sqrtP + amount) when the product overflows.
///
/// # Arguments
/// * `sqrt_px96` - The starting price (Q64.96).
/// * `liquidity` - The amount of usable liquidity.
/// * `amount` - How much of token0 to add to or remove from virtual reserves.
/// * `add` - Whether to add (true) or remove (false) the amount of token0.
pub fn get_next_sqrt_price_from_amount0_rounding_up(
    sqrt_px96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, SqrtPriceMathError> {
    if amount == U256::ZERO {
        return Ok(sqrt_px96);
    }

    let numerator1: U256 = U256::from(liquidity) << 96;
    let product = amount.checked_mul(sqrt_px96);

    if add {
        if let Some(product) = product {
            if let Some(denominator) = numerator1.checked_add(product) {
                return mul_div_rounding_up(numerator1, sqrt_px96, denominator)
                    .map_err(|_| SqrtPriceMathError::PriceOverflow)
                    .and_then(ensure_u160);
            }
        }
        let denominator = (numerator1 / sqrt_px96)
            .checked_add(amount)
            .ok_or(SqrtPriceMathError::PriceOverflow)?;
        ensure_u160(div_rounding_up(numerator1, denominator))
    } else {
        // the removed reserves must stay strictly below the virtual reserves
        let product = match product {
            Some(product) if numerator1 > product => product,
            _ => return Err(SqrtPriceMathError::PriceOverflow),
        };
        mul_div_rounding_up(numerator1, sqrt_px96, numerator1 - product)
            .map_err(|_| SqrtPriceMathError::PriceOverflow)
            .and_then(ensure_u160)
    }
}

/// Gets the next sqrt price given a delta of token1, rounding down.
///
/// Computes sqrtP ± amount / liquidity. The quotient is floored when adding and
/// ceiled when removing so the price never moves past what the amount pays for.
pub fn get_next_sqrt_price_from_amount1_rounding_down(
    sqrt_px96: U256,
    liquidity: u128,
    amount: U256,
    add: bool,
) -> Result<U256, SqrtPriceMathError> {
    let liquidity = U256::from(liquidity);

    if add {
        let quotient = if amount <= *U160_MAX {
            (amount << 96) / liquidity
        } else {
            mul_div(amount, *Q96, liquidity).map_err(|_| SqrtPriceMathError::PriceOverflow)?
        };
        let next = sqrt_px96
            .checked_add(quotient)
            .ok_or(SqrtPriceMathError::PriceOverflow)?;
        ensure_u160(next)
    } else {
        let quotient = if amount <= *U160_MAX {
            div_rounding_up(amount << 96, liquidity)
        } else {
            mul_div_rounding_up(amount, *Q96, liquidity)
                .map_err(|_| SqrtPriceMathError::PriceOverflow)?
        };
        if sqrt_px96 <= quotient {
            return Err(SqrtPriceMathError::NotEnoughLiquidity);
        }
        Ok(sqrt_px96 - quotient)
    }
}

/// Gets the next sqrt price given an input amount of token0 (`zero_for_one`) or token1.
/// Fails if price or liquidity are zero. Rounds so the target price is never passed.
pub fn get_next_sqrt_price_from_input(
    sqrt_px96: U256,
    liquidity: u128,
    amount_in: U256,
    zero_for_one: bool,
) -> Result<U256, SqrtPriceMathError> {
    if sqrt_px96 == U256::ZERO || liquidity == 0 {
        return Err(SqrtPriceMathError::InvalidPriceOrLiquidity);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_px96, liquidity, amount_in, true)
    } else {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_px96, liquidity, amount_in, true)
    }
}

/// Gets the next sqrt price given an output amount of token1 (`zero_for_one`) or token0.
/// Fails if price or liquidity are zero. Rounds so the target price is always reached.
pub fn get_next_sqrt_price_from_output(
    sqrt_px96: U256,
    liquidity: u128,
    amount_out: U256,
    zero_for_one: bool,
) -> Result<U256, SqrtPriceMathError> {
    if sqrt_px96 == U256::ZERO || liquidity == 0 {
        return Err(SqrtPriceMathError::InvalidPriceOrLiquidity);
    }

    if zero_for_one {
        get_next_sqrt_price_from_amount1_rounding_down(sqrt_px96, liquidity, amount_out, false)
    } else {
        get_next_sqrt_price_from_amount0_rounding_up(sqrt_px96, liquidity, amount_out, false)
    }
}
