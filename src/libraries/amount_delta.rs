use super::{
    constants::Q96,
    full_math::{div_rounding_up, mul_div, mul_div_rounding_up},
};

use ethnum::{I256, U256};

pub fn abs_diff(a: U256, b: U256) -> U256 {
    if a >= b { a - b } else { b - a }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AmountDeltaError {
    InvalidPrice,
    Overflow,
}

const FIXED_POINT_96_RESOLUTION: u8 = 96;

/// Gets the amount0 delta between two prices.
/// Calculates liquidity / sqrt(lower) - liquidity / sqrt(upper),
/// i.e. liquidity * (sqrt(upper) - sqrt(lower)) / (sqrt(upper) * sqrt(lower)).
/// The prices may be passed in either order.
pub fn get_amount_0_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, AmountDeltaError> {
    let (sqrt_lower, sqrt_upper) = if sqrt_price_a_x96 > sqrt_price_b_x96 {
        (sqrt_price_b_x96, sqrt_price_a_x96)
    } else {
        (sqrt_price_a_x96, sqrt_price_b_x96)
    };

    if sqrt_lower == U256::ZERO {
        return Err(AmountDeltaError::InvalidPrice);
    }

    let numerator1 = U256::from(liquidity) << FIXED_POINT_96_RESOLUTION;
    let numerator2 = sqrt_upper - sqrt_lower;

    if round_up {
        let scaled = mul_div_rounding_up(numerator1, numerator2, sqrt_upper)
            .map_err(|_e| AmountDeltaError::Overflow)?;
        Ok(div_rounding_up(scaled, sqrt_lower))
    } else {
        let scaled =
            mul_div(numerator1, numerator2, sqrt_upper).map_err(|_e| AmountDeltaError::Overflow)?;
        Ok(scaled / sqrt_lower)
    }
}

/// Gets the amount1 delta between two prices.
/// Calculates liquidity * (sqrt(upper) - sqrt(lower)).
pub fn get_amount_1_delta(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: u128,
    round_up: bool,
) -> Result<U256, AmountDeltaError> {
    let numerator = abs_diff(sqrt_price_a_x96, sqrt_price_b_x96);
    let liquidity = U256::from(liquidity);

    let result = if round_up {
        mul_div_rounding_up(liquidity, numerator, *Q96)
    } else {
        mul_div(liquidity, numerator, *Q96)
    };
    result.map_err(|_e| AmountDeltaError::Overflow)
}

fn to_signed(amount: U256, negate: bool) -> Result<I256, AmountDeltaError> {
    let amount = I256::try_from(amount).map_err(|_e| AmountDeltaError::Overflow)?;
    Ok(if negate { -amount } else { amount })
}

/// Signed token0 delta for a liquidity change.
/// Adding liquidity rounds up and is positive (owed to the pool); removing rounds down
/// and is negative (owed by the pool).
pub fn get_amount_0_delta_signed(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: i128,
) -> Result<I256, AmountDeltaError> {
    let abs_liquidity = liquidity.unsigned_abs();
    let amount = get_amount_0_delta(
        sqrt_price_a_x96,
        sqrt_price_b_x96,
        abs_liquidity,
        liquidity >= 0,
    )?;
    to_signed(amount, liquidity < 0)
}

/// Signed token1 delta for a liquidity change, with the same sign and rounding rules
/// as [`get_amount_0_delta_signed`].
pub fn get_amount_1_delta_signed(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    liquidity: i128,
) -> Result<I256, AmountDeltaError> {
    let abs_liquidity = liquidity.unsigned_abs();
    let amount = get_amount_1_delta(
        sqrt_price_a_x96,
        sqrt_price_b_x96,
        abs_liquidity,
        liquidity >= 0,
    )?;
    to_signed(amount, liquidity < 0)
}
