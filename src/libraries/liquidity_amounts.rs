use ethnum::U256;

use super::{constants::Q96, full_math::mul_div};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LiquidityAmountsError {
    Overflow,
    InvalidPrice,
}

fn sorted_range(a: U256, b: U256) -> Result<(U256, U256), LiquidityAmountsError> {
    let (lower, upper) = if a > b { (b, a) } else { (a, b) };
    if lower == upper || lower == U256::ZERO {
        return Err(LiquidityAmountsError::InvalidPrice);
    }
    Ok((lower, upper))
}

fn narrow(liquidity: U256) -> Result<u128, LiquidityAmountsError> {
    u128::try_from(liquidity).map_err(|_| LiquidityAmountsError::Overflow)
}

/// Liquidity bought by `amount0` of token0 over a price range.
/// Calculates amount0 * (sqrt(upper) * sqrt(lower)) / (sqrt(upper) - sqrt(lower)).
pub fn get_liquidity_for_amount0(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    amount0: U256,
) -> Result<u128, LiquidityAmountsError> {
    let (lower, upper) = sorted_range(sqrt_price_a_x96, sqrt_price_b_x96)?;

    let intermediate = mul_div(lower, upper, *Q96).map_err(|_| LiquidityAmountsError::Overflow)?;
    let liquidity =
        mul_div(amount0, intermediate, upper - lower).map_err(|_| LiquidityAmountsError::Overflow)?;
    narrow(liquidity)
}

/// Liquidity bought by `amount1` of token1 over a price range.
/// Calculates amount1 / (sqrt(upper) - sqrt(lower)).
pub fn get_liquidity_for_amount1(
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    amount1: U256,
) -> Result<u128, LiquidityAmountsError> {
    let (lower, upper) = sorted_range(sqrt_price_a_x96, sqrt_price_b_x96)?;

    let liquidity =
        mul_div(amount1, *Q96, upper - lower).map_err(|_| LiquidityAmountsError::Overflow)?;
    narrow(liquidity)
}

/// Maximum liquidity that both amounts can pay for at the current price.
///
/// Below the range only token0 counts, above it only token1; inside it the smaller of the
/// two partial liquidities wins.
pub fn get_liquidity_for_amounts(
    sqrt_price_x96: U256,
    sqrt_price_a_x96: U256,
    sqrt_price_b_x96: U256,
    amount0: U256,
    amount1: U256,
) -> Result<u128, LiquidityAmountsError> {
    let (lower, upper) = sorted_range(sqrt_price_a_x96, sqrt_price_b_x96)?;

    if sqrt_price_x96 <= lower {
        get_liquidity_for_amount0(lower, upper, amount0)
    } else if sqrt_price_x96 < upper {
        let liquidity0 = get_liquidity_for_amount0(sqrt_price_x96, upper, amount0)?;
        let liquidity1 = get_liquidity_for_amount1(lower, sqrt_price_x96, amount1)?;
        Ok(liquidity0.min(liquidity1))
    } else {
        get_liquidity_for_amount1(lower, upper, amount1)
    }
}
