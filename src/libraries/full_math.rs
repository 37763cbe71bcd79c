use ethnum::U256;
use num_bigint::BigUint;
use num_traits::Zero;

use super::safe_cast::{big_uint_to_u256, u256_to_big_uint};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FullMathError {
    DivisionByZero,
    Overflow,
}

/// Whether a division result is floored or ceiled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    Down,
    Up,
}

/// Computes a * b / denominator with a 512-bit intermediate product, rounding as requested.
/// Fails if the denominator is zero or the result does not fit in 256 bits.
pub fn mul_div_with_rounding(
    a: U256,
    b: U256,
    denominator: U256,
    rounding: Rounding,
) -> Result<U256, FullMathError> {
    if denominator == U256::ZERO {
        return Err(FullMathError::DivisionByZero);
    }

    let product = u256_to_big_uint(a) * u256_to_big_uint(b);
    let denominator = u256_to_big_uint(denominator);

    let quotient = &product / &denominator;
    let result = match rounding {
        Rounding::Down => quotient,
        Rounding::Up if (&product % &denominator).is_zero() => quotient,
        Rounding::Up => quotient + BigUint::from(1u8),
    };

    big_uint_to_u256(result).map_err(|_| FullMathError::Overflow)
}

/// floor(a * b / denominator) with full precision.
pub fn mul_div(a: U256, b: U256, denominator: U256) -> Result<U256, FullMathError> {
    mul_div_with_rounding(a, b, denominator, Rounding::Down)
}

/// ceil(a * b / denominator) with full precision.
pub fn mul_div_rounding_up(a: U256, b: U256, denominator: U256) -> Result<U256, FullMathError> {
    mul_div_with_rounding(a, b, denominator, Rounding::Up)
}

/// Returns ceil(x / y).
/// Division by zero returns 0 and must be ruled out by the caller.
pub fn div_rounding_up(x: U256, y: U256) -> U256 {
    if y == U256::ZERO {
        return U256::ZERO;
    }
    let quotient = x / y;
    if x % y == U256::ZERO {
        quotient
    } else {
        quotient + U256::ONE
    }
}
