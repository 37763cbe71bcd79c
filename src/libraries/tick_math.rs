use ethnum::{I256, U256};
use lazy_static::lazy_static;

use super::{
    bit_math::most_significant_bit,
    constants::{MAX_SQRT_RATIO, MAX_TICK, MIN_SQRT_RATIO, MIN_TICK},
};

/// Math library for computing sqrt prices from ticks and vice versa.
/// Computes sqrt price for ticks of size 1.0001, i.e. sqrt(1.0001^tick) as fixed point Q64.96
/// numbers. Supports prices between 2^-128 and 2^128.
pub struct TickMath;

/// sqrt(1.0001^-(2^i)) as Q128.128, indexed by bit i of |tick|.
const RATIOS: [u128; 20] = [
    0xfffcb933bd6fad37aa2d162d1a594001,
    0xfff97272373d413259a46990580e213a,
    0xfff2e50f5f656932ef12357cf3c7fdcc,
    0xffe5caca7e10e4e61c3624eaa0941cd0,
    0xffcb9843d60f6159c9db58835c926644,
    0xff973b41fa98c081472e6896dfb254c0,
    0xff2ea16466c96a3843ec78b326b52861,
    0xfe5dee046a99a2a811c461f1969c3053,
    0xfcbe86c7900a88aedcffc83b479aa3a4,
    0xf987a7253ac413176f2b074cf7815e54,
    0xf3392b0822b70005940c7a398e4b70f3,
    0xe7159475a2c29b7443b29c7fa6e889d9,
    0xd097f3bdfd2022b8845ad8f792aa5825,
    0xa9f746462d870fdf8a65dc1f90e061e5,
    0x70d869a156d2a1b890bb3df62baf32f7,
    0x31be135f97d08fd981231505542fcfa6,
    0x9aa508b5b7a84e1c677de54f3e99bc9,
    0x5d6af8dedb81196699c329225ee604,
    0x2216e584f5fa1ea926041bedfe98,
    0x48a170391f7dc42444e8fa2,
];

lazy_static! {
    // 2^64 / log2(sqrt(1.0001))
    static ref LOG_SQRT_10001_COEFF: I256 = I256::from(255738958999603826347141_i128);
    static ref TICK_LOW_OFFSET: I256 = I256::from(3402992956809132418596140100660247210_i128);
    static ref TICK_HI_OFFSET: I256 =
        U256::from_words(0, 0xdb2df09e81959a81455e260799a0632f).as_i256();
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TickMathError {
    TickOutOfBounds,
    SqrtPriceOutOfBounds,
}

impl TickMath {
    /// Calculates sqrt(1.0001^tick) * 2^96.
    /// Fails if |tick| > MAX_TICK.
    pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, TickMathError> {
        if !(MIN_TICK..=MAX_TICK).contains(&tick) {
            return Err(TickMathError::TickOutOfBounds);
        }

        let abs_tick = tick.unsigned_abs();

        let mut ratio = if abs_tick & 0x1 != 0 {
            U256::from(RATIOS[0])
        } else {
            U256::from_words(1, 0)
        };
        for (i, &constant) in RATIOS.iter().enumerate().skip(1) {
            if abs_tick & (1 << i) != 0 {
                ratio = (ratio * U256::from(constant)) >> 128;
            }
        }

        if tick > 0 {
            ratio = U256::MAX / ratio;
        }

        // Q128.128 -> Q64.96, rounding up so that get_tick_at_sqrt_ratio of the result is tick
        let round_up = if ratio & U256::from(u32::MAX) == U256::ZERO {
            U256::ZERO
        } else {
            U256::ONE
        };
        Ok((ratio >> 32) + round_up)
    }

    /// Calculates the greatest tick value such that get_sqrt_ratio_at_tick(tick) <= sqrt_price_x96.
    /// Fails unless MIN_SQRT_RATIO <= sqrt_price_x96 < MAX_SQRT_RATIO.
    pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, TickMathError> {
        if sqrt_price_x96 < *MIN_SQRT_RATIO || sqrt_price_x96 >= *MAX_SQRT_RATIO {
            return Err(TickMathError::SqrtPriceOutOfBounds);
        }

        let ratio = sqrt_price_x96 << 32;
        let msb = most_significant_bit(&ratio).ok_or(TickMathError::SqrtPriceOutOfBounds)? as u32;

        // normalise so the leading bit sits at position 127
        let mut r = if msb >= 128 {
            ratio >> (msb - 127)
        } else {
            ratio << (127 - msb)
        };

        let mut log_2 = I256::from(msb as i32 - 128) << 64;
        for shift in (50..=63u32).rev() {
            r = (r * r) >> 127;
            let f: U256 = r >> 128;
            log_2 |= f.as_i256() << shift;
            r >>= f.as_u32();
        }

        let log_sqrt10001 = log_2 * *LOG_SQRT_10001_COEFF;

        let tick_low: I256 = (log_sqrt10001 - *TICK_LOW_OFFSET) >> 128;
        let tick_hi: I256 = (log_sqrt10001 + *TICK_HI_OFFSET) >> 128;
        let (tick_low, tick_hi) = (tick_low.as_i32(), tick_hi.as_i32());

        if tick_low == tick_hi {
            return Ok(tick_low);
        }
        if Self::get_sqrt_ratio_at_tick(tick_hi)? <= sqrt_price_x96 {
            Ok(tick_hi)
        } else {
            Ok(tick_low)
        }
    }
}
