pub mod amount_delta;
pub mod balance_delta;
pub mod bit_math;
pub mod constants;
pub mod full_math;
pub mod liquidity_amounts;
pub mod liquidity_math;
pub mod safe_cast;
pub mod sqrt_price_math;
pub mod swap_math;
pub mod tick_bitmap;
pub mod tick_math;
