use ethnum::U256;
use lazy_static::lazy_static;

lazy_static! {
    pub static ref Q128: U256 = U256::from_words(1, 0); // 2^128
    pub static ref Q96: U256 = U256::ONE << 96; // 2^96
    pub static ref Q160: U256 = U256::ONE << 160; // 2^160
    pub static ref U160_MAX: U256 = (U256::ONE << 160) - U256::ONE;

    // sqrt prices at MIN_TICK and MAX_TICK
    pub static ref MIN_SQRT_RATIO: U256 = U256::from(4295128739_u64);
    pub static ref MAX_SQRT_RATIO: U256 =
        U256::from_words(0xfffd8963, 0xefd1fc6a506488495d951d5263988d26);
}

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = 887272;

/// Largest tick spacing a pool may be configured with.
pub const MAX_TICK_SPACING: i32 = 16384;

/// Fee denominator in hundredths of a bip (100% = 1_000_000).
pub const MAX_SWAP_FEE: u32 = 1_000_000;
