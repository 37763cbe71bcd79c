use candid::Principal;
use ethnum::U256;

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct PoolFee(pub u32);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Debug, Ord, Hash)]
pub struct PoolTickSpacing(pub i32);

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Hash)]
pub struct PoolId {
    pub token0: Principal, // Token0 identifier, the smaller of the pair
    pub token1: Principal, // Token1 identifier
    pub fee: PoolFee,      // Fee tier in hundredths of a bip (e.g., 3000 for 0.3%)
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PoolState {
    pub sqrt_price_x96: U256, // Current price in Q64.96 format, zero until initialized
    pub tick: i32,            // Current tick index
    pub fee_growth_global_0_x128: U256, // Cumulative fees per unit of liquidity for token0
    pub fee_growth_global_1_x128: U256, // Cumulative fees per unit of liquidity for token1
    pub liquidity: u128,      // Liquidity of the positions whose range contains the current tick
    pub tick_spacing: PoolTickSpacing, // Spacing between usable ticks
    pub max_liquidity_per_tick: u128, // Max gross liquidity a single tick may reference
}

impl PoolState {
    pub fn new(tick_spacing: PoolTickSpacing, max_liquidity_per_tick: u128) -> Self {
        Self {
            sqrt_price_x96: U256::ZERO,
            tick: 0,
            fee_growth_global_0_x128: U256::ZERO,
            fee_growth_global_1_x128: U256::ZERO,
            liquidity: 0,
            tick_spacing,
            max_liquidity_per_tick,
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.sqrt_price_x96 != U256::ZERO
    }
}

/// Snapshot of the pool's price and lock.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
    pub unlocked: bool,
}
