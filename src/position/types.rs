use candid::Principal;
use ethnum::U256;

/// Identifies a position: an owner's liquidity over one tick range.
/// Ordered by owner first, so one owner's positions are contiguous.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PositionKey {
    pub owner: Principal,
    pub tick_lower: i32,
    pub tick_upper: i32,
}

#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct PositionInfo {
    pub liquidity: u128, // Position liquidity
    pub fee_growth_inside_0_last_x128: U256, // Fees for token0 at last update
    pub fee_growth_inside_1_last_x128: U256, // Fees for token1 at last update
    pub tokens_owed_0: u128, // Collectable token0, from fees and burned liquidity
    pub tokens_owed_1: u128, // Collectable token1, from fees and burned liquidity
}
