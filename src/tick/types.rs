use ethnum::U256;

/// Per-tick bookkeeping. A tick only exists while some position references it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickInfo {
    pub liquidity_gross: u128, // Total liquidity referencing this tick
    pub liquidity_net: i128,   // Liquidity added when crossed left to right
    pub fee_growth_outside_0_x128: U256, // Fee growth of token0 on the other side of the tick
    pub fee_growth_outside_1_x128: U256, // Fee growth of token1 on the other side of the tick
    pub initialized: bool,
}
