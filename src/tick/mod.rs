use crate::libraries::constants::{MAX_TICK, MIN_TICK};
use crate::libraries::liquidity_math::{self, AddDeltaError};
use ethnum::U256;
use types::TickInfo;

pub mod types;


/// Derives max liquidity per tick from tick spacing.
/// Used in pool creation.
pub fn tick_spacing_to_max_liquidity_per_tick(tick_spacing: i32) -> u128 {
    let min_tick = (MIN_TICK / tick_spacing) * tick_spacing;
    let max_tick = (MAX_TICK / tick_spacing) * tick_spacing;
    let num_ticks = ((max_tick - min_tick) / tick_spacing) as u32 + 1;
    u128::MAX / num_ticks as u128
}

/// Fee growth per unit of liquidity accumulated strictly inside `[tick_lower, tick_upper)`.
///
/// Every subtraction wraps: only differences between two readings of the result are
/// meaningful, never its absolute value.
pub fn get_fee_growth_inside(
    tick_lower: i32,
    tick_upper: i32,
    lower_info: &TickInfo,
    upper_info: &TickInfo,
    tick_current: i32,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
) -> (U256, U256) {
    let (fee_growth_below_0_x128, fee_growth_below_1_x128) = if tick_current >= tick_lower {
        (
            lower_info.fee_growth_outside_0_x128,
            lower_info.fee_growth_outside_1_x128,
        )
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(lower_info.fee_growth_outside_0_x128),
            fee_growth_global_1_x128.wrapping_sub(lower_info.fee_growth_outside_1_x128),
        )
    };

    let (fee_growth_above_0_x128, fee_growth_above_1_x128) = if tick_current < tick_upper {
        (
            upper_info.fee_growth_outside_0_x128,
            upper_info.fee_growth_outside_1_x128,
        )
    } else {
        (
            fee_growth_global_0_x128.wrapping_sub(upper_info.fee_growth_outside_0_x128),
            fee_growth_global_1_x128.wrapping_sub(upper_info.fee_growth_outside_1_x128),
        )
    };

    (
        fee_growth_global_0_x128
            .wrapping_sub(fee_growth_below_0_x128)
            .wrapping_sub(fee_growth_above_0_x128),
        fee_growth_global_1_x128
            .wrapping_sub(fee_growth_below_1_x128)
            .wrapping_sub(fee_growth_above_1_x128),
    )
}

#[derive(Debug, Clone, PartialEq)]
pub enum UpdateTickError {
    AddDeltaError(AddDeltaError),
    LiquidityNetOverflow,
    LiquidityCapExceeded {
        liquidity_gross_after: u128,
        max_liquidity: u128,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTickParams {
    pub tick: i32,
    pub tick_current: i32,
    pub liquidity_delta: i128,
    pub fee_growth_global_0_x128: U256,
    pub fee_growth_global_1_x128: U256,
    pub upper: bool,
    pub max_liquidity: u128,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateTickSuccess {
    pub flipped: bool,
    pub liquidity_gross_after: u128,
    pub updated_tick_info: TickInfo,
}

/// Applies a position's liquidity change to one of its boundary ticks.
///
/// `flipped` is true when the tick goes from unreferenced to referenced or back. The
/// updated info is returned rather than stored, the caller commits it once every other
/// step of the operation has succeeded.
pub fn update_tick(
    tick_info: &TickInfo,
    params: &UpdateTickParams,
) -> Result<UpdateTickSuccess, UpdateTickError> {
    let mut tick_info = tick_info.clone();

    let liquidity_gross_before = tick_info.liquidity_gross;
    let liquidity_gross_after =
        liquidity_math::add_delta(liquidity_gross_before, params.liquidity_delta)
            .map_err(UpdateTickError::AddDeltaError)?;

    if liquidity_gross_after > params.max_liquidity {
        return Err(UpdateTickError::LiquidityCapExceeded {
            liquidity_gross_after,
            max_liquidity: params.max_liquidity,
        });
    }

    let flipped = (liquidity_gross_after == 0) != (liquidity_gross_before == 0);

    if liquidity_gross_before == 0 {
        // by convention, we assume that all growth before a tick was initialized happened _below_ the tick
        if params.tick <= params.tick_current {
            tick_info.fee_growth_outside_0_x128 = params.fee_growth_global_0_x128;
            tick_info.fee_growth_outside_1_x128 = params.fee_growth_global_1_x128;
        }
        tick_info.initialized = true;
    }

    tick_info.liquidity_gross = liquidity_gross_after;

    // when the lower (upper) tick is crossed left to right, liquidity must be added (removed)
    // when the lower (upper) tick is crossed right to left, liquidity must be removed (added)
    tick_info.liquidity_net = if params.upper {
        tick_info
            .liquidity_net
            .checked_sub(params.liquidity_delta)
            .ok_or(UpdateTickError::LiquidityNetOverflow)?
    } else {
        tick_info
            .liquidity_net
            .checked_add(params.liquidity_delta)
            .ok_or(UpdateTickError::LiquidityNetOverflow)?
    };

    Ok(UpdateTickSuccess {
        flipped,
        liquidity_gross_after,
        updated_tick_info: tick_info,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossTickSuccess {
    pub liquidity_net: i128,
    pub updated_tick_info: TickInfo,
}

/// Transitions to the other side of a tick as the price moves through it.
/// The outside fee growth flips to the complement against the current globals.
pub fn cross_tick(
    tick_info: &TickInfo,
    fee_growth_global_0_x128: U256,
    fee_growth_global_1_x128: U256,
) -> CrossTickSuccess {
    let mut updated_tick_info = tick_info.clone();

    updated_tick_info.fee_growth_outside_0_x128 =
        fee_growth_global_0_x128.wrapping_sub(tick_info.fee_growth_outside_0_x128);
    updated_tick_info.fee_growth_outside_1_x128 =
        fee_growth_global_1_x128.wrapping_sub(tick_info.fee_growth_outside_1_x128);

    CrossTickSuccess {
        liquidity_net: tick_info.liquidity_net,
        updated_tick_info,
    }
}
