use ethnum::U256;
use types::PositionInfo;

use crate::libraries::{
    constants::Q128,
    full_math::{FullMathError, mul_div},
    liquidity_math::{self, AddDeltaError},
};

pub mod types;

#[derive(Debug, Clone, PartialEq)]
pub enum UpdatePositionError {
    ZeroLiquidity,
    AddDeltaError(AddDeltaError),
    MathError(FullMathError),
    OwedOverflow,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdatePositionSuccess {
    pub fee0_owed: u128,
    pub fee1_owed: u128,
    pub updated_position_info: PositionInfo,
}

/// Credits accumulated fees to a position and applies its liquidity change.
///
/// Fees are earned by the liquidity held *before* the change, over the fee growth inside the
/// range since the position was last touched. A zero delta on an empty position is rejected,
/// it would only be a poke of nothing.
pub fn update_position(
    position_info: &PositionInfo,
    liquidity_delta: i128,
    fee_growth_inside_0_x128: U256,
    fee_growth_inside_1_x128: U256,
) -> Result<UpdatePositionSuccess, UpdatePositionError> {
    let mut position_info = position_info.clone();

    let liquidity = position_info.liquidity;
    if liquidity_delta == 0 {
        // disallow pokes for 0 liquidity positions
        if liquidity == 0 {
            return Err(UpdatePositionError::ZeroLiquidity);
        }
    } else {
        position_info.liquidity = liquidity_math::add_delta(liquidity, liquidity_delta)
            .map_err(UpdatePositionError::AddDeltaError)?;
    }

    // overflow in the subtraction of fee growth is expected
    let fee0_owed = owed_fees(
        fee_growth_inside_0_x128.wrapping_sub(position_info.fee_growth_inside_0_last_x128),
        liquidity,
    )?;
    let fee1_owed = owed_fees(
        fee_growth_inside_1_x128.wrapping_sub(position_info.fee_growth_inside_1_last_x128),
        liquidity,
    )?;

    position_info.fee_growth_inside_0_last_x128 = fee_growth_inside_0_x128;
    position_info.fee_growth_inside_1_last_x128 = fee_growth_inside_1_x128;
    position_info.credit_owed(fee0_owed, fee1_owed)?;

    Ok(UpdatePositionSuccess {
        fee0_owed,
        fee1_owed,
        updated_position_info: position_info,
    })
}

fn owed_fees(fee_growth_delta_x128: U256, liquidity: u128) -> Result<u128, UpdatePositionError> {
    let owed = mul_div(fee_growth_delta_x128, U256::from(liquidity), *Q128)
        .map_err(UpdatePositionError::MathError)?;
    u128::try_from(owed).map_err(|_| UpdatePositionError::OwedOverflow)
}

impl PositionInfo {
    /// Adds collectable amounts to the owed counters.
    pub fn credit_owed(&mut self, amount0: u128, amount1: u128) -> Result<(), UpdatePositionError> {
        self.tokens_owed_0 = self
            .tokens_owed_0
            .checked_add(amount0)
            .ok_or(UpdatePositionError::OwedOverflow)?;
        self.tokens_owed_1 = self
            .tokens_owed_1
            .checked_add(amount1)
            .ok_or(UpdatePositionError::OwedOverflow)?;
        Ok(())
    }
}
