use candid::Principal;
use ethnum::{I256, U256};
use ic_canister_log::log;

use crate::{
    ledger::{Transfer, TokenLedger, settle},
    libraries::{
        amount_delta::{get_amount_0_delta_signed, get_amount_1_delta_signed},
        balance_delta::BalanceDelta,
        liquidity_math,
        tick_bitmap::TickBitmap,
        tick_math::TickMath,
    },
    logs::INFO,
    position::{
        types::{PositionInfo, PositionKey},
        update_position,
    },
    state::State,
    tick::{UpdateTickParams, get_fee_growth_inside, types::TickInfo, update_tick},
};

use super::{Pool, PoolError, check_ticks, types::PoolState};

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModifyLiquidityParams {
    pub owner: Principal,
    pub tick_lower: i32,
    pub tick_upper: i32,
    pub liquidity_delta: i128,
}

/// Keeps state changes, in case of success, state transition will be applied using this buffer
/// state, In case of failure no state transition will be triggered
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModifyLiquidityBufferState {
    pub pool: PoolState,
    // `None` clears a tick whose gross liquidity dropped to zero
    pub ticks: Vec<(i32, Option<TickInfo>)>,
    pub position: (PositionKey, PositionInfo),
    pub flipped_ticks: Vec<(i16, u8)>,
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ModifyLiquiditySuccess {
    // tokens owed to (positive) or by (negative) the pool for the liquidity change
    pub balance_delta: BalanceDelta,
    // fees credited to the position by this update
    pub fee_delta: (u128, u128),
    pub buffer_state: ModifyLiquidityBufferState,
}

/// Computes the effect of changing a position's liquidity without touching the state.
///
/// Updates both boundary ticks, locates their bitmap bits when they flip, settles the
/// position's fees, then prices the liquidity change against the current tick. Pool
/// liquidity only moves when the range contains the current tick.
pub fn modify_liquidity(
    state: &State,
    params: &ModifyLiquidityParams,
) -> Result<ModifyLiquiditySuccess, PoolError> {
    let pool_state_initial = state.get_pool();
    if !pool_state_initial.is_initialized() {
        return Err(PoolError::NotInitialized);
    }
    let tick_spacing = pool_state_initial.tick_spacing.0;
    check_ticks(params.tick_lower, params.tick_upper, tick_spacing)?;

    let mut pool_state = pool_state_initial.clone();
    let position_key = PositionKey {
        owner: params.owner,
        tick_lower: params.tick_lower,
        tick_upper: params.tick_upper,
    };

    let mut lower_info = state.get_tick(params.tick_lower);
    let mut upper_info = state.get_tick(params.tick_upper);
    let mut ticks = vec![];
    let mut flipped_ticks = vec![];

    if params.liquidity_delta != 0 {
        for (tick, info, upper) in [
            (params.tick_lower, &mut lower_info, false),
            (params.tick_upper, &mut upper_info, true),
        ] {
            let update = update_tick(
                info,
                &UpdateTickParams {
                    tick,
                    tick_current: pool_state.tick,
                    liquidity_delta: params.liquidity_delta,
                    fee_growth_global_0_x128: pool_state.fee_growth_global_0_x128,
                    fee_growth_global_1_x128: pool_state.fee_growth_global_1_x128,
                    upper,
                    max_liquidity: pool_state.max_liquidity_per_tick,
                },
            )?;
            if update.flipped {
                flipped_ticks.push(TickBitmap::flip_position(tick, tick_spacing)?);
            }
            *info = update.updated_tick_info;
        }
    }

    let (fee_growth_inside_0_x128, fee_growth_inside_1_x128) = get_fee_growth_inside(
        params.tick_lower,
        params.tick_upper,
        &lower_info,
        &upper_info,
        pool_state.tick,
        pool_state.fee_growth_global_0_x128,
        pool_state.fee_growth_global_1_x128,
    );

    let position_update = update_position(
        &state.get_position(&position_key),
        params.liquidity_delta,
        fee_growth_inside_0_x128,
        fee_growth_inside_1_x128,
    )?;

    let mut amount0 = I256::ZERO;
    let mut amount1 = I256::ZERO;

    if params.liquidity_delta != 0 {
        // a decreasing delta that empties a tick clears it
        for (tick, info) in [(params.tick_lower, lower_info), (params.tick_upper, upper_info)] {
            let keep = info.liquidity_gross != 0;
            ticks.push((tick, keep.then_some(info)));
        }

        let sqrt_price_lower_x96 =
            TickMath::get_sqrt_ratio_at_tick(params.tick_lower).map_err(|_| PoolError::Bounds)?;
        let sqrt_price_upper_x96 =
            TickMath::get_sqrt_ratio_at_tick(params.tick_upper).map_err(|_| PoolError::Bounds)?;

        if pool_state.tick < params.tick_lower {
            // current tick is below the passed range; liquidity can only become in range by crossing from left to
            // right, when we'll need _more_ token0 (it's becoming more valuable) so user must provide it
            amount0 = get_amount_0_delta_signed(
                sqrt_price_lower_x96,
                sqrt_price_upper_x96,
                params.liquidity_delta,
            )
            .map_err(|_| PoolError::CalculationOverflow)?;
        } else if pool_state.tick < params.tick_upper {
            amount0 = get_amount_0_delta_signed(
                pool_state.sqrt_price_x96,
                sqrt_price_upper_x96,
                params.liquidity_delta,
            )
            .map_err(|_| PoolError::CalculationOverflow)?;
            amount1 = get_amount_1_delta_signed(
                sqrt_price_lower_x96,
                pool_state.sqrt_price_x96,
                params.liquidity_delta,
            )
            .map_err(|_| PoolError::CalculationOverflow)?;

            pool_state.liquidity =
                liquidity_math::add_delta(pool_state.liquidity, params.liquidity_delta)?;
        } else {
            // current tick is above the passed range; liquidity can only become in range by crossing from right to
            // left, when we'll need _more_ token1 (it's becoming more valuable) so user must provide it
            amount1 = get_amount_1_delta_signed(
                sqrt_price_lower_x96,
                sqrt_price_upper_x96,
                params.liquidity_delta,
            )
            .map_err(|_| PoolError::CalculationOverflow)?;
        }
    }

    Ok(ModifyLiquiditySuccess {
        balance_delta: BalanceDelta::new(amount0, amount1),
        fee_delta: (position_update.fee0_owed, position_update.fee1_owed),
        buffer_state: ModifyLiquidityBufferState {
            pool: pool_state,
            ticks,
            position: (position_key, position_update.updated_position_info),
            flipped_ticks,
        },
    })
}

fn liquidity_delta(amount: u128) -> Result<i128, PoolError> {
    i128::try_from(amount).map_err(|_| PoolError::LiquidityOverflow)
}

impl<L: TokenLedger> Pool<L> {
    /// Adds `amount` of liquidity to the owner's position over `[tick_lower, tick_upper)`.
    ///
    /// The required token amounts are pulled from the owner before the position exists;
    /// returns them as `(amount0, amount1)`.
    pub fn mint(
        &self,
        owner: Principal,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> Result<(U256, U256), PoolError> {
        let _guard = self.lock("mint")?;
        self.ensure_initialized()?;
        if amount == 0 {
            return Err(PoolError::AmountZero);
        }

        let params = ModifyLiquidityParams {
            owner,
            tick_lower,
            tick_upper,
            liquidity_delta: liquidity_delta(amount)?,
        };
        let success = self.read_state(|s| modify_liquidity(s, &params))?;

        // adding liquidity never yields negative amounts
        let amount0 = success.balance_delta.amount0().as_u256();
        let amount1 = success.balance_delta.amount1().as_u256();

        settle(
            self.ledger(),
            &[
                Transfer::In {
                    token: self.pool_id.token0,
                    from: owner,
                    amount: amount0,
                },
                Transfer::In {
                    token: self.pool_id.token1,
                    from: owner,
                    amount: amount1,
                },
            ],
        )?;

        self.mutate_state(|s| s.apply_modify_liquidity_buffer_state(success.buffer_state));

        log!(
            INFO,
            "[mint]: {} added {amount} liquidity to [{tick_lower}, {tick_upper}) for {amount0} token0 and {amount1} token1",
            owner.to_text()
        );

        Ok((amount0, amount1))
    }

    /// Removes `amount` of liquidity from the owner's position.
    ///
    /// The released tokens are not sent, they are credited to the position's owed counters
    /// for a later [`Pool::collect`]. A zero amount only settles the position's fees.
    pub fn burn(
        &self,
        owner: Principal,
        tick_lower: i32,
        tick_upper: i32,
        amount: u128,
    ) -> Result<(U256, U256), PoolError> {
        let _guard = self.lock("burn")?;
        self.ensure_initialized()?;

        let params = ModifyLiquidityParams {
            owner,
            tick_lower,
            tick_upper,
            liquidity_delta: -liquidity_delta(amount)?,
        };
        let mut success = self.read_state(|s| modify_liquidity(s, &params))?;

        let amount0 = success.balance_delta.amount0().unsigned_abs();
        let amount1 = success.balance_delta.amount1().unsigned_abs();
        let owed0 = u128::try_from(amount0).map_err(|_| PoolError::CalculationOverflow)?;
        let owed1 = u128::try_from(amount1).map_err(|_| PoolError::CalculationOverflow)?;
        success
            .buffer_state
            .position
            .1
            .credit_owed(owed0, owed1)?;

        self.mutate_state(|s| s.apply_modify_liquidity_buffer_state(success.buffer_state));

        log!(
            INFO,
            "[burn]: {} removed {amount} liquidity from [{tick_lower}, {tick_upper}), {amount0} token0 and {amount1} token1 now owed",
            owner.to_text()
        );

        Ok((amount0, amount1))
    }

    /// Pays out up to the requested amounts of what the position is owed.
    ///
    /// Returns the amounts actually paid; nothing owed is not an error.
    pub fn collect(
        &self,
        owner: Principal,
        recipient: Principal,
        tick_lower: i32,
        tick_upper: i32,
        amount0_requested: u128,
        amount1_requested: u128,
    ) -> Result<(u128, u128), PoolError> {
        let _guard = self.lock("collect")?;
        self.ensure_initialized()?;

        let position_key = PositionKey {
            owner,
            tick_lower,
            tick_upper,
        };
        let mut position = self.read_state(|s| s.get_position(&position_key));

        let amount0 = amount0_requested.min(position.tokens_owed_0);
        let amount1 = amount1_requested.min(position.tokens_owed_1);
        if amount0 == 0 && amount1 == 0 {
            return Ok((0, 0));
        }

        position.tokens_owed_0 -= amount0;
        position.tokens_owed_1 -= amount1;

        settle(
            self.ledger(),
            &[
                Transfer::Out {
                    token: self.pool_id.token0,
                    to: recipient,
                    amount: U256::from(amount0),
                },
                Transfer::Out {
                    token: self.pool_id.token1,
                    to: recipient,
                    amount: U256::from(amount1),
                },
            ],
        )?;

        self.mutate_state(|s| s.update_position(position_key, position));

        log!(
            INFO,
            "[collect]: paid {amount0} token0 and {amount1} token1 from {}'s [{tick_lower}, {tick_upper}) to {}",
            owner.to_text(),
            recipient.to_text()
        );

        Ok((amount0, amount1))
    }
}
