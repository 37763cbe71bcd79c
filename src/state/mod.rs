// [Pool State]
//  ├── pool: PoolState                              price, tick, liquidity, fee growth
//  ├── ticks: BTreeMap<i32, TickInfo>               only ticks referenced by a position
//  ├── positions: BTreeMap<PositionKey, PositionInfo>
//  └── tick_bitmap: TickBitmap                      one bit per initialized tick

use crate::{
    libraries::tick_bitmap::TickBitmap,
    pool::{
        modify_liquidity::ModifyLiquidityBufferState, swap::SwapBufferState, types::PoolState,
    },
    position::types::{PositionInfo, PositionKey},
    tick::types::TickInfo,
};

use candid::Principal;
use std::collections::BTreeMap;

#[derive(Debug, Clone)]
pub struct State {
    pool: PoolState,
    ticks: BTreeMap<i32, TickInfo>,
    positions: BTreeMap<PositionKey, PositionInfo>,
    tick_bitmap: TickBitmap,
}

impl State {
    pub fn new(pool: PoolState) -> Self {
        Self {
            pool,
            ticks: BTreeMap::new(),
            positions: BTreeMap::new(),
            tick_bitmap: TickBitmap::new(),
        }
    }

    pub fn get_pool(&self) -> &PoolState {
        &self.pool
    }

    pub fn set_pool(&mut self, pool_state: PoolState) {
        self.pool = pool_state;
    }

    /// Tick info, zeroed for ticks no position references.
    pub fn get_tick(&self, tick: i32) -> TickInfo {
        self.ticks.get(&tick).cloned().unwrap_or_default()
    }

    pub fn find_tick(&self, tick: i32) -> Option<&TickInfo> {
        self.ticks.get(&tick)
    }

    pub fn ticks(&self) -> impl Iterator<Item = (&i32, &TickInfo)> {
        self.ticks.iter()
    }

    pub fn get_position(&self, key: &PositionKey) -> PositionInfo {
        self.positions.get(key).cloned().unwrap_or_default()
    }

    pub fn update_position(&mut self, key: PositionKey, info: PositionInfo) {
        self.positions.insert(key, info);
    }

    /// All positions of `owner`, ordered by range.
    pub fn get_positions_by_owner(&self, owner: Principal) -> Vec<(PositionKey, PositionInfo)> {
        self.positions
            .iter()
            .filter(|(key, _info)| key.owner == owner)
            .map(|(key, info)| (*key, info.clone()))
            .collect()
    }

    pub fn tick_bitmap(&self) -> &TickBitmap {
        &self.tick_bitmap
    }

    pub fn apply_modify_liquidity_buffer_state(
        &mut self,
        buffer_state: ModifyLiquidityBufferState,
    ) {
        // pool state transition
        self.pool = buffer_state.pool;

        // ticks state transition, `None` clears a tick nothing references anymore
        for (tick, tick_info) in buffer_state.ticks {
            match tick_info {
                Some(info) => {
                    self.ticks.insert(tick, info);
                }
                None => {
                    self.ticks.remove(&tick);
                }
            }
        }

        // position state transition, positions stay even once emptied
        let (position_key, position_info) = buffer_state.position;
        self.positions.insert(position_key, position_info);

        // tickbitmaps state transition
        for flipped in buffer_state.flipped_ticks {
            self.tick_bitmap.toggle(flipped);
        }
    }

    pub fn apply_swap_buffer_state(&mut self, buffer_state: SwapBufferState) {
        // pool state transition
        self.pool = buffer_state.pool;

        for (tick, tick_info) in buffer_state.crossed_ticks {
            self.ticks.insert(tick, tick_info);
        }
    }
}
