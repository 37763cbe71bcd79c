pub mod create_pool;
pub mod modify_liquidity;
pub mod quote;
pub mod swap;
pub mod types;


use std::cell::{Cell, RefCell};

use candid::Principal;
use ethnum::U256;
use ic_canister_log::log;

use crate::{
    guard::PoolGuard,
    ledger::{LedgerTransferError, TokenLedger},
    libraries::{
        constants::{MAX_TICK, MIN_TICK},
        liquidity_math::AddDeltaError,
        tick_bitmap::TickBitmapError,
        tick_math::TickMath,
    },
    logs::{DEBUG, INFO},
    position::{
        UpdatePositionError,
        types::{PositionInfo, PositionKey},
    },
    state::State,
    tick::{UpdateTickError, types::TickInfo},
};
use create_pool::PoolArgs;
use types::{PoolId, PoolState, Slot0};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolError {
    AlreadyInitialized,
    NotInitialized,
    ReentrantCall,
    TickOrder { tick_lower: i32, tick_upper: i32 },
    TickBounds(i32),
    AmountZero,
    PriceLimit,
    Spacing { tick: i32, tick_spacing: i32 },
    LiquidityCapExceeded,
    LiquidityUnderflow,
    LiquidityOverflow,
    Bounds,
    EmptyPosition,
    CalculationOverflow,
    Ledger(LedgerTransferError),
}

impl From<LedgerTransferError> for PoolError {
    fn from(value: LedgerTransferError) -> Self {
        PoolError::Ledger(value)
    }
}

impl From<AddDeltaError> for PoolError {
    fn from(value: AddDeltaError) -> Self {
        match value {
            AddDeltaError::Overflow => PoolError::LiquidityOverflow,
            AddDeltaError::Underflow => PoolError::LiquidityUnderflow,
        }
    }
}

impl From<TickBitmapError> for PoolError {
    fn from(value: TickBitmapError) -> Self {
        match value {
            TickBitmapError::TickMisaligned(tick, tick_spacing) => {
                PoolError::Spacing { tick, tick_spacing }
            }
            TickBitmapError::TickOutOfBounds(tick) => PoolError::TickBounds(tick),
            TickBitmapError::InvalidTickSpacing(tick_spacing) => PoolError::Spacing {
                tick: 0,
                tick_spacing,
            },
        }
    }
}

impl From<UpdateTickError> for PoolError {
    fn from(value: UpdateTickError) -> Self {
        match value {
            UpdateTickError::AddDeltaError(e) => e.into(),
            UpdateTickError::LiquidityNetOverflow => PoolError::LiquidityOverflow,
            UpdateTickError::LiquidityCapExceeded { .. } => PoolError::LiquidityCapExceeded,
        }
    }
}

impl From<UpdatePositionError> for PoolError {
    fn from(value: UpdatePositionError) -> Self {
        match value {
            UpdatePositionError::ZeroLiquidity => PoolError::EmptyPosition,
            UpdatePositionError::AddDeltaError(e) => e.into(),
            UpdatePositionError::MathError(_) | UpdatePositionError::OwedOverflow => {
                PoolError::CalculationOverflow
            }
        }
    }
}

/// Checks a position range: ordered, inside the tick domain and aligned to the spacing.
pub fn check_ticks(tick_lower: i32, tick_upper: i32, tick_spacing: i32) -> Result<(), PoolError> {
    if tick_spacing <= 0 {
        return Err(PoolError::Spacing {
            tick: tick_lower,
            tick_spacing,
        });
    }
    if tick_lower >= tick_upper {
        return Err(PoolError::TickOrder {
            tick_lower,
            tick_upper,
        });
    }
    if tick_lower < MIN_TICK {
        return Err(PoolError::TickBounds(tick_lower));
    }
    if tick_upper > MAX_TICK {
        return Err(PoolError::TickBounds(tick_upper));
    }
    for tick in [tick_lower, tick_upper] {
        if tick % tick_spacing != 0 {
            return Err(PoolError::Spacing { tick, tick_spacing });
        }
    }
    Ok(())
}

/// A single concentrated-liquidity pool and the ledger that custodies its tokens.
///
/// Operations take `&self` so that a ledger may hold a handle to the pool and call back
/// into it; such calls are rejected with [`PoolError::ReentrantCall`] while another
/// operation holds the lock.
pub struct Pool<L: TokenLedger> {
    pool_id: PoolId,
    state: RefCell<State>,
    lock: Cell<bool>,
    ledger: L,
}

impl<L: TokenLedger> Pool<L> {
    /// Creates an uninitialized pool, its price is set later by [`Pool::initialize`].
    pub fn new(args: PoolArgs, ledger: L) -> Self {
        Self {
            pool_id: args.pool_id(),
            state: RefCell::new(State::new(PoolState::new(
                args.tick_spacing(),
                args.max_liquidity_per_tick(),
            ))),
            lock: Cell::new(false),
            ledger,
        }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    pub(crate) fn read_state<R>(&self, f: impl FnOnce(&State) -> R) -> R {
        f(&self.state.borrow())
    }

    pub(crate) fn mutate_state<R>(&self, f: impl FnOnce(&mut State) -> R) -> R {
        f(&mut self.state.borrow_mut())
    }

    /// Takes the pool lock, held until the returned guard is dropped.
    pub(crate) fn lock(&self, operation: &str) -> Result<PoolGuard<'_>, PoolError> {
        PoolGuard::new(&self.lock).map_err(|_| {
            log!(DEBUG, "[{operation}]: rejected, pool is locked by another operation");
            PoolError::ReentrantCall
        })
    }

    pub(crate) fn ensure_initialized(&self) -> Result<(), PoolError> {
        if self.read_state(|s| s.get_pool().is_initialized()) {
            Ok(())
        } else {
            Err(PoolError::NotInitialized)
        }
    }

    /// Sets the first price of the pool and returns the matching tick.
    pub fn initialize(&self, sqrt_price_x96: U256) -> Result<i32, PoolError> {
        let _guard = self.lock("initialize")?;

        if self.read_state(|s| s.get_pool().is_initialized()) {
            return Err(PoolError::AlreadyInitialized);
        }

        let tick =
            TickMath::get_tick_at_sqrt_ratio(sqrt_price_x96).map_err(|_| PoolError::Bounds)?;

        self.mutate_state(|s| {
            let mut pool_state = s.get_pool().clone();
            pool_state.sqrt_price_x96 = sqrt_price_x96;
            pool_state.tick = tick;
            s.set_pool(pool_state);
        });

        log!(
            INFO,
            "[initialize]: pool {}/{} fee {} initialized at sqrt price {sqrt_price_x96}, tick {tick}",
            self.pool_id.token0.to_text(),
            self.pool_id.token1.to_text(),
            self.pool_id.fee.0
        );

        Ok(tick)
    }

    pub fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    pub fn tick_spacing(&self) -> i32 {
        self.read_state(|s| s.get_pool().tick_spacing.0)
    }

    pub fn max_liquidity_per_tick(&self) -> u128 {
        self.read_state(|s| s.get_pool().max_liquidity_per_tick)
    }

    pub fn is_locked(&self) -> bool {
        self.lock.get()
    }

    /// Current price and tick; `unlocked` is false before initialization and while an
    /// operation is in progress.
    pub fn slot0(&self) -> Slot0 {
        self.read_state(|s| {
            let pool_state = s.get_pool();
            Slot0 {
                sqrt_price_x96: pool_state.sqrt_price_x96,
                tick: pool_state.tick,
                unlocked: pool_state.is_initialized() && !self.is_locked(),
            }
        })
    }

    pub fn liquidity(&self) -> u128 {
        self.read_state(|s| s.get_pool().liquidity)
    }

    pub fn fee_growth_global(&self) -> (U256, U256) {
        self.read_state(|s| {
            let pool_state = s.get_pool();
            (
                pool_state.fee_growth_global_0_x128,
                pool_state.fee_growth_global_1_x128,
            )
        })
    }

    pub fn pool_state(&self) -> PoolState {
        self.read_state(|s| s.get_pool().clone())
    }

    /// Tick record, `None` for ticks no position references.
    pub fn tick(&self, tick: i32) -> Option<TickInfo> {
        self.read_state(|s| s.find_tick(tick).cloned())
    }

    /// Position record, zeroed for ranges the owner never minted.
    pub fn position(&self, owner: Principal, tick_lower: i32, tick_upper: i32) -> PositionInfo {
        self.read_state(|s| {
            s.get_position(&PositionKey {
                owner,
                tick_lower,
                tick_upper,
            })
        })
    }

    pub fn positions_by_owner(&self, owner: Principal) -> Vec<(PositionKey, PositionInfo)> {
        self.read_state(|s| s.get_positions_by_owner(owner))
    }

    /// Initialized ticks met by a swap starting at `start`, in the order it would meet them.
    pub fn initialized_ticks(&self, start: i32, searching_down: bool) -> Vec<i32> {
        self.read_state(|s| {
            s.tick_bitmap()
                .initialized_ticks(start, s.get_pool().tick_spacing.0, searching_down)
                .collect()
        })
    }
}
