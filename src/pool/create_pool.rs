use candid::Principal;
use serde::{Deserialize, Serialize};

use crate::{
    libraries::constants::{MAX_SWAP_FEE, MAX_TICK_SPACING},
    tick::tick_spacing_to_max_liquidity_per_tick,
};

use super::types::{PoolFee, PoolId, PoolTickSpacing};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreatePoolError {
    InvalidConfig(String),
    InvalidToken(String),
    IdenticalTokens,
    InvalidFeeAmount,
    InvalidTickSpacing,
}

/// Pool parameters as written by an operator, tokens in any order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolConfig {
    pub token_a: String,
    pub token_b: String,
    pub fee: u32,
    pub tick_spacing: i32,
}

impl PoolConfig {
    pub fn from_json(json: &str) -> Result<Self, CreatePoolError> {
        serde_json::from_str(json).map_err(|e| CreatePoolError::InvalidConfig(e.to_string()))
    }
}

/// Validated construction parameters of a pool.
///
/// Only built through [`PoolArgs::new`], so the liquidity cap always matches the spacing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolArgs {
    pool_id: PoolId,
    tick_spacing: PoolTickSpacing,
    max_liquidity_per_tick: u128,
}

impl PoolArgs {
    pub fn new(
        token_a: Principal,
        token_b: Principal,
        fee: u32,
        tick_spacing: i32,
    ) -> Result<Self, CreatePoolError> {
        if token_a == token_b {
            return Err(CreatePoolError::IdenticalTokens);
        }
        if fee >= MAX_SWAP_FEE {
            return Err(CreatePoolError::InvalidFeeAmount);
        }
        if tick_spacing <= 0 || tick_spacing > MAX_TICK_SPACING {
            return Err(CreatePoolError::InvalidTickSpacing);
        }

        // sort token_a and b, token 0 is always the smaller token
        let (token0, token1) = if token_a < token_b {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };

        Ok(Self {
            pool_id: PoolId {
                token0,
                token1,
                fee: PoolFee(fee),
            },
            tick_spacing: PoolTickSpacing(tick_spacing),
            max_liquidity_per_tick: tick_spacing_to_max_liquidity_per_tick(tick_spacing),
        })
    }

    pub fn pool_id(&self) -> PoolId {
        self.pool_id
    }

    pub fn tick_spacing(&self) -> PoolTickSpacing {
        self.tick_spacing
    }

    pub fn max_liquidity_per_tick(&self) -> u128 {
        self.max_liquidity_per_tick
    }
}

impl TryFrom<PoolConfig> for PoolArgs {
    type Error = CreatePoolError;

    fn try_from(config: PoolConfig) -> Result<Self, Self::Error> {
        let parse = |text: &str| {
            Principal::from_text(text).map_err(|e| CreatePoolError::InvalidToken(e.to_string()))
        };
        PoolArgs::new(
            parse(&config.token_a)?,
            parse(&config.token_b)?,
            config.fee,
            config.tick_spacing,
        )
    }
}
