use ethnum::I256;
use std::ops::Add;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BalanceDeltaError {
    Overflow,
}

/// Signed token amounts moved by an operation, seen from the pool.
/// Positive amounts are owed to the pool, negative amounts are paid out by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BalanceDelta {
    amount0: I256,
    amount1: I256,
}

impl BalanceDelta {
    pub const ZERO_DELTA: BalanceDelta = BalanceDelta {
        amount0: I256::ZERO,
        amount1: I256::ZERO,
    };

    pub fn new(amount0: I256, amount1: I256) -> BalanceDelta {
        BalanceDelta { amount0, amount1 }
    }

    pub fn amount0(&self) -> I256 {
        self.amount0
    }

    pub fn amount1(&self) -> I256 {
        self.amount1
    }

    /// Splits the delta of a swap into its `(input, output)` sides.
    pub fn input_output(&self, zero_for_one: bool) -> (I256, I256) {
        if zero_for_one {
            (self.amount0, self.amount1)
        } else {
            (self.amount1, self.amount0)
        }
    }

    pub fn checked_add(self, other: BalanceDelta) -> Result<BalanceDelta, BalanceDeltaError> {
        let amount0 = self
            .amount0
            .checked_add(other.amount0)
            .ok_or(BalanceDeltaError::Overflow)?;
        let amount1 = self
            .amount1
            .checked_add(other.amount1)
            .ok_or(BalanceDeltaError::Overflow)?;
        Ok(BalanceDelta { amount0, amount1 })
    }
}

impl Add for BalanceDelta {
    type Output = Result<BalanceDelta, BalanceDeltaError>;

    fn add(self, other: BalanceDelta) -> Self::Output {
        self.checked_add(other)
    }
}
