#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddDeltaError {
    Overflow,
    Underflow,
}

/// Applies a signed liquidity delta to an unsigned liquidity amount.
/// Fails instead of wrapping when the result leaves the u128 range.
pub fn add_delta(x: u128, y: i128) -> Result<u128, AddDeltaError> {
    if y < 0 {
        x.checked_sub(y.unsigned_abs())
            .ok_or(AddDeltaError::Underflow)
    } else {
        x.checked_add(y.unsigned_abs()).ok_or(AddDeltaError::Overflow)
    }
}
