use ethnum::U256;

/// Index of the most significant set bit, `None` for zero.
pub fn most_significant_bit(value: &U256) -> Option<u8> {
    if *value == U256::ZERO {
        return None;
    }
    Some((255 - value.leading_zeros()) as u8)
}

/// Index of the least significant set bit, `None` for zero.
pub fn least_significant_bit(value: &U256) -> Option<u8> {
    if *value == U256::ZERO {
        return None;
    }
    Some(value.trailing_zeros() as u8)
}
