use ethnum::U256;
use num_bigint::BigUint;

pub fn big_uint_to_u256(value: BigUint) -> Result<U256, String> {
    let value_bytes = value.to_bytes_be();
    if value_bytes.len() > 32 {
        return Err(format!("does not fit in a U256: {}", value));
    }
    let mut buffer = [0u8; 32];
    buffer[32 - value_bytes.len()..].copy_from_slice(&value_bytes);
    Ok(U256::from_be_bytes(buffer))
}

pub fn u256_to_big_uint(value: U256) -> BigUint {
    BigUint::from_bytes_be(&value.to_be_bytes())
}
