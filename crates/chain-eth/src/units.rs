//! Native-unit amounts and JSON-RPC quantity encoding.

use alloy_primitives::utils::parse_ether;
use alloy_primitives::U256;

use crate::error::EthError;

/// Parses a decimal ether amount (e.g. `"0.001"`) into wei.
pub fn ether_to_wei(amount: &str) -> Result<U256, EthError> {
    let trimmed = amount.trim();
    if trimmed.is_empty() || trimmed.starts_with('-') {
        return Err(EthError::InvalidAmount(format!("not a positive decimal: {amount:?}")));
    }
    parse_ether(trimmed).map_err(|e| EthError::InvalidAmount(format!("{amount}: {e}")))
}

/// Encodes a value as a JSON-RPC quantity: `0x` followed by minimal hex.
pub fn to_quantity(value: U256) -> String {
    format!("{value:#x}")
}

/// Decodes a JSON-RPC quantity into a `U256`.
pub fn parse_quantity(quantity: &str) -> Result<U256, EthError> {
    let digits = strip_quantity_prefix(quantity)?;
    U256::from_str_radix(digits, 16)
        .map_err(|e| EthError::DecodingError(format!("invalid quantity {quantity:?}: {e}")))
}

/// Decodes a JSON-RPC quantity that must fit in 64 bits.
pub fn parse_quantity_u64(quantity: &str) -> Result<u64, EthError> {
    let digits = strip_quantity_prefix(quantity)?;
    u64::from_str_radix(digits, 16)
        .map_err(|e| EthError::DecodingError(format!("invalid quantity {quantity:?}: {e}")))
}

fn strip_quantity_prefix(quantity: &str) -> Result<&str, EthError> {
    let digits = quantity
        .strip_prefix("0x")
        .ok_or_else(|| EthError::DecodingError(format!("quantity without 0x prefix: {quantity:?}")))?;
    if digits.is_empty() {
        return Err(EthError::DecodingError("empty quantity".into()));
    }
    Ok(digits)
}
