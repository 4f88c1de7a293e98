//! Wei/gwei/native conversions for display.

use crate::error::GasLensError;
use ethers::{types::U256, utils::format_units};

/// Formats a wei amount in gwei without trailing zeros, e.g. `20`, `0.1`.
pub fn format_gwei(wei: U256) -> Result<String, GasLensError> {
    format_trimmed(wei, "gwei")
}

/// Formats a wei amount in the chain's native unit (18 decimals on every supported chain).
pub fn format_native(wei: U256) -> Result<String, GasLensError> {
    format_trimmed(wei, "ether")
}

/// `gas_units * gas_price_wei`, saturating at `U256::MAX`.
pub fn total_cost_wei(gas_units: U256, gas_price_wei: U256) -> U256 {
    gas_units.saturating_mul(gas_price_wei)
}

fn format_trimmed(wei: U256, unit: &str) -> Result<String, GasLensError> {
    let formatted = format_units(wei, unit)
        .map_err(|e| GasLensError::InternalError(format!("unit conversion failed: {}", e)))?;
    Ok(trim_decimal(&formatted))
}

fn trim_decimal(value: &str) -> String {
    if !value.contains('.') {
        return value.to_string();
    }
    value.trim_end_matches('0').trim_end_matches('.').to_string()
}
