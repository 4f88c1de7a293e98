use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ChainKey;

/// Outcome of one gas estimation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GasEstimateResult {
    pub gas_units: String,
    pub gas_price_gwei: String,
    pub total_cost_native: String,
    /// Whether the gas price came from the static per-chain table.
    pub gas_price_fallback: bool,
    pub chain: ChainKey,
    pub endpoint_used: String,
}

/// One block of base-fee history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeHistorySample {
    pub block_number: u64,
    pub base_fee_per_gas: String,
    pub timestamp: DateTime<Utc>,
}

/// Cheapest block found in a recent window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeeWindow {
    pub window_label: String,
    pub avg_gwei: String,
    pub blocks_sampled: u64,
    pub cheapest: FeeHistorySample,
    pub chain: ChainKey,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub success: bool,
    /// Decoded outputs rendered as strings, or the raw hex return data when decoding failed.
    pub return_values: Vec<String>,
    pub gas_used: Option<String>,
    pub block_number: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub chain: ChainKey,
}
