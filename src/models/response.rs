use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Serialize, Deserialize, Debug)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    pub timestamp: DateTime<Utc>,
    pub data_source: String,
    pub request_id: String,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T, data_source: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            timestamp: Utc::now(),
            data_source: data_source.into(),
            request_id: Uuid::new_v4().to_string(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub chains: usize,
    pub uptime_seconds: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct Stats {
    pub abi_parsed: u64,
    pub estimates_total: u64,
    pub estimates_failed: u64,
    pub estimates_superseded: u64,
    pub simulations_total: u64,
    pub fee_windows_total: u64,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChainInfo {
    pub chain: String,
    pub primary: String,
    pub fallback: String,
    pub fallback_gas_price_gwei: String,
}
