use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Parameter values keyed positionally: `param0`, `param1`, ...
pub type ParamValues = HashMap<String, String>;

pub fn param_key(index: usize) -> String {
    format!("param{}", index)
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseAbiRequest {
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub abi: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EstimateRequest {
    pub chain: String,
    pub address: String,
    pub abi: String,
    /// Bare name or full signature, e.g. `transfer(address,uint256)`.
    pub function: String,
    #[serde(default)]
    pub params: ParamValues,
    /// Generation slot; a newer request on the same slot supersedes this one.
    #[serde(default)]
    pub slot: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulateRequest {
    pub chain: String,
    pub address: String,
    pub abi: String,
    pub function: String,
    #[serde(default)]
    pub params: ParamValues,
    #[serde(default)]
    pub from: Option<Address>,
    /// Native value to attach, in ether units (e.g. `"0.1"`).
    #[serde(default)]
    pub value: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BestWindowQuery {
    #[serde(default = "default_chain")]
    pub chain: String,
    #[serde(default = "default_hours")]
    pub hours: u64,
}

fn default_chain() -> String {
    "ethereum".to_string()
}

fn default_hours() -> u64 {
    24
}
