use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Chains the estimation pipeline can talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainKey {
    Ethereum,
    Polygon,
    Bsc,
    Arbitrum,
    Optimism,
}

impl ChainKey {
    pub const ALL: [ChainKey; 5] = [
        ChainKey::Ethereum,
        ChainKey::Polygon,
        ChainKey::Bsc,
        ChainKey::Arbitrum,
        ChainKey::Optimism,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChainKey::Ethereum => "ethereum",
            ChainKey::Polygon => "polygon",
            ChainKey::Bsc => "bsc",
            ChainKey::Arbitrum => "arbitrum",
            ChainKey::Optimism => "optimism",
        }
    }

    /// Prefix used for per-chain environment overrides, e.g. `ETHEREUM_RPC_URL`.
    pub fn env_prefix(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for ChainKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownChain(pub String);

impl FromStr for ChainKey {
    type Err = UnknownChain;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ethereum" => Ok(ChainKey::Ethereum),
            "polygon" => Ok(ChainKey::Polygon),
            "bsc" => Ok(ChainKey::Bsc),
            "arbitrum" => Ok(ChainKey::Arbitrum),
            "optimism" => Ok(ChainKey::Optimism),
            _ => Err(UnknownChain(s.to_string())),
        }
    }
}
