use crate::models::ChainKey;
use anyhow::{bail, Context, Result};
use ethers::{types::U256, utils::parse_units};
use std::collections::BTreeMap;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testnet,
    Production,
}

/// Primary and fallback JSON-RPC URLs for one chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainEndpoints {
    pub primary: String,
    pub fallback: String,
}

impl ChainEndpoints {
    pub fn new(primary: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            primary: primary.into(),
            fallback: fallback.into(),
        }
    }
}

/// Immutable endpoint table injected into the provider resolver.
#[derive(Debug, Clone, Default)]
pub struct ChainRegistry {
    endpoints: BTreeMap<ChainKey, ChainEndpoints>,
}

impl ChainRegistry {
    pub fn new(endpoints: BTreeMap<ChainKey, ChainEndpoints>) -> Self {
        Self { endpoints }
    }

    pub fn defaults() -> Self {
        let endpoints = ChainKey::ALL
            .into_iter()
            .map(|chain| {
                let (primary, fallback) = default_endpoints(chain);
                (chain, ChainEndpoints::new(primary, fallback))
            })
            .collect();
        Self { endpoints }
    }

    pub fn with_endpoints(mut self, chain: ChainKey, endpoints: ChainEndpoints) -> Self {
        self.endpoints.insert(chain, endpoints);
        self
    }

    pub fn get(&self, chain: ChainKey) -> Option<&ChainEndpoints> {
        self.endpoints.get(&chain)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ChainKey, &ChainEndpoints)> {
        self.endpoints.iter().map(|(chain, endpoints)| (*chain, endpoints))
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}

fn default_endpoints(chain: ChainKey) -> (&'static str, &'static str) {
    match chain {
        ChainKey::Ethereum => ("https://rpc.ankr.com/eth", "https://ethereum.publicnode.com"),
        ChainKey::Polygon => ("https://rpc.ankr.com/polygon", "https://polygon.publicnode.com"),
        ChainKey::Bsc => ("https://rpc.ankr.com/bsc", "https://bsc.publicnode.com"),
        ChainKey::Arbitrum => ("https://rpc.ankr.com/arbitrum", "https://arbitrum.publicnode.com"),
        ChainKey::Optimism => ("https://rpc.ankr.com/optimism", "https://optimism.publicnode.com"),
    }
}

/// Gas price used when the node cannot report one, 20 gwei.
pub const DEFAULT_FALLBACK_GAS_PRICE_WEI: u64 = 20_000_000_000;

/// Static per-chain gas prices, in wei.
#[derive(Debug, Clone, Default)]
pub struct FallbackPrices {
    wei: BTreeMap<ChainKey, U256>,
}

impl FallbackPrices {
    pub fn new(wei: BTreeMap<ChainKey, U256>) -> Self {
        Self { wei }
    }

    pub fn defaults() -> Self {
        let wei = ChainKey::ALL
            .into_iter()
            .map(|chain| {
                let price: u64 = match chain {
                    ChainKey::Ethereum => 20_000_000_000,
                    ChainKey::Polygon => 30_000_000_000,
                    ChainKey::Bsc => 5_000_000_000,
                    ChainKey::Arbitrum => 100_000_000,
                    ChainKey::Optimism => 1_000_000,
                };
                (chain, U256::from(price))
            })
            .collect();
        Self { wei }
    }

    pub fn with_price(mut self, chain: ChainKey, wei: U256) -> Self {
        self.wei.insert(chain, wei);
        self
    }

    /// Fallback price for `chain`; chains without an entry get 20 gwei.
    pub fn wei_for(&self, chain: ChainKey) -> U256 {
        self.wei
            .get(&chain)
            .copied()
            .unwrap_or_else(|| U256::from(DEFAULT_FALLBACK_GAS_PRICE_WEI))
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub environment: Environment,
    pub host: String,
    pub port: u16,

    // Upstream RPC
    pub rpc_timeout: Duration,
    pub chains: ChainRegistry,
    pub fallback_prices: FallbackPrices,

    // HTTP
    pub request_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Self::parse_environment(lookup("ENVIRONMENT"))?;

        let mut chains = ChainRegistry::defaults();
        let mut fallback_prices = FallbackPrices::defaults();
        for chain in ChainKey::ALL {
            let prefix = chain.env_prefix();
            let (primary, fallback) = default_endpoints(chain);
            let endpoints = ChainEndpoints::new(
                lookup(&format!("{}_RPC_URL", prefix)).unwrap_or_else(|| primary.to_string()),
                lookup(&format!("{}_RPC_FALLBACK", prefix)).unwrap_or_else(|| fallback.to_string()),
            );
            chains = chains.with_endpoints(chain, endpoints);

            let price_var = format!("{}_FALLBACK_GWEI", prefix);
            if let Some(gwei) = lookup(&price_var) {
                let wei = parse_units(gwei.trim(), "gwei")
                    .with_context(|| format!("Invalid {}", price_var))?;
                fallback_prices = fallback_prices.with_price(chain, wei.into());
            }
        }

        let config = Self {
            environment,
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
            port: lookup("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse()
                .context("Invalid PORT")?,
            rpc_timeout: Duration::from_secs(
                lookup("RPC_TIMEOUT_SECS")
                    .unwrap_or_else(|| "15".to_string())
                    .parse()
                    .context("Invalid RPC_TIMEOUT_SECS")?,
            ),
            chains,
            fallback_prices,
            request_timeout: Duration::from_secs(
                lookup("REQUEST_TIMEOUT_SECS")
                    .unwrap_or_else(|| "30".to_string())
                    .parse()
                    .context("Invalid REQUEST_TIMEOUT_SECS")?,
            ),
        };

        config.validate()?;
        Ok(config)
    }

    fn parse_environment(value: Option<String>) -> Result<Environment> {
        let env = value.unwrap_or_else(|| "development".to_string());

        match env.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "testnet" | "test" => Ok(Environment::Testnet),
            "production" | "prod" => Ok(Environment::Production),
            _ => bail!("Unknown environment: {}", env),
        }
    }

    fn validate(&self) -> Result<()> {
        for (chain, endpoints) in self.chains.iter() {
            for url in [&endpoints.primary, &endpoints.fallback] {
                let parsed = reqwest::Url::parse(url)
                    .with_context(|| format!("Invalid RPC endpoint for {}: {}", chain, url))?;
                if !matches!(parsed.scheme(), "http" | "https") {
                    bail!("RPC endpoint for {} must be HTTP(S) URL: {}", chain, url);
                }
            }
        }

        if self.rpc_timeout.is_zero() {
            bail!("RPC_TIMEOUT_SECS must be greater than zero");
        }
        if self.request_timeout.is_zero() {
            bail!("REQUEST_TIMEOUT_SECS must be greater than zero");
        }

        tracing::info!(
            "Configuration validated for {:?} environment ({} chains)",
            self.environment,
            self.chains.len()
        );

        Ok(())
    }
}
