use crate::{config::ChainRegistry, error::GasLensError, models::ChainKey};
use ethers::{
    prelude::*,
    providers::{Http, Provider},
};
use reqwest::Url;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointKind {
    Primary,
    Fallback,
}

/// A live JSON-RPC connection. Only built after the endpoint answered `eth_chainId`.
#[derive(Debug, Clone)]
pub struct ChainConnection {
    pub chain: ChainKey,
    pub endpoint_used: String,
    pub endpoint_kind: EndpointKind,
    pub chain_id: U256,
    pub provider: Provider<Http>,
}

/// Opens a fresh connection per call, primary endpoint first, then the fallback.
pub struct ProviderResolver {
    registry: ChainRegistry,
    client: reqwest::Client,
}

impl ProviderResolver {
    pub fn new(registry: ChainRegistry, rpc_timeout: Duration) -> Result<Self, GasLensError> {
        let client = reqwest::Client::builder()
            .timeout(rpc_timeout)
            .build()
            .map_err(|e| GasLensError::ConfigError(format!("HTTP client: {}", e)))?;

        Ok(Self { registry, client })
    }

    pub fn registry(&self) -> &ChainRegistry {
        &self.registry
    }

    /// Maps a chain name to a configured chain key without touching the network.
    pub fn chain_key(&self, chain: &str) -> Result<ChainKey, GasLensError> {
        chain
            .parse::<ChainKey>()
            .ok()
            .filter(|key| self.registry.get(*key).is_some())
            .ok_or_else(|| GasLensError::UnsupportedChain(chain.to_string()))
    }

    pub async fn resolve(&self, chain: &str) -> Result<ChainConnection, GasLensError> {
        let key = self.chain_key(chain)?;
        let endpoints = self
            .registry
            .get(key)
            .ok_or_else(|| GasLensError::UnsupportedChain(chain.to_string()))?;

        match self.connect(&endpoints.primary).await {
            Ok((provider, chain_id)) => {
                tracing::debug!("Connected to {} via primary endpoint", key);
                return Ok(ChainConnection {
                    chain: key,
                    endpoint_used: endpoints.primary.clone(),
                    endpoint_kind: EndpointKind::Primary,
                    chain_id,
                    provider,
                });
            }
            Err(e) => {
                tracing::warn!("Primary RPC endpoint failed for {}: {}, trying fallback", key, e);
            }
        }

        match self.connect(&endpoints.fallback).await {
            Ok((provider, chain_id)) => {
                tracing::info!("Connected to {} via fallback endpoint", key);
                Ok(ChainConnection {
                    chain: key,
                    endpoint_used: endpoints.fallback.clone(),
                    endpoint_kind: EndpointKind::Fallback,
                    chain_id,
                    provider,
                })
            }
            Err(e) => {
                tracing::error!("Fallback RPC endpoint failed for {}: {}", key, e);
                Err(GasLensError::ConnectionUnavailable {
                    chain: key.to_string(),
                })
            }
        }
    }

    async fn connect(&self, url: &str) -> Result<(Provider<Http>, U256), String> {
        let url = Url::parse(url).map_err(|e| format!("invalid URL {}: {}", url, e))?;
        let provider = Provider::new(Http::new_with_client(url, self.client.clone()));

        // Liveness check
        let chain_id = provider.get_chainid().await.map_err(|e| e.to_string())?;

        Ok((provider, chain_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ChainEndpoints;
    use mockito::{Matcher, Server, ServerGuard};

    const CHAIN_ID_ONE: &str = r#"{"jsonrpc":"2.0","id":1,"result":"0x1"}"#;

    async fn answering(server: &mut ServerGuard, hits: usize) -> mockito::Mock {
        server
            .mock("POST", "/")
            .match_body(Matcher::Regex("eth_chainId".to_string()))
            .with_header("content-type", "application/json")
            .with_body(CHAIN_ID_ONE)
            .expect(hits)
            .create_async()
            .await
    }

    async fn broken(server: &mut ServerGuard) -> mockito::Mock {
        server
            .mock("POST", "/")
            .with_status(503)
            .with_body("upstream unavailable")
            .create_async()
            .await
    }

    fn resolver(primary: &ServerGuard, fallback: &ServerGuard) -> ProviderResolver {
        let registry = ChainRegistry::default().with_endpoints(
            ChainKey::Ethereum,
            ChainEndpoints::new(primary.url(), fallback.url()),
        );
        ProviderResolver::new(registry, Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn uses_primary_when_it_answers() {
        let mut primary = Server::new_async().await;
        let mut fallback = Server::new_async().await;
        let primary_mock = answering(&mut primary, 1).await;
        let fallback_mock = answering(&mut fallback, 0).await;

        let connection = resolver(&primary, &fallback).resolve("ethereum").await.unwrap();

        assert_eq!(connection.endpoint_kind, EndpointKind::Primary);
        assert_eq!(connection.endpoint_used, primary.url());
        assert_eq!(connection.chain_id, U256::one());
        primary_mock.assert_async().await;
        fallback_mock.assert_async().await;
    }

    #[tokio::test]
    async fn falls_back_when_primary_fails() {
        let mut primary = Server::new_async().await;
        let mut fallback = Server::new_async().await;
        let _primary_mock = broken(&mut primary).await;
        let fallback_mock = answering(&mut fallback, 1).await;

        let connection = resolver(&primary, &fallback).resolve("ethereum").await.unwrap();

        assert_eq!(connection.endpoint_kind, EndpointKind::Fallback);
        assert_eq!(connection.endpoint_used, fallback.url());
        fallback_mock.assert_async().await;
    }

    #[tokio::test]
    async fn both_endpoints_down_is_connection_unavailable() {
        let mut primary = Server::new_async().await;
        let mut fallback = Server::new_async().await;
        let _p = broken(&mut primary).await;
        let _f = broken(&mut fallback).await;

        let err = resolver(&primary, &fallback).resolve("ethereum").await.unwrap_err();

        assert!(matches!(err, GasLensError::ConnectionUnavailable { ref chain } if chain == "ethereum"));
    }

    #[tokio::test]
    async fn unsupported_chain_makes_no_network_call() {
        let mut primary = Server::new_async().await;
        let mut fallback = Server::new_async().await;
        let primary_mock = answering(&mut primary, 0).await;
        let fallback_mock = answering(&mut fallback, 0).await;
        let resolver = resolver(&primary, &fallback);

        let err = resolver.resolve("base").await.unwrap_err();
        assert!(matches!(err, GasLensError::UnsupportedChain(ref c) if c == "base"));

        // known key, but not configured in this registry
        let err = resolver.resolve("polygon").await.unwrap_err();
        assert!(matches!(err, GasLensError::UnsupportedChain(_)));

        primary_mock.assert_async().await;
        fallback_mock.assert_async().await;
    }
}
