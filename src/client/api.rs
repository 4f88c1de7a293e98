use crate::models::{EstimateRequest, ParseAbiRequest};
use anyhow::{Context, Result};
use reqwest::{Client, Response};
use serde::Serialize;
use serde_json::Value;

/// Thin HTTP client for a running gas-lens server.
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn health(&self) -> Result<Value> {
        self.get("/health").await
    }

    pub async fn chains(&self) -> Result<Value> {
        self.get("/api/chains").await
    }

    pub async fn sample_abi(&self) -> Result<ParseAbiRequest> {
        let body = self.get("/api/abi/sample").await?;
        serde_json::from_value(body["data"].clone()).context("unexpected sample payload")
    }

    pub async fn parse_abi(&self, request: &ParseAbiRequest) -> Result<Value> {
        self.post("/api/abi/parse", request).await
    }

    pub async fn estimate(&self, request: &EstimateRequest) -> Result<Value> {
        self.post("/api/gas/estimate", request).await
    }

    pub async fn best_window(&self, chain: &str, hours: u64) -> Result<Value> {
        let url = format!("{}/api/gas/best-window", self.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[("chain", chain.to_string()), ("hours", hours.to_string())])
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;
        read_json(response).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("GET {}", url))?;
        read_json(response).await
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .with_context(|| format!("POST {}", url))?;
        read_json(response).await
    }
}

async fn read_json(response: Response) -> Result<Value> {
    let status = response.status();
    let body: Value = response.json().await.context("response was not JSON")?;

    if !status.is_success() {
        let message = body["error"].as_str().unwrap_or("unknown error");
        anyhow::bail!("{} ({})", message, status);
    }

    Ok(body)
}
