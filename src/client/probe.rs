use anyhow::Result;
use gas_lens::{
    client::ApiClient,
    models::{param_key, EstimateRequest},
};
use std::collections::HashMap;

/// Usage: gas-lens-probe [chain] [function] [param0] [param1] ...
#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    dotenvy::dotenv().ok();

    let base_url = std::env::var("GAS_LENS_URL").unwrap_or_else(|_| "http://localhost:8080".to_string());
    let mut args = std::env::args().skip(1);
    let chain = args.next().unwrap_or_else(|| "ethereum".to_string());
    let function = args.next().unwrap_or_else(|| "balanceOf".to_string());
    let values: Vec<String> = args.collect();

    let client = ApiClient::new(&base_url);

    println!("Gas Lens Probe");
    println!("==============");
    println!("Server: {}", base_url);
    println!();

    let health = client.health().await?;
    println!("[OK] Server status: {}", health["status"].as_str().unwrap_or("unknown"));

    let chains = client.chains().await?;
    println!("Chains: {}", serde_json::to_string_pretty(&chains["data"])?);
    println!();

    let sample = client.sample_abi().await?;
    let parsed = client.parse_abi(&sample).await?;
    let functions = parsed["data"].as_array().map(Vec::len).unwrap_or(0);
    println!("[OK] Sample ABI parsed: {} functions", functions);

    let params: HashMap<String, String> = if values.is_empty() {
        // balanceOf(account) against the sample contract itself
        [(param_key(0), sample.address.clone())].into()
    } else {
        values
            .into_iter()
            .enumerate()
            .map(|(i, v)| (param_key(i), v))
            .collect()
    };

    let request = EstimateRequest {
        chain: chain.clone(),
        address: sample.address.clone(),
        abi: sample.abi.clone(),
        function,
        params,
        slot: None,
    };

    match client.estimate(&request).await {
        Ok(estimate) => {
            println!("[SUCCESS] Estimate:");
            println!("{}", serde_json::to_string_pretty(&estimate["data"])?);
        }
        Err(e) => println!("[FAILED] {}", e),
    }

    match client.best_window(&chain, 1).await {
        Ok(window) => {
            println!("[SUCCESS] Cheapest recent block:");
            println!("{}", serde_json::to_string_pretty(&window["data"])?);
        }
        Err(e) => println!("[FAILED] {}", e),
    }

    Ok(())
}
