use super::AppState;
use crate::{
    error::GasLensError,
    models::{ApiResponse, ChainInfo, HealthStatus},
    units,
};
use axum::{extract::State, Json};
use chrono::Utc;

/// Process liveness. Upstream RPC health is checked per request, not here.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthStatus> {
    Json(HealthStatus {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        chains: state.resolver.registry().len(),
        uptime_seconds: state.analytics.uptime_seconds(),
        timestamp: Utc::now(),
    })
}

pub async fn list_chains(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<ChainInfo>>>, GasLensError> {
    let chains = state
        .resolver
        .registry()
        .iter()
        .map(|(chain, endpoints)| -> Result<ChainInfo, GasLensError> {
            Ok(ChainInfo {
                chain: chain.to_string(),
                primary: endpoints.primary.clone(),
                fallback: endpoints.fallback.clone(),
                fallback_gas_price_gwei: units::format_gwei(
                    state.estimator.fallback_prices().wei_for(chain),
                )?,
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(ApiResponse::ok(chains, "config")))
}
