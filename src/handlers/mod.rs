pub mod abi;
pub mod gas;
pub mod health;
pub mod simulate;
pub mod stats;

pub use abi::*;
pub use gas::*;
pub use health::*;
pub use simulate::*;
pub use stats::*;

use crate::services::{
    Analytics, CallSimulator, FeeHistorySampler, GasEstimator, Generations, ProviderResolver,
};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<ProviderResolver>,
    pub estimator: Arc<GasEstimator>,
    pub sampler: Arc<FeeHistorySampler>,
    pub simulator: Arc<CallSimulator>,
    pub generations: Arc<Generations>,
    pub analytics: Arc<Analytics>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/stats", get(get_stats))
        .route("/api/chains", get(list_chains))
        .route("/api/abi/parse", post(parse_abi))
        .route("/api/abi/sample", get(sample_abi))
        .route("/api/gas/estimate", post(estimate_gas))
        .route("/api/gas/best-window", get(best_window))
        .route("/api/simulate", post(simulate_call))
        .with_state(state)
}
