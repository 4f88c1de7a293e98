use super::{abi::locate_function, AppState};
use crate::{
    error::GasLensError,
    models::{ApiResponse, SimulateRequest, SimulationResult},
    services::CallContext,
};
use axum::{extract::State, Json};

pub async fn simulate_call(
    State(state): State<AppState>,
    Json(request): Json<SimulateRequest>,
) -> Result<Json<ApiResponse<SimulationResult>>, GasLensError> {
    let descriptor = locate_function(&request.address, &request.abi, &request.function)?;
    let context = CallContext::parse(request.from, request.value.as_deref())?;

    let result = state
        .simulator
        .simulate(
            &descriptor,
            &request.address,
            &request.abi,
            &request.chain,
            &request.params,
            &context,
        )
        .await?;
    state.analytics.record_simulation();

    let source = format!("{}-eth-call", result.chain);
    Ok(Json(ApiResponse::ok(result, source)))
}
