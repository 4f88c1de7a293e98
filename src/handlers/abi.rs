use super::AppState;
use crate::{
    contracts,
    error::GasLensError,
    models::{ApiResponse, FunctionDescriptor, ParseAbiRequest},
    services::abi,
};
use axum::{extract::State, Json};

pub async fn parse_abi(
    State(state): State<AppState>,
    Json(request): Json<ParseAbiRequest>,
) -> Result<Json<ApiResponse<Vec<FunctionDescriptor>>>, GasLensError> {
    let functions = abi::parse(&request.address, &request.abi)?;
    state.analytics.record_abi_parsed();

    tracing::debug!("Parsed ABI with {} functions", functions.len());

    Ok(Json(ApiResponse::ok(functions, "abi")))
}

pub async fn sample_abi() -> Json<ApiResponse<ParseAbiRequest>> {
    Json(ApiResponse::ok(contracts::sample_request(), "sample"))
}

/// Resolves the function a request targets, validating address and ABI first.
pub(crate) fn locate_function(
    address: &str,
    abi_text: &str,
    selector: &str,
) -> Result<FunctionDescriptor, GasLensError> {
    if address.trim().is_empty() {
        return Err(GasLensError::InvalidAddress("contract address is required".to_string()));
    }
    if abi_text.trim().is_empty() {
        return Err(GasLensError::InvalidAbiJson);
    }

    let functions = abi::parse(address, abi_text).map_err(|e| match e {
        GasLensError::InvalidJson(_) | GasLensError::InvalidAbiShape(_) => GasLensError::InvalidAbiJson,
        other => other,
    })?;
    abi::find_function(&functions, selector).cloned()
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use crate::{config::ChainRegistry, contracts::SAMPLE_ADDRESS};
    use axum::http::StatusCode;
    use serde_json::json;

    #[tokio::test]
    async fn parses_functions() {
        let body = json!({
            "address": SAMPLE_ADDRESS,
            "abi": r#"[{"type":"function","name":"f","inputs":[],"outputs":[],"stateMutability":"view"}]"#,
        });
        let (status, json) =
            send(state(ChainRegistry::defaults()), post_json("/api/abi/parse", body)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["success"], true);
        assert_eq!(json["data"][0]["name"], "f");
        assert_eq!(json["data"][0]["kind"], "function");
        assert_eq!(json["data"][0]["mutability"], "view");
    }

    #[tokio::test]
    async fn rejects_bad_address() {
        let body = json!({ "address": "0x1234", "abi": "[]" });
        let (status, json) =
            send(state(ChainRegistry::defaults()), post_json("/api/abi/parse", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], "INVALID_ADDRESS");
    }

    #[tokio::test]
    async fn blank_request_is_empty_list() {
        let (status, json) =
            send(state(ChainRegistry::defaults()), post_json("/api/abi/parse", json!({}))).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"], json!([]));
    }

    #[tokio::test]
    async fn serves_sample() {
        let (status, json) = send(state(ChainRegistry::defaults()), get("/api/abi/sample")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["data"]["address"], SAMPLE_ADDRESS);
    }
}
