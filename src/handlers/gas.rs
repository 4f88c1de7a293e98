use super::{abi::locate_function, AppState};
use crate::{
    error::GasLensError,
    models::{ApiResponse, BestWindowQuery, EstimateRequest, FeeWindow, GasEstimateResult},
    services::{Analytics, Generations, Ticket},
};
use axum::{
    extract::{Query, State},
    Json,
};

pub async fn estimate_gas(
    State(state): State<AppState>,
    Json(request): Json<EstimateRequest>,
) -> Result<Json<ApiResponse<GasEstimateResult>>, GasLensError> {
    let ticket = request.slot.as_deref().map(|slot| state.generations.begin(slot));

    let result = match locate_function(&request.address, &request.abi, &request.function) {
        Ok(descriptor) => {
            state
                .estimator
                .estimate(
                    &descriptor,
                    &request.address,
                    &request.abi,
                    &request.chain,
                    &request.params,
                )
                .await
        }
        Err(e) => Err(e),
    };

    let estimate = publish(&state.generations, &state.analytics, ticket.as_ref(), result)?;
    let source = estimate.endpoint_used.clone();
    Ok(Json(ApiResponse::ok(estimate, source)))
}

/// Drops the outcome of a request that a newer one on the same slot has replaced.
fn publish<T>(
    generations: &Generations,
    analytics: &Analytics,
    ticket: Option<&Ticket>,
    result: Result<T, GasLensError>,
) -> Result<T, GasLensError> {
    if let Some(ticket) = ticket {
        if !generations.finish(ticket) {
            analytics.record_superseded();
            tracing::debug!(
                "Discarding estimate for slot {} generation {}",
                ticket.slot,
                ticket.generation
            );
            return Err(GasLensError::Superseded {
                slot: ticket.slot.clone(),
            });
        }
    }

    analytics.record_estimate(result.is_ok());
    result
}

pub async fn best_window(
    State(state): State<AppState>,
    Query(query): Query<BestWindowQuery>,
) -> Result<Json<ApiResponse<FeeWindow>>, GasLensError> {
    let window = state.sampler.best_recent_window(&query.chain, query.hours).await?;
    state.analytics.record_fee_window();

    let source = format!("{}-fee-history", window.chain);
    Ok(Json(ApiResponse::ok(window, source)))
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::*;
    use crate::{
        config::{ChainEndpoints, ChainRegistry},
        contracts::{SAMPLE_ADDRESS, SAMPLE_ERC20_ABI},
        models::ChainKey,
    };
    use axum::http::StatusCode;
    use mockito::Server;
    use serde_json::json;

    fn estimate_body(chain: &str, function: &str, params: serde_json::Value) -> serde_json::Value {
        json!({
            "chain": chain,
            "address": SAMPLE_ADDRESS,
            "abi": SAMPLE_ERC20_ABI,
            "function": function,
            "params": params,
        })
    }

    #[tokio::test]
    async fn missing_parameter_is_bad_request() {
        let body = estimate_body("ethereum", "transfer", json!({ "param0": SAMPLE_ADDRESS }));
        let (status, json) =
            send(state(ChainRegistry::defaults()), post_json("/api/gas/estimate", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error"], "Parameter amount is required");
    }

    #[tokio::test]
    async fn unknown_function_is_not_found() {
        let body = estimate_body("ethereum", "mint", json!({}));
        let (status, json) =
            send(state(ChainRegistry::defaults()), post_json("/api/gas/estimate", body)).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error_code"], "UNKNOWN_FUNCTION");
    }

    #[tokio::test]
    async fn unsupported_chain_is_rejected() {
        let body = estimate_body("solana", "balanceOf", json!({ "param0": SAMPLE_ADDRESS }));
        let (status, json) =
            send(state(ChainRegistry::defaults()), post_json("/api/gas/estimate", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], "UNSUPPORTED_CHAIN");
    }

    #[tokio::test]
    async fn unreachable_chain_is_bad_gateway() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/")
            .with_status(503)
            .with_body("unavailable")
            .expect(2)
            .create_async()
            .await;
        let registry = ChainRegistry::default()
            .with_endpoints(ChainKey::Polygon, ChainEndpoints::new(server.url(), server.url()));

        let body = estimate_body("polygon", "balanceOf", json!({ "param0": SAMPLE_ADDRESS }));
        let (status, json) = send(state(registry), post_json("/api/gas/estimate", body)).await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(
            json["error"],
            "Failed to connect to polygon network. Please try again later."
        );
    }

    #[tokio::test]
    async fn blank_address_is_reported_before_parsing() {
        let body = json!({
            "chain": "ethereum",
            "address": "",
            "abi": SAMPLE_ERC20_ABI,
            "function": "balanceOf",
        });
        let (status, json) =
            send(state(ChainRegistry::defaults()), post_json("/api/gas/estimate", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], "INVALID_ADDRESS");
    }

    #[test]
    fn stale_generation_is_superseded() {
        let generations = Generations::new();
        let analytics = Analytics::new();
        let stale = generations.begin("form");
        let fresh = generations.begin("form");

        let err = publish(&generations, &analytics, Some(&stale), Ok(1)).unwrap_err();
        assert!(matches!(err, GasLensError::Superseded { ref slot } if slot == "form"));
        assert_eq!(publish(&generations, &analytics, Some(&fresh), Ok(2)).unwrap(), 2);
        assert_eq!(publish(&generations, &analytics, None, Ok(3)).unwrap(), 3);

        let stats = analytics.get_stats();
        assert_eq!(stats.estimates_superseded, 1);
        assert_eq!(stats.estimates_total, 2);
        assert!(generations.is_empty());
    }

    #[tokio::test]
    async fn finished_estimate_releases_its_slot() {
        let state = state(ChainRegistry::defaults());
        let mut body = estimate_body("ethereum", "transfer", json!({}));
        body["slot"] = json!("form-7");

        let (status, _) = send(state.clone(), post_json("/api/gas/estimate", body)).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(state.generations.is_empty());
    }

    #[tokio::test]
    async fn malformed_abi_is_invalid_abi_json() {
        for abi in ["{not json", r#"{"not":"an array"}"#] {
            let body = json!({
                "chain": "ethereum",
                "address": SAMPLE_ADDRESS,
                "abi": abi,
                "function": "transfer",
            });
            let (status, json) =
                send(state(ChainRegistry::defaults()), post_json("/api/gas/estimate", body)).await;

            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(json["error_code"], "INVALID_ABI_JSON");
        }
    }

    #[tokio::test]
    async fn best_window_rejects_unknown_chain() {
        let (status, json) = send(
            state(ChainRegistry::defaults()),
            get("/api/gas/best-window?chain=dogechain&hours=2"),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["error_code"], "UNSUPPORTED_CHAIN");
    }
}
