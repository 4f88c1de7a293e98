use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum GasLensError {
    #[error("Unsupported chain: {0}")]
    UnsupportedChain(String),

    #[error("Failed to connect to {chain} network. Please try again later.")]
    ConnectionUnavailable { chain: String },

    #[error("Fee history unavailable for {chain}: {reason}")]
    HistoryUnavailable { chain: String, reason: String },

    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),

    #[error("Invalid JSON: {0}")]
    InvalidJson(String),

    #[error("Invalid ABI: {0}")]
    InvalidAbiShape(String),

    #[error("Invalid ABI JSON format")]
    InvalidAbiJson,

    #[error("Parameter {input_name} is required")]
    MissingParameter { input_name: String },

    #[error("Invalid value for parameter {input_name}: {reason}")]
    InvalidParameter { input_name: String, reason: String },

    #[error("Function not found in ABI: {0}")]
    UnknownFunction(String),

    #[error("Function {0} is overloaded, select it by full signature")]
    AmbiguousFunction(String),

    #[error("{message}")]
    EstimationFailed { message: String },

    #[error("Simulation failed: {message}")]
    SimulationFailed { message: String },

    #[error("Request superseded by a newer one on slot {slot}")]
    Superseded { slot: String },

    #[error("RPC error: {0}")]
    RpcError(#[from] ethers::providers::ProviderError),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal server error: {0}")]
    InternalError(String),
}

impl GasLensError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            GasLensError::UnsupportedChain(_)
            | GasLensError::InvalidAddress(_)
            | GasLensError::InvalidJson(_)
            | GasLensError::InvalidAbiShape(_)
            | GasLensError::InvalidAbiJson
            | GasLensError::MissingParameter { .. }
            | GasLensError::InvalidParameter { .. }
            | GasLensError::AmbiguousFunction(_) => StatusCode::BAD_REQUEST,
            GasLensError::UnknownFunction(_) => StatusCode::NOT_FOUND,
            GasLensError::Superseded { .. } => StatusCode::CONFLICT,
            GasLensError::EstimationFailed { .. } | GasLensError::SimulationFailed { .. } => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            GasLensError::ConnectionUnavailable { .. }
            | GasLensError::HistoryUnavailable { .. }
            | GasLensError::RpcError(_) => StatusCode::BAD_GATEWAY,
            GasLensError::ConfigError(_) | GasLensError::InternalError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            GasLensError::UnsupportedChain(_) => "UNSUPPORTED_CHAIN",
            GasLensError::ConnectionUnavailable { .. } => "CONNECTION_UNAVAILABLE",
            GasLensError::HistoryUnavailable { .. } => "HISTORY_UNAVAILABLE",
            GasLensError::InvalidAddress(_) => "INVALID_ADDRESS",
            GasLensError::InvalidJson(_) => "INVALID_JSON",
            GasLensError::InvalidAbiShape(_) => "INVALID_ABI_SHAPE",
            GasLensError::InvalidAbiJson => "INVALID_ABI_JSON",
            GasLensError::MissingParameter { .. } => "MISSING_PARAMETER",
            GasLensError::InvalidParameter { .. } => "INVALID_PARAMETER",
            GasLensError::UnknownFunction(_) => "UNKNOWN_FUNCTION",
            GasLensError::AmbiguousFunction(_) => "AMBIGUOUS_FUNCTION",
            GasLensError::EstimationFailed { .. } => "ESTIMATION_FAILED",
            GasLensError::SimulationFailed { .. } => "SIMULATION_FAILED",
            GasLensError::Superseded { .. } => "SUPERSEDED",
            GasLensError::RpcError(_) => "UPSTREAM_ERROR",
            GasLensError::ConfigError(_) | GasLensError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub error_code: String,
    pub timestamp: chrono::DateTime<Utc>,
    pub request_id: String,
}

impl IntoResponse for GasLensError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let error_code = self.error_code();

        let body = ErrorResponse {
            success: false,
            error: self.to_string(),
            error_code: error_code.to_string(),
            timestamp: Utc::now(),
            request_id: Uuid::new_v4().to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, error_code = error_code, "Request failed");
        } else {
            tracing::warn!(error = %self, error_code = error_code, "Request rejected");
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimation_failure_is_verbatim() {
        let err = GasLensError::EstimationFailed {
            message: "execution reverted: ERC20: transfer amount exceeds balance".to_string(),
        };
        assert_eq!(err.to_string(), "execution reverted: ERC20: transfer amount exceeds balance");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn validation_errors_are_client_errors() {
        let err = GasLensError::MissingParameter { input_name: "to".to_string() };
        assert_eq!(err.to_string(), "Parameter to is required");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.error_code(), "MISSING_PARAMETER");
    }

    #[test]
    fn connectivity_errors_are_gateway_errors() {
        let err = GasLensError::ConnectionUnavailable { chain: "bsc".to_string() };
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert!(err.to_string().contains("bsc"));
    }

    #[test]
    fn renders_json_body() {
        let response = GasLensError::UnsupportedChain("base".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
