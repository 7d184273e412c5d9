use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),

    #[error("Remote API unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("{0}")]
    RemoteRejected(String),

    #[error("Not allowed in the current state: {0}")]
    StateViolation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::RemoteUnavailable(err.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            GatewayError::InvalidInput(_) | GatewayError::OutOfRange(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            GatewayError::StateViolation(_) => (StatusCode::CONFLICT, self.to_string()),
            GatewayError::Unauthorized => (StatusCode::FORBIDDEN, self.to_string()),
            GatewayError::RemoteRejected(_) => (StatusCode::BAD_GATEWAY, self.to_string()),
            GatewayError::RemoteUnavailable(detail) => {
                // Transport details stay in the server log; the operator only
                // ever sees a generic connection failure.
                log::error!("Remote API unreachable: {}", detail);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Connection error. Please try again.".to_string(),
                )
            }
            GatewayError::Storage(_) => (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()),
        };

        let body = Json(json!({
            "success": false,
            "data": message,
        }));

        (status, body).into_response()
    }
}
