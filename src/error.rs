use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Emporia authentication failed: {0}")]
    Auth(String),

    #[error("Device not found: {0}")]
    DeviceNotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Emporia API error: {0}")]
    Vendor(String),

    #[error("Emporia request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(ref msg) => {
                tracing::error!("Configuration error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
            AppError::Auth(ref msg) => {
                tracing::error!("Emporia authentication failed: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Not connected to Emporia cloud",
                )
            }
            AppError::DeviceNotFound(ref msg) => (StatusCode::NOT_FOUND, msg.as_str()),
            AppError::Validation(ref msg) => (StatusCode::BAD_REQUEST, msg.as_str()),
            AppError::Vendor(ref msg) => {
                tracing::error!("Emporia API error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Emporia request failed")
            }
            AppError::Http(ref e) => {
                tracing::error!("Emporia request error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Emporia request failed")
            }
            AppError::Other(ref e) => {
                tracing::error!("Internal error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
