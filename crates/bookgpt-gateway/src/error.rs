//! Error types for the Gateway

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use bookgpt_core::error::ValidationError;

use crate::api::PayloadKind;

/// Gateway error type
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request was rejected before any provider was contacted
    #[error("{message}")]
    BadRequest { kind: PayloadKind, message: String },

    /// Unexpected failure while serving a request; detail stays in the logs
    #[error("Internal error: {message}")]
    Internal { kind: PayloadKind, message: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl GatewayError {
    pub fn bad_request(kind: PayloadKind, message: impl Into<String>) -> Self {
        Self::BadRequest {
            kind,
            message: message.into(),
        }
    }

    pub fn internal(kind: PayloadKind, message: impl Into<String>) -> Self {
        Self::Internal {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(kind: PayloadKind, err: ValidationError) -> Self {
        Self::bad_request(kind, err.to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest { .. } => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<serde_json::Error> for GatewayError {
    fn from(e: serde_json::Error) -> Self {
        GatewayError::Serialization(e.to_string())
    }
}

impl From<toml::de::Error> for GatewayError {
    fn from(e: toml::de::Error) -> Self {
        GatewayError::InvalidConfig(e.to_string())
    }
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::BadRequest { kind, message } => kind.rejected(message),
            Self::Internal { kind, message } => {
                tracing::error!("Request failed: {}", message);
                kind.failed()
            }
            other => {
                tracing::error!("Gateway error: {}", other);
                serde_json::json!({ "success": false, "error": crate::api::INTERNAL_ERROR })
            }
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for Gateway operations
pub type Result<T> = std::result::Result<T, GatewayError>;
