//! API error taxonomy and response mapping.
//!
//! # Design Decisions
//! - Handlers return `Result<_, ApiError>`; the response mapping lives in one
//!   place
//! - Plain-text bodies for terse rejections (`Unauthorized`, `Not found`,
//!   `Invalid payload`); field-level validation failures return a JSON map

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

/// Per-field validation messages, keyed by wire field name.
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found")]
    NotFound,

    #[error("Car not found")]
    CarNotFound,

    #[error("Invalid payload")]
    InvalidPayload,

    #[error("validation failed")]
    Validation(FieldErrors),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized").into_response(),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not found").into_response(),
            ApiError::CarNotFound => (StatusCode::NOT_FOUND, "Car not found").into_response(),
            ApiError::InvalidPayload => {
                (StatusCode::UNPROCESSABLE_ENTITY, "Invalid payload").into_response()
            }
            ApiError::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({ "errors": errors })),
            )
                .into_response(),
        }
    }
}
