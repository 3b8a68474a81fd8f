//! Listing CRUD handlers.
//!
//! Status mapping follows the public API contract: reads are open, mutations
//! sit behind the admin middleware (wired in `api::router`), malformed or
//! constraint-violating payloads return 422 with a field-error map.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::{json, Value};

use crate::api::error::{ApiError, FieldErrors};
use crate::api::validate;
use crate::http::server::AppState;
use crate::store::types::{CarInput, CarPatch};

pub async fn list_cars(State(state): State<AppState>) -> Json<Value> {
    Json(json!({ "cars": state.store.list_cars() }))
}

pub async fn get_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, ApiError> {
    let car = state.store.get_car(id).ok_or(ApiError::NotFound)?;
    Ok(Json(json!({ "car": car })))
}

pub async fn create_car(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input: CarInput = serde_json::from_value(payload).map_err(shape_error)?;
    validate::validate_car_input(&input).map_err(ApiError::Validation)?;

    let car = state.store.create_car(input);
    tracing::info!(car_id = car.id, make = %car.make, model = %car.model, "Listing created");
    Ok((StatusCode::CREATED, Json(json!({ "car": car }))))
}

pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<Value>,
) -> Result<Json<Value>, ApiError> {
    let patch: CarPatch = serde_json::from_value(payload).map_err(shape_error)?;
    validate::validate_car_patch(&patch).map_err(ApiError::Validation)?;

    let car = state.store.update_car(id, patch).ok_or(ApiError::NotFound)?;
    tracing::info!(car_id = car.id, "Listing updated");
    Ok(Json(json!({ "car": car })))
}

pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    if state.store.delete_car(id) {
        tracing::info!(car_id = id, "Listing deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}

/// Serde deserialization failures become a single-entry field-error map, so
/// clients see 422 with a body in the same shape as constraint violations.
fn shape_error(err: serde_json::Error) -> ApiError {
    let mut errors = FieldErrors::new();
    errors.insert("body".to_string(), err.to_string());
    ApiError::Validation(errors)
}
