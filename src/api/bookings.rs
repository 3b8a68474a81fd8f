//! Booking request handler.
//!
//! Validation failures map to a plain 422, an unknown car to a plain 404.
//! Notification dispatch is fire-and-forget: the 201 response never waits
//! on, or fails because of, a delivery channel.

use axum::{extract::State, http::StatusCode, Json};
use serde_json::{json, Value};

use crate::api::error::ApiError;
use crate::api::validate;
use crate::http::server::AppState;
use crate::notify::BookingNotice;
use crate::observability::metrics;

pub async fn create_booking(
    State(state): State<AppState>,
    Json(payload): Json<Value>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let input = validate::parse_booking(&payload).ok_or(ApiError::InvalidPayload)?;
    let car = state.store.get_car(input.car_id).ok_or(ApiError::CarNotFound)?;

    let booking = state.store.create_booking(input);
    tracing::info!(
        booking_id = booking.id,
        car_id = booking.car_id,
        "Booking request created"
    );
    metrics::record_booking_created();

    let notice = BookingNotice::new(&car, &booking);
    let notifier = state.notifier.clone();
    tokio::spawn(async move {
        notifier.send(notice).await;
    });

    Ok((
        StatusCode::CREATED,
        Json(json!({ "ok": true, "bookingId": booking.id })),
    ))
}
