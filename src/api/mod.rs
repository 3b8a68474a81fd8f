//! Public JSON API.
//!
//! # Data Flow
//! ```text
//! Admitted request
//!     → router (method + path dispatch)
//!     → auth.rs (admin secret, mutating car routes only)
//!     → validate.rs (payload constraints)
//!     → cars.rs / bookings.rs (handlers, store access)
//!     → error.rs (failure → response mapping)
//! ```

pub mod auth;
pub mod bookings;
pub mod cars;
pub mod error;
pub mod validate;

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::http::server::AppState;

/// Build the API route tree. Mutating car routes carry the admin layer;
/// reads and booking creation are open (the admission filter still applies
/// upstream).
pub fn api_router(state: AppState) -> Router {
    let admin = Router::new()
        .route("/api/cars", post(cars::create_car))
        .route(
            "/api/cars/{id}",
            put(cars::update_car).delete(cars::delete_car),
        )
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::admin_auth_middleware,
        ));

    Router::new()
        .route("/api/cars", get(cars::list_cars))
        .route("/api/cars/{id}", get(cars::get_car))
        .route("/api/bookings", post(bookings::create_booking))
        .merge(admin)
        .with_state(state)
}
