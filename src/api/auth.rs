//! Shared-secret authorization for mutating admin operations.

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::Next,
    response::Response,
};

use crate::api::error::ApiError;
use crate::http::server::AppState;

/// Header carrying the admin shared secret.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Middleware rejecting mutating requests without the configured secret.
///
/// An empty configured password fails every request: no configuration means
/// no admin access, never open access.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let supplied = request
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|h| h.to_str().ok());

    match supplied {
        Some(password) if !state.admin.password.is_empty() && password == state.admin.password => {
            Ok(next.run(request).await)
        }
        _ => Err(ApiError::Unauthorized),
    }
}
