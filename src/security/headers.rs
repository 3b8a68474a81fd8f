//! Security response headers.
//!
//! # Responsibilities
//! - Stamp a fixed set of hardening headers on every response
//!
//! # Design Decisions
//! - Applied as the outermost layer so rejected (429) responses carry the
//!   headers too, not just responses produced by route handlers
//! - Values are fixed; there is nothing to configure

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::Next,
    response::Response,
};

/// The headers stamped on every response, gated path or not.
pub const SECURITY_HEADERS: [(&str, &str); 4] = [
    ("x-frame-options", "DENY"),
    ("x-content-type-options", "nosniff"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("permissions-policy", "geolocation=(), microphone=()"),
];

/// Middleware attaching the fixed security headers to the response.
pub async fn security_headers_middleware(request: Request<Body>, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderName;

    #[test]
    fn header_values_parse() {
        for (name, value) in SECURITY_HEADERS {
            name.parse::<HeaderName>().unwrap();
            HeaderValue::from_static(value);
        }
    }
}
