//! First Lane Rentals listing API.
//!
//! A car-rental listing service: listing CRUD behind a shared-secret admin
//! gate, booking-request intake with webhook/email notification relay, and a
//! request admission filter (security headers plus a fixed-window per-IP
//! rate limit on API paths) in front of everything.

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod notify;
pub mod observability;
pub mod security;
pub mod store;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
