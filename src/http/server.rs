//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, metrics, request id, security headers,
//!   admission, timeout) in an order that keeps the header invariant
//! - Bind the server to a listener and serve with graceful shutdown
//!
//! # Layering
//! The security-header layer sits outside the admission layer so rejected
//! (429) and timed-out responses carry the fixed headers, not only responses
//! produced by route handlers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::{AdminConfig, AppConfig};
use crate::http::request::request_id_middleware;
use crate::lifecycle::{wait_for_signal, Shutdown};
use crate::notify::Notifier;
use crate::observability::metrics;
use crate::security::headers::security_headers_middleware;
use crate::security::rate_limit::{admission_middleware, spawn_sweeper, RateLimiter};
use crate::store::MemoryStore;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MemoryStore>,
    pub notifier: Arc<Notifier>,
    pub admin: AdminConfig,
}

/// HTTP server for the listing service.
pub struct HttpServer {
    router: Router,
    limiter: Arc<RateLimiter>,
    sweep_interval_secs: u64,
    shutdown: Shutdown,
}

impl HttpServer {
    /// Create a server with a fresh store and notifier.
    pub fn new(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let notifier = Arc::new(Notifier::new(config.notifier.clone()));
        Self::with_state(config, store, notifier)
    }

    /// Create a server around externally owned collaborators.
    pub fn with_state(
        config: AppConfig,
        store: Arc<MemoryStore>,
        notifier: Arc<Notifier>,
    ) -> Self {
        let state = AppState {
            store,
            notifier,
            admin: config.admin.clone(),
        };
        let limiter = Arc::new(RateLimiter::new(&config.rate_limit));
        let router = build_router(&config, state, limiter.clone());

        Self {
            router,
            limiter,
            sweep_interval_secs: config.rate_limit.sweep_interval_secs,
            shutdown: Shutdown::new(),
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        spawn_sweeper(
            self.limiter.clone(),
            self.sweep_interval_secs,
            self.shutdown.subscribe(),
        );

        let app = self
            .router
            .into_make_service_with_connect_info::<SocketAddr>();

        axum::serve(listener, app)
            .with_graceful_shutdown(wait_for_signal())
            .await?;

        self.shutdown.trigger();
        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Build the router with all middleware layers.
fn build_router(config: &AppConfig, state: AppState, limiter: Arc<RateLimiter>) -> Router {
    Router::new()
        .merge(crate::api::api_router(state))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(limiter, admission_middleware))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.timeouts.request_secs,
        )))
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(middleware::from_fn(track_metrics))
        .layer(TraceLayer::new_for_http())
}

async fn healthz() -> &'static str {
    "ok"
}

/// Record method/status/latency for every response, including rejections.
async fn track_metrics(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
