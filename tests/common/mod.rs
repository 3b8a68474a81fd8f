//! Shared utilities for integration testing.

use std::net::SocketAddr;

use serde_json::{json, Value};
use tokio::net::TcpListener;

use firstlane::config::AppConfig;
use firstlane::http::HttpServer;

#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "test-admin-secret";

/// Config tuned for integration tests: known admin secret, no sweeper, and a
/// cap high enough that functional tests never trip the limiter.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.admin.password = ADMIN_PASSWORD.to_string();
    config.rate_limit.max_requests = 1_000;
    config.rate_limit.sweep_interval_secs = 0;
    config
}

/// Boot the real server on an ephemeral port; returns its base URL.
pub async fn start_server(config: AppConfig) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr: SocketAddr = listener.local_addr().unwrap();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });
    format!("http://{addr}")
}

/// A complete, valid listing payload.
#[allow(dead_code)]
pub fn sample_car() -> Value {
    json!({
        "make": "Toyota",
        "model": "Camry",
        "year": 2021,
        "trim": "SE",
        "dailyPrice": 55,
        "city": "Little Rock",
        "state": "AR",
        "mileage": 42000,
        "transmission": "Automatic",
        "fuel": "Gas",
        "seats": 5,
        "doors": 4,
        "imageUrl": "https://img.example/camry.jpg",
        "images": ["https://img.example/camry-side.jpg"],
        "description": "Clean commuter sedan",
        "features": ["Backup camera", "Bluetooth"]
    })
}
