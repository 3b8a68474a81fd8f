//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the service.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the listing service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Request admission (rate limiting) settings.
    pub rate_limit: RateLimitConfig,

    /// Admin shared-secret settings.
    pub admin: AdminConfig,

    /// Booking notification channels.
    pub notifier: NotifierConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Whole-request timeout in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Request admission settings.
///
/// Fixed at startup. Window accounting is per client IP and only applies to
/// paths under `path_prefix`.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RateLimitConfig {
    /// Window duration in milliseconds.
    pub window_ms: u64,

    /// Maximum admitted requests per identifier per window.
    pub max_requests: u32,

    /// Only paths starting with this prefix are subject to accounting.
    pub path_prefix: String,

    /// Interval between sweeps of expired window entries, in seconds.
    /// 0 disables sweeping; entries then live for the process lifetime.
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window_ms: 15_000,
            max_requests: 30,
            path_prefix: "/api/".to_string(),
            sweep_interval_secs: 60,
        }
    }
}

/// Admin shared-secret settings.
///
/// Mutating car operations require the `x-admin-password` request header to
/// equal `password`. An empty password rejects every mutating request.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AdminConfig {
    /// Shared secret. Usually supplied via the ADMIN_PASSWORD env var.
    pub password: String,
}

/// Booking notification channels. Both are optional; a booking with no
/// configured channel is still accepted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Webhook catch URL to POST booking notices to.
    pub webhook_url: Option<String>,

    /// Resend API key; selects the Resend email transport when set.
    pub resend_api_key: Option<String>,

    /// SMTP relay host; selects direct SMTP delivery when set and no
    /// Resend key is configured.
    pub smtp_host: Option<String>,

    /// SMTP relay port.
    pub smtp_port: u16,

    /// SMTP credentials. Both must be set for authentication to be used.
    pub smtp_user: Option<String>,
    pub smtp_pass: Option<String>,

    /// Recipient for booking notification emails.
    pub bookings_email: String,

    /// From line for booking notification emails.
    pub email_from: String,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            resend_api_key: None,
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_pass: None,
            bookings_email: "owner@example.com".to_string(),
            email_from: "First Lane Rentals <noreply@firstlane.example>".to_string(),
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Emit JSON log lines instead of the pretty format.
    pub log_json: bool,

    /// Expose a Prometheus scrape endpoint.
    pub metrics_enabled: bool,

    /// Address for the Prometheus scrape endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_json: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9100".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_admission_constants() {
        let config = AppConfig::default();
        assert_eq!(config.rate_limit.window_ms, 15_000);
        assert_eq!(config.rate_limit.max_requests, 30);
        assert_eq!(config.rate_limit.path_prefix, "/api/");
    }

    #[test]
    fn minimal_toml_deserializes_with_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [listener]
            bind_address = "127.0.0.1:3000"

            [admin]
            password = "hunter2"
            "#,
        )
        .unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.admin.password, "hunter2");
        assert_eq!(config.rate_limit.max_requests, 30);
        assert!(config.notifier.webhook_url.is_none());
    }
}
