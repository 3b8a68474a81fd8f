//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (window > 0, cap > 0, timeouts > 0)
//! - Check addresses parse before binding is attempted
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::AppConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address {0:?} is not a valid socket address")]
    BadBindAddress(String),

    #[error("observability.metrics_address {0:?} is not a valid socket address")]
    BadMetricsAddress(String),

    #[error("timeouts.request_secs must be greater than 0")]
    ZeroRequestTimeout,

    #[error("rate_limit.window_ms must be greater than 0")]
    ZeroWindow,

    #[error("rate_limit.max_requests must be greater than 0")]
    ZeroMaxRequests,

    #[error("rate_limit.path_prefix must not be empty")]
    EmptyPathPrefix,

    #[error("notifier.webhook_url {0:?} is not a valid URL")]
    BadWebhookUrl(String),
}

/// Validate semantic constraints, collecting every violation.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BadBindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::BadMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.rate_limit.window_ms == 0 {
        errors.push(ValidationError::ZeroWindow);
    }

    if config.rate_limit.max_requests == 0 {
        errors.push(ValidationError::ZeroMaxRequests);
    }

    if config.rate_limit.path_prefix.is_empty() {
        errors.push(ValidationError::EmptyPathPrefix);
    }

    if let Some(ref raw) = config.notifier.webhook_url {
        if url::Url::parse(raw).is_err() {
            errors.push(ValidationError::BadWebhookUrl(raw.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&AppConfig::default()).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = AppConfig::default();
        config.listener.bind_address = "not-an-addr".into();
        config.rate_limit.window_ms = 0;
        config.rate_limit.max_requests = 0;
        config.rate_limit.path_prefix = String::new();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::ZeroWindow));
        assert!(errors.contains(&ValidationError::ZeroMaxRequests));
        assert!(errors.contains(&ValidationError::EmptyPathPrefix));
    }

    #[test]
    fn rejects_malformed_webhook_url() {
        let mut config = AppConfig::default();
        config.notifier.webhook_url = Some("::nope::".into());
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::BadWebhookUrl("::nope::".into())]
        );
    }
}
