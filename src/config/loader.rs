//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", format_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file, then apply environment
/// overrides for secrets.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let mut config: AppConfig = toml::from_str(&content)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Validated default configuration with environment overrides applied.
/// Used when the service starts without a config file.
pub fn default_config() -> Result<AppConfig, ConfigError> {
    let mut config = AppConfig::default();
    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Secrets come from the environment so config files stay committable.
fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(password) = env::var("ADMIN_PASSWORD") {
        config.admin.password = password;
    }
    if let Ok(key) = env::var("RESEND_API_KEY") {
        config.notifier.resend_api_key = Some(key);
    }
    if let Ok(host) = env::var("SMTP_HOST") {
        config.notifier.smtp_host = Some(host);
    }
    if let Ok(port) = env::var("SMTP_PORT") {
        match port.parse() {
            Ok(port) => config.notifier.smtp_port = port,
            Err(_) => tracing::warn!(value = %port, "Ignoring unparseable SMTP_PORT"),
        }
    }
    if let Ok(user) = env::var("SMTP_USER") {
        config.notifier.smtp_user = Some(user);
    }
    if let Ok(pass) = env::var("SMTP_PASS") {
        config.notifier.smtp_pass = Some(pass);
    }
    if let Ok(url) = env::var("FIRSTLANE_WEBHOOK_URL") {
        config.notifier.webhook_url = Some(url);
    }
    if let Ok(to) = env::var("BOOKINGS_EMAIL") {
        config.notifier.bookings_email = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_rejects_invalid_toml() {
        let dir = std::env::temp_dir();
        let path = dir.join("firstlane-loader-test.toml");
        fs::write(&path, "listener = 3").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn load_surfaces_validation_errors() {
        let dir = std::env::temp_dir();
        let path = dir.join("firstlane-loader-invalid.toml");
        fs::write(&path, "[rate_limit]\nwindow_ms = 0\n").unwrap();
        let err = load_config(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        let _ = fs::remove_file(&path);
    }
}
