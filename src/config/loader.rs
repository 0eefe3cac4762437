//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{LoggerConfig, LoggingConfig, ServiceConfig, DEFAULT_SERVICE};
use crate::config::validation::{parse_flag, validate_config, ValidationError};
use crate::observability::level::LogLevel;
use crate::observability::logging::DEVELOPMENT;

pub const LOG_LEVEL: &str = "LOG_LEVEL";
pub const APP_NAME: &str = "APP_NAME";
pub const APP_ENV: &str = "APP_ENV";
pub const APP_VERSION: &str = "APP_VERSION";
pub const LOG_HTTP_REQUESTS: &str = "LOG_HTTP_REQUESTS";

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: ServiceConfig = toml::from_str(&content)?;

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Read a variable from the process environment.
pub fn env_lookup(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Resolve the logger configuration.
///
/// Precedence per field: `lookup` (environment), then the file section,
/// then defaults. Blank values count as unset.
pub fn resolve_logger_config<F>(file: &LoggingConfig, lookup: F) -> Result<LoggerConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let pick = |key: &str, from_file: &Option<String>| -> Option<String> {
        non_blank(lookup(key).as_deref()).or_else(|| non_blank(from_file.as_deref()))
    };

    let mut errors = Vec::new();

    let level = match pick(LOG_LEVEL, &file.level) {
        Some(raw) => raw.parse::<LogLevel>().unwrap_or_else(|e| {
            errors.push(ValidationError::from(e));
            LogLevel::default()
        }),
        None => LogLevel::default(),
    };

    let http_requests = match non_blank(lookup(LOG_HTTP_REQUESTS).as_deref()) {
        Some(raw) => parse_flag(LOG_HTTP_REQUESTS, &raw).unwrap_or_else(|e| {
            errors.push(e);
            true
        }),
        None => file.http_requests.unwrap_or(true),
    };

    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    let environment = pick(APP_ENV, &file.environment).unwrap_or_else(|| DEVELOPMENT.to_string());
    let enable_pretty_print = environment == DEVELOPMENT;

    Ok(LoggerConfig {
        level,
        service: pick(APP_NAME, &file.service).unwrap_or_else(|| DEFAULT_SERVICE.to_string()),
        environment,
        enable_pretty_print,
        version: pick(APP_VERSION, &file.version)
            .unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string()),
        http_requests,
    })
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use crate::observability::logging::Transport;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_inputs() {
        let config = resolve_logger_config(&LoggingConfig::default(), lookup_from(&[])).unwrap();
        assert_eq!(config.level, LogLevel::Info);
        assert_eq!(config.service, "unknown-service");
        assert_eq!(config.environment, "development");
        assert!(config.enable_pretty_print);
        assert_eq!(config.version, env!("CARGO_PKG_VERSION"));
        assert!(config.http_requests);
    }

    #[test]
    fn test_environment_drives_transport() {
        let prod = resolve_logger_config(
            &LoggingConfig::default(),
            lookup_from(&[(APP_ENV, "production"), (APP_NAME, "auth-service")]),
        )
        .unwrap();
        assert!(!prod.enable_pretty_print);
        assert_eq!(prod.transport(), Transport::Json);
        assert_eq!(prod.service, "auth-service");

        let dev = resolve_logger_config(
            &LoggingConfig::default(),
            lookup_from(&[(APP_ENV, "development")]),
        )
        .unwrap();
        assert_eq!(dev.transport(), Transport::Pretty);
    }

    #[test]
    fn test_environment_overrides_file() {
        let file = LoggingConfig {
            level: Some("debug".into()),
            service: Some("from-file".into()),
            environment: Some("staging".into()),
            ..Default::default()
        };
        let config = resolve_logger_config(&file, lookup_from(&[(APP_NAME, "from-env")])).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.service, "from-env");
        assert_eq!(config.environment, "staging");
    }

    #[test]
    fn test_blank_values_fall_back_to_defaults() {
        let config = resolve_logger_config(
            &LoggingConfig::default(),
            lookup_from(&[(APP_NAME, "  "), (LOG_LEVEL, ""), (LOG_HTTP_REQUESTS, "")]),
        )
        .unwrap();
        assert_eq!(config.service, "unknown-service");
        assert_eq!(config.level, LogLevel::Info);
        assert!(config.http_requests);
    }

    #[test]
    fn test_blank_environment_falls_back_to_file() {
        let file = LoggingConfig {
            level: Some("debug".into()),
            service: Some("orders".into()),
            environment: Some("staging".into()),
            http_requests: Some(false),
            ..Default::default()
        };
        let config = resolve_logger_config(
            &file,
            lookup_from(&[
                (APP_NAME, ""),
                (LOG_LEVEL, "  "),
                (APP_ENV, ""),
                (LOG_HTTP_REQUESTS, " "),
            ]),
        )
        .unwrap();
        assert_eq!(config.service, "orders");
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.environment, "staging");
        assert!(!config.http_requests);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let err = resolve_logger_config(
            &LoggingConfig::default(),
            lookup_from(&[(LOG_LEVEL, "chatty"), (LOG_HTTP_REQUESTS, "sometimes")]),
        )
        .unwrap_err();
        match err {
            ConfigError::Validation(errors) => assert_eq!(errors.len(), 2),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_load_config_from_toml() {
        let dir = std::env::temp_dir().join(format!("service-logging-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("service.toml");
        fs::write(
            &path,
            "[listener]\nbind_address = \"127.0.0.1:4000\"\n\n[logging]\nlevel = \"warn\"\nservice = \"orders\"\nhttp_requests = false\n",
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:4000");
        assert_eq!(config.logging.level.as_deref(), Some("warn"));
        assert_eq!(config.logging.http_requests, Some(false));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_load_config_rejects_bad_level() {
        let dir = std::env::temp_dir().join(format!("service-logging-bad-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("service.toml");
        fs::write(&path, "[logging]\nlevel = \"shout\"\n").unwrap();

        assert!(matches!(load_config(&path), Err(ConfigError::Validation(_))));

        fs::remove_dir_all(&dir).unwrap();
    }
}
