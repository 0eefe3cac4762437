//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate the listener address and logging values
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Runs before config is accepted into the system

use std::net::SocketAddr;

use crate::config::schema::ServiceConfig;
use crate::observability::level::{LogLevel, ParseLevelError};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("log level: {0}")]
    Level(#[from] ParseLevelError),

    #[error("{name} must be a boolean, got '{value}'")]
    Flag { name: &'static str, value: String },
}

/// Check a loaded configuration file.
pub fn validate_config(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(
            config.listener.bind_address.clone(),
        ));
    }

    if let Some(level) = &config.logging.level {
        if let Err(e) = level.parse::<LogLevel>() {
            errors.push(e.into());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Parse a boolean flag the way environment files usually spell them.
pub fn parse_flag(name: &'static str, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ValidationError::Flag {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&ServiceConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let mut config = ServiceConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.logging.level = Some("loud".into());

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], ValidationError::BindAddress(_)));
        assert!(matches!(errors[1], ValidationError::Level(_)));
    }

    #[test]
    fn test_parse_flag() {
        assert_eq!(parse_flag("LOG_HTTP_REQUESTS", "TRUE"), Ok(true));
        assert_eq!(parse_flag("LOG_HTTP_REQUESTS", "off"), Ok(false));
        assert!(parse_flag("LOG_HTTP_REQUESTS", "maybe").is_err());
    }
}
