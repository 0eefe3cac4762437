//! Configuration schema definitions.
//!
//! `ServiceConfig` is the optional on-disk file. `LoggerConfig` is the
//! resolved, immutable logger setup shared by every request.

use serde::{Deserialize, Serialize};

use crate::observability::level::LogLevel;
use crate::observability::logging::{Transport, DEVELOPMENT};

pub const DEFAULT_SERVICE: &str = "unknown-service";

/// Root of the service configuration file.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Logging settings; environment variables take precedence.
    pub logging: LoggingConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Logging section of the configuration file. Unset fields fall through
/// to environment variables and then to defaults.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub service: Option<String>,
    pub environment: Option<String>,
    pub version: Option<String>,
    /// Emit one record per finished HTTP request.
    pub http_requests: Option<bool>,
}

/// Resolved logger configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggerConfig {
    pub level: LogLevel,
    pub service: String,
    pub environment: String,
    /// True only in the development environment.
    pub enable_pretty_print: bool,
    pub version: String,
    pub http_requests: bool,
}

impl LoggerConfig {
    pub fn transport(&self) -> Transport {
        if self.enable_pretty_print {
            Transport::Pretty
        } else {
            Transport::Json
        }
    }
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Info,
            service: DEFAULT_SERVICE.to_string(),
            environment: DEVELOPMENT.to_string(),
            enable_pretty_print: true,
            version: env!("CARGO_PKG_VERSION").to_string(),
            http_requests: true,
        }
    }
}
