//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! .env file (optional, dotenvy)
//!     → process environment
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ServiceConfig
//!
//! ServiceConfig.logging + environment
//!     → loader.rs (resolve_logger_config)
//!     → LoggerConfig (immutable, shared via Arc)
//! ```
//!
//! # Design Decisions
//! - Resolved once at startup; never reloaded while serving
//! - All fields have defaults to allow an empty environment
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{env_lookup, load_config, resolve_logger_config, ConfigError};
pub use schema::{ListenerConfig, LoggerConfig, LoggingConfig, ServiceConfig};
