//! Correlation-aware request logging for multi-service backends.
//!
//! # Architecture Overview
//!
//! ```text
//!     Client Request
//!     ──────────────▶ correlation ──▶ access log ──▶ interceptor ──▶ handler
//!                     (id + start)    (per request)  (per operation)
//!                          │               │               │
//!                          │               ▼               ▼
//!                          │          observability: LogRecord → RecordSink
//!                          │               → tracing subscriber (pretty | JSON lines)
//!                          ▼
//!     ◀────────────── response + x-correlation-id / x-request-id
//! ```
//!
//! - [`config`]: logger and listener configuration from file and environment
//! - [`correlation`]: per-request correlation id boundary
//! - [`operations`]: declarative per-operation logging metadata
//! - [`interceptor`]: start/completed/failed records around operations
//! - [`observability`]: records, sinks, levels, serializers, subscriber setup
//! - [`http`]: middleware composition and the demo service

// The record event in `observability::sink` carries every wire field.
#![recursion_limit = "256"]

pub mod config;
pub mod correlation;
pub mod http;
pub mod interceptor;
pub mod lifecycle;
pub mod observability;
pub mod operations;

pub use config::{LoggerConfig, ServiceConfig};
pub use http::HttpServer;
pub use interceptor::LoggingInterceptor;
pub use operations::{OperationId, OperationMetadata, OperationRegistry};
