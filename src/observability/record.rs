//! The structured log record and its emitter.
//!
//! # Responsibilities
//! - Define the flat record shape shared by every transport
//! - Stamp base fields (service, environment, version) on each record
//! - Hand finished records to the configured sink
//!
//! # Design Decisions
//! - Records are built per emission and dropped after the sink returns
//! - Absent optional fields are omitted, not serialized as null

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;

use crate::config::LoggerConfig;
use crate::observability::level::LogLevel;
use crate::observability::serializers::{ErrorSummary, RequestSummary, ResponseSummary};
use crate::observability::sink::RecordSink;

/// One structured log emission.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogRecord {
    pub level: LogLevel,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub args: Option<Value>,
    /// Milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub req: Option<RequestSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub res: Option<ResponseSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub err: Option<ErrorSummary>,
    pub service: String,
    pub environment: String,
    pub version: String,
}

impl LogRecord {
    /// Record carrying only level, message and base fields.
    pub fn new(config: &LoggerConfig, level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            correlation_id: None,
            operation: None,
            method: None,
            url: None,
            args: None,
            duration: None,
            success: None,
            result: None,
            error: None,
            stack: None,
            req: None,
            res: None,
            err: None,
            service: config.service.clone(),
            environment: config.environment.clone(),
            version: config.version.clone(),
        }
    }

    pub fn with_correlation_id(mut self, correlation_id: Option<impl Into<String>>) -> Self {
        self.correlation_id = correlation_id.map(Into::into);
        self
    }

    pub fn with_operation(mut self, operation: impl Into<String>) -> Self {
        self.operation = Some(operation.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration = Some(duration_ms);
        self
    }
}

/// Shared handle that stamps and forwards records.
///
/// Cloning is cheap; every clone reads the same immutable config.
#[derive(Clone)]
pub struct Emitter {
    config: Arc<LoggerConfig>,
    sink: Arc<dyn RecordSink>,
}

impl Emitter {
    pub fn new(config: Arc<LoggerConfig>, sink: Arc<dyn RecordSink>) -> Self {
        Self { config, sink }
    }

    pub fn config(&self) -> &LoggerConfig {
        &self.config
    }

    /// Start a record stamped with this emitter's base fields.
    pub fn record(&self, level: LogLevel, message: impl Into<String>) -> LogRecord {
        LogRecord::new(&self.config, level, message)
    }

    /// Fire-and-forget hand-off to the sink.
    pub fn emit(&self, record: LogRecord) {
        self.sink.emit(&record);
    }
}

impl std::fmt::Debug for Emitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Emitter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
