//! Record sinks.
//!
//! # Responsibilities
//! - Define the hand-off point between record producers and transports
//! - Forward records into `tracing` for the installed subscriber
//! - Keep records in memory for inspection
//!
//! # Design Decisions
//! - `emit` is infallible: transport failures stay inside the transport
//! - Pretty events carry one `tracing` field per wire field
//! - JSON events carry the serialized record whole, so `args` and `result`
//!   keep their JSON types on the line

use std::sync::{Arc, Mutex};

use crate::observability::level::LogLevel;
use crate::observability::logging::Transport;
use crate::observability::record::LogRecord;

/// Target of every event produced by [`TracingSink`].
pub const RECORD_TARGET: &str = "service_logging::record";

/// Field holding the serialized record on JSON events.
pub(crate) const RECORD_FIELD: &str = "record";

/// Destination for finished records.
pub trait RecordSink: Send + Sync {
    fn emit(&self, record: &LogRecord);
}

/// Forwards records as `tracing` events under [`RECORD_TARGET`].
///
/// Build it for the transport [`init_logging`](crate::observability::logging::init_logging)
/// installed: the JSON subscriber writes the `record` field of these events
/// verbatim as the line.
#[derive(Debug, Clone, Copy)]
pub struct TracingSink {
    transport: Transport,
}

impl TracingSink {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> Transport {
        self.transport
    }
}

impl Default for TracingSink {
    fn default() -> Self {
        Self::new(Transport::Pretty)
    }
}

struct EventFields<'a> {
    message: &'a str,
    correlation_id: Option<&'a str>,
    operation: Option<&'a str>,
    method: Option<&'a str>,
    url: Option<&'a str>,
    args: Option<String>,
    duration: Option<u64>,
    success: Option<bool>,
    result: Option<String>,
    error: Option<&'a str>,
    stack: Option<&'a str>,
    req_method: Option<&'a str>,
    req_url: Option<&'a str>,
    req_user_agent: Option<&'a str>,
    req_correlation_id: Option<&'a str>,
    req_ip: Option<&'a str>,
    res_status_code: Option<u16>,
    res_response_time: Option<u64>,
    err_kind: Option<&'a str>,
    err_message: Option<&'a str>,
    err_stack: Option<&'a str>,
    service: &'a str,
    environment: &'a str,
    version: &'a str,
}

impl<'a> EventFields<'a> {
    fn from_record(r: &'a LogRecord) -> Self {
        let req = r.req.as_ref();
        let err = r.err.as_ref();
        Self {
            message: &r.message,
            correlation_id: r.correlation_id.as_deref(),
            operation: r.operation.as_deref(),
            method: r.method.as_deref(),
            url: r.url.as_deref(),
            args: r.args.as_ref().map(ToString::to_string),
            duration: r.duration,
            success: r.success,
            result: r.result.as_ref().map(ToString::to_string),
            error: r.error.as_deref(),
            stack: r.stack.as_deref(),
            req_method: req.map(|q| q.method.as_str()),
            req_url: req.map(|q| q.url.as_str()),
            req_user_agent: req.and_then(|q| q.user_agent.as_deref()),
            req_correlation_id: req.and_then(|q| q.correlation_id.as_deref()),
            req_ip: req.and_then(|q| q.ip.as_deref()),
            res_status_code: r.res.map(|s| s.status_code),
            res_response_time: r.res.map(|s| s.response_time),
            err_kind: err.map(|e| e.kind.as_str()),
            err_message: err.map(|e| e.message.as_str()),
            err_stack: err.and_then(|e| e.stack.as_deref()),
            service: &r.service,
            environment: &r.environment,
            version: &r.version,
        }
    }
}

macro_rules! record_event {
    ($macro:ident, $f:expr) => {
        tracing::$macro!(
            target: RECORD_TARGET,
            correlationId = $f.correlation_id,
            operation = $f.operation,
            method = $f.method,
            url = $f.url,
            args = $f.args.as_deref(),
            duration = $f.duration,
            success = $f.success,
            result = $f.result.as_deref(),
            error = $f.error,
            stack = $f.stack,
            req.method = $f.req_method,
            req.url = $f.req_url,
            req.userAgent = $f.req_user_agent,
            req.correlationId = $f.req_correlation_id,
            req.ip = $f.req_ip,
            res.statusCode = $f.res_status_code,
            res.responseTime = $f.res_response_time,
            err.kind = $f.err_kind,
            err.message = $f.err_message,
            err.stack = $f.err_stack,
            service = $f.service,
            environment = $f.environment,
            version = $f.version,
            "{}",
            $f.message
        )
    };
}

macro_rules! record_line_event {
    ($macro:ident, $line:expr, $message:expr) => {
        tracing::$macro!(target: RECORD_TARGET, record = $line, "{}", $message)
    };
}

/// The record as one JSON object, stamped with the emission time.
fn json_line(record: &LogRecord) -> serde_json::Result<String> {
    let mut value = serde_json::to_value(record)?;
    if let Some(object) = value.as_object_mut() {
        object.insert(
            "timestamp".to_string(),
            chrono::Utc::now().to_rfc3339().into(),
        );
    }
    serde_json::to_string(&value)
}

impl TracingSink {
    fn emit_fields(record: &LogRecord) {
        let fields = EventFields::from_record(record);
        match record.level {
            LogLevel::Trace => record_event!(trace, fields),
            LogLevel::Debug => record_event!(debug, fields),
            LogLevel::Info => record_event!(info, fields),
            LogLevel::Warn => record_event!(warn, fields),
            LogLevel::Error => record_event!(error, fields),
        }
    }

    fn emit_line(record: &LogRecord, line: &str) {
        let message = &record.message;
        match record.level {
            LogLevel::Trace => record_line_event!(trace, line, message),
            LogLevel::Debug => record_line_event!(debug, line, message),
            LogLevel::Info => record_line_event!(info, line, message),
            LogLevel::Warn => record_line_event!(warn, line, message),
            LogLevel::Error => record_line_event!(error, line, message),
        }
    }
}

impl RecordSink for TracingSink {
    fn emit(&self, record: &LogRecord) {
        match self.transport {
            Transport::Pretty => Self::emit_fields(record),
            Transport::Json => match json_line(record) {
                Ok(line) => Self::emit_line(record, &line),
                Err(e) => {
                    tracing::debug!(error = %e, "Record not serializable, logging fields");
                    Self::emit_fields(record);
                }
            },
        }
    }
}

/// Keeps every record it receives, in order.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    records: Arc<Mutex<Vec<LogRecord>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the records received so far.
    pub fn records(&self) -> Vec<LogRecord> {
        match self.records.lock() {
            Ok(records) => records.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn clear(&self) {
        match self.records.lock() {
            Ok(mut records) => records.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }
}

impl RecordSink for MemorySink {
    fn emit(&self, record: &LogRecord) {
        let mut records = match self.records.lock() {
            Ok(records) => records,
            Err(poisoned) => poisoned.into_inner(),
        };
        records.push(record.clone());
    }
}
