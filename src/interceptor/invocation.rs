//! One intercepted invocation, from "starting" to its terminal record.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;

use crate::correlation::RequestScope;
use crate::observability::{Emitter, ErrorSummary, LogLevel};
use crate::operations::RegisteredOperation;

/// Guard that guarantees exactly one terminal record.
///
/// [`complete`](Invocation::complete) and [`fail`](Invocation::fail) consume
/// the guard. Dropping it unresolved (the caller abandoned the future, or a
/// panic unwound through it) emits a failed record instead.
#[must_use = "dropping an Invocation records the operation as cancelled"]
pub struct Invocation {
    emitter: Emitter,
    operation: Arc<RegisteredOperation>,
    correlation_id: Option<Arc<str>>,
    started: Instant,
    finished: bool,
}

impl Invocation {
    /// Start timing and emit the "starting" record.
    pub fn begin(emitter: Emitter, operation: Arc<RegisteredOperation>, args: Option<Value>) -> Self {
        let started = Instant::now();
        let scope = RequestScope::current();
        let correlation_id = scope.as_ref().map(|s| s.correlation.shared_id());

        let mut record = emitter
            .record(LogLevel::Info, format!("Starting operation: {}", operation.name))
            .with_correlation_id(correlation_id.as_deref())
            .with_operation(&operation.name);
        if let Some(scope) = scope {
            record.method = Some(scope.method.to_string());
            record.url = Some(scope.url);
        }
        record.args = args;
        emitter.emit(record);

        Self {
            emitter,
            operation,
            correlation_id,
            started,
            finished: false,
        }
    }

    pub fn operation(&self) -> &RegisteredOperation {
        &self.operation
    }

    /// Emit the "completed" record. `result` is recorded as given.
    pub fn complete(mut self, result: Option<Value>) {
        self.finished = true;
        let mut record = self
            .emitter
            .record(
                LogLevel::Info,
                format!("Completed operation: {}", self.operation.name),
            )
            .with_correlation_id(self.correlation_id.as_deref())
            .with_operation(&self.operation.name)
            .with_duration(self.elapsed_ms());
        record.success = Some(true);
        record.result = result;
        self.emitter.emit(record);
    }

    /// Emit the "failed" record.
    pub fn fail(mut self, error: ErrorSummary) {
        self.finished = true;
        self.emit_failure(error);
    }

    fn emit_failure(&self, error: ErrorSummary) {
        let mut record = self
            .emitter
            .record(
                LogLevel::Error,
                format!("Failed operation: {}", self.operation.name),
            )
            .with_correlation_id(self.correlation_id.as_deref())
            .with_operation(&self.operation.name)
            .with_duration(self.elapsed_ms());
        record.success = Some(false);
        record.error = Some(error.message.clone());
        record.stack = error.stack.clone();
        record.err = Some(error);
        self.emitter.emit(record);
    }

    fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl Drop for Invocation {
    fn drop(&mut self) {
        if self.finished {
            return;
        }
        self.finished = true;
        let error = if std::thread::panicking() {
            ErrorSummary::new("Panic", "operation panicked before completion")
        } else {
            ErrorSummary::cancelled()
        };
        self.emit_failure(error);
    }
}
