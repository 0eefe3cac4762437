//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Record producers (interceptor, access log):
//!     → record.rs (LogRecord stamped with service/environment/version)
//!     → sink.rs (RecordSink: tracing events or in-memory)
//!     → logging.rs (subscriber: pretty in development, JSON lines elsewhere)
//!
//! Helpers:
//!     → level.rs (level-by-outcome heuristic)
//!     → serializers.rs (safe request/response/error summaries)
//!     → access_log.rs (one record per finished request)
//! ```
//!
//! # Design Decisions
//! - Structured records, never pre-formatted strings at call sites
//! - Correlation id flows from the request scope into every record
//! - Sinks are fire-and-forget; the request never waits on the transport

pub mod access_log;
pub mod level;
pub mod logging;
pub mod record;
pub mod serializers;
pub mod sink;

pub use level::{level_for_outcome, LogLevel};
pub use logging::{init_logging, json_subscriber, Transport};
pub use record::{Emitter, LogRecord};
pub use serializers::{ErrorSummary, RequestSummary, ResponseSummary};
pub use sink::{MemorySink, RecordSink, TracingSink, RECORD_TARGET};
