//! Correlation boundary subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request
//!     → id.rs (x-correlation-id, then x-request-id, else generated UUID v4)
//!     → context.rs (CorrelationContext in extensions + task-local RequestScope)
//!     → middleware.rs (runs the chain in scope, sets response headers)
//!     → Response carries x-correlation-id and x-request-id
//! ```
//!
//! # Design Decisions
//! - One id and one start time per request, never stored process-wide
//! - A missing inbound id is not an error; a failed entropy source is

pub mod context;
pub mod id;
pub mod middleware;

pub use context::{current_correlation_id, inject_current, CorrelationContext, RequestScope};
pub use id::{
    generate_correlation_id, probe_entropy, resolve_correlation_id, EntropyError,
    X_CORRELATION_ID, X_REQUEST_ID,
};
pub use middleware::correlation_boundary;
