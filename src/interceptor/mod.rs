//! Logging interceptor subsystem.
//!
//! # Data Flow
//! ```text
//! Invocation of an operation
//!     → registry lookup (OperationId or matched route)
//!     → None: run the operation untouched
//!     → Some: invocation.rs emits "starting"
//!         → operation runs
//!         → "completed" (duration, success, optional result)
//!           or "failed" (duration, error, stack)
//!           or, if abandoned, "failed" with a cancellation error
//! ```
//!
//! # Design Decisions
//! - Exactly one terminal record per start, enforced by a drop guard
//! - Errors are observed by reference and returned as-is
//! - Timing is local to the invocation, independent of request timing

pub mod http;
pub mod invocation;
pub mod wrapper;

pub use http::intercept_http;
pub use invocation::Invocation;
pub use wrapper::LoggingInterceptor;
