//! Operation metadata registry.
//!
//! # Data Flow
//! ```text
//! Startup:
//!     OperationId + OperationMetadata (explicit register calls)
//!     → registry.rs (names resolved, routes bound)
//!     → Arc<OperationRegistry> (frozen)
//!
//! Invocation:
//!     interceptor looks up by OperationId or (Method, route pattern)
//!     → Some: intercept, None: passthrough
//! ```

pub mod metadata;
pub mod registry;

pub use metadata::{OperationId, OperationMetadata};
pub use registry::{OperationRegistry, RegisteredOperation};
