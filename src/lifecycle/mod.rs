//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     .env → CLI → config file → logger config → subscriber → entropy probe → listener
//!
//! Shutdown (signals.rs):
//!     SIGINT → stop accepting → drain in-flight requests → exit
//! ```
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

pub mod signals;

pub use signals::shutdown_signal;
