//! HTTP composition subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum serve, connect info, graceful shutdown)
//!     → compose.rs (correlation → access log → interceptor)
//!     → handlers.rs (hello, health)
//!     → error.rs (handler failures marked for the interceptor)
//!     → Send to client
//! ```

pub mod compose;
pub mod error;
pub mod handlers;
pub mod server;

pub use compose::compose;
pub use error::AppError;
pub use server::HttpServer;
