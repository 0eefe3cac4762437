//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the observability pieces from the resolved logger config
//! - Compose service routes with the middleware chain
//! - Bind server to listener with connect info and graceful shutdown

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::{LoggerConfig, ServiceConfig};
use crate::http::compose::compose;
use crate::http::handlers::{self, AppState};
use crate::interceptor::LoggingInterceptor;
use crate::lifecycle::shutdown_signal;
use crate::observability::{Emitter, RecordSink};

/// HTTP server for the service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
}

impl HttpServer {
    /// Create a new HTTP server writing records to `sink`.
    pub fn new(config: ServiceConfig, logger: Arc<LoggerConfig>, sink: Arc<dyn RecordSink>) -> Self {
        let state = AppState::new(logger.service.as_str());
        let emitter = Emitter::new(logger, sink);
        let interceptor = LoggingInterceptor::new(Arc::new(handlers::operations()), emitter);

        tracing::debug!(
            operations = interceptor.registry().len(),
            "Operation registry built"
        );

        let router = compose(handlers::routes(state), interceptor);
        Self { router, config }
    }

    /// The fully composed router.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Run until Ctrl+C.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        self.run_until(listener, shutdown_signal()).await
    }

    /// Run until `shutdown` resolves, then drain in-flight requests.
    pub async fn run_until<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let app = self.router.into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
