//! Service endpoints and their logging metadata.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::Method,
    response::Json,
    routing::get,
    Router,
};
use serde::Serialize;

use crate::correlation::CorrelationContext;
use crate::operations::{OperationId, OperationMetadata, OperationRegistry};

pub const GET_HELLO: OperationId = OperationId::new("AppController", "get_hello");
pub const GET_HEALTH: OperationId = OperationId::new("AppController", "get_health");

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<str>,
    pub started: Instant,
}

impl AppState {
    pub fn new(service: impl Into<Arc<str>>) -> Self {
        Self {
            service: service.into(),
            started: Instant::now(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub service: String,
    pub timestamp: String,
    /// Seconds since the service started.
    pub uptime: f64,
}

/// Logging metadata for this service's endpoints.
pub fn operations() -> OperationRegistry {
    OperationRegistry::new()
        .register(GET_HELLO, OperationMetadata::named("get-hello").include_result())
        .register(GET_HEALTH, OperationMetadata::named("health-check"))
        .route(Method::GET, "/", GET_HELLO)
        .route(Method::GET, "/health", GET_HEALTH)
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_hello))
        .route("/health", get(get_health))
        .with_state(state)
}

async fn get_hello(correlation: CorrelationContext) -> &'static str {
    tracing::info!(correlation_id = %correlation.correlation_id(), "Hello endpoint called");
    "Auth Service is running with structured logging!"
}

async fn get_health(State(state): State<AppState>) -> Json<HealthStatus> {
    tracing::info!("Health check requested");
    Json(HealthStatus {
        status: "ok",
        service: state.service.to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime: state.started.elapsed().as_secs_f64(),
    })
}
