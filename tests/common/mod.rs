//! Shared utilities for integration tests.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
    Router,
};
use tower::ServiceExt;

use service_logging::config::{LoggerConfig, ServiceConfig};
use service_logging::http::compose;
use service_logging::observability::{Emitter, LogRecord, MemorySink};
use service_logging::{HttpServer, LoggingInterceptor, OperationRegistry};

#[allow(dead_code)]
pub fn logger_config() -> Arc<LoggerConfig> {
    Arc::new(LoggerConfig {
        service: "auth-service".into(),
        environment: "test".into(),
        enable_pretty_print: false,
        version: "1.0.0".into(),
        ..LoggerConfig::default()
    })
}

/// The real service router, recording into memory.
#[allow(dead_code)]
pub fn service_app() -> (Router, MemorySink) {
    let sink = MemorySink::new();
    let server = HttpServer::new(ServiceConfig::default(), logger_config(), Arc::new(sink.clone()));
    (server.router(), sink)
}

/// Arbitrary routes behind the same middleware chain.
#[allow(dead_code)]
pub fn observed(routes: Router, registry: OperationRegistry) -> (Router, MemorySink) {
    let sink = MemorySink::new();
    let emitter = Emitter::new(logger_config(), Arc::new(sink.clone()));
    let interceptor = LoggingInterceptor::new(Arc::new(registry), emitter);
    (compose(routes, interceptor), sink)
}

#[allow(dead_code)]
pub async fn send(router: &Router, req: Request<Body>) -> Response<Body> {
    router.clone().oneshot(req).await.unwrap()
}

#[allow(dead_code)]
pub async fn get(router: &Router, uri: &str, headers: &[(&str, &str)]) -> Response<Body> {
    let mut builder = Request::builder().uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    send(router, builder.body(Body::empty()).unwrap()).await
}

#[allow(dead_code)]
pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Records produced by the interceptor (they name an operation).
#[allow(dead_code)]
pub fn operation_records(sink: &MemorySink) -> Vec<LogRecord> {
    sink.records()
        .into_iter()
        .filter(|r| r.operation.is_some())
        .collect()
}

/// Per-request records produced by the access log.
#[allow(dead_code)]
pub fn request_records(sink: &MemorySink) -> Vec<LogRecord> {
    sink.records()
        .into_iter()
        .filter(|r| r.res.is_some())
        .collect()
}
