//! Correlation boundary middleware.

use axum::{
    extract::Request,
    http::{HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::Instrument;

use crate::correlation::context::{CorrelationContext, RequestScope};
use crate::correlation::id::{resolve_correlation_id, X_CORRELATION_ID, X_REQUEST_ID};

/// Assign the request its correlation context and mirror the id onto the
/// response.
///
/// Everything downstream runs inside the request's [`RequestScope`] and a
/// `request` span carrying the id, so plain `tracing` events from handlers
/// are joinable as well.
pub async fn correlation_boundary(mut req: Request, next: Next) -> Response {
    let correlation_id = match resolve_correlation_id(req.headers()) {
        Ok(id) => id,
        Err(e) => {
            tracing::error!(error = %e, "Cannot assign correlation id");
            return (StatusCode::INTERNAL_SERVER_ERROR, "entropy source unavailable")
                .into_response();
        }
    };

    let context = CorrelationContext::new(correlation_id);
    req.extensions_mut().insert(context.clone());

    let scope = RequestScope {
        correlation: context.clone(),
        method: req.method().clone(),
        url: req.uri().to_string(),
    };
    let span = tracing::info_span!("request", correlationId = %context.correlation_id());

    let mut response = scope.run(next.run(req)).instrument(span).await;

    if let Ok(value) = HeaderValue::from_str(context.correlation_id()) {
        let headers = response.headers_mut();
        headers.insert(X_CORRELATION_ID, value.clone());
        headers.insert(X_REQUEST_ID, value);
    }
    response
}
