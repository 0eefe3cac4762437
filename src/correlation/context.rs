//! Request-scoped correlation state.
//!
//! The context is carried two ways for the lifetime of one request: in the
//! request's extensions (for extractors and middleware) and in a tokio
//! task-local around the request future (for code that only has the call
//! chain). Neither outlives the request.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap, HeaderValue, Method, StatusCode},
};

use crate::correlation::id::{X_CORRELATION_ID, X_REQUEST_ID};

/// Correlation id and arrival time of one request.
#[derive(Debug, Clone)]
pub struct CorrelationContext {
    correlation_id: Arc<str>,
    start_time: Instant,
}

impl CorrelationContext {
    pub fn new(correlation_id: String) -> Self {
        Self {
            correlation_id: Arc::from(correlation_id),
            start_time: Instant::now(),
        }
    }

    pub fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    /// The id itself, shared rather than copied.
    pub fn shared_id(&self) -> Arc<str> {
        Arc::clone(&self.correlation_id)
    }

    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Milliseconds since the request crossed the boundary.
    pub fn elapsed_ms(&self) -> u64 {
        u64::try_from(self.start_time.elapsed().as_millis()).unwrap_or(u64::MAX)
    }
}

impl<S> FromRequestParts<S> for CorrelationContext
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CorrelationContext>()
            .cloned()
            .ok_or((
                StatusCode::INTERNAL_SERVER_ERROR,
                "correlation boundary is not installed",
            ))
    }
}

/// Everything a request-scoped log statement may need.
#[derive(Debug, Clone)]
pub struct RequestScope {
    pub correlation: CorrelationContext,
    pub method: Method,
    pub url: String,
}

tokio::task_local! {
    static REQUEST_SCOPE: RequestScope;
}

impl RequestScope {
    /// Run `fut` with this scope visible through [`RequestScope::current`].
    pub async fn run<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        REQUEST_SCOPE.scope(self, fut).await
    }

    /// Scope of the request being handled by the current task, if any.
    pub fn current() -> Option<RequestScope> {
        REQUEST_SCOPE.try_with(Clone::clone).ok()
    }
}

/// Correlation id of the request being handled by the current task.
pub fn current_correlation_id() -> Option<Arc<str>> {
    REQUEST_SCOPE
        .try_with(|scope| scope.correlation.shared_id())
        .ok()
}

/// Copy the current correlation id onto outbound request headers so the
/// next hop joins the same correlation. Returns false outside a request.
pub fn inject_current(headers: &mut HeaderMap) -> bool {
    let Some(id) = current_correlation_id() else {
        return false;
    };
    let Ok(value) = HeaderValue::from_str(&id) else {
        return false;
    };
    headers.insert(X_CORRELATION_ID, value.clone());
    headers.insert(X_REQUEST_ID, value);
    true
}
