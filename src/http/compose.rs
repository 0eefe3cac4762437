//! Middleware chain composition.
//!
//! Outermost to innermost:
//! ```text
//! correlation_boundary → access_log (optional) → intercept_http (matched routes) → handler
//! ```

use axum::{middleware, Router};

use crate::correlation::correlation_boundary;
use crate::interceptor::{intercept_http, LoggingInterceptor};
use crate::observability::access_log::access_log;

/// Wrap `routes` in the observability chain. Call after all routes are added.
pub fn compose(routes: Router, interceptor: LoggingInterceptor) -> Router {
    let emitter = interceptor.emitter().clone();
    let log_requests = emitter.config().http_requests;

    let mut router = routes.route_layer(middleware::from_fn_with_state(interceptor, intercept_http));
    if log_requests {
        router = router.layer(middleware::from_fn_with_state(emitter, access_log));
    }
    router.layer(middleware::from_fn(correlation_boundary))
}
