//! Per-request completion log.
//!
//! One record per request once the response is ready, levelled by
//! [`level_for_outcome`]. Response time is measured from the moment the
//! request crossed the correlation boundary.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::correlation::CorrelationContext;
use crate::observability::level::level_for_outcome;
use crate::observability::record::Emitter;
use crate::observability::serializers::{ErrorSummary, RequestSummary, ResponseSummary};

pub async fn access_log(State(emitter): State<Emitter>, req: Request, next: Next) -> Response {
    let summary = RequestSummary::from_request(&req);
    let context = req.extensions().get::<CorrelationContext>().cloned();

    let response = next.run(req).await;

    let status = response.status().as_u16();
    let response_time = context.as_ref().map(|c| c.elapsed_ms()).unwrap_or_default();
    let err = response.extensions().get::<ErrorSummary>().cloned();
    let level = level_for_outcome(status, err.is_some());

    let message = match &err {
        Some(err) => format!("{} {} {} - {}", summary.method, summary.url, status, err.message),
        None => format!("{} {} {} - {}ms", summary.method, summary.url, status, response_time),
    };

    let mut record = emitter
        .record(level, message)
        .with_correlation_id(context.as_ref().map(|c| c.correlation_id()));
    record.req = Some(summary);
    record.res = Some(ResponseSummary {
        status_code: status,
        response_time,
    });
    record.err = err;
    emitter.emit(record);

    response
}
