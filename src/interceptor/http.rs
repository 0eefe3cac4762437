//! Route-level interception for axum handlers.
//!
//! # Responsibilities
//! - Map the matched route to a registered operation
//! - Emit start/terminal records around the handler
//! - Detect handler failure from the response's [`ErrorSummary`] extension
//!
//! # Design Decisions
//! - Unregistered routes go straight to `next.run`
//! - The response is passed through as produced; a result capture re-attaches
//!   the exact bytes it read, or a body raising the read error
//! - Streaming or large bodies are never buffered for logging

use std::collections::HashMap;

use axum::{
    body::{Body, Bytes, HttpBody},
    extract::{MatchedPath, Query, Request, State},
    http::{header, HeaderMap, Uri},
    middleware::Next,
    response::Response,
};
use futures_util::{future, stream};
use serde_json::Value;

use crate::interceptor::wrapper::{to_loggable, LoggingInterceptor};
use crate::observability::ErrorSummary;

/// Largest response body copied into a `result` field.
pub const MAX_RESULT_BYTES: usize = 64 * 1024;

pub async fn intercept_http(
    State(interceptor): State<LoggingInterceptor>,
    req: Request,
    next: Next,
) -> Response {
    let operation = req
        .extensions()
        .get::<MatchedPath>()
        .and_then(|path| interceptor.registry().for_route(req.method(), path.as_str()))
        .cloned();
    let Some(operation) = operation else {
        return next.run(req).await;
    };

    let args = if operation.metadata.records_args() {
        query_args(req.uri())
    } else {
        None
    };
    let records_result = operation.metadata.records_result();
    let invocation = interceptor.begin(operation, args);

    let response = next.run(req).await;

    if let Some(err) = response.extensions().get::<ErrorSummary>().cloned() {
        invocation.fail(err);
        return response;
    }
    if !records_result {
        invocation.complete(None);
        return response;
    }

    let (response, captured) = capture_result(response).await;
    match captured {
        Ok(result) => invocation.complete(result),
        Err(err) => invocation.fail(err),
    }
    response
}

fn query_args(uri: &Uri) -> Option<Value> {
    uri.query()?;
    Query::<HashMap<String, String>>::try_from_uri(uri)
        .ok()
        .and_then(|Query(params)| to_loggable(&params))
}

/// Read a small response body into a loggable value.
///
/// A body that fails mid-read is reported as a failure, and the caller
/// receives a body that raises the same error.
async fn capture_result(response: Response) -> (Response, Result<Option<Value>, ErrorSummary>) {
    let (parts, body) = response.into_parts();

    let fits = HttpBody::size_hint(&body)
        .exact()
        .is_some_and(|len| usize::try_from(len).is_ok_and(|len| len <= MAX_RESULT_BYTES));
    if !fits {
        return (Response::from_parts(parts, body), Ok(None));
    }

    match axum::body::to_bytes(body, MAX_RESULT_BYTES).await {
        Ok(bytes) => {
            let result = decode_result(&parts.headers, &bytes);
            (Response::from_parts(parts, Body::from(bytes)), Ok(result))
        }
        Err(e) => {
            let (body, err) = failed_body(e);
            (Response::from_parts(parts, body), Err(err))
        }
    }
}

fn failed_body(e: axum::Error) -> (Body, ErrorSummary) {
    let summary = ErrorSummary::from_error(&e);
    let body = Body::from_stream(stream::once(future::ready(Err::<Bytes, _>(e))));
    (body, summary)
}

fn decode_result(headers: &HeaderMap, bytes: &Bytes) -> Option<Value> {
    if bytes.is_empty() {
        return None;
    }
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|ct| ct.starts_with("application/json") || ct.contains("+json"))
        .unwrap_or(false);

    if is_json {
        serde_json::from_slice(bytes).ok()
    } else {
        std::str::from_utf8(bytes)
            .ok()
            .map(|text| Value::String(text.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_decode_json_and_text() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
        assert_eq!(
            decode_result(&headers, &Bytes::from_static(br#"{"status":"ok"}"#)),
            Some(serde_json::json!({"status": "ok"}))
        );

        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
        assert_eq!(
            decode_result(&headers, &Bytes::from_static(b"hello")),
            Some(Value::String("hello".into()))
        );

        assert_eq!(decode_result(&headers, &Bytes::new()), None);
        assert_eq!(decode_result(&headers, &Bytes::from_static(&[0xff, 0xfe])), None);
    }

    #[test]
    fn test_query_args() {
        let uri: Uri = "/users?page=2&sort=name".parse().unwrap();
        assert_eq!(
            query_args(&uri),
            Some(serde_json::json!({"page": "2", "sort": "name"}))
        );
        let uri: Uri = "/users".parse().unwrap();
        assert_eq!(query_args(&uri), None);
    }

    #[tokio::test]
    async fn test_capture_result_preserves_body() {
        let response = Response::builder()
            .header(header::CONTENT_TYPE, "text/plain")
            .body(Body::from("hello world"))
            .unwrap();

        let (response, result) = capture_result(response).await;
        assert_eq!(result, Ok(Some(Value::String("hello world".into()))));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"hello world");
    }

    #[tokio::test]
    async fn test_capture_result_skips_large_bodies() {
        let big = "x".repeat(MAX_RESULT_BYTES + 1);
        let response = Response::new(Body::from(big.clone()));

        let (response, result) = capture_result(response).await;
        assert_eq!(result, Ok(None));
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.len(), big.len());
    }

    #[tokio::test]
    async fn test_unreadable_body_stays_an_error() {
        let (body, summary) = failed_body(axum::Error::new("connection reset"));

        assert_eq!(summary.message, "connection reset");
        let read = axum::body::to_bytes(body, usize::MAX).await;
        assert!(read.unwrap_err().to_string().contains("connection reset"));
    }
}
