//! Correlation id resolution and propagation through the composed router.

use std::collections::HashSet;

use axum::{http::StatusCode, routing::get, Router};
use futures_util::future::join_all;

use service_logging::correlation::{current_correlation_id, CorrelationContext};
use service_logging::OperationRegistry;

mod common;

#[tokio::test]
async fn test_inbound_correlation_id_is_echoed() {
    let (app, _) = common::service_app();

    let res = common::get(&app, "/health", &[("x-correlation-id", "abc-123")]).await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["x-correlation-id"], "abc-123");
    assert_eq!(res.headers()["x-request-id"], "abc-123");
}

#[tokio::test]
async fn test_request_id_used_when_correlation_id_missing() {
    let (app, _) = common::service_app();

    let res = common::get(&app, "/health", &[("x-request-id", "req-9")]).await;
    assert_eq!(res.headers()["x-correlation-id"], "req-9");
    assert_eq!(res.headers()["x-request-id"], "req-9");

    let res = common::get(
        &app,
        "/health",
        &[("x-correlation-id", ""), ("x-request-id", "req-10")],
    )
    .await;
    assert_eq!(res.headers()["x-correlation-id"], "req-10");
}

#[tokio::test]
async fn test_generated_ids_are_distinct_under_concurrency() {
    let (app, _) = common::service_app();

    let responses = join_all((0..64).map(|_| common::get(&app, "/health", &[]))).await;

    let ids: HashSet<String> = responses
        .iter()
        .map(|res| {
            let id = res.headers()["x-correlation-id"].to_str().unwrap().to_string();
            assert_eq!(res.headers()["x-request-id"], id.as_str());
            assert!(!id.is_empty());
            id
        })
        .collect();
    assert_eq!(ids.len(), 64);
}

#[tokio::test]
async fn test_unmatched_routes_still_get_headers() {
    let (app, _) = common::service_app();

    let res = common::get(&app, "/missing", &[("x-correlation-id", "abc-123")]).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.headers()["x-correlation-id"], "abc-123");
}

#[tokio::test]
async fn test_handlers_see_their_own_context() {
    async fn echo(ctx: CorrelationContext) -> String {
        tokio::task::yield_now().await;
        let scoped = current_correlation_id().map(|id| id.to_string());
        assert_eq!(scoped.as_deref(), Some(ctx.correlation_id()));
        ctx.correlation_id().to_string()
    }

    let routes = Router::new().route("/echo", get(echo));
    let (app, _) = common::observed(routes, OperationRegistry::new());

    let requests = (0..32).map(|i| {
        let app = app.clone();
        async move {
            let id = format!("req-{i}");
            let res = common::get(&app, "/echo", &[("x-correlation-id", id.as_str())]).await;
            (id, common::body_string(res).await)
        }
    });
    for (sent, echoed) in join_all(requests).await {
        assert_eq!(sent, echoed);
    }
}
