//! Reductions of request, response and error values to loggable summaries.
//!
//! # Responsibilities
//! - Reduce requests to method, url, user agent, correlation id and client ip
//! - Reduce responses to status code and response time
//! - Reduce errors to kind, message and stack
//!
//! # Design Decisions
//! - Only the fixed field subset is ever copied; headers, bodies and
//!   arbitrary object graphs never reach a record

use std::error::Error;
use std::net::SocketAddr;

use axum::{
    extract::ConnectInfo,
    http::{header, Request},
};
use serde::Serialize;

use crate::correlation::CorrelationContext;

const X_FORWARDED_FOR: &str = "x-forwarded-for";

/// Safe subset of an inbound request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestSummary {
    pub method: String,
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip: Option<String>,
}

impl RequestSummary {
    pub fn from_request<B>(req: &Request<B>) -> Self {
        let headers = req.headers();

        let user_agent = headers
            .get(header::USER_AGENT)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        // Peer address when served with connect info, first forwarded hop otherwise.
        let ip = req
            .extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip().to_string())
            .or_else(|| {
                headers
                    .get(X_FORWARDED_FOR)
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.split(',').next())
                    .map(|v| v.trim().to_string())
                    .filter(|v| !v.is_empty())
            });

        Self {
            method: req.method().to_string(),
            url: req.uri().to_string(),
            user_agent,
            correlation_id: req
                .extensions()
                .get::<CorrelationContext>()
                .map(|ctx| ctx.correlation_id().to_string()),
            ip,
        }
    }
}

/// Safe subset of an outbound response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseSummary {
    pub status_code: u16,
    /// Milliseconds since the request crossed the correlation boundary.
    pub response_time: u64,
}

/// Safe subset of an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorSummary {
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack: Option<String>,
}

impl ErrorSummary {
    /// Summarize an error, walking its `source()` chain into `stack`.
    ///
    /// `kind` is the short name of `E`, looking through `Box`, `Arc` and `Rc`.
    /// A trait object has no name to report, so it becomes `Error`; use
    /// [`with_kind`](Self::with_kind) when the caller knows better.
    pub fn from_error<E>(err: &E) -> Self
    where
        E: Error + 'static,
    {
        let kind = short_type_name::<E>();
        Self {
            kind: kind.to_string(),
            message: err.to_string(),
            stack: Some(render_chain(kind, err)),
        }
    }

    pub fn new(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            message: message.into(),
            stack: None,
        }
    }

    /// Replace `kind`, keeping the stack's first line in step.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        let kind = kind.into();
        if let Some(stack) = self.stack.as_mut() {
            if let Some(rest) = stack.strip_prefix(self.kind.as_str()) {
                *stack = format!("{}{}", kind, rest);
            }
        }
        self.kind = kind;
        self
    }

    /// Summary recorded when an operation is aborted before it resolves.
    pub fn cancelled() -> Self {
        Self::new("Cancelled", "operation cancelled before completion")
    }

    pub fn is_cancellation(&self) -> bool {
        self.kind == "Cancelled"
    }
}

const POINTERS: [&str; 3] = ["Box", "Arc", "Rc"];

fn short_type_name<T: ?Sized>() -> &'static str {
    let mut full = std::any::type_name::<T>();
    loop {
        let (base, generics) = match full.split_once('<') {
            Some((base, rest)) => (base, rest.strip_suffix('>')),
            None => (full, None),
        };
        let name = base.rsplit("::").next().unwrap_or(base);
        match generics {
            Some(inner) if POINTERS.contains(&name) => {
                if inner.starts_with("dyn ") {
                    return "Error";
                }
                full = inner;
            }
            _ => return name,
        }
    }
}

fn render_chain(kind: &str, err: &(dyn Error + 'static)) -> String {
    let mut out = format!("{}: {}", kind, err);
    let mut source = err.source();
    while let Some(cause) = source {
        out.push_str("\n    caused by: ");
        out.push_str(&cause.to_string());
        source = cause.source();
    }
    out
}
