//! Handler error type.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;

use crate::observability::ErrorSummary;

/// Errors a handler can return.
///
/// The response carries an [`ErrorSummary`] extension so the interceptor
/// and the access log can tell a failed operation from a plain 4xx/5xx.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let summary = ErrorSummary::from_error(&self);
        let status = self.status();
        let mut response = (
            status,
            Json(json!({ "statusCode": status.as_u16(), "message": self.to_string() })),
        )
            .into_response();
        response.extensions_mut().insert(summary);
        response
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_carries_error_summary() {
        let response = AppError::NotFound("no such user".into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let summary = response.extensions().get::<ErrorSummary>().unwrap();
        assert_eq!(summary.kind, "AppError");
        assert_eq!(summary.message, "no such user");
    }
}
