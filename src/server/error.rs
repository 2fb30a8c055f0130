//! HTTP error responses

use axum::extract::rejection::QueryRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::ExoskyError;

/// Error returned from a handler, rendered as `{"error": "..."}`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<ExoskyError> for ApiError {
    fn from(error: ExoskyError) -> Self {
        let status = match &error {
            ExoskyError::Range { .. } => StatusCode::NOT_FOUND,
            ExoskyError::Query(_) => StatusCode::BAD_GATEWAY,
            ExoskyError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self::bad_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            log::error!("{} {}", self.status, self.message);
        } else {
            log::debug!("{} {}", self.status, self.message);
        }
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let range: ApiError = ExoskyError::Range { index: 3, len: 2 }.into();
        assert_eq!(range.status(), StatusCode::NOT_FOUND);
        assert!(range.message().contains("index 3"));

        let query: ApiError = ExoskyError::Query("timed out".to_string()).into();
        assert_eq!(query.status(), StatusCode::BAD_GATEWAY);

        let tilt: ApiError = ExoskyError::Config("tilt angles must be finite".to_string()).into();
        assert_eq!(tilt.status(), StatusCode::BAD_REQUEST);

        let other: ApiError = ExoskyError::Format("bad".to_string()).into();
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
