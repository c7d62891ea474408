use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Error body returned by every endpoint: `{ "error": "...", "code": "..." }`
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: None,
        }
    }

    pub fn with_code(error: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: Some(code.into()),
        }
    }
}

/// Errors that know which transport status they map to
pub trait HttpError: std::error::Error {
    fn status_code(&self) -> StatusCode;

    /// Machine-readable code, e.g. "NOT_FOUND"
    fn error_code(&self) -> Option<&'static str> {
        None
    }
}

/// Turn an [`HttpError`] into a JSON error response.
///
/// Server-side failures are logged at error level, caller mistakes at warn.
pub fn into_response<E: HttpError>(err: E) -> Response {
    let status = err.status_code();
    let code = err.error_code();
    let message = err.to_string();

    if status.is_server_error() {
        tracing::error!(error = %message, status = %status, code = ?code, "Request failed");
    } else {
        tracing::warn!(error = %message, status = %status, code = ?code, "Request rejected");
    }

    let body = match code {
        Some(code) => ErrorResponse::with_code(message, code),
        None => ErrorResponse::new(message),
    };

    (status, Json(body)).into_response()
}

/// Implement `IntoResponse` for a type that implements [`HttpError`]
#[macro_export]
macro_rules! impl_into_response {
    ($error_type:ty) => {
        impl axum::response::IntoResponse for $error_type {
            fn into_response(self) -> axum::response::Response {
                $crate::error::into_response(self)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use thiserror::Error;

    #[derive(Error, Debug)]
    enum SampleError {
        #[error("nope")]
        Rejected,
        #[error("boom")]
        Broken,
    }

    impl HttpError for SampleError {
        fn status_code(&self) -> StatusCode {
            match self {
                Self::Rejected => StatusCode::BAD_REQUEST,
                Self::Broken => StatusCode::INTERNAL_SERVER_ERROR,
            }
        }

        fn error_code(&self) -> Option<&'static str> {
            match self {
                Self::Rejected => Some("REJECTED"),
                Self::Broken => None,
            }
        }
    }

    #[test]
    fn test_error_response_omits_missing_code() {
        let body = serde_json::to_value(ErrorResponse::new("boom")).unwrap();
        assert_eq!(body, serde_json::json!({ "error": "boom" }));
    }

    #[test]
    fn test_into_response_uses_status_code() {
        assert_eq!(
            into_response(SampleError::Rejected).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            into_response(SampleError::Broken).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
