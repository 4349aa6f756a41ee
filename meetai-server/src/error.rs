//! HTTP error responses
//!
//! Every failure is rendered as `{"error": "<message>"}` with a matching
//! status code. Limit denials carry extra fields so the client can offer an
//! upgrade path.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use meetai_common::{DenyReason, Error};
use serde_json::json;
use tracing::error;

/// Handler error types
#[derive(Debug)]
pub enum ApiError {
    Unauthorized,
    LimitReached(DenyReason),
    BadRequest(String),
    /// Body or query string the extractor could not accept
    Rejected { status: StatusCode, message: String },
    Forbidden(String),
    NotFound(String),
    Conflict(String),
    UsageUnavailable(String),
    Internal(String),
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        match err {
            Error::NotFound(msg) => ApiError::NotFound(msg),
            Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            Error::Conflict(msg) => ApiError::Conflict(msg),
            Error::UsageLookup { .. } => ApiError::UsageUnavailable(err.to_string()),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Rejected {
            status: rejection.status(),
            message: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                json!({ "error": "You must be logged in to access this resource." }),
            ),
            ApiError::LimitReached(reason) => {
                let DenyReason::LimitReached { kind, limit } = reason;
                (
                    StatusCode::FORBIDDEN,
                    json!({
                        "error": reason.to_string(),
                        "code": "LIMIT_REACHED",
                        "resource": kind,
                        "limit": limit,
                    }),
                )
            }
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, json!({ "error": msg })),
            ApiError::Rejected { status, message } => (status, json!({ "error": message })),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, json!({ "error": msg })),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, json!({ "error": msg })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::UsageUnavailable(msg) => {
                error!("Usage gate unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    json!({ "error": "Usage limits could not be verified, please retry" }),
                )
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
