//! Error response helpers shared by handlers.
//!
//! Error bodies have the shape `{"detail": "..."}`.

use axum::Json;
use axum::http::StatusCode;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

pub type ErrorResponse = (StatusCode, Json<ErrorBody>);

pub fn with_status(status: StatusCode, detail: impl Into<String>) -> ErrorResponse {
    (
        status,
        Json(ErrorBody {
            detail: detail.into(),
        }),
    )
}

pub fn bad_request(detail: impl Into<String>) -> ErrorResponse {
    with_status(StatusCode::BAD_REQUEST, detail)
}

/// Input failed validation.
pub fn unprocessable(detail: impl Into<String>) -> ErrorResponse {
    with_status(StatusCode::UNPROCESSABLE_ENTITY, detail)
}

pub fn internal_error(detail: impl Into<String>) -> ErrorResponse {
    with_status(StatusCode::INTERNAL_SERVER_ERROR, detail)
}
