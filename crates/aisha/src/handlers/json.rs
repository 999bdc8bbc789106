//! JSON body extractor with `{detail}` rejections.

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};

use crate::response::{self, ErrorResponse};

/// Like [`axum::Json`], but a body that fails to parse or deserialize is
/// answered with the usual `{"detail": ...}` error shape.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ErrorResponse;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(response::with_status(
                rejection.status(),
                rejection.body_text(),
            )),
        }
    }
}
