use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::handlers::ApiJson;
use crate::response;
use crate::server::AppState;

#[derive(Deserialize)]
pub struct GenerateRequest {
    prompt: String,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    response: String,
}

/// POST /gemini
pub async fn generate(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Response {
    match state.generative.generate(&req.prompt).await {
        Ok(text) => (StatusCode::OK, Json(GenerateResponse { response: text })).into_response(),
        Err(e) => {
            error!(error = %e, "gemini request failed");
            response::internal_error(e.to_string()).into_response()
        }
    }
}
