//! WhatsApp messaging HTTP handlers.

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use crate::gateway::external_message_id;
use crate::handlers::ApiJson;
use crate::http::Envelope;
use crate::phone;
use crate::response;
use crate::server::AppState;
use crate::store::{MessageRecord, MessageStatus, NewMessage};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct SendTextRequest {
    phone_number: String,
    message: String,
}

#[derive(Deserialize)]
pub struct SendTemplateRequest {
    phone_number: String,
    template_name: String,
    #[serde(default)]
    parameters: Option<Vec<Value>>,
}

#[derive(Deserialize)]
pub struct SendMediaRequest {
    phone_number: String,
    media_url: String,
    /// image, document, video or audio
    media_type: String,
    #[serde(default)]
    caption: Option<String>,
}

#[derive(Serialize)]
pub struct MessageHistoryResponse {
    count: usize,
    messages: Vec<MessageRecord>,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /whatsapp/send-text
pub async fn send_text(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendTextRequest>,
) -> Response {
    let envelope = state
        .gateway
        .send_text(&req.phone_number, &req.message)
        .await;

    record_and_respond(
        &state,
        envelope,
        &req.phone_number,
        req.message,
        "text".to_string(),
    )
    .await
}

/// POST /whatsapp/send-template
pub async fn send_template(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendTemplateRequest>,
) -> Response {
    let envelope = state
        .gateway
        .send_template(&req.phone_number, &req.template_name, req.parameters)
        .await;

    let content = format!("Template: {}", req.template_name);
    record_and_respond(
        &state,
        envelope,
        &req.phone_number,
        content,
        "template".to_string(),
    )
    .await
}

/// POST /whatsapp/send-media
pub async fn send_media(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<SendMediaRequest>,
) -> Response {
    let envelope = state
        .gateway
        .send_media(
            &req.phone_number,
            &req.media_url,
            &req.media_type,
            req.caption.as_deref(),
        )
        .await;

    record_and_respond(
        &state,
        envelope,
        &req.phone_number,
        req.media_url,
        req.media_type,
    )
    .await
}

/// GET /whatsapp/messages/{phone_number}
pub async fn message_history(
    State(state): State<AppState>,
    Path(phone_number): Path<String>,
) -> Response {
    let phone_number = phone::normalize(&phone_number);

    match state.db.messages_for_phone(&phone_number).await {
        Ok(messages) => {
            let response = MessageHistoryResponse {
                count: messages.len(),
                messages,
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => {
            error!(error = %e, "message history query failed");
            response::internal_error("Failed to load message history").into_response()
        }
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// Log a successful send, then return the gateway envelope as the body.
///
/// Failed sends are not logged; the caller sees `success: false` instead.
async fn record_and_respond(
    state: &AppState,
    envelope: Envelope,
    phone_number: &str,
    message_content: String,
    message_type: String,
) -> Response {
    if let Envelope::Success(ref data) = envelope {
        let message = NewMessage {
            phone_number: phone::normalize(phone_number),
            message_content,
            message_type,
            status: MessageStatus::Sent,
            external_message_id: external_message_id(data),
            error_message: None,
        };
        if let Err(e) = state.db.insert_message(&message).await {
            error!(error = %e, "failed to record sent message");
            return response::internal_error(format!("Failed to record message: {e}"))
                .into_response();
        }
    }

    (StatusCode::OK, Json(envelope)).into_response()
}
