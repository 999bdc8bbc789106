//! Waiting list signup.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::handlers::ApiJson;
use crate::phone;
use crate::response;
use crate::server::AppState;
use crate::store::StoreError;

const DUPLICATE_PHONE: &str = "Phone number already in waiting list";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct CreateEntryRequest {
    username: String,
    phone_number: String,
}

#[derive(Serialize)]
pub struct CreateEntryResponse {
    message: &'static str,
    id: i64,
    whatsapp_sent: bool,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /waiting-list/
///
/// Validates the signup, stores it under the canonical phone number and sends
/// a WhatsApp welcome. A failed welcome does not fail the signup; it is
/// reported through `whatsapp_sent`.
pub async fn create_entry(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<CreateEntryRequest>,
) -> Response {
    if let Err(detail) = validate(&req) {
        return response::unprocessable(detail).into_response();
    }

    let phone_number = phone::normalize(&req.phone_number);

    match state.db.find_waiting_list_by_phone(&phone_number).await {
        Ok(None) => {}
        Ok(Some(_)) => return response::bad_request(DUPLICATE_PHONE).into_response(),
        Err(e) => {
            error!(error = %e, "waiting list lookup failed");
            return response::internal_error("Failed to check waiting list").into_response();
        }
    }

    let entry = match state
        .db
        .insert_waiting_list(&req.username, &phone_number)
        .await
    {
        Ok(entry) => entry,
        Err(StoreError::Duplicate) => {
            return response::bad_request(DUPLICATE_PHONE).into_response();
        }
        Err(e) => {
            error!(error = %e, "waiting list insert failed");
            return response::internal_error("Failed to add to waiting list").into_response();
        }
    };

    let envelope = state
        .gateway
        .send_text(&phone_number, &welcome_message(&req.username))
        .await;
    info!(
        entry_id = entry.id,
        whatsapp_sent = envelope.is_success(),
        "waiting list entry created"
    );

    let response = CreateEntryResponse {
        message: "Added to waiting list",
        id: entry.id,
        whatsapp_sent: envelope.is_success(),
    };

    (StatusCode::OK, Json(response)).into_response()
}

// ============================================================================
// Helpers
// ============================================================================

/// Checks every field, username first, and joins all failures.
fn validate(req: &CreateEntryRequest) -> Result<(), String> {
    let mut errors = Vec::new();
    if !phone::is_valid_username(&req.username) {
        errors.push("Username must contain only letters, spaces, or hyphens (2-50 characters)");
    }
    if !phone::is_valid_kenyan_phone(&req.phone_number) {
        errors.push("Invalid Kenyan phone number format: 0712345678 or +254712345678");
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors.join("; "))
    }
}

fn welcome_message(username: &str) -> String {
    format!(
        "Hello {username}, 👋\n\nThanks for joining our waiting list! \
         We'll notify you soon when we launch. 🚀"
    )
}
