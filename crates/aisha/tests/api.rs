//! End-to-end tests for the HTTP API over an in-memory database and a mock
//! outbound transport.

mod common;

use axum::http::StatusCode;
use serde_json::json;

use aisha::http::TransportError;
use aisha::test_support::MockTransport;

use common::{get, post_json, test_app, test_app_with_keys};

fn gateway_ok() -> std::sync::Arc<MockTransport> {
    MockTransport::json(200, json!({"messages": [{"id": "wamid.ABC"}]}))
}

// ============================================================================
// Health
// ============================================================================

#[tokio::test]
async fn root_reports_running() {
    let t = test_app(gateway_ok()).await;

    let (status, body) = get(&t.app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Aisha Backend API is running");
}

#[tokio::test]
async fn probes_are_ok() {
    let t = test_app(gateway_ok()).await;

    assert_eq!(get(&t.app, "/livez").await.0, StatusCode::OK);
    assert_eq!(get(&t.app, "/readyz").await.0, StatusCode::OK);

    let (status, body) = get(&t.app, "/version").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "aisha");
}

// ============================================================================
// Waiting list
// ============================================================================

#[tokio::test]
async fn waiting_list_signup_sends_welcome() {
    let t = test_app(gateway_ok()).await;

    let (status, body) = post_json(
        &t.app,
        "/waiting-list/",
        json!({"username": "Jane Doe", "phone_number": "0712345678"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Added to waiting list");
    assert_eq!(body["whatsapp_sent"], true);
    assert!(body["id"].as_i64().is_some());

    let entry = t
        .db
        .find_waiting_list_by_phone("+254712345678")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(entry.username, "Jane Doe");

    let request = t.transport.last_request().unwrap();
    let payload = request.body.unwrap();
    assert_eq!(payload["to"], "+254712345678");
    assert_eq!(payload["message_type"], "text");
    assert!(
        payload["message"]
            .as_str()
            .unwrap()
            .starts_with("Hello Jane Doe, 👋")
    );
}

#[tokio::test]
async fn duplicate_phone_is_rejected_without_sending() {
    let t = test_app(gateway_ok()).await;
    t.db.insert_waiting_list("Jane", "+254712345678")
        .await
        .unwrap();

    // Same number in a different accepted format.
    let (status, body) = post_json(
        &t.app,
        "/waiting-list/",
        json!({"username": "John", "phone_number": "254712345678"}),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "Phone number already in waiting list");
    assert_eq!(t.transport.call_count(), 0);
    assert_eq!(t.db.count_waiting_list().await.unwrap(), 1);
}

#[tokio::test]
async fn invalid_signup_is_unprocessable() {
    let t = test_app(gateway_ok()).await;

    let (status, body) = post_json(
        &t.app,
        "/waiting-list/",
        json!({"username": "Jane", "phone_number": "12345"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("phone number"));

    let (status, _) = post_json(
        &t.app,
        "/waiting-list/",
        json!({"username": "J", "phone_number": "0712345678"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    assert_eq!(t.transport.call_count(), 0);
    assert_eq!(t.db.count_waiting_list().await.unwrap(), 0);
}

#[tokio::test]
async fn non_ascii_digits_are_rejected_at_signup() {
    let t = test_app(gateway_ok()).await;

    for phone_number in ["0٧١٢٣٤٥٦٧٨", "0٩٩٩٩٩٩٩٩٩"] {
        let (status, body) = post_json(
            &t.app,
            "/waiting-list/",
            json!({"username": "Jane", "phone_number": phone_number}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("phone number"));
    }

    assert_eq!(t.transport.call_count(), 0);
    assert_eq!(t.db.count_waiting_list().await.unwrap(), 0);
    assert!(t.db.find_waiting_list_by_phone("+254").await.unwrap().is_none());
}

#[tokio::test]
async fn signup_with_missing_field_gets_detail() {
    let t = test_app(gateway_ok()).await;

    let (status, body) = post_json(&t.app, "/waiting-list/", json!({"username": "Jane"})).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("phone_number"));
    assert_eq!(t.db.count_waiting_list().await.unwrap(), 0);
}

#[tokio::test]
async fn failed_welcome_still_adds_entry() {
    let t = test_app_with_keys(gateway_ok(), None, None).await;

    let (status, body) = post_json(
        &t.app,
        "/waiting-list/",
        json!({"username": "Jane", "phone_number": "+254712345678"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["whatsapp_sent"], false);
    assert_eq!(t.transport.call_count(), 0);
    assert_eq!(t.db.count_waiting_list().await.unwrap(), 1);
}

// ============================================================================
// WhatsApp
// ============================================================================

#[tokio::test]
async fn send_text_records_message_on_success() {
    let t = test_app(gateway_ok()).await;

    let (status, body) = post_json(
        &t.app,
        "/whatsapp/send-text",
        json!({"phone_number": "0712345678", "message": "Habari"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["messages"][0]["id"], "wamid.ABC");

    let history = t.db.messages_for_phone("+254712345678").await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].message_content, "Habari");
    assert_eq!(history[0].message_type, "text");
    assert_eq!(history[0].external_message_id.as_deref(), Some("wamid.ABC"));
}

#[tokio::test]
async fn send_text_failure_is_not_recorded() {
    let t = test_app(MockTransport::text(500, "gateway down")).await;

    let (status, body) = post_json(
        &t.app,
        "/whatsapp/send-text",
        json!({"phone_number": "0712345678", "message": "Habari"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("500"));
    assert!(
        t.db.messages_for_phone("+254712345678")
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn send_text_with_missing_field_gets_detail() {
    let t = test_app(gateway_ok()).await;

    let (status, body) = post_json(
        &t.app,
        "/whatsapp/send-text",
        json!({"phone_number": "0712345678"}),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].as_str().unwrap().contains("message"));
    assert_eq!(t.transport.call_count(), 0);
}

#[tokio::test]
async fn mistyped_field_gets_detail() {
    let t = test_app(gateway_ok()).await;

    let (status, body) = post_json(
        &t.app,
        "/whatsapp/send-media",
        json!({"phone_number": "0712345678", "media_url": 42, "media_type": "image"}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    let (status, body) = post_json(&t.app, "/gemini", json!({"prompt": ["a", "b"]})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["detail"].is_string());

    assert_eq!(t.transport.call_count(), 0);
}

#[tokio::test]
async fn send_template_records_template_name() {
    let t = test_app(gateway_ok()).await;

    let (status, body) = post_json(
        &t.app,
        "/whatsapp/send-template",
        json!({"phone_number": "+254712345678", "template_name": "launch"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let payload = t.transport.last_request().unwrap().body.unwrap();
    assert_eq!(payload["parameters"], json!([]));

    let history = t.db.messages_for_phone("+254712345678").await.unwrap();
    assert_eq!(history[0].message_content, "Template: launch");
    assert_eq!(history[0].message_type, "template");
}

#[tokio::test]
async fn send_media_records_url_and_type() {
    let t = test_app(gateway_ok()).await;

    let (status, _) = post_json(
        &t.app,
        "/whatsapp/send-media",
        json!({
            "phone_number": "0712345678",
            "media_url": "https://cdn.test/poster.png",
            "media_type": "image",
            "caption": "Launch day"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let history = t.db.messages_for_phone("+254712345678").await.unwrap();
    assert_eq!(history[0].message_content, "https://cdn.test/poster.png");
    assert_eq!(history[0].message_type, "image");
}

#[tokio::test]
async fn send_without_api_key_makes_no_call() {
    let t = test_app_with_keys(gateway_ok(), None, Some("gemini-key")).await;

    let (status, body) = post_json(
        &t.app,
        "/whatsapp/send-text",
        json!({"phone_number": "0712345678", "message": "hi"}),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], false);
    assert!(
        body["error"]
            .as_str()
            .unwrap()
            .contains("API key not configured")
    );
    assert_eq!(t.transport.call_count(), 0);
}

#[tokio::test]
async fn message_history_is_newest_first() {
    let t = test_app(gateway_ok()).await;
    for message in ["first", "second"] {
        post_json(
            &t.app,
            "/whatsapp/send-text",
            json!({"phone_number": "0712345678", "message": message}),
        )
        .await;
    }

    let (status, body) = get(&t.app, "/whatsapp/messages/0712345678").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["messages"][0]["message_content"], "second");
    assert_eq!(body["messages"][1]["message_content"], "first");
    assert_eq!(body["messages"][0]["status"], "sent");
}

#[tokio::test]
async fn message_history_for_unknown_phone_is_empty() {
    let t = test_app(gateway_ok()).await;

    let (status, body) = get(&t.app, "/whatsapp/messages/0799999999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"count": 0, "messages": []}));
}

// ============================================================================
// Gemini
// ============================================================================

#[tokio::test]
async fn gemini_returns_reply_text() {
    let transport = MockTransport::json(
        200,
        json!({"candidates": [{"content": {"parts": [{"text": "Jambo!"}]}}]}),
    );
    let t = test_app(transport).await;

    let (status, body) = post_json(&t.app, "/gemini", json!({"prompt": "Greet me"})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"response": "Jambo!"}));
}

#[tokio::test]
async fn gemini_missing_reply_path_is_server_error() {
    let t = test_app(MockTransport::json(200, json!({"candidates": []}))).await;

    let (status, _) = post_json(&t.app, "/gemini", json!({"prompt": "Greet me"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn gemini_transport_failure_is_server_error() {
    let t = test_app(MockTransport::failing(TransportError::Timeout)).await;

    let (status, body) = post_json(&t.app, "/gemini", json!({"prompt": "Greet me"})).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("timed out"));
}
