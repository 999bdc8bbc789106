//! Ngumzo gateway client.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::payload::OutboundMessage;
use crate::config::GatewayConfig;
use crate::http::{ApiCall, Envelope, HttpCaller};

/// Error returned when no gateway API key is configured.
pub const API_KEY_MISSING: &str = "gateway API key not configured (set NGUMZO_API_KEY)";

/// Timeout for every gateway request.
pub const SEND_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends WhatsApp messages through the gateway.
///
/// All operations return an [`Envelope`]; nothing here fails or panics.
#[derive(Clone)]
pub struct GatewayClient {
    caller: HttpCaller,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(caller: HttpCaller, config: GatewayConfig) -> Self {
        Self { caller, config }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key().is_some()
    }

    pub async fn send_text(&self, phone: &str, message: &str) -> Envelope {
        self.send(&OutboundMessage::Text {
            to: phone.to_string(),
            body: message.to_string(),
        })
        .await
    }

    /// Send a template message. `None` parameters are sent as an empty list.
    pub async fn send_template(
        &self,
        phone: &str,
        template_name: &str,
        parameters: Option<Vec<Value>>,
    ) -> Envelope {
        self.send(&OutboundMessage::Template {
            to: phone.to_string(),
            template_name: template_name.to_string(),
            parameters: parameters.unwrap_or_default(),
        })
        .await
    }

    pub async fn send_media(
        &self,
        phone: &str,
        media_url: &str,
        media_type: &str,
        caption: Option<&str>,
    ) -> Envelope {
        self.send(&OutboundMessage::Media {
            to: phone.to_string(),
            media_url: media_url.to_string(),
            media_type: media_type.to_string(),
            caption: caption.map(str::to_string),
        })
        .await
    }

    pub async fn send(&self, message: &OutboundMessage) -> Envelope {
        let Some(api_key) = self.api_key() else {
            warn!(
                message_type = message.message_type(),
                "gateway API key not configured, message not sent"
            );
            return Envelope::failure(API_KEY_MISSING);
        };

        let payload = message.to_payload(api_key, self.config.sender_id.as_deref());
        let body = match serde_json::to_value(&payload) {
            Ok(body) => body,
            Err(e) => return Envelope::failure(format!("failed to build gateway payload: {e}")),
        };

        debug!(
            to = body["to"].as_str().unwrap_or_default(),
            message_type = message.message_type(),
            "sending whatsapp message"
        );

        let envelope = self
            .caller
            .call(
                ApiCall::post(self.endpoint())
                    .header("Content-Type", "application/json")
                    .json(body)
                    .timeout(SEND_TIMEOUT),
            )
            .await;

        if let Some(error) = envelope.error() {
            warn!(message_type = message.message_type(), %error, "gateway send failed");
        }
        envelope
    }

    fn api_key(&self) -> Option<&str> {
        self.config
            .api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
    }

    fn endpoint(&self) -> String {
        format!("{}/send-message", self.config.base_url.trim_end_matches('/'))
    }
}

/// Gateway message id from a successful send, at `messages[0].id`.
pub fn external_message_id(data: &Value) -> Option<String> {
    data.pointer("/messages/0/id")
        .and_then(Value::as_str)
        .map(str::to_string)
}
