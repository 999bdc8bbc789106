//! Outbound message variants and their provider payloads.

use serde::Serialize;
use serde_json::Value;

use crate::phone;

/// A message to send through the gateway.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundMessage {
    Text {
        to: String,
        body: String,
    },
    Template {
        to: String,
        template_name: String,
        parameters: Vec<Value>,
    },
    Media {
        to: String,
        media_url: String,
        /// image, document, video or audio; sent verbatim as the type marker
        media_type: String,
        caption: Option<String>,
    },
}

impl OutboundMessage {
    pub fn recipient(&self) -> &str {
        match self {
            OutboundMessage::Text { to, .. }
            | OutboundMessage::Template { to, .. }
            | OutboundMessage::Media { to, .. } => to,
        }
    }

    /// Type marker the gateway expects in `message_type`.
    pub fn message_type(&self) -> &str {
        match self {
            OutboundMessage::Text { .. } => "text",
            OutboundMessage::Template { .. } => "template",
            OutboundMessage::Media { media_type, .. } => media_type,
        }
    }

    pub(crate) fn to_payload<'a>(
        &'a self,
        api_key: &'a str,
        sender_id: Option<&'a str>,
    ) -> ProviderPayload<'a> {
        let content = match self {
            OutboundMessage::Text { body, .. } => PayloadContent::Text { message: body },
            OutboundMessage::Template {
                template_name,
                parameters,
                ..
            } => PayloadContent::Template {
                template_name,
                parameters,
            },
            OutboundMessage::Media {
                media_url, caption, ..
            } => PayloadContent::Media {
                media_url,
                caption: caption.as_deref(),
            },
        };

        ProviderPayload {
            api_key,
            sender_id,
            to: phone::normalize(self.recipient()),
            message_type: self.message_type(),
            content,
        }
    }
}

// --- Provider wire format ---

#[derive(Serialize)]
pub(crate) struct ProviderPayload<'a> {
    api_key: &'a str,
    sender_id: Option<&'a str>,
    to: String,
    message_type: &'a str,
    #[serde(flatten)]
    content: PayloadContent<'a>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum PayloadContent<'a> {
    Text {
        message: &'a str,
    },
    Template {
        template_name: &'a str,
        parameters: &'a [Value],
    },
    Media {
        media_url: &'a str,
        caption: Option<&'a str>,
    },
}
