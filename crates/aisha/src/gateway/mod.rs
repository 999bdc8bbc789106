//! WhatsApp messaging through the Ngumzo gateway.

mod client;
mod payload;

pub use client::{API_KEY_MISSING, GatewayClient, SEND_TIMEOUT, external_message_id};
pub use payload::OutboundMessage;
