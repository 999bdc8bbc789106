//! WhatsApp message log.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Database, StoreError, StoreResult};

/// Row type returned by SQLite queries for messages.
type MessageRow = (
    i64,
    String,
    String,
    String,
    String,
    Option<String>,
    DateTime<Utc>,
    Option<String>,
);

/// Delivery status of a logged message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageStatus {
    #[default]
    Pending,
    Sent,
    Delivered,
    Failed,
}

impl MessageStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            MessageStatus::Pending => "pending",
            MessageStatus::Sent => "sent",
            MessageStatus::Delivered => "delivered",
            MessageStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MessageStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(MessageStatus::Pending),
            "sent" => Ok(MessageStatus::Sent),
            "delivered" => Ok(MessageStatus::Delivered),
            "failed" => Ok(MessageStatus::Failed),
            other => Err(format!("unknown message status: {other}")),
        }
    }
}

/// A logged message.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MessageRecord {
    pub id: i64,
    pub phone_number: String,
    pub message_content: String,
    pub message_type: String,
    pub status: MessageStatus,
    pub external_message_id: Option<String>,
    pub sent_at: DateTime<Utc>,
    pub error_message: Option<String>,
}

impl TryFrom<MessageRow> for MessageRecord {
    type Error = StoreError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let (id, phone_number, message_content, message_type, status, external_id, sent_at, error) =
            row;
        let status = status
            .parse::<MessageStatus>()
            .map_err(|e| StoreError::Corrupt(format!("message {id}: {e}")))?;
        Ok(Self {
            id,
            phone_number,
            message_content,
            message_type,
            status,
            external_message_id: external_id,
            sent_at,
            error_message: error,
        })
    }
}

/// A message to log. `sent_at` is stamped on insert.
#[derive(Debug, Clone)]
pub struct NewMessage {
    pub phone_number: String,
    pub message_content: String,
    pub message_type: String,
    pub status: MessageStatus,
    pub external_message_id: Option<String>,
    pub error_message: Option<String>,
}

impl Database {
    pub async fn insert_message(&self, message: &NewMessage) -> StoreResult<MessageRecord> {
        let sent_at = Utc::now();
        let result = sqlx::query(
            "INSERT INTO whatsapp_messages \
             (phone_number, message_content, message_type, status, external_message_id, sent_at, error_message) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&message.phone_number)
        .bind(&message.message_content)
        .bind(&message.message_type)
        .bind(message.status.as_str())
        .bind(&message.external_message_id)
        .bind(sent_at)
        .bind(&message.error_message)
        .execute(self.pool())
        .await?;

        let id = result.last_insert_rowid();
        trace!(message_id = id, message_type = %message.message_type, "message logged");
        Ok(MessageRecord {
            id,
            phone_number: message.phone_number.clone(),
            message_content: message.message_content.clone(),
            message_type: message.message_type.clone(),
            status: message.status,
            external_message_id: message.external_message_id.clone(),
            sent_at,
            error_message: message.error_message.clone(),
        })
    }

    /// Messages for `phone_number`, newest first.
    pub async fn messages_for_phone(&self, phone_number: &str) -> StoreResult<Vec<MessageRecord>> {
        let rows: Vec<MessageRow> = sqlx::query_as(
            "SELECT id, phone_number, message_content, message_type, status, \
             external_message_id, sent_at, error_message \
             FROM whatsapp_messages WHERE phone_number = ?1 \
             ORDER BY sent_at DESC, id DESC",
        )
        .bind(phone_number)
        .fetch_all(self.pool())
        .await?;
        rows.into_iter().map(MessageRecord::try_from).collect()
    }
}
