//! Waiting list rows.

use serde::Serialize;
use tracing::trace;

use super::{Database, StoreResult, map_unique_violation};

/// Row type returned by SQLite queries for the waiting list.
type WaitingListRow = (i64, String, String);

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WaitingListEntry {
    pub id: i64,
    pub username: String,
    /// Canonical phone number.
    pub phone_number: String,
}

impl From<WaitingListRow> for WaitingListEntry {
    fn from((id, username, phone_number): WaitingListRow) -> Self {
        Self {
            id,
            username,
            phone_number,
        }
    }
}

impl Database {
    pub async fn find_waiting_list_by_phone(
        &self,
        phone_number: &str,
    ) -> StoreResult<Option<WaitingListEntry>> {
        let row: Option<WaitingListRow> = sqlx::query_as(
            "SELECT id, username, phone_number FROM waiting_list WHERE phone_number = ?1",
        )
        .bind(phone_number)
        .fetch_optional(self.pool())
        .await?;
        Ok(row.map(WaitingListEntry::from))
    }

    /// Insert an entry.
    ///
    /// # Errors
    ///
    /// Returns [`super::StoreError::Duplicate`] if the phone number is taken.
    pub async fn insert_waiting_list(
        &self,
        username: &str,
        phone_number: &str,
    ) -> StoreResult<WaitingListEntry> {
        let result = sqlx::query("INSERT INTO waiting_list (username, phone_number) VALUES (?1, ?2)")
            .bind(username)
            .bind(phone_number)
            .execute(self.pool())
            .await
            .map_err(map_unique_violation)?;

        let id = result.last_insert_rowid();
        trace!(entry_id = id, "waiting list entry created");
        Ok(WaitingListEntry {
            id,
            username: username.to_string(),
            phone_number: phone_number.to_string(),
        })
    }

    #[cfg(any(test, feature = "test-support"))]
    pub async fn count_waiting_list(&self) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM waiting_list")
            .fetch_one(self.pool())
            .await?;
        Ok(count)
    }
}
