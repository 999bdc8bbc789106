//! Test utilities shared by unit tests (in `src/`) and integration tests (in
//! `tests/`). Only compiled for tests or with the `test-support` feature.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use serde_json::Value;

use crate::http::{HttpRequest, HttpResponse, HttpTransport, StatusCode, TransportError};
use crate::store::Database;

/// Transport that replays one scripted reply and records every request.
pub struct MockTransport {
    reply: Result<HttpResponse, TransportError>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new(reply: Result<HttpResponse, TransportError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Reply with `status` and a JSON body.
    pub fn json(status: u16, body: Value) -> Arc<Self> {
        Self::text(status, &body.to_string())
    }

    /// Reply with `status` and a raw text body.
    pub fn text(status: u16, body: &str) -> Arc<Self> {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Self::new(Ok(HttpResponse {
            status,
            body: Bytes::from(body.to_string()),
        }))
    }

    /// Fail every request with `error`.
    pub fn failing(error: TransportError) -> Arc<Self> {
        Self::new(Err(error))
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn last_request(&self) -> Option<HttpRequest> {
        self.requests().pop()
    }

    pub fn call_count(&self) -> usize {
        self.requests().len()
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(request);
        self.reply.clone()
    }
}

/// Fresh in-memory database with the schema applied.
///
/// # Panics
///
/// Panics if SQLite cannot open an in-memory database.
pub async fn memory_database() -> Database {
    let db = Database::connect_in_memory()
        .await
        .expect("in-memory sqlite should open");
    db.migrate().await.expect("schema should apply");
    db
}
