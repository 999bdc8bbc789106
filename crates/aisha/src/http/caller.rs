//! Generic HTTP caller returning [`Envelope`]s.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::Method;
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use super::envelope::Envelope;
use super::transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

/// Timeout applied when a call does not specify one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Description of a single outbound call.
#[derive(Debug, Clone)]
pub struct ApiCall {
    method: Method,
    url: String,
    headers: BTreeMap<String, String>,
    body: Option<Value>,
    timeout: Option<Duration>,
}

impl ApiCall {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: BTreeMap::new(),
            body: None,
            timeout: None,
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Attach a body, sent as JSON.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Issues [`ApiCall`]s through an [`HttpTransport`].
///
/// Stateless apart from the transport handle, so clones are cheap and can be
/// shared freely between requests.
#[derive(Clone)]
pub struct HttpCaller {
    transport: Arc<dyn HttpTransport>,
}

impl HttpCaller {
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        Self { transport }
    }

    /// Caller backed by a real `reqwest` client.
    pub fn with_reqwest() -> Self {
        Self::new(Arc::new(ReqwestTransport::new()))
    }

    /// Perform the call. Never fails: every outcome is folded into the envelope.
    pub async fn call(&self, call: ApiCall) -> Envelope {
        if call.url.trim().is_empty() {
            return Envelope::failure("request url must not be empty");
        }

        let url = match Url::parse(&call.url) {
            Ok(url) => url,
            Err(e) => return Envelope::failure(format!("invalid url '{}': {e}", call.url)),
        };

        let request = HttpRequest {
            method: call.method,
            url,
            headers: call.headers,
            body: call.body,
            timeout: call.timeout.unwrap_or(DEFAULT_TIMEOUT),
        };

        let method = request.method.clone();
        let host = request.url.host_str().unwrap_or_default().to_string();
        debug!(%method, %host, path = request.url.path(), "outbound request");

        match self.transport.execute(request).await {
            Ok(response) => into_envelope(response),
            Err(e) => {
                warn!(%method, %host, error = %e, "outbound request failed");
                Envelope::failure(e.to_string())
            }
        }
    }
}

fn into_envelope(response: HttpResponse) -> Envelope {
    if response.status.is_success() {
        return Envelope::Success(parse_body(&response.body));
    }

    let code = response.status.as_u16();
    let text = String::from_utf8_lossy(&response.body);
    let detail = match text.trim() {
        "" => response
            .status
            .canonical_reason()
            .unwrap_or("no response body")
            .to_string(),
        body => body.to_string(),
    };
    warn!(status = code, "upstream returned non-success status");
    Envelope::failure(format!("upstream returned status {code}: {detail}"))
}

/// JSON when the body parses, the raw text otherwise, `null` when empty.
fn parse_body(body: &Bytes) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}
