//! Outbound HTTP calls normalized into a uniform [`Envelope`].
//!
//! Every call to a third-party API goes through [`HttpCaller`]. Whatever goes
//! wrong on the wire (timeouts, refused connections, non-2xx statuses) comes
//! back as [`Envelope::Failure`], so callers have a single failure path.

mod caller;
mod envelope;
mod error;
mod transport;

pub use caller::{ApiCall, DEFAULT_TIMEOUT, HttpCaller};
pub use envelope::Envelope;
pub use error::TransportError;
pub use transport::{HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};

pub use reqwest::{Method, StatusCode};
