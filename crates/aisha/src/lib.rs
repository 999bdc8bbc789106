//! Aisha - backend API for the waiting list, WhatsApp messaging and Gemini prompts.

pub mod config;
pub mod gateway;
pub mod generative;
pub mod handlers;
pub mod http;
pub mod logging;
pub mod phone;
pub mod response;
pub mod server;
pub mod store;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
