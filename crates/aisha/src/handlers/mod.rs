//! HTTP request handlers.

pub mod gemini;
mod health;
mod json;
mod version;
pub mod waiting_list;
pub mod whatsapp;

pub use health::{livez, readyz, root};
pub use json::ApiJson;
pub use version::version;
