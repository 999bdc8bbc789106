use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;

use crate::gateway::GatewayClient;
use crate::generative::GenerativeClient;
use crate::handlers;
use crate::store::Database;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub gateway: GatewayClient,
    pub generative: GenerativeClient,
}

pub fn build_app(state: AppState, request_timeout_secs: u64) -> Router {
    let whatsapp = Router::new()
        .route("/send-text", post(handlers::whatsapp::send_text))
        .route("/send-template", post(handlers::whatsapp::send_template))
        .route("/send-media", post(handlers::whatsapp::send_media))
        .route(
            "/messages/{phone_number}",
            get(handlers::whatsapp::message_history),
        );

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::root))
        .route("/livez", get(handlers::livez))
        .route("/readyz", get(handlers::readyz))
        .route("/version", get(handlers::version))
        .route("/waiting-list/", post(handlers::waiting_list::create_entry))
        .nest("/whatsapp", whatsapp)
        .route("/gemini", post(handlers::gemini::generate))
        .with_state(state)
        .layer(cors)
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            Duration::from_secs(request_timeout_secs),
        ))
}
