use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::{info, warn};

use aisha::config::Config;
use aisha::gateway::GatewayClient;
use aisha::generative::GenerativeClient;
use aisha::http::HttpCaller;
use aisha::logging;
use aisha::server::{self, AppState};
use aisha::store::Database;

#[derive(Parser)]
#[command(name = "aisha", version, about = "Aisha backend API server")]
struct Cli {
    /// Path to the YAML config file (missing file means defaults)
    #[arg(short, long, default_value = "aisha.yaml")]
    config: PathBuf,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();
    logging::init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .await
        .with_context(|| format!("failed to load config from {}", cli.config.display()))?;
    config.apply_env();
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    let db = Database::connect(&config.database.url, config.database.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database.url))?;
    db.migrate().await.context("failed to apply database schema")?;

    let caller = HttpCaller::with_reqwest();
    let gateway = GatewayClient::new(caller.clone(), config.gateway.clone());
    let key_state = if gateway.is_configured() {
        "SET"
    } else {
        "NOT SET"
    };
    info!(
        base_url = %config.gateway.base_url,
        api_key = key_state,
        sender_id = config.gateway.sender_id.as_deref().unwrap_or_default(),
        "gateway configured"
    );
    if config.generative.api_key.is_none() {
        warn!("GEMINI_API_KEY not set, /gemini requests will fail");
    }

    let state = AppState {
        db,
        gateway,
        generative: GenerativeClient::new(caller, config.generative.clone()),
    };

    let app = server::build_app(state, config.server.request_timeout_seconds);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "failed to listen for shutdown signal");
    }
}
