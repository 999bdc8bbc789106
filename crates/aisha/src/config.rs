use std::fmt;
use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// Config (root)
// ============================================================================

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub generative: GenerativeConfig,
}

impl Config {
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path).await {
            Ok(c) => c,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(ConfigError::Io(e)),
        };
        Ok(serde_saphyr::from_str(&contents)?)
    }

    /// Apply secrets and overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`. Empty values count as unset.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("DATABASE_URL") {
            self.database.url = url;
        }
        if let Some(key) = get("NGUMZO_API_KEY") {
            self.gateway.api_key = Some(key);
        }
        if let Some(url) = get("NGUMZO_API_URL") {
            self.gateway.base_url = url;
        }
        if let Some(sender) = get("NGUMZO_SENDER_ID") {
            self.gateway.sender_id = Some(sender);
        }
        if let Some(key) = get("GEMINI_API_KEY") {
            self.generative.api_key = Some(key);
        }
    }
}

// ============================================================================
// ServerConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_request_timeout() -> u64 {
    90
}

// ============================================================================
// DatabaseConfig
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    "sqlite://aisha.db".to_string()
}

fn default_max_connections() -> u32 {
    5
}

// ============================================================================
// GatewayConfig
// ============================================================================

/// Ngumzo WhatsApp gateway settings.
///
/// The API key is never read from the config file, only from `NGUMZO_API_KEY`.
#[derive(Clone, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_gateway_url")]
    pub base_url: String,
    #[serde(default)]
    pub sender_id: Option<String>,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: default_gateway_url(),
            sender_id: None,
            api_key: None,
        }
    }
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("base_url", &self.base_url)
            .field("sender_id", &self.sender_id)
            .field("api_key", &redacted(&self.api_key))
            .finish()
    }
}

fn default_gateway_url() -> String {
    "https://ngumzo.com/v1".to_string()
}

// ============================================================================
// GenerativeConfig
// ============================================================================

/// Gemini generative-text API settings. The key comes from `GEMINI_API_KEY`.
#[derive(Clone, Deserialize)]
pub struct GenerativeConfig {
    #[serde(default = "default_generative_url")]
    pub base_url: String,
    #[serde(default = "default_generative_model")]
    pub model: String,
    #[serde(default = "default_generative_timeout")]
    pub timeout_seconds: u64,
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for GenerativeConfig {
    fn default() -> Self {
        Self {
            base_url: default_generative_url(),
            model: default_generative_model(),
            timeout_seconds: default_generative_timeout(),
            api_key: None,
        }
    }
}

impl fmt::Debug for GenerativeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GenerativeConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("timeout_seconds", &self.timeout_seconds)
            .field("api_key", &redacted(&self.api_key))
            .finish()
    }
}

fn default_generative_url() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_generative_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_generative_timeout() -> u64 {
    60
}

fn redacted(secret: &Option<String>) -> &'static str {
    if secret.is_some() { "SET" } else { "NOT SET" }
}

// ============================================================================
// ConfigError
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Yaml(#[from] serde_saphyr::Error),
}

// ============================================================================
// Tests
// ============================================================================
