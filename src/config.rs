/*
 * Responsibility
 * - 環境変数や設定の読み込み (CLIENT_ID, DATABASE_URL, ALLOWED_ORIGINS など)
 * - 設定値のバリデーション (不足なら起動失敗)
 */
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5371";
const DEFAULT_GOOGLE_CERTS_URL: &str = "https://www.googleapis.com/oauth2/v3/certs";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing configuration: {0}")]
    Missing(&'static str),
    #[error("invalid configuration: {0}")]
    Invalid(&'static str),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    // Expected `aud` of incoming ID tokens (the OAuth client id).
    pub client_id: String,
    pub google_certs_url: Url,
    pub token_leeway: Duration,

    pub database_url: String,
    pub database_max_connections: u32,

    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 3001,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let client_id = std::env::var("CLIENT_ID")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .ok_or(ConfigError::Missing("CLIENT_ID"))?;

        let google_certs_url = std::env::var("GOOGLE_CERTS_URL")
            .unwrap_or_else(|_| DEFAULT_GOOGLE_CERTS_URL.to_string());
        let google_certs_url =
            Url::parse(&google_certs_url).map_err(|_| ConfigError::Invalid("GOOGLE_CERTS_URL"))?;

        let token_leeway = std::env::var("TOKEN_LEEWAY_SECONDS")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(300));

        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;

        let database_max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
            .ok()
            .and_then(|v| v.parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(5);

        let allowed_origins = parse_origins(std::env::var("ALLOWED_ORIGINS").ok().as_deref());

        Ok(Self {
            addr,
            app_env,
            client_id,
            google_certs_url,
            token_leeway,
            database_url,
            database_max_connections,
            allowed_origins,
        })
    }
}

// Comma-separated allowlist; unset falls back to the local frontend dev server.
fn parse_origins(raw: Option<&str>) -> Vec<String> {
    match raw {
        Some(raw) => raw
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        None => vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
    }
}
