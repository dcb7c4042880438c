use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::Context;

const DEFAULT_MAX_UPLOAD_BYTES: usize = 5 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    /// Raw JWT secret. Authentication is disabled when unset.
    pub jwt_secret: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = std::env::var("CATALOG_LISTEN_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
            .parse()
            .context("Invalid CATALOG_LISTEN_ADDR")?;
        let db_path =
            std::env::var("CATALOG_DB_PATH").unwrap_or_else(|_| "./db/catalog.db".into());
        let cors_allow = std::env::var("CATALOG_CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = std::env::var("CATALOG_REQUEST_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30000);
        let upload_dir = std::env::var("CATALOG_UPLOAD_DIR")
            .unwrap_or_else(|_| "./uploads/images".into())
            .into();
        let max_upload_bytes = std::env::var("CATALOG_MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);
        let jwt_secret = std::env::var("CATALOG_JWT_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        Ok(Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            upload_dir,
            max_upload_bytes,
            jwt_secret,
        })
    }
}
