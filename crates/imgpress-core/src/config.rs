//! Configuration module
//!
//! This module provides the immutable process configuration, loaded once from the
//! environment at startup and passed to component constructors.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

const SERVER_PORT: u16 = 5001;
const STORAGE_DIR: &str = "uploads";
const MAX_FILE_SIZE_MB: usize = 10;
const ENCODE_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub environment: String,
    /// Directory holding compressed outputs and retained originals.
    pub storage_dir: PathBuf,
    /// Public origin used to build response URLs (e.g. `https://img.example.com`).
    /// When unset, the request's `Host` header is used.
    pub public_base_url: Option<String>,
    pub max_file_size_bytes: usize,
    /// Upper bound on a single encode. 0 disables the bound.
    pub encode_timeout_secs: u64,
    /// Keep the original upload under its own name when re-encoding does not shrink it,
    /// so the URL reported for a rejected compression resolves.
    pub retain_rejected_originals: bool,
    pub retention_sweep_enabled: bool,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_file_size_mb = env::var("MAX_FILE_SIZE_MB")
            .unwrap_or_else(|_| MAX_FILE_SIZE_MB.to_string())
            .parse::<usize>()
            .unwrap_or(MAX_FILE_SIZE_MB);

        let config = Config {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            environment,
            storage_dir: env::var("STORAGE_DIR")
                .unwrap_or_else(|_| STORAGE_DIR.to_string())
                .into(),
            public_base_url: env::var("PUBLIC_BASE_URL")
                .ok()
                .map(|s| s.trim().trim_end_matches('/').to_string())
                .filter(|s| !s.is_empty()),
            max_file_size_bytes: max_file_size_mb * 1024 * 1024,
            encode_timeout_secs: env::var("ENCODE_TIMEOUT_SECS")
                .unwrap_or_else(|_| ENCODE_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(ENCODE_TIMEOUT_SECS),
            retain_rejected_originals: parse_bool_env("RETAIN_REJECTED_ORIGINALS", true),
            retention_sweep_enabled: parse_bool_env("RETENTION_SWEEP_ENABLED", true),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.storage_dir.as_os_str().is_empty() {
            return Err(anyhow::anyhow!("STORAGE_DIR must not be empty"));
        }

        if self.max_file_size_bytes == 0 {
            return Err(anyhow::anyhow!("MAX_FILE_SIZE_MB must be greater than 0"));
        }

        if self.is_production() && self.cors_origins.iter().any(|o| o == "*") {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        if let Some(ref url) = self.public_base_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow::anyhow!(
                    "PUBLIC_BASE_URL must start with http:// or https://"
                ));
            }
        }

        Ok(())
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn encode_timeout(&self) -> Option<Duration> {
        (self.encode_timeout_secs > 0).then(|| Duration::from_secs(self.encode_timeout_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: SERVER_PORT,
            cors_origins: vec!["*".to_string()],
            environment: "development".to_string(),
            storage_dir: PathBuf::from(STORAGE_DIR),
            public_base_url: None,
            max_file_size_bytes: MAX_FILE_SIZE_MB * 1024 * 1024,
            encode_timeout_secs: ENCODE_TIMEOUT_SECS,
            retain_rejected_originals: true,
            retention_sweep_enabled: true,
        }
    }
}

fn parse_bool_env(key: &str, default: bool) -> bool {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().to_lowercase().parse().ok())
        .unwrap_or(default)
}
