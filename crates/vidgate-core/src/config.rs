//! Configuration module
//!
//! Every knob is environment-driven with a default that matches the shipped
//! deployment: a 100 MB request ceiling, a `downloads` sweep directory, and
//! hourly cleanup with a one-hour retention window.

use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_PORT: u16 = 5000;
const DEFAULT_MAX_REQUEST_SIZE_MB: usize = 100;
const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 3600;
const DEFAULT_RETENTION_SECS: u64 = 3600;

#[derive(Clone, Debug)]
pub struct Config {
    server_port: u16,
    cors_origins: Vec<String>,
    max_request_size_bytes: usize,
    download_dir: PathBuf,
    cleanup_interval: Duration,
    retention_window: Duration,
    ytdlp_path: String,
    frontend_dir: Option<PathBuf>,
    environment: String,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        let cors_origins = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let max_request_size_mb = env::var("MAX_REQUEST_SIZE_MB")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(DEFAULT_MAX_REQUEST_SIZE_MB);

        let config = Self {
            server_port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            cors_origins,
            max_request_size_bytes: max_request_size_mb * 1024 * 1024,
            download_dir: env::var("DOWNLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("downloads")),
            cleanup_interval: Duration::from_secs(
                env::var("CLEANUP_INTERVAL_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_CLEANUP_INTERVAL_SECS),
            ),
            retention_window: Duration::from_secs(
                env::var("RETENTION_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(DEFAULT_RETENTION_SECS),
            ),
            ytdlp_path: env::var("YTDLP_PATH").unwrap_or_else(|_| "yt-dlp".to_string()),
            frontend_dir: env::var("FRONTEND_DIR").ok().map(PathBuf::from),
            environment: env::var("ENVIRONMENT")
                .or_else(|_| env::var("APP_ENV"))
                .unwrap_or_else(|_| "development".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.max_request_size_bytes == 0 {
            anyhow::bail!("MAX_REQUEST_SIZE_MB must be greater than zero");
        }
        if self.cleanup_interval.is_zero() {
            anyhow::bail!("CLEANUP_INTERVAL_SECS must be greater than zero");
        }
        if self.ytdlp_path.trim().is_empty() {
            anyhow::bail!("YTDLP_PATH must not be empty");
        }
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        let env = self.environment.to_lowercase();
        env == "production" || env == "prod"
    }

    pub fn server_port(&self) -> u16 {
        self.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.cors_origins
    }

    pub fn max_request_size_bytes(&self) -> usize {
        self.max_request_size_bytes
    }

    pub fn download_dir(&self) -> &Path {
        &self.download_dir
    }

    pub fn cleanup_interval(&self) -> Duration {
        self.cleanup_interval
    }

    pub fn retention_window(&self) -> Duration {
        self.retention_window
    }

    pub fn ytdlp_path(&self) -> &str {
        &self.ytdlp_path
    }

    pub fn frontend_dir(&self) -> Option<&Path> {
        self.frontend_dir.as_deref()
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }
}
