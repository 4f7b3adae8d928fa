//! Application configuration loaded from environment variables.
//!
//! Configuration is loaded once at startup and validated before the server starts.
//!
//! ```bash
//! export DATABASE_URL="sqlite://urls.db"
//! export BASE_URL="https://s.example.com"
//! export APP_ENV="production"
//! export URL_DENYLIST="malware.example,phish"
//! ```
//!
//! ## Optional Variables
//!
//! - `DATABASE_URL` - SQLite database (default: `sqlite://urls.db`)
//! - `LISTEN` - Bind address (default: `0.0.0.0:3000`); `PORT` alone sets the port
//! - `BASE_URL` - Public origin for short URLs (default: `http://localhost:<port>`)
//! - `APP_ENV` - `production` or `development` (default: `production`)
//! - `URL_DENYLIST` - Comma-separated hostname substrings to reject
//! - `RUST_LOG` - Log level (default: `info`)
//! - `LOG_FORMAT` - Log format: `text` or `json` (default: `text`)
//! - `CLICK_QUEUE_CAPACITY` - Click event buffer size (default: 10000, min: 100)
//! - `CLICK_WORKER_CONCURRENCY` - Parallel click increments (default: 4)
//! - `STATS_RECENT_LIMIT` - Links listed by `/api/stats` (default: 10)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `DB_CONNECT_TIMEOUT` - Seconds to wait for a pooled connection (default: 30)

use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::utils::url_validator::{Environment, UrlPolicy};

const DEFAULT_DATABASE_URL: &str = "sqlite://urls.db";
const DEFAULT_PORT: &str = "3000";

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub listen_addr: String,
    /// Origin prepended to short codes, without a trailing slash.
    pub base_url: String,
    pub environment: Environment,
    /// Hostname substrings that may not be shortened.
    pub url_denylist: Vec<String>,
    pub log_level: String,
    pub log_format: String,
    pub click_queue_capacity: usize,
    /// Maximum number of click increments processed concurrently by the background worker.
    pub click_worker_concurrency: usize,
    /// Number of links listed in the stats response.
    pub stats_recent_limit: usize,

    // ── Pool settings ───────────────────────────────────────────────────────
    /// Maximum number of connections in the pool (`DB_MAX_CONNECTIONS`, default: 5).
    pub db_max_connections: u32,
    /// Timeout for acquiring a connection from the pool in seconds
    /// (`DB_CONNECT_TIMEOUT`, default: 30).
    pub db_connect_timeout: u64,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable is present but cannot be parsed.
    pub fn from_env() -> Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());

        let listen_addr = Self::load_listen_addr();
        let base_url = Self::load_base_url(&listen_addr);

        let environment = match env::var("APP_ENV") {
            Ok(value) => Environment::from_str(&value)
                .map_err(anyhow::Error::msg)
                .context("Invalid APP_ENV")?,
            Err(_) => Environment::default(),
        };

        let url_denylist = env::var("URL_DENYLIST")
            .map(|v| parse_list(&v))
            .unwrap_or_default();

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

        let click_queue_capacity = parse_var("CLICK_QUEUE_CAPACITY", 10_000)?;
        let click_worker_concurrency = parse_var("CLICK_WORKER_CONCURRENCY", 4)?;
        let stats_recent_limit = parse_var("STATS_RECENT_LIMIT", 10)?;
        let db_max_connections = parse_var("DB_MAX_CONNECTIONS", 5)?;
        let db_connect_timeout = parse_var("DB_CONNECT_TIMEOUT", 30)?;

        Ok(Self {
            database_url,
            listen_addr,
            base_url,
            environment,
            url_denylist,
            log_level,
            log_format,
            click_queue_capacity,
            click_worker_concurrency,
            stats_recent_limit,
            db_max_connections,
            db_connect_timeout,
        })
    }

    /// Loads the bind address.
    ///
    /// Priority:
    /// 1. `LISTEN` environment variable
    /// 2. `0.0.0.0:$PORT`
    /// 3. `0.0.0.0:3000`
    fn load_listen_addr() -> String {
        if let Ok(addr) = env::var("LISTEN") {
            return addr;
        }

        let port = env::var("PORT").unwrap_or_else(|_| DEFAULT_PORT.to_string());
        format!("0.0.0.0:{}", port)
    }

    /// Loads the public origin, defaulting to `http://localhost:<listen port>`.
    fn load_base_url(listen_addr: &str) -> String {
        if let Ok(url) = env::var("BASE_URL") {
            return url.trim_end_matches('/').to_string();
        }

        let port = listen_addr.rsplit(':').next().unwrap_or(DEFAULT_PORT);
        format!("http://localhost:{}", port)
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any value is out of range or has the wrong format.
    pub fn validate(&self) -> Result<()> {
        if self.click_queue_capacity < 100 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY must be at least 100, got {}",
                self.click_queue_capacity
            );
        }

        if self.click_queue_capacity > 1_000_000 {
            anyhow::bail!(
                "CLICK_QUEUE_CAPACITY is too large (max: 1000000), got {}",
                self.click_queue_capacity
            );
        }

        if self.click_worker_concurrency == 0 || self.click_worker_concurrency > 256 {
            anyhow::bail!(
                "CLICK_WORKER_CONCURRENCY must be between 1 and 256, got {}",
                self.click_worker_concurrency
            );
        }

        if self.stats_recent_limit == 0 || self.stats_recent_limit > 1000 {
            anyhow::bail!(
                "STATS_RECENT_LIMIT must be between 1 and 1000, got {}",
                self.stats_recent_limit
            );
        }

        if self.log_format != "text" && self.log_format != "json" {
            anyhow::bail!(
                "LOG_FORMAT must be 'text' or 'json', got '{}'",
                self.log_format
            );
        }

        if !self.listen_addr.contains(':') {
            anyhow::bail!(
                "LISTEN must be in format 'host:port', got '{}'",
                self.listen_addr
            );
        }

        if !self.database_url.starts_with("sqlite:") {
            anyhow::bail!(
                "DATABASE_URL must start with 'sqlite:', got '{}'",
                self.database_url
            );
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            anyhow::bail!(
                "BASE_URL must start with 'http://' or 'https://', got '{}'",
                self.base_url
            );
        }

        if self.db_max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if self.db_connect_timeout == 0 {
            anyhow::bail!("DB_CONNECT_TIMEOUT must be greater than 0");
        }

        Ok(())
    }

    /// Builds the URL admission policy for this deployment.
    pub fn url_policy(&self) -> UrlPolicy {
        UrlPolicy::new(self.environment, &self.url_denylist)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.db_connect_timeout)
    }

    /// Prints configuration summary.
    pub fn print_summary(&self) {
        tracing::info!("Configuration loaded:");
        tracing::info!("  Listen address: {}", self.listen_addr);
        tracing::info!("  Base URL: {}", self.base_url);
        tracing::info!("  Database: {}", self.database_url);
        tracing::info!("  Environment: {:?}", self.environment);
        tracing::info!("  Denylist entries: {}", self.url_denylist.len());
        tracing::info!("  Log level: {}", self.log_level);
        tracing::info!("  Log format: {}", self.log_format);
        tracing::info!("  Click queue capacity: {}", self.click_queue_capacity);
    }
}

/// Splits a comma-separated list, dropping blank entries.
fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Reads and parses an optional variable, falling back to `default` when unset.
fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: '{}'", name, value)),
        Err(_) => Ok(default),
    }
}

/// Loads and validates configuration from environment variables.
///
/// # Errors
///
/// Returns an error if a variable is malformed or validation fails.
///
/// # Note
///
/// This function expects environment variables to be already loaded
/// (e.g., via `dotenvy::dotenv()` in `main.rs`).
pub fn load_from_env() -> Result<Config> {
    let config = Config::from_env()?;
    config.validate()?;
    Ok(config)
}
