//! Booking server configuration

use std::time::Duration;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:5500,http://localhost:5173";

/// Booking server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Environment: development | staging | production
    pub environment: String,
    /// HTTP port
    pub http_port: u16,
    /// PostgreSQL connection URL; `None` selects the in-memory store (development only)
    pub database_url: Option<String>,
    /// Maximum pooled connections
    pub db_max_connections: u32,
    /// How long to wait for a pooled connection
    pub db_acquire_timeout: Duration,
    /// Browser origins allowed by CORS
    pub cors_origins: Vec<String>,
    /// Seed demo listings and promo codes at boot
    pub seed_demo_data: bool,
    /// Directory for the daily rolling log file
    pub log_dir: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".into(),
            http_port: 3001,
            database_url: None,
            db_max_connections: 5,
            db_acquire_timeout: Duration::from_millis(30_000),
            cors_origins: parse_list(DEFAULT_CORS_ORIGINS),
            seed_demo_data: false,
            log_dir: None,
        }
    }
}

impl Config {
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let config = Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            http_port: env_parse("HTTP_PORT").unwrap_or(3001),
            database_url: std::env::var("DATABASE_URL").ok().filter(|s| !s.is_empty()),
            db_max_connections: env_parse("DB_MAX_CONNECTIONS").unwrap_or(5),
            db_acquire_timeout: Duration::from_millis(
                env_parse("DB_ACQUIRE_TIMEOUT_MS").unwrap_or(30_000),
            ),
            cors_origins: parse_list(
                &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| DEFAULT_CORS_ORIGINS.into()),
            ),
            seed_demo_data: std::env::var("SEED_DEMO_DATA")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
        };
        config.check()?;
        Ok(config)
    }

    /// Outside development a database is mandatory
    fn check(&self) -> Result<(), BoxError> {
        if self.database_url.is_none() && !self.is_development() {
            return Err(format!(
                "DATABASE_URL must be set in {} environment",
                self.environment
            )
            .into());
        }
        Ok(())
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
