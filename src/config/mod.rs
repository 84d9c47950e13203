use std::env;
use std::str::FromStr;

pub mod cors;
pub mod security;

pub use cors::{create_cors_layer, DEFAULT_ALLOWED_ORIGINS};
pub use security::create_security_headers_layer;

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/league_portal";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3001";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    pub max_connections: u32,
    pub admin_username: String,
    pub admin_password: String,
    pub session_ttl_hours: i64,
    /// Read notifications stay listed for this many hours after creation.
    pub notification_recent_hours: i64,
    pub notification_page_size: i64,
    /// Upper bound on concurrent slug updates during a backfill.
    pub backfill_concurrency: usize,
    /// Comma-separated list of origins allowed to call the API.
    pub cors_allowed_origins: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_connections: 5,
            admin_username: DEFAULT_ADMIN_USERNAME.to_string(),
            admin_password: DEFAULT_ADMIN_PASSWORD.to_string(),
            session_ttl_hours: 12,
            notification_recent_hours: 24,
            notification_page_size: 10,
            backfill_concurrency: 8,
            cors_allowed_origins: DEFAULT_ALLOWED_ORIGINS.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            bind_addr: env::var("BIND_ADDR").unwrap_or(defaults.bind_addr),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS", defaults.max_connections),
            admin_username: env::var("ADMIN_USERNAME").unwrap_or(defaults.admin_username),
            admin_password: env::var("ADMIN_PASSWORD").unwrap_or(defaults.admin_password),
            session_ttl_hours: parse_var("SESSION_TTL_HOURS", defaults.session_ttl_hours),
            notification_recent_hours: parse_var(
                "NOTIFICATION_RECENT_HOURS",
                defaults.notification_recent_hours,
            ),
            notification_page_size: parse_var(
                "NOTIFICATION_PAGE_SIZE",
                defaults.notification_page_size,
            ),
            backfill_concurrency: parse_var("BACKFILL_CONCURRENCY", defaults.backfill_concurrency)
                .max(1),
            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
        };

        if config.admin_password == DEFAULT_ADMIN_PASSWORD {
            tracing::warn!("ADMIN_PASSWORD not set, using the default admin password");
        }

        tracing::info!(
            bind_addr = %config.bind_addr,
            max_connections = config.max_connections,
            notification_recent_hours = config.notification_recent_hours,
            notification_page_size = config.notification_page_size,
            backfill_concurrency = config.backfill_concurrency,
            "configuration loaded"
        );

        config
    }
}

fn parse_var<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                tracing::warn!("Config: invalid value '{}' for {}, using default", raw, key);
                default
            }
        },
        Err(_) => default,
    }
}
