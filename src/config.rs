use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub max_connections: u32,
    /// Upper bound for a single ledger transaction, in milliseconds.
    pub ledger_tx_timeout_ms: u64,
    pub catalog_path: Option<String>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")?;
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "merch-store".into()),
            audience: std::env::var("JWT_AUDIENCE")
                .unwrap_or_else(|_| "merch-store-users".into()),
            ttl_minutes: env_or("JWT_TTL_MINUTES", 60),
        };
        Ok(Self {
            database_url,
            max_connections: env_or("DB_MAX_CONNECTIONS", 10),
            ledger_tx_timeout_ms: env_or("LEDGER_TX_TIMEOUT_MS", 5_000),
            catalog_path: std::env::var("CATALOG_PATH").ok().filter(|p| !p.trim().is_empty()),
            jwt,
        })
    }

    pub fn ledger_tx_timeout(&self) -> Duration {
        Duration::from_millis(self.ledger_tx_timeout_ms)
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    parse_or(std::env::var(key).ok().as_deref(), default)
}

fn parse_or<T: FromStr>(raw: Option<&str>, default: T) -> T {
    raw.and_then(|v| v.trim().parse::<T>().ok()).unwrap_or(default)
}
