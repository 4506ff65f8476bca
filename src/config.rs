//! Runtime configuration loaded from environment variables.
//!
//! Every knob has a sane default so the binary runs out of the box; defaults
//! that are unsafe for production (the token secret) are logged loudly.

use std::env;
use std::path::PathBuf;

use tracing::{info, warn};

/// Default signing secret. Only acceptable for local development.
const DEFAULT_SECRET: &str = "change-me-in-production";

#[derive(Debug, Clone)]
pub struct Config {
    /// Port the API binds to.
    pub port: u16,
    /// Base URL of the Vitibrasil report site.
    pub base_url: String,
    /// Upstream request timeout in seconds.
    pub timeout_secs: u64,
    /// SQLite database path. `None` disables the cache and the user store
    /// falls back to the default location under the home directory.
    pub db_path: Option<PathBuf>,
    /// Secret used to sign access tokens.
    pub secret_key: String,
    /// Access token lifetime in seconds.
    pub token_ttl_secs: i64,
    /// Comma-separated list of allowed CORS origins.
    pub allowed_origins: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        let secret_key =
            env::var("VITIBRASIL_SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET.to_string());
        if secret_key == DEFAULT_SECRET {
            warn!("VITIBRASIL_SECRET_KEY is using the built-in default; set a real secret in production");
        }

        let db_path = env::var("VITIBRASIL_DB").map(PathBuf::from).ok();
        match &db_path {
            Some(p) => info!("cache database: {}", p.display()),
            None => info!("VITIBRASIL_DB not set, response caching disabled"),
        }

        Self {
            port: parse_or("VITIBRASIL_PORT", 8000),
            base_url: env::var("VITIBRASIL_BASE_URL")
                .unwrap_or_else(|_| "http://vitibrasil.cnpuv.embrapa.br".to_string()),
            timeout_secs: parse_or("VITIBRASIL_TIMEOUT_SECS", 15),
            db_path,
            secret_key,
            token_ttl_secs: parse_or("VITIBRASIL_TOKEN_TTL_SECS", 60 * 60 * 24),
            allowed_origins: env::var("VITIBRASIL_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "http://localhost,http://127.0.0.1".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        }
    }

    /// Full URL of the upstream report endpoint.
    pub fn index_url(&self) -> String {
        format!("{}/index.php", self.base_url.trim_end_matches('/'))
    }

    /// Where the user store lives when no cache database is configured.
    pub fn default_db_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("/tmp"))
            .join(".vitibrasil")
            .join("vitibrasil.db")
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => match raw.parse() {
            Ok(v) => v,
            Err(e) => {
                warn!("invalid {key} value {raw:?}: {e}; using default");
                default
            }
        },
        Err(_) => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_url_strips_trailing_slash() {
        let mut cfg = Config::from_env();
        cfg.base_url = "http://example.com/".to_string();
        assert_eq!(cfg.index_url(), "http://example.com/index.php");
    }
}
