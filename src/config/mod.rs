//! Configuration module for the FOD backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::AppError;

/// League slugs used when `FOD_LEAGUES` is not set.
pub const DEFAULT_LEAGUES: &[&str] = &["mlb", "aaa", "aa", "high_a"];

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Accepted secrets for the settings bridge; more than one while rotating
    pub bridge_keys: Vec<String>,
    /// Path to SQLite database file
    pub db_path: PathBuf,
    /// Optional JSON snapshot imported on startup
    pub seed_path: Option<PathBuf>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Base URL the dashboard and roster views call
    pub api_base_url: String,
    /// Allowed CORS origin; any origin when unset
    pub cors_origin: Option<String>,
    /// League slugs expanded into the per-league settings keys
    pub leagues: Vec<String>,
    /// Timeout for view requests against the API
    pub view_timeout: Duration,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit logs as JSON
    pub log_json: bool,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bridge_keys = var("FOD_BRIDGE_KEYS")
            .map(|raw| split_list(&raw))
            .unwrap_or_default();

        let db_path = var("FOD_DB_PATH")
            .unwrap_or_else(|| "./data/fod.sqlite".to_string())
            .into();

        let seed_path = var("FOD_SEED_PATH").map(PathBuf::from);

        let bind_addr: SocketAddr = var("FOD_BIND_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Internal(format!("Invalid FOD_BIND_ADDR format: {}", e)))?;

        let api_base_url = var("FOD_API_BASE_URL")
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| format!("http://{}", bind_addr));

        let cors_origin = var("FOD_CORS_ORIGIN");

        let leagues = var("FOD_LEAGUES")
            .map(|raw| split_list(&raw))
            .filter(|slugs| !slugs.is_empty())
            .unwrap_or_else(|| DEFAULT_LEAGUES.iter().map(|s| s.to_string()).collect());

        let view_timeout = match var("FOD_VIEW_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map(Duration::from_secs).map_err(|e| {
                AppError::Internal(format!("Invalid FOD_VIEW_TIMEOUT_SECS: {}", e))
            })?,
            None => Duration::from_secs(10),
        };

        let log_level = var("FOD_LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_json = var("FOD_LOG_JSON")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        Ok(Self {
            bridge_keys,
            db_path,
            seed_path,
            bind_addr,
            api_base_url,
            cors_origin,
            leagues,
            view_timeout,
            log_level,
            log_json,
        })
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config, AppError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_default_config() {
        let config = config_from(&[]).unwrap();

        assert!(config.bridge_keys.is_empty());
        assert_eq!(config.db_path, PathBuf::from("./data/fod.sqlite"));
        assert!(config.seed_path.is_none());
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8080");
        assert_eq!(config.api_base_url, "http://127.0.0.1:8080");
        assert!(config.cors_origin.is_none());
        assert_eq!(config.leagues, vec!["mlb", "aaa", "aa", "high_a"]);
        assert_eq!(config.view_timeout, Duration::from_secs(10));
        assert_eq!(config.log_level, "info");
        assert!(!config.log_json);
    }

    #[test]
    fn test_key_ring_and_leagues_are_split() {
        let config = config_from(&[
            ("FOD_BRIDGE_KEYS", "current-key, previous-key,,"),
            ("FOD_LEAGUES", "mlb,low_a"),
        ])
        .unwrap();

        assert_eq!(config.bridge_keys, vec!["current-key", "previous-key"]);
        assert_eq!(config.leagues, vec!["mlb", "low_a"]);
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let config = config_from(&[("FOD_API_BASE_URL", "https://api.example.test/")]).unwrap();
        assert_eq!(config.api_base_url, "https://api.example.test");
    }

    #[test]
    fn test_invalid_bind_addr_is_an_error() {
        let err = config_from(&[("FOD_BIND_ADDR", "not-an-address")]).unwrap_err();
        assert!(err.message().contains("FOD_BIND_ADDR"));
    }

    #[test]
    fn test_invalid_timeout_is_an_error() {
        assert!(config_from(&[("FOD_VIEW_TIMEOUT_SECS", "soon")]).is_err());
    }
}
