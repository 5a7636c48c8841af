//! Runtime configuration.
//!
//! Values come from the environment, then command-line flags override them.

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const ENV_API_URL: &str = "COMITIA_API_URL";
pub const ENV_CACHE_DIR: &str = "COMITIA_CACHE_DIR";
pub const ENV_HTTP_TIMEOUT: &str = "COMITIA_HTTP_TIMEOUT_SECS";

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Base URL of the election backend, without trailing slash.
    pub api_base_url: String,
    pub cache_dir: PathBuf,
    pub http_timeout: Duration,
    pub offline: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.into(),
            cache_dir: default_cache_dir(),
            http_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            offline: false,
        }
    }
}

impl Config {
    /// Build from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|s| !s.trim().is_empty()) {
            cfg.api_base_url = url.trim().trim_end_matches('/').to_string();
        }
        if let Some(dir) = lookup(ENV_CACHE_DIR).filter(|s| !s.trim().is_empty()) {
            cfg.cache_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup(ENV_HTTP_TIMEOUT) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => cfg.http_timeout = Duration::from_secs(secs),
                _ => warn!(value = %raw, "ignoring invalid {}", ENV_HTTP_TIMEOUT),
            }
        }
        cfg
    }

    pub fn with_api_url(mut self, url: Option<String>) -> Self {
        if let Some(url) = url {
            self.api_base_url = url.trim_end_matches('/').to_string();
        }
        self
    }

    pub fn with_offline(mut self, offline: bool) -> Self {
        self.offline |= offline;
        self
    }
}

fn default_cache_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".comitia")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let cfg = Config::from_lookup(lookup(&[]));
        assert_eq!(cfg.api_base_url, DEFAULT_API_URL);
        assert_eq!(cfg.http_timeout, Duration::from_secs(10));
        assert!(cfg.cache_dir.ends_with(".comitia"));
        assert!(!cfg.offline);
    }

    #[test]
    fn test_env_overrides() {
        let cfg = Config::from_lookup(lookup(&[
            (ENV_API_URL, "http://192.168.18.55:5000/"),
            (ENV_CACHE_DIR, "/tmp/comitia"),
            (ENV_HTTP_TIMEOUT, "3"),
        ]));
        assert_eq!(cfg.api_base_url, "http://192.168.18.55:5000");
        assert_eq!(cfg.cache_dir, PathBuf::from("/tmp/comitia"));
        assert_eq!(cfg.http_timeout, Duration::from_secs(3));
    }

    #[test]
    fn test_bad_timeout_keeps_default() {
        let cfg = Config::from_lookup(lookup(&[(ENV_HTTP_TIMEOUT, "soon")]));
        assert_eq!(cfg.http_timeout, Duration::from_secs(10));
        let cfg = Config::from_lookup(lookup(&[(ENV_HTTP_TIMEOUT, "0")]));
        assert_eq!(cfg.http_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_flag_overrides() {
        let cfg = Config::default()
            .with_api_url(Some("https://api.example.pe/".into()))
            .with_offline(true);
        assert_eq!(cfg.api_base_url, "https://api.example.pe");
        assert!(cfg.offline);
    }
}
