use std::env;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Key lookup with profile fallback: tries `{PROFILE}_{KEY}` first, then `{KEY}`.
struct Source<'a, F: Fn(&str) -> Option<String>> {
    profile: &'a str,
    lookup: F,
}

impl<'a, F: Fn(&str) -> Option<String>> Source<'a, F> {
    fn opt(&self, key: &str) -> Option<String> {
        if !self.profile.is_empty() {
            let prefixed = format!("{}_{}", self.profile, key);
            if let Some(v) = (self.lookup)(&prefixed).filter(|s| !s.is_empty()) {
                return Some(v);
            }
        }
        (self.lookup)(key).filter(|s| !s.is_empty())
    }

    fn or(&self, key: &str, default: &str) -> String {
        self.opt(key).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T: std::str::FromStr>(&self, key: &str, default: T) -> T {
        match self.opt(key) {
            Some(raw) => match raw.parse() {
                Ok(v) => v,
                Err(_) => {
                    tracing::warn!(key, value = %raw, "unparseable config value, using default");
                    default
                }
            },
            None => default,
        }
    }
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub pool: PoolConfig,
    pub callback: CallbackConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `POOLTASK_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_opt("POOLTASK_PROFILE").unwrap_or_default();
        Self::for_profile(&profile)
    }

    /// Build config from environment variables for a specific named profile
    /// (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        Self::from_lookup(profile, env_opt)
    }

    /// Build config for a profile from an arbitrary key lookup.
    pub fn from_lookup(profile: &str, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let profile = profile.to_uppercase();
        let src = Source {
            profile: &profile,
            lookup,
        };
        Self {
            profile: profile.clone(),
            server: ServerConfig {
                host: src.or("HOST", "0.0.0.0"),
                port: src.parsed("PORT", 8080),
            },
            pool: PoolConfig {
                max_workers: src.parsed("MAX_WORKERS", 10),
            },
            callback: CallbackConfig {
                url: src.or("CALLBACK_URL", "http://localhost:8080/callback"),
                timeout_secs: src.parsed("CALLBACK_TIMEOUT_SECS", 10),
            },
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pool.max_workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.callback.url.trim().is_empty() {
            return Err(ConfigError::EmptyCallbackUrl);
        }
        Ok(())
    }

    /// Print a summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:    {}:{}", self.server.host, self.server.port);
        tracing::info!("  pool:      max_workers={}", self.pool.max_workers);
        tracing::info!(
            "  callback:  url={}, timeout={}s",
            self.callback.url,
            self.callback.timeout_secs
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ── Worker pool ───────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Ceiling on concurrently executing tasks.
    pub max_workers: usize,
}

// ── Completion callback ───────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallbackConfig {
    pub url: String,
    pub timeout_secs: u64,
}

impl CallbackConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_nothing_set() {
        let config = Config::from_lookup("", lookup(&[]));
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.pool.max_workers, 10);
        assert_eq!(config.callback.url, "http://localhost:8080/callback");
        assert_eq!(config.callback.timeout(), Duration::from_secs(10));
        assert_eq!(config.profile_label(), "default");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn profile_prefix_wins_over_plain_key() {
        let config = Config::from_lookup(
            "prod",
            lookup(&[("MAX_WORKERS", "3"), ("PROD_MAX_WORKERS", "7"), ("PORT", "9000")]),
        );
        assert_eq!(config.profile, "PROD");
        assert_eq!(config.pool.max_workers, 7);
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn unparseable_value_falls_back_to_default() {
        let config = Config::from_lookup("", lookup(&[("MAX_WORKERS", "many")]));
        assert_eq!(config.pool.max_workers, 10);
    }

    #[test]
    fn empty_value_is_treated_as_unset() {
        let config = Config::from_lookup("", lookup(&[("CALLBACK_URL", "")]));
        assert_eq!(config.callback.url, "http://localhost:8080/callback");
    }

    #[test]
    fn validate_rejects_zero_workers() {
        let config = Config::from_lookup("", lookup(&[("MAX_WORKERS", "0")]));
        assert_eq!(config.validate(), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn validate_rejects_blank_callback_url() {
        let mut config = Config::from_lookup("", lookup(&[]));
        config.callback.url = "   ".into();
        assert_eq!(config.validate(), Err(ConfigError::EmptyCallbackUrl));
    }

    #[test]
    fn server_addr_joins_host_and_port() {
        let config = Config::from_lookup("", lookup(&[("HOST", "127.0.0.1"), ("PORT", "4000")]));
        assert_eq!(config.server.addr(), "127.0.0.1:4000");
    }
}
