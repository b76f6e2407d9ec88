//! Configuration Module
//!
//! Handles loading and managing cache configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::{CountPolicy, DEFAULT_TTL_SECS};

/// Which entry store backs the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    /// Mutex-guarded map living inside this process
    InProcess,
    /// Redis server reached over the network
    External,
}

impl FromStr for Backend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inprocess" | "in-process" | "memory" => Ok(Backend::InProcess),
            "external" | "redis" => Ok(Backend::External),
            other => Err(format!("unknown backend '{}'", other)),
        }
    }
}

/// Cache and server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Seconds a fresh entry remains usable
    pub ttl: u64,
    /// Entry store backend
    pub backend: Backend,
    /// Connection target when the backend is external
    pub endpoint: String,
    /// When the access counter is bumped
    pub count_policy: CountPolicy,
    /// Timeout in seconds for a single page fetch
    pub fetch_timeout: u64,
    /// Timeout in milliseconds for connecting to the external store
    pub store_connect_timeout_ms: u64,
    /// Timeout in milliseconds for each external store command
    pub store_response_timeout_ms: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_TTL` - Freshness window in seconds (default: 10)
    /// - `CACHE_BACKEND` - `inprocess` or `external` (default: inprocess)
    /// - `CACHE_ENDPOINT` - External store URL (default: redis://127.0.0.1:6379/)
    /// - `COUNT_POLICY` - `every_call` or `miss_only` (default: every_call)
    /// - `FETCH_TIMEOUT` - Page fetch timeout in seconds (default: 30)
    /// - `STORE_CONNECT_TIMEOUT_MS` - External store connect timeout (default: 500)
    /// - `STORE_RESPONSE_TIMEOUT_MS` - External store reply timeout (default: 500)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            ttl: parse_var("CACHE_TTL").unwrap_or(defaults.ttl),
            backend: parse_var("CACHE_BACKEND").unwrap_or(defaults.backend),
            endpoint: env::var("CACHE_ENDPOINT").unwrap_or(defaults.endpoint),
            count_policy: parse_var("COUNT_POLICY").unwrap_or(defaults.count_policy),
            fetch_timeout: parse_var("FETCH_TIMEOUT").unwrap_or(defaults.fetch_timeout),
            store_connect_timeout_ms: parse_var("STORE_CONNECT_TIMEOUT_MS")
                .unwrap_or(defaults.store_connect_timeout_ms),
            store_response_timeout_ms: parse_var("STORE_RESPONSE_TIMEOUT_MS")
                .unwrap_or(defaults.store_response_timeout_ms),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    /// Freshness window as a Duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl)
    }

    /// Page fetch timeout as a Duration.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout)
    }

    /// External store connect timeout as a Duration.
    pub fn store_connect_timeout(&self) -> Duration {
        Duration::from_millis(self.store_connect_timeout_ms)
    }

    /// External store reply timeout as a Duration.
    pub fn store_response_timeout(&self) -> Duration {
        Duration::from_millis(self.store_response_timeout_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL_SECS,
            backend: Backend::InProcess,
            endpoint: "redis://127.0.0.1:6379/".to_string(),
            count_policy: CountPolicy::EveryCall,
            fetch_timeout: 30,
            store_connect_timeout_ms: 500,
            store_response_timeout_ms: 500,
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.ttl, 10);
        assert_eq!(config.backend, Backend::InProcess);
        assert_eq!(config.count_policy, CountPolicy::EveryCall);
        assert_eq!(config.server_port, 3000);
        assert_eq!(config.ttl(), Duration::from_secs(10));
    }

    #[test]
    fn test_config_from_env_defaults() {
        // Clear any existing env vars to test defaults
        for name in [
            "CACHE_TTL",
            "CACHE_BACKEND",
            "CACHE_ENDPOINT",
            "COUNT_POLICY",
            "FETCH_TIMEOUT",
            "STORE_CONNECT_TIMEOUT_MS",
            "STORE_RESPONSE_TIMEOUT_MS",
            "SERVER_PORT",
        ] {
            env::remove_var(name);
        }

        let config = Config::from_env();
        assert_eq!(config.ttl, 10);
        assert_eq!(config.backend, Backend::InProcess);
        assert_eq!(config.endpoint, "redis://127.0.0.1:6379/");
        assert_eq!(config.fetch_timeout, 30);
        assert_eq!(config.store_connect_timeout_ms, 500);
        assert_eq!(config.store_response_timeout_ms, 500);
    }

    #[test]
    fn test_backend_parse() {
        assert_eq!("inprocess".parse(), Ok(Backend::InProcess));
        assert_eq!("Memory".parse(), Ok(Backend::InProcess));
        assert_eq!("external".parse(), Ok(Backend::External));
        assert_eq!(" redis ".parse(), Ok(Backend::External));
        assert!("disk".parse::<Backend>().is_err());
    }
}
