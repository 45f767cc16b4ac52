//! Configuration module for the mentor console.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use crate::errors::ConsoleError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the platform REST backend
    pub backend_url: String,
    /// Bearer token presented to the platform backend
    pub backend_token: Option<String>,
    /// Pre-shared key guarding the console API (required in production)
    pub console_psk: Option<String>,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Timeout applied to every backend request
    pub request_timeout: Duration,
    /// Idle time after which a console session is evicted
    pub session_ttl: Duration,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConsoleError> {
        dotenvy::dotenv().ok();

        let backend_url = env::var("MENTOR_BACKEND_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:5000".to_string())
            .trim_end_matches('/')
            .to_string();

        let backend_token = env::var("MENTOR_BACKEND_TOKEN").ok();
        let console_psk = env::var("MENTOR_CONSOLE_PSK").ok();

        let bind_addr = env::var("MENTOR_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8090".to_string())
            .parse()
            .map_err(|e| ConsoleError::Config(format!("Invalid MENTOR_BIND_ADDR: {}", e)))?;

        let log_level = env::var("MENTOR_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let timeout_secs: u64 = env::var("MENTOR_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .map_err(|e| {
                ConsoleError::Config(format!("Invalid MENTOR_REQUEST_TIMEOUT_SECS: {}", e))
            })?;

        let ttl_secs: u64 = env::var("MENTOR_SESSION_TTL_SECS")
            .unwrap_or_else(|_| "1800".to_string())
            .parse()
            .map_err(|e| ConsoleError::Config(format!("Invalid MENTOR_SESSION_TTL_SECS: {}", e)))?;

        Ok(Self {
            backend_url,
            backend_token,
            console_psk,
            bind_addr,
            log_level,
            request_timeout: Duration::from_secs(timeout_secs),
            session_ttl: Duration::from_secs(ttl_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VARS: [&str; 7] = [
        "MENTOR_BACKEND_URL",
        "MENTOR_BACKEND_TOKEN",
        "MENTOR_CONSOLE_PSK",
        "MENTOR_BIND_ADDR",
        "MENTOR_LOG_LEVEL",
        "MENTOR_REQUEST_TIMEOUT_SECS",
        "MENTOR_SESSION_TTL_SECS",
    ];

    // Both cases share process-wide env vars, so they run in one test.
    #[test]
    fn test_config_from_env() {
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env().unwrap();

        assert_eq!(config.backend_url, "http://127.0.0.1:5000");
        assert!(config.backend_token.is_none());
        assert!(config.console_psk.is_none());
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:8090");
        assert_eq!(config.log_level, "info");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.session_ttl, Duration::from_secs(1800));

        env::set_var("MENTOR_BACKEND_URL", "https://api.example.org/");
        env::set_var("MENTOR_REQUEST_TIMEOUT_SECS", "5");
        env::set_var("MENTOR_SESSION_TTL_SECS", "600");
        let config = Config::from_env().unwrap();
        assert_eq!(config.backend_url, "https://api.example.org");
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.session_ttl, Duration::from_secs(600));

        env::set_var("MENTOR_SESSION_TTL_SECS", "soon");
        assert!(matches!(Config::from_env(), Err(ConsoleError::Config(_))));
        env::remove_var("MENTOR_SESSION_TTL_SECS");

        env::set_var("MENTOR_BIND_ADDR", "not-an-address");
        let err = Config::from_env().unwrap_err();
        assert!(matches!(err, ConsoleError::Config(_)));

        for var in VARS {
            env::remove_var(var);
        }
    }
}
