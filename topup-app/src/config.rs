//! Configuration loading from environment.

use std::env;
use std::time::Duration;

use anyhow::Context;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 30;

/// Application configuration.
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub gateway: GatewaySettings,
}

/// Payment gateway connection settings.
pub struct GatewaySettings {
    pub base_url: String,
    pub api_key: String,
    pub username: String,
    pub password: String,
    pub timeout: Duration,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .with_context(|| format!("{} environment variable is required", key))
        };

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().context("PORT must be a valid port number")?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match lookup("GATEWAY_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse()
                .context("GATEWAY_TIMEOUT_SECS must be a whole number of seconds")?,
            None => DEFAULT_GATEWAY_TIMEOUT_SECS,
        };

        Ok(Self {
            port,
            database_url: required("DATABASE_URL")?,
            gateway: GatewaySettings {
                base_url: required("GATEWAY_BASE_URL")?,
                api_key: required("GATEWAY_API_KEY")?,
                username: required("GATEWAY_USERNAME")?,
                password: required("GATEWAY_PASSWORD")?,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
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
        move |key| map.get(key).cloned()
    }

    const FULL: &[(&str, &str)] = &[
        ("DATABASE_URL", "sqlite::memory:"),
        ("GATEWAY_BASE_URL", "https://gateway.example"),
        ("GATEWAY_API_KEY", "key"),
        ("GATEWAY_USERNAME", "user"),
        ("GATEWAY_PASSWORD", "pass"),
    ];

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(FULL)).unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.gateway.timeout, Duration::from_secs(30));
        assert_eq!(config.gateway.base_url, "https://gateway.example");
    }

    #[test]
    fn test_overrides() {
        let mut pairs = FULL.to_vec();
        pairs.push(("PORT", "8080"));
        pairs.push(("GATEWAY_TIMEOUT_SECS", "5"));

        let config = Config::from_lookup(lookup(&pairs)).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.gateway.timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_missing_required_value() {
        let pairs: Vec<_> = FULL
            .iter()
            .copied()
            .filter(|(k, _)| *k != "GATEWAY_API_KEY")
            .collect();

        let err = Config::from_lookup(lookup(&pairs)).err().unwrap();
        assert!(err.to_string().contains("GATEWAY_API_KEY"));
    }

    #[test]
    fn test_invalid_port() {
        let mut pairs = FULL.to_vec();
        pairs.push(("PORT", "not-a-port"));

        assert!(Config::from_lookup(lookup(&pairs)).is_err());
    }
}
