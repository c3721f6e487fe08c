//! Configuration management for the Game Details Service
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::retriever::FailurePolicy;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Redis URL for the game cache; an in-process cache is used when unset
    pub redis_url: Option<String>,

    /// Base URL of the store whose app pages are scraped
    pub store_base_url: String,

    /// Deadline for a single store page fetch, in seconds
    pub fetch_timeout_secs: u64,

    /// Handling of per-id failures inside a batch
    pub failure_policy: FailurePolicy,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8085".to_string())
                .parse()
                .context("Invalid API_PORT")?,

            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),

            store_base_url: env::var("STORE_BASE_URL")
                .unwrap_or_else(|_| "https://store.steampowered.com".to_string()),

            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid FETCH_TIMEOUT_SECS")?,

            failure_policy: env::var("BATCH_FAILURE_POLICY")
                .unwrap_or_else(|_| "skip".to_string())
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid BATCH_FAILURE_POLICY")?,
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.api_port == 0 {
            anyhow::bail!("API_PORT must be greater than 0");
        }

        if self.fetch_timeout_secs == 0 {
            anyhow::bail!("FETCH_TIMEOUT_SECS must be greater than 0");
        }

        Ok(())
    }

    /// Get the API server address
    pub fn api_address(&self) -> String {
        format!("{}:{}", self.api_host, self.api_port)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            api_host: "127.0.0.1".to_string(),
            api_port: 9000,
            redis_url: None,
            store_base_url: "https://store.steampowered.com".to_string(),
            fetch_timeout_secs: 10,
            failure_policy: FailurePolicy::SkipAndContinue,
        }
    }

    #[test]
    fn test_config_defaults() {
        // Clear any existing environment variables
        env::remove_var("API_HOST");
        env::remove_var("API_PORT");
        env::remove_var("REDIS_URL");
        env::remove_var("STORE_BASE_URL");
        env::remove_var("FETCH_TIMEOUT_SECS");
        env::remove_var("BATCH_FAILURE_POLICY");

        let config = Config::from_env().expect("Failed to load config");

        assert_eq!(config.api_host, "0.0.0.0");
        assert_eq!(config.api_port, 8085);
        assert!(config.redis_url.is_none());
        assert_eq!(config.store_base_url, "https://store.steampowered.com");
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert_eq!(config.failure_policy, FailurePolicy::SkipAndContinue);
    }

    #[test]
    fn test_api_address() {
        assert_eq!(config().api_address(), "127.0.0.1:9000");
    }

    #[test]
    fn test_validate_invalid_port() {
        let config = Config {
            api_port: 0,
            ..config()
        };

        let result = config.validate();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("API_PORT must be greater than 0"));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = Config {
            fetch_timeout_secs: 0,
            ..config()
        };

        assert!(config.validate().is_err());
    }
}
