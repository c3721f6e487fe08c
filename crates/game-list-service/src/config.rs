//! Configuration management for the Game List Service
//!
//! Loads configuration from environment variables with sensible defaults.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API server host
    pub api_host: String,

    /// API server port
    pub api_port: u16,

    /// Base URL of the community site serving profile documents
    pub community_base_url: String,

    /// Base URL of the Web API serving owned games lists
    pub web_api_base_url: String,

    /// Web API key; empty keys are rejected by the Web API
    pub web_api_key: String,

    /// Value of the Access-Control-Allow-Origin response header
    pub allowed_origin: String,

    /// Deadline for a single upstream fetch, in seconds
    pub fetch_timeout_secs: u64,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists (for local development)
        dotenvy::dotenv().ok();

        let config = Config {
            api_host: env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            api_port: env::var("API_PORT")
                .unwrap_or_else(|_| "8086".to_string())
                .parse()
                .context("Invalid API_PORT")?,

            community_base_url: env::var("COMMUNITY_BASE_URL")
                .unwrap_or_else(|_| "https://steamcommunity.com".to_string()),

            web_api_base_url: env::var("WEB_API_BASE_URL")
                .unwrap_or_else(|_| "http://api.steampowered.com".to_string()),

            web_api_key: env::var("STEAM_WEB_API_KEY").unwrap_or_default(),

            allowed_origin: env::var("ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),

            fetch_timeout_secs: env::var("FETCH_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .context("Invalid FETCH_TIMEOUT_SECS")?,
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
