//! Configuration management for quizsolver.
//!
//! Configuration can be set via environment variables:
//! - `OPENROUTER_API_KEY` - Required. Your OpenRouter API key.
//! - `QUIZ_EMAIL` - Required. The email identifying this participant.
//! - `QUIZ_SECRET` - Required. The shared secret inbound requests must carry.
//! - `DEFAULT_MODEL` - Optional. The LLM model to use. Defaults to `openai/gpt-4o-mini`.
//! - `HOST` - Optional. Server host. Defaults to `127.0.0.1`.
//! - `PORT` - Optional. Server port. Defaults to `3000`.
//! - `MAX_RETRIES` - Optional. Maximum solve-loop attempts. Defaults to `3`.
//! - `SOLVE_BUDGET_SECS` - Optional. Wall-clock budget per solve session in
//!   seconds. Defaults to `170` (headroom under the caller's 180 s ceiling).
//! - `BROWSER_CDP_URL` - Optional. Chrome DevTools endpoint for the rendered
//!   fetch fallback. Defaults to `http://127.0.0.1:9222`.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Default Chrome DevTools Protocol endpoint for the rendered-fetch fallback.
pub const DEFAULT_CDP_URL: &str = "http://127.0.0.1:9222";

/// Service configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// OpenRouter API key
    pub api_key: String,

    /// LLM model identifier (OpenRouter format)
    pub model: String,

    /// Participant email included in submission payloads and checked on
    /// inbound requests
    pub email: String,

    /// Shared secret included in submission payloads and checked on inbound
    /// requests
    pub secret: String,

    /// Server host
    pub host: String,

    /// Server port
    pub port: u16,

    /// Maximum attempts per solve session
    pub max_retries: u32,

    /// Wall-clock budget per solve session
    pub budget: Duration,

    /// Chrome DevTools endpoint for the rendered fetch fallback
    pub cdp_url: String,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `OPENROUTER_API_KEY`,
    /// `QUIZ_EMAIL` or `QUIZ_SECRET` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_env("OPENROUTER_API_KEY")?;
        let email = require_env("QUIZ_EMAIL")?;
        let secret = require_env("QUIZ_SECRET")?;

        let model = std::env::var("DEFAULT_MODEL")
            .unwrap_or_else(|_| "openai/gpt-4o-mini".to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let port = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("PORT".to_string(), format!("{}", e)))?;

        let max_retries = std::env::var("MAX_RETRIES")
            .unwrap_or_else(|_| "3".to_string())
            .parse()
            .map_err(|e| ConfigError::InvalidValue("MAX_RETRIES".to_string(), format!("{}", e)))?;

        let budget_secs: u64 = std::env::var("SOLVE_BUDGET_SECS")
            .unwrap_or_else(|_| "170".to_string())
            .parse()
            .map_err(|e| {
                ConfigError::InvalidValue("SOLVE_BUDGET_SECS".to_string(), format!("{}", e))
            })?;

        let cdp_url =
            std::env::var("BROWSER_CDP_URL").unwrap_or_else(|_| DEFAULT_CDP_URL.to_string());

        Ok(Self {
            api_key,
            model,
            email,
            secret,
            host,
            port,
            max_retries,
            budget: Duration::from_secs(budget_secs),
            cdp_url,
        })
    }

    /// Create a config with custom values (useful for testing).
    pub fn new(api_key: String, email: String, secret: String) -> Self {
        Self {
            api_key,
            model: "openai/gpt-4o-mini".to_string(),
            email,
            secret,
            host: "127.0.0.1".to_string(),
            port: 3000,
            max_retries: 3,
            budget: Duration::from_secs(170),
            cdp_url: DEFAULT_CDP_URL.to_string(),
        }
    }
}

fn require_env(name: &str) -> Result<String, ConfigError> {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingEnvVar(name.to_string()))
}
