//! Configuration module for the threadsbot service.
//!
//! This module contains the configuration structure and environment variable handling
//! for the HTTP server, the Twitter/X proxy and the GAME agent API.

use log::{debug, error, info, warn};
use std::env;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Default base URL of the GAME Twitter proxy (Twitter API v2 paths are appended).
pub const DEFAULT_X_API_BASE_URL: &str = "https://twitter.game.virtuals.io/tweets";
/// Default base URL of the GAME agent API.
pub const DEFAULT_GAME_API_BASE_URL: &str = "https://sdk.game.virtuals.io";
/// Default URL used to exchange a GAME API key for an access token.
pub const DEFAULT_GAME_ACCESS_URL: &str = "https://api.virtuals.io/api";

/// Errors raised while loading configuration from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing {0} environment variable")]
    Missing(&'static str),
    #[error("{0} cannot be empty")]
    Empty(&'static str),
    #[error("PORT must be a valid number, got '{0}'")]
    InvalidPort(String),
    #[error("NODE_ENV must be one of development, production; got '{0}'")]
    InvalidEnvironment(String),
}

/// Deployment environment, read from `NODE_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(self) -> bool {
        self == Environment::Production
    }
}

impl FromStr for Environment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" => Ok(Environment::Development),
            "production" => Ok(Environment::Production),
            other => Err(ConfigError::InvalidEnvironment(other.to_string())),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Environment::Development => f.write_str("development"),
            Environment::Production => f.write_str("production"),
        }
    }
}

/// Application configuration.
///
/// Holds the server port, the deployment environment and the two credentials the
/// service needs: the GAME API key (agent runtime) and the GAME Twitter access token
/// (Twitter/X proxy).
#[derive(Clone)]
pub struct AppConfig {
    /// Port the HTTP server listens on
    pub port: u16,
    /// Deployment environment
    pub environment: Environment,
    /// API key for the GAME agent API
    pub game_api_key: String,
    /// Access token for the GAME Twitter proxy
    pub game_twitter_access_token: String,
    /// Base URL of the Twitter proxy
    pub x_api_base_url: String,
    /// Base URL of the GAME agent API
    pub game_api_base_url: String,
    /// Base URL of the GAME access token endpoint
    pub game_access_url: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("port", &self.port)
            .field("environment", &self.environment)
            .field("game_api_key", &mask_secret(&self.game_api_key))
            .field(
                "game_twitter_access_token",
                &mask_secret(&self.game_twitter_access_token),
            )
            .field("x_api_base_url", &self.x_api_base_url)
            .field("game_api_base_url", &self.game_api_base_url)
            .field("game_access_url", &self.game_access_url)
            .finish()
    }
}

/// Masks a secret for logging, keeping at most the first and last few characters.
pub(crate) fn mask_secret(secret: &str) -> String {
    let len = secret.chars().count();
    if len > 16 {
        let prefix: String = secret.chars().take(8).collect();
        let suffix: String = secret.chars().skip(len - 4).collect();
        format!("{}...{}", prefix, suffix)
    } else if len > 8 {
        let prefix: String = secret.chars().take(4).collect();
        format!("{}...", prefix)
    } else {
        "***".to_string()
    }
}

/// Reads a required, non-empty secret from the environment.
fn required_secret(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) => {
            let value = value.trim().to_string();
            if value.is_empty() {
                error!("{} is empty", name);
                return Err(ConfigError::Empty(name));
            }
            info!("Found {} environment variable with length: {}", name, value.len());
            debug!("{} (masked): {}", name, mask_secret(&value));
            if value.len() < 10 {
                warn!("{} seems unusually short ({} characters)", name, value.len());
            }
            Ok(value)
        }
        Err(_) => {
            error!("Make sure {} environment variable is set", name);
            Err(ConfigError::Missing(name))
        }
    }
}

/// Reads an optional URL override, trimming any trailing slash.
fn url_or_default(name: &str, default: &str) -> String {
    match env::var(name) {
        Ok(url) if !url.trim().is_empty() => {
            info!("Using {} override: {}", name, url.trim());
            url.trim().trim_end_matches('/').to_string()
        }
        _ => default.to_string(),
    }
}

fn parse_port(raw: Option<String>) -> Result<u16, ConfigError> {
    match raw {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(value)),
        None => Ok(3000),
    }
}

impl AppConfig {
    /// Creates a new `AppConfig` by loading values from environment variables.
    ///
    /// # Required Environment Variables
    ///
    /// - `GAME_API_KEY`: API key for the GAME agent runtime
    /// - `GAME_TWITTER_ACCESS_TOKEN`: access token for the GAME Twitter proxy
    ///
    /// # Optional Environment Variables
    ///
    /// - `PORT`: server port (defaults to 3000)
    /// - `NODE_ENV`: `development` or `production` (defaults to development)
    /// - `X_API_BASE_URL`, `GAME_API_BASE_URL`, `GAME_ACCESS_URL`: upstream overrides
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when a required variable is missing or empty, or when
    /// `PORT`/`NODE_ENV` hold values that cannot be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading configuration from environment variables");

        let port = parse_port(env::var("PORT").ok())?;
        let environment = match env::var("NODE_ENV") {
            Ok(value) => value.parse()?,
            Err(_) => {
                warn!("NODE_ENV not set, defaulting to development");
                Environment::Development
            }
        };

        let game_api_key = required_secret("GAME_API_KEY")?;
        let game_twitter_access_token = required_secret("GAME_TWITTER_ACCESS_TOKEN")?;

        let config = AppConfig {
            port,
            environment,
            game_api_key,
            game_twitter_access_token,
            x_api_base_url: url_or_default("X_API_BASE_URL", DEFAULT_X_API_BASE_URL),
            game_api_base_url: url_or_default("GAME_API_BASE_URL", DEFAULT_GAME_API_BASE_URL),
            game_access_url: url_or_default("GAME_ACCESS_URL", DEFAULT_GAME_ACCESS_URL),
        };

        info!(
            "Configuration loaded successfully (environment: {}, port: {})",
            config.environment, config.port
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            "production".parse::<Environment>().unwrap(),
            Environment::Production
        );
        assert_eq!(
            " Development ".parse::<Environment>().unwrap(),
            Environment::Development
        );
        assert!("staging".parse::<Environment>().is_err());
    }

    #[test]
    fn test_parse_port() {
        assert_eq!(parse_port(None).unwrap(), 3000);
        assert_eq!(parse_port(Some("8080".to_string())).unwrap(), 8080);
        assert!(matches!(
            parse_port(Some("eighty".to_string())),
            Err(ConfigError::InvalidPort(_))
        ));
    }

    #[test]
    fn test_mask_secret_hides_middle() {
        assert_eq!(mask_secret("short"), "***");
        assert_eq!(mask_secret("abcdefghij"), "abcd...");
        assert_eq!(mask_secret("abcdefghijklmnopqrst"), "abcdefgh...qrst");
    }
}
