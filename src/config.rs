use crate::error::{RateLimitError, Result};
use serde::{Deserialize, Serialize};

/// Default maximum booking attempts per window.
const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Default window length: one hour.
const DEFAULT_WINDOW_MS: u64 = 60 * 60 * 1000;

/// Rate limiting policy for booking endpoints.
///
/// Construction-time only; a running limiter never changes its policy.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    /// Maximum booking attempts allowed per window.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Window length in milliseconds.
    #[serde(default = "default_window_ms")]
    pub window_ms: u64,

    /// Message returned to denied clients.
    #[serde(default = "default_message")]
    pub message: String,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            window_ms: default_window_ms(),
            message: default_message(),
        }
    }
}

impl RateLimitConfig {
    /// Create a new RateLimitConfig builder
    pub fn builder() -> RateLimitConfigBuilder {
        RateLimitConfigBuilder::new()
    }

    /// Create a strict configuration for abuse-prone deployments.
    ///
    /// Allows only 3 attempts per 30 minutes.
    pub fn strict() -> Self {
        Self {
            max_attempts: 3,
            window_ms: 30 * 60 * 1000,
            ..Self::default()
        }
    }

    /// Create a lenient configuration for shared-IP audiences (offices,
    /// campus networks) where one address covers many visitors.
    ///
    /// Allows 10 attempts per hour.
    pub fn lenient() -> Self {
        Self {
            max_attempts: 10,
            window_ms: 60 * 60 * 1000,
            ..Self::default()
        }
    }

    /// Load rate limit configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Some(max_attempts) = get_env_with_prefix("RATE_LIMIT_MAX_ATTEMPTS") {
            if let Ok(val) = max_attempts.parse() {
                config.max_attempts = val;
            }
        }

        if let Some(window) = get_env_with_prefix("RATE_LIMIT_WINDOW_MS") {
            if let Ok(val) = window.parse() {
                config.window_ms = val;
            }
        }

        if let Some(message) = get_env_with_prefix("RATE_LIMIT_MESSAGE") {
            config.message = message;
        }

        config
    }

    /// Reject configurations the limiter cannot enforce.
    ///
    /// A zero attempt budget or a zero-length window is a programmer error,
    /// caught when the limiter is constructed rather than at request time.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(RateLimitError::invalid_config(
                "max_attempts must be greater than zero",
            ));
        }
        if self.window_ms == 0 {
            return Err(RateLimitError::invalid_config(
                "window_ms must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Builder for RateLimitConfig
#[must_use = "builder does nothing until you call build()"]
pub struct RateLimitConfigBuilder {
    config: RateLimitConfig,
}

impl RateLimitConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: RateLimitConfig::default(),
        }
    }

    pub fn max_attempts(mut self, max: u32) -> Self {
        self.config.max_attempts = max;
        self
    }

    pub fn window_ms(mut self, window_ms: u64) -> Self {
        self.config.window_ms = window_ms;
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.config.message = message.into();
        self
    }

    pub fn build(self) -> RateLimitConfig {
        self.config
    }
}

impl Default for RateLimitConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

fn default_window_ms() -> u64 {
    DEFAULT_WINDOW_MS
}

fn default_message() -> String {
    "Troppi tentativi di prenotazione. Riprova tra un'ora.".to_string()
}

/// Get environment variable with BOOKING_ prefix, falling back to the
/// unprefixed name for compatibility with standard naming.
fn get_env_with_prefix(key: &str) -> Option<String> {
    std::env::var(format!("BOOKING_{}", key))
        .or_else(|_| std::env::var(key))
        .ok()
}
