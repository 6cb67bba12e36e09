//! Session configuration.

use crate::strategist::Difficulty;
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info, instrument};

/// Tunables for a [`crate::SessionController`].
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Thinking delay before a random-policy move, in milliseconds.
    #[serde(default = "default_random_delay_ms")]
    random_delay_ms: u64,

    /// Thinking delay before an optimal-policy move, in milliseconds.
    #[serde(default = "default_optimal_delay_ms")]
    optimal_delay_ms: u64,

    /// Difficulty in effect when the session starts.
    #[serde(default)]
    difficulty: Difficulty,

    /// Seed for the random policy; entropy-seeded when absent.
    #[serde(default)]
    rng_seed: Option<u64>,
}

fn default_random_delay_ms() -> u64 {
    500
}

fn default_optimal_delay_ms() -> u64 {
    700
}

impl SessionConfig {
    /// Creates a configuration with the interactive defaults.
    pub fn new() -> Self {
        Self {
            random_delay_ms: default_random_delay_ms(),
            optimal_delay_ms: default_optimal_delay_ms(),
            difficulty: Difficulty::default(),
            rng_seed: None,
        }
    }

    /// Configuration with no thinking delay, for non-interactive use.
    pub fn instant() -> Self {
        Self {
            random_delay_ms: 0,
            optimal_delay_ms: 0,
            ..Self::new()
        }
    }

    /// Sets the initial difficulty.
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Sets the random-policy seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Sets the same thinking delay for both policies.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        let ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        self.random_delay_ms = ms;
        self.optimal_delay_ms = ms;
        self
    }

    /// Thinking delay for the given policy.
    pub fn thinking_delay(&self, difficulty: Difficulty) -> Duration {
        match difficulty {
            Difficulty::Random => Duration::from_millis(self.random_delay_ms),
            Difficulty::Optimal => Duration::from_millis(self.optimal_delay_ms),
        }
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        debug!(?config, "Config parsed");
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml_str(&content)?;
        info!(difficulty = %config.difficulty, "Config loaded successfully");
        Ok(config)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = SessionConfig::from_toml_str("").unwrap();
        assert_eq!(config, SessionConfig::new());
        assert_eq!(config.thinking_delay(Difficulty::Random), Duration::from_millis(500));
        assert_eq!(config.thinking_delay(Difficulty::Optimal), Duration::from_millis(700));
    }

    #[test]
    fn test_toml_overrides() {
        let config = SessionConfig::from_toml_str(
            r#"
            difficulty = "random"
            random_delay_ms = 0
            rng_seed = 9
            "#,
        )
        .unwrap();
        assert_eq!(*config.difficulty(), Difficulty::Random);
        assert_eq!(*config.random_delay_ms(), 0);
        assert_eq!(*config.optimal_delay_ms(), 700);
        assert_eq!(*config.rng_seed(), Some(9));
    }

    #[test]
    fn test_bad_toml_reports_location() {
        let err = SessionConfig::from_toml_str("difficulty = \"medium\"").unwrap_err();
        assert!(err.message.contains("Failed to parse config"));
        assert!(err.file.ends_with("config.rs"));
    }

    #[test]
    fn test_instant_has_no_delay() {
        let config = SessionConfig::instant();
        assert_eq!(config.thinking_delay(Difficulty::Optimal), Duration::ZERO);
    }
}
