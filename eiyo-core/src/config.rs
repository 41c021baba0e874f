//! Matcher configuration.

use std::env;
use std::time::Duration;
use thiserror::Error;

/// Minimum similarity ratio accepted by the similarity level.
pub const DEFAULT_SIMILARITY_THRESHOLD: f64 = 0.6;

/// Number of suggestions returned when nothing resolves.
pub const DEFAULT_SUGGESTION_LIMIT: usize = 5;

/// Number of suggestions shown in a user-facing miss message.
pub const DEFAULT_HINT_LIMIT: usize = 3;

/// Catalog prefix used as the assisted candidate pool when no entry shares a
/// token with the query.
pub const DEFAULT_ASSIST_POOL_SIZE: usize = 100;

/// Candidates actually listed in the assisted prompt.
pub const DEFAULT_ASSIST_PROMPT_LIMIT: usize = 50;

pub const DEFAULT_ASSIST_TIMEOUT_SECS: u64 = 30;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?} ({reason})")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Tunables for [`crate::MatchCascade`].
#[derive(Debug, Clone, PartialEq)]
pub struct CascadeConfig {
    pub similarity_threshold: f64,
    pub suggestion_limit: usize,
    pub hint_limit: usize,
    pub assist_pool_size: usize,
    pub assist_prompt_limit: usize,
    pub assist_timeout: Duration,
}

impl Default for CascadeConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: DEFAULT_SIMILARITY_THRESHOLD,
            suggestion_limit: DEFAULT_SUGGESTION_LIMIT,
            hint_limit: DEFAULT_HINT_LIMIT,
            assist_pool_size: DEFAULT_ASSIST_POOL_SIZE,
            assist_prompt_limit: DEFAULT_ASSIST_PROMPT_LIMIT,
            assist_timeout: Duration::from_secs(DEFAULT_ASSIST_TIMEOUT_SECS),
        }
    }
}

impl CascadeConfig {
    /// Load overrides from environment variables.
    ///
    /// Optional:
    /// - `EIYO_SIMILARITY_THRESHOLD`: ratio in `[0, 1]` (default: 0.6)
    /// - `EIYO_ASSIST_TIMEOUT_SECS`: seconds, at least 1 (default: 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Ok(value) = env::var("EIYO_SIMILARITY_THRESHOLD") {
            config.similarity_threshold = parse_threshold(&value)?;
        }

        if let Ok(value) = env::var("EIYO_ASSIST_TIMEOUT_SECS") {
            config.assist_timeout = parse_timeout(&value)?;
        }

        Ok(config)
    }

    pub fn with_similarity_threshold(mut self, threshold: f64) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    pub fn with_assist_timeout(mut self, timeout: Duration) -> Self {
        self.assist_timeout = timeout;
        self
    }
}

fn parse_threshold(value: &str) -> Result<f64, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        name: "EIYO_SIMILARITY_THRESHOLD",
        value: value.to_string(),
        reason,
    };

    let threshold: f64 = value.trim().parse().map_err(|_| invalid("not a number"))?;
    if !(0.0..=1.0).contains(&threshold) {
        return Err(invalid("must be between 0 and 1"));
    }
    Ok(threshold)
}

fn parse_timeout(value: &str) -> Result<Duration, ConfigError> {
    let invalid = |reason| ConfigError::InvalidValue {
        name: "EIYO_ASSIST_TIMEOUT_SECS",
        value: value.to_string(),
        reason,
    };

    let secs: u64 = value
        .trim()
        .parse()
        .map_err(|_| invalid("not a whole number of seconds"))?;
    if secs == 0 {
        return Err(invalid("must be at least 1"));
    }
    Ok(Duration::from_secs(secs))
}
