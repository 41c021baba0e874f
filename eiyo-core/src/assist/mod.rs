//! Assisted matching: the optional, best-effort last resort of the cascade.
//!
//! The cascade only sees the [`AssistedMatcher`] capability. When no backend
//! is configured, [`NoAssist`] is injected and the level is skipped.
//! Whatever a matcher returns is validated against the catalog by the caller;
//! errors never leave the cascade.

mod prompt;

pub use prompt::{parse_matched_food, render_food_match_prompt};

use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::llm::{create_provider_from_env, LlmError, LlmProvider};

#[derive(Debug, Error)]
pub enum AssistError {
    #[error("Assisted matching is not configured")]
    Unavailable,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Unexpected assisted reply: {0}")]
    UnexpectedReply(String),

    #[error("Assisted reply was empty")]
    EmptyReply,

    #[error("Assisted lookup timed out after {0:?}")]
    TimedOut(Duration),
}

/// Picks a catalog name for a query out of a candidate list.
#[async_trait]
pub trait AssistedMatcher: Send + Sync + fmt::Debug {
    /// Return the name the backend believes matches `query`.
    ///
    /// The reply is untrusted; it may name something outside `candidates`.
    async fn pick(&self, query: &str, candidates: &[&str]) -> Result<String, AssistError>;

    /// Whether calling [`AssistedMatcher::pick`] can ever succeed.
    fn is_available(&self) -> bool {
        true
    }
}

/// Stand-in used when no assisted backend is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoAssist;

#[async_trait]
impl AssistedMatcher for NoAssist {
    async fn pick(&self, _query: &str, _candidates: &[&str]) -> Result<String, AssistError> {
        Err(AssistError::Unavailable)
    }

    fn is_available(&self) -> bool {
        false
    }
}

/// Asks an LLM to choose among the candidates.
#[derive(Debug)]
pub struct LlmAssistedMatcher {
    provider: Box<dyn LlmProvider>,
}

impl LlmAssistedMatcher {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl AssistedMatcher for LlmAssistedMatcher {
    async fn pick(&self, query: &str, candidates: &[&str]) -> Result<String, AssistError> {
        let prompt = render_food_match_prompt(query, candidates);

        tracing::debug!(
            provider = self.provider.provider_name(),
            model = self.provider.model_name(),
            candidates = candidates.len(),
            "Calling assisted matcher"
        );

        let reply = self.provider.complete(&prompt).await?;
        parse_matched_food(&reply)
    }
}

/// Build the matcher selected by the environment (see
/// [`create_provider_from_env`]).
///
/// Misconfiguration is logged and falls back to [`NoAssist`].
pub fn matcher_from_env() -> Arc<dyn AssistedMatcher> {
    match create_provider_from_env() {
        Ok(Some(provider)) => Arc::new(LlmAssistedMatcher::new(provider)),
        Ok(None) => Arc::new(NoAssist),
        Err(e) => {
            tracing::warn!(error = %e, "Assisted matching unavailable");
            Arc::new(NoAssist)
        }
    }
}
