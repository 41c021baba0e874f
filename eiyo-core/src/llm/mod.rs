//! LLM providers backing the assisted matching level.
//!
//! Providers are interchangeable behind [`LlmProvider`]; tests use
//! [`FakeProvider`] so nothing here needs network access to be exercised.

mod claude;
mod fake;

pub use claude::ClaudeProvider;
pub use fake::FakeProvider;

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// Default Claude model for assisted matching.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API request failed: {0}")]
    RequestFailed(String),

    #[error("API returned error: {status} - {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to parse response: {0}")]
    ParseError(String),

    #[error("Rate limited, retry after {retry_after_secs:?} seconds")]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("Provider not configured: {0}")]
    NotConfigured(String),
}

/// A text-completion backend.
///
/// Implementations must be thread-safe; one provider is shared by every
/// concurrent resolution.
#[async_trait]
pub trait LlmProvider: Send + Sync + fmt::Debug {
    /// Send a prompt and return the model's text reply.
    async fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Provider name (e.g., "claude", "fake").
    fn provider_name(&self) -> &'static str;

    fn model_name(&self) -> &str;
}

/// Build a provider from environment variables.
///
/// - `EIYO_ASSIST_PROVIDER`: "claude" | "none". Defaults to "claude" when an
///   API key is set, otherwise "none".
/// - `ANTHROPIC_API_KEY` (or `CLAUDE_API_KEY`): API key for Claude
/// - `EIYO_ASSIST_MODEL`: model name (default: [`DEFAULT_CLAUDE_MODEL`])
///
/// Returns `Ok(None)` when assisted matching is switched off.
pub fn create_provider_from_env() -> Result<Option<Box<dyn LlmProvider>>, LlmError> {
    let api_key = std::env::var("ANTHROPIC_API_KEY")
        .or_else(|_| std::env::var("CLAUDE_API_KEY"))
        .ok();

    create_provider(
        std::env::var("EIYO_ASSIST_PROVIDER").ok().as_deref(),
        api_key,
        std::env::var("EIYO_ASSIST_MODEL").ok(),
    )
}

fn create_provider(
    provider: Option<&str>,
    api_key: Option<String>,
    model: Option<String>,
) -> Result<Option<Box<dyn LlmProvider>>, LlmError> {
    let api_key = api_key.filter(|k| !k.is_empty());
    let provider = provider.unwrap_or(if api_key.is_some() { "claude" } else { "none" });

    match provider {
        "none" => Ok(None),
        "claude" => {
            let api_key = api_key.ok_or_else(|| {
                LlmError::NotConfigured("ANTHROPIC_API_KEY not set".to_string())
            })?;
            let model = model.unwrap_or_else(|| DEFAULT_CLAUDE_MODEL.to_string());
            Ok(Some(Box::new(ClaudeProvider::new(api_key, model))))
        }
        other => Err(LlmError::NotConfigured(format!(
            "Unknown provider: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_key_means_no_provider() {
        assert!(create_provider(None, None, None).unwrap().is_none());
        assert!(create_provider(None, Some(String::new()), None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_key_selects_claude() {
        let provider = create_provider(None, Some("sk-test".into()), None)
            .unwrap()
            .unwrap();
        assert_eq!(provider.provider_name(), "claude");
        assert_eq!(provider.model_name(), DEFAULT_CLAUDE_MODEL);

        let provider = create_provider(
            Some("claude"),
            Some("sk-test".into()),
            Some("claude-haiku".into()),
        )
        .unwrap()
        .unwrap();
        assert_eq!(provider.model_name(), "claude-haiku");
    }

    #[test]
    fn test_explicit_none_wins_over_key() {
        assert!(create_provider(Some("none"), Some("sk-test".into()), None)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_claude_without_key_is_not_configured() {
        assert!(matches!(
            create_provider(Some("claude"), None, None),
            Err(LlmError::NotConfigured(_))
        ));
    }

    #[test]
    fn test_fake_is_not_selectable_from_env() {
        let err = create_provider(Some("fake"), None, None).unwrap_err();
        assert!(err.to_string().contains("Unknown provider: fake"));
    }
}
