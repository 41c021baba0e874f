//! Fake LLM provider for testing.
//!
//! Returns canned responses chosen by prompt substring, so the assisted level
//! can be exercised without network access.

use super::{LlmError, LlmProvider};
use async_trait::async_trait;
use std::time::Duration;

/// Responses are matched by checking whether the prompt contains a registered
/// substring; the first registration that matches wins.
#[derive(Debug, Default)]
pub struct FakeProvider {
    responses: Vec<(String, String)>,
    default_response: Option<String>,
    delay: Option<Duration>,
}

impl FakeProvider {
    /// A provider with no responses; every call fails.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(prompt_contains: &str, response: &str) -> Self {
        let mut provider = Self::new();
        provider.add_response(prompt_contains, response);
        provider
    }

    pub fn add_response(&mut self, prompt_contains: &str, response: &str) {
        self.responses
            .push((prompt_contains.to_string(), response.to_string()));
    }

    /// Response used when no registered substring matches.
    pub fn with_default_response(mut self, response: &str) -> Self {
        self.default_response = Some(response.to_string());
        self
    }

    /// Sleep before answering, to simulate a slow backend.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[async_trait]
impl LlmProvider for FakeProvider {
    async fn complete(&self, prompt: &str) -> Result<String, LlmError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let matched = self
            .responses
            .iter()
            .find(|(pattern, _)| prompt.contains(pattern.as_str()))
            .map(|(_, response)| response.clone());

        matched
            .or_else(|| self.default_response.clone())
            .ok_or_else(|| {
                LlmError::RequestFailed(format!(
                    "FakeProvider: no response configured for prompt (first 100 chars): {}",
                    prompt.chars().take(100).collect::<String>()
                ))
            })
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }

    fn model_name(&self) -> &str {
        "fake-model"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fake_provider_matching() {
        let provider = FakeProvider::with_response("生卵", "鶏卵　全卵　生");
        let result = provider.complete("入力された食品: 生卵").await.unwrap();
        assert_eq!(result, "鶏卵　全卵　生");
    }

    #[tokio::test]
    async fn test_first_registration_wins() {
        let mut provider = FakeProvider::new();
        provider.add_response("卵", "first");
        provider.add_response("生卵", "second");
        assert_eq!(provider.complete("生卵").await.unwrap(), "first");
    }

    #[tokio::test]
    async fn test_fake_provider_no_match() {
        let provider = FakeProvider::new();
        let err = provider.complete("random prompt").await.unwrap_err();
        assert!(matches!(err, LlmError::RequestFailed(_)));
    }

    #[tokio::test]
    async fn test_fake_provider_default_response() {
        let provider = FakeProvider::new().with_default_response("default");
        assert_eq!(provider.complete("random prompt").await.unwrap(), "default");
    }
}
