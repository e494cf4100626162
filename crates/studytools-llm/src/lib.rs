//! StudyTools LLM Provider Layer
//!
//! Implementations of the `LlmProvider` trait from `studytools-domain`.
//!
//! # Providers
//!
//! - `MockProvider`: scripted responses for tests, no network
//! - `AnthropicProvider`: the Anthropic Messages API over HTTP
//!
//! # Examples
//!
//! ```
//! use studytools_llm::MockProvider;
//! use studytools_domain::traits::LlmProvider;
//!
//! let provider = MockProvider::new("QUESTION: 2+2?\nANSWER: 4");
//! let result = provider.generate("make one card").unwrap();
//! assert!(result.starts_with("QUESTION:"));
//! ```

#![warn(missing_docs)]

pub mod anthropic;

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use studytools_domain::traits::LlmProvider as LlmProviderTrait;
use thiserror::Error;

pub use anthropic::{AnthropicConfig, AnthropicProvider};

/// Errors that can occur during LLM operations
#[derive(Error, Debug)]
pub enum LlmError {
    /// Network or API communication error
    #[error("Communication error: {0}")]
    Communication(String),

    /// Response arrived but did not have the expected envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimitExceeded,

    /// Model not available
    #[error("Model not available: {0}")]
    ModelNotAvailable(String),

    /// Provider is missing something it needs to make a call
    #[error("Provider configuration error: {0}")]
    Configuration(String),

    /// Generic error
    #[error("LLM error: {0}")]
    Other(String),
}

/// A single call observed by the mock
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    /// Prompt that was sent
    pub prompt: String,

    /// Schema, for `generate_structured` calls
    pub schema: Option<String>,
}

/// Scripted LLM provider for deterministic testing
///
/// Responses queued with [`MockProvider::push_response`] and
/// [`MockProvider::push_error`] are handed out in order; once the script runs
/// out, every call gets the fallback response. Every call is recorded.
///
/// # Examples
///
/// ```
/// use studytools_llm::MockProvider;
/// use studytools_domain::traits::LlmProvider;
///
/// let provider = MockProvider::new("fallback");
/// provider.push_response("first");
/// assert_eq!(provider.generate("a").unwrap(), "first");
/// assert_eq!(provider.generate("b").unwrap(), "fallback");
/// assert_eq!(provider.calls().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MockProvider {
    fallback: String,
    model: String,
    script: Arc<Mutex<VecDeque<Result<String, String>>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

fn locked<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl MockProvider {
    /// Create a mock that answers every call with `response`
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            fallback: response.into(),
            model: "mock".to_string(),
            script: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Report a different model name
    pub fn with_model_name(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Queue a response for the next unanswered call
    pub fn push_response(&self, response: impl Into<String>) {
        locked(&self.script).push_back(Ok(response.into()));
    }

    /// Queue a failure for the next unanswered call
    pub fn push_error(&self, message: impl Into<String>) {
        locked(&self.script).push_back(Err(message.into()));
    }

    /// Every call made so far, oldest first
    pub fn calls(&self) -> Vec<RecordedCall> {
        locked(&self.calls).clone()
    }

    /// Number of calls made so far
    pub fn call_count(&self) -> usize {
        locked(&self.calls).len()
    }

    fn answer(&self, prompt: &str, schema: Option<&str>) -> Result<String, LlmError> {
        locked(&self.calls).push(RecordedCall {
            prompt: prompt.to_string(),
            schema: schema.map(str::to_string),
        });

        match locked(&self.script).pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::Other(message)),
            None => Ok(self.fallback.clone()),
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new("Default mock response")
    }
}

impl LlmProviderTrait for MockProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.answer(prompt, None)
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        self.answer(prompt, Some(schema))
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_provider_fallback() {
        let provider = MockProvider::new("Test response");
        assert_eq!(provider.generate("any prompt").unwrap(), "Test response");
        assert_eq!(provider.generate("another").unwrap(), "Test response");
    }

    #[test]
    fn test_mock_provider_script_order() {
        let provider = MockProvider::default();
        provider.push_response("one");
        provider.push_error("boom");
        provider.push_response("two");

        assert_eq!(provider.generate("a").unwrap(), "one");
        assert!(matches!(provider.generate("b"), Err(LlmError::Other(m)) if m == "boom"));
        assert_eq!(provider.generate("c").unwrap(), "two");
        assert_eq!(provider.generate("d").unwrap(), "Default mock response");
    }

    #[test]
    fn test_mock_provider_records_calls() {
        let provider = MockProvider::new("{}");
        provider.generate("plain").unwrap();
        provider.generate_structured("structured", "{\"type\":\"object\"}").unwrap();

        let calls = provider.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].prompt, "plain");
        assert_eq!(calls[0].schema, None);
        assert_eq!(calls[1].schema.as_deref(), Some("{\"type\":\"object\"}"));
    }

    #[test]
    fn test_mock_provider_clone_shares_state() {
        let provider1 = MockProvider::new("test").with_model_name("claude-test");
        let provider2 = provider1.clone();

        provider1.generate("test").unwrap();

        assert_eq!(provider2.call_count(), 1);
        assert_eq!(provider2.model_name(), "claude-test");
    }
}
