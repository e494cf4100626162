//! Error types for prompt building, extraction and generation

use crate::types::RecoveryState;
use studytools_llm::LlmError;
use thiserror::Error;

/// Errors that can occur while building prompts or recovering records
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// Caller passed an empty source text or a count below one
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Every recovery state ran without producing a valid record
    #[error("Extraction failed after {} (response excerpt: {excerpt:?})", describe_states(.attempted))]
    ExtractionFailure {
        /// States that were tried, in order
        attempted: Vec<RecoveryState>,
        /// Bounded prefix of the raw response
        excerpt: String,
    },

    /// LLM provider error
    #[error("LLM error: {0}")]
    Llm(String),

    /// The external call took longer than the configured limit
    #[error("Generation timeout")]
    Timeout,

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

fn describe_states(states: &[RecoveryState]) -> String {
    if states.is_empty() {
        return "no applicable recovery state".to_string();
    }
    states
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" -> ")
}

impl From<LlmError> for ExtractorError {
    fn from(e: LlmError) -> Self {
        ExtractorError::Llm(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_message_lists_states() {
        let err = ExtractorError::ExtractionFailure {
            attempted: vec![RecoveryState::WholeJson, RecoveryState::DelimitedText],
            excerpt: "I could not".to_string(),
        };
        let message = err.to_string();
        assert!(message.contains("WHOLE_JSON_PARSE -> DELIMITED_TEXT_PATTERN_MATCH"));
        assert!(message.contains("I could not"));
    }

    #[test]
    fn test_llm_error_conversion() {
        let err: ExtractorError = LlmError::RateLimitExceeded.into();
        assert!(matches!(err, ExtractorError::Llm(m) if m == "Rate limit exceeded"));
    }
}
