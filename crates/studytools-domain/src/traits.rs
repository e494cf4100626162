//! Trait definitions for external interactions
//!
//! These traits define the boundary between the generation pipeline and the
//! outside world. Implementations live in other crates.

/// Trait for LLM provider operations
///
/// Implemented by the infrastructure layer (studytools-llm). Calls are
/// blocking; async callers are expected to run them on a blocking task.
pub trait LlmProvider {
    /// Error type for LLM operations
    type Error;

    /// Generate a free-text completion
    fn generate(&self, prompt: &str) -> Result<String, Self::Error>;

    /// Generate with a declared output schema (if the backend supports one)
    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error>;

    /// Name of the model answering the calls
    fn model_name(&self) -> &str;
}
