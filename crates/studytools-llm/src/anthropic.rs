//! Anthropic Provider Implementation
//!
//! Talks to the Anthropic Messages API (`POST /v1/messages`).
//!
//! # Features
//!
//! - Async HTTP communication via `reqwest`
//! - Explicit configuration value (no process-wide API key)
//! - Retry with exponential backoff on rate limits and server errors
//! - Request timeout
//!
//! # Examples
//!
//! ```no_run
//! use studytools_llm::{AnthropicConfig, AnthropicProvider};
//!
//! let config = AnthropicConfig::from_env();
//! let provider = AnthropicProvider::new(config).expect("ANTHROPIC_API_KEY not set");
//! ```

use crate::LlmError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use studytools_domain::traits::LlmProvider as LlmProviderTrait;
use tracing::{debug, warn};

/// Default API endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// Default model
pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-latest";

/// Value of the `anthropic-version` header
pub const API_VERSION: &str = "2023-06-01";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// Default completion budget
pub const DEFAULT_MAX_TOKENS: u32 = 4096;

/// Default timeout for a single HTTP request (60 seconds)
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of attempts per call
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Connection settings for the Anthropic API.
///
/// The API key is never serialized; it is read from the environment or set
/// explicitly by whoever builds the provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API base URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Model identifier
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens in a completion
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Attempts per call before giving up
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// API key
    #[serde(skip)]
    pub api_key: String,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_max_tokens() -> u32 {
    DEFAULT_MAX_TOKENS
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            api_key: String::new(),
        }
    }
}

impl AnthropicConfig {
    /// Defaults with the API key taken from `ANTHROPIC_API_KEY`
    pub fn from_env() -> Self {
        Self::default().with_api_key(std::env::var(API_KEY_ENV).unwrap_or_default())
    }

    /// Set the API key
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self
    }
}

/// Anthropic Messages API provider
pub struct AnthropicProvider {
    config: AnthropicConfig,
    client: reqwest::Client,
}

/// Request body for the Messages API
#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    messages: Vec<Message<'a>>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Response from the Messages API
#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl MessagesResponse {
    /// Concatenated text of every text block
    fn into_text(self) -> Result<String, LlmError> {
        let text: String = self
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .filter_map(|block| block.text)
            .collect();

        if text.is_empty() {
            return Err(LlmError::InvalidResponse(
                "Unexpected response format: no text content".to_string(),
            ));
        }
        Ok(text)
    }
}

impl AnthropicProvider {
    /// Create a provider from an explicit configuration
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::Configuration`] when the API key is empty or the
    /// HTTP client cannot be built.
    pub fn new(config: AnthropicConfig) -> Result<Self, LlmError> {
        if config.api_key.trim().is_empty() {
            return Err(LlmError::Configuration(format!(
                "API key not configured (set {})",
                API_KEY_ENV
            )));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| LlmError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Send one user message, optionally with a system prompt
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - The API cannot be reached after all retries
    /// - The model is unknown
    /// - The API keeps rate limiting
    /// - The response envelope has no text
    pub async fn complete(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        let url = format!("{}/v1/messages", self.config.endpoint.trim_end_matches('/'));

        let request_body = MessagesRequest {
            model: &self.config.model,
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            system,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
        };

        let max_attempts = self.config.max_retries.max(1);
        let mut attempts = 0;
        let mut last_error = None;

        while attempts < max_attempts {
            debug!(
                "Sending request to {} (model {}, attempt {})",
                url,
                self.config.model,
                attempts + 1
            );

            match self
                .client
                .post(&url)
                .header("x-api-key", &self.config.api_key)
                .header("anthropic-version", API_VERSION)
                .json(&request_body)
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();
                    if status.is_success() {
                        return response
                            .json::<MessagesResponse>()
                            .await
                            .map_err(|e| {
                                LlmError::InvalidResponse(format!("Failed to parse response: {}", e))
                            })?
                            .into_text();
                    }

                    if status == reqwest::StatusCode::NOT_FOUND {
                        return Err(LlmError::ModelNotAvailable(self.config.model.clone()));
                    }

                    let error_text = response
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());

                    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                        last_error = Some(LlmError::RateLimitExceeded);
                    } else if status.is_server_error() {
                        last_error = Some(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    } else {
                        // Client errors will not improve on retry
                        return Err(LlmError::Communication(format!(
                            "HTTP {}: {}",
                            status, error_text
                        )));
                    }
                }
                Err(e) => {
                    last_error = Some(LlmError::Communication(format!("Request failed: {}", e)));
                }
            }

            attempts += 1;
            if attempts < max_attempts {
                // Exponential backoff: 1s, 2s, 4s, etc.
                let delay = Duration::from_secs(2u64.pow(attempts - 1));
                warn!("LLM call failed, retrying in {}s", delay.as_secs());
                tokio::time::sleep(delay).await;
            }
        }

        Err(last_error
            .unwrap_or_else(|| LlmError::Communication("Max retries exceeded".to_string())))
    }

    fn block_on(&self, prompt: &str, system: Option<&str>) -> Result<String, LlmError> {
        // Blocking wrapper; callers run this off the async executor
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| LlmError::Other(format!("Failed to start runtime: {}", e)))?
            .block_on(self.complete(prompt, system))
    }
}

/// System prompt that pins the reply to a JSON schema
fn schema_system_prompt(schema: &str) -> String {
    format!(
        "Respond with a single JSON object that conforms to this schema:\n{}\n\
         Do not add any text before or after the JSON. Do not use markdown code fences.",
        schema
    )
}

impl LlmProviderTrait for AnthropicProvider {
    type Error = LlmError;

    fn generate(&self, prompt: &str) -> Result<String, Self::Error> {
        self.block_on(prompt, None)
    }

    fn generate_structured(&self, prompt: &str, schema: &str) -> Result<String, Self::Error> {
        let system = schema_system_prompt(schema);
        self.block_on(prompt, Some(&system))
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
