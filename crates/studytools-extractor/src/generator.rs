//! Generator: prompt, provider call, recovery

use crate::config::GeneratorConfig;
use crate::error::ExtractorError;
use crate::parser::{extract, extract_paper};
use crate::prompt::{PaperPromptBuilder, PromptBuilder, PAPER_SCHEMA};
use crate::types::{GeneratedDeck, GeneratedPaper};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use studytools_domain::traits::LlmProvider;
use studytools_domain::{ArtifactId, GenerationRequest, PaperDifficulty, SourceDocument};
use tokio::time::timeout;
use tracing::{debug, info};

/// Turns source text into flashcards or a regenerated paper through an LLM
///
/// Provider calls are blocking and run on the blocking pool. When the
/// generation timeout elapses the caller gets [`ExtractorError::Timeout`],
/// but the provider call is not cancelled: it keeps running in the
/// background, transport retries and backoff included, until it returns.
/// Its result is then discarded.
pub struct Generator<L>
where
    L: LlmProvider,
{
    llm_provider: Arc<L>,
    config: GeneratorConfig,
    model_name: String,
}

impl<L> Generator<L>
where
    L: LlmProvider + Send + Sync + 'static,
    L::Error: std::fmt::Display,
{
    /// Create a new Generator
    ///
    /// # Errors
    ///
    /// [`ExtractorError::Config`] when the configuration does not validate.
    pub fn new(llm_provider: L, config: GeneratorConfig) -> Result<Self, ExtractorError> {
        config.validate().map_err(ExtractorError::Config)?;
        let model_name = llm_provider.model_name().to_string();
        Ok(Self {
            llm_provider: Arc::new(llm_provider),
            config,
            model_name,
        })
    }

    /// Active configuration
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate a flashcard deck from the request's source text
    pub async fn generate_flashcards(
        &self,
        request: GenerationRequest,
    ) -> Result<GeneratedDeck, ExtractorError> {
        let start_time = SystemTime::now();
        request.validate().map_err(ExtractorError::InvalidArgument)?;

        let text = normalize(&request.source_text)?;
        info!(
            "Generating {} flashcards from {} chars of source text",
            request.count,
            text.chars().count()
        );

        let mut builder = PromptBuilder::new(text, request.count)
            .with_contract(self.config.contract)
            .with_max_source_chars(self.config.max_source_chars);
        if let Some(subject) = request.subject {
            builder = builder.with_subject(subject);
        }
        if let Some(difficulty) = request.difficulty {
            builder = builder.with_difficulty(difficulty);
        }
        let prompt = builder.build()?;
        debug!("Prompt length: {} chars", prompt.len());

        let response = self.call_llm(prompt, builder.schema()).await?;
        let extraction = extract(&response)?;

        let processing_time_ms = elapsed_ms(start_time);
        info!(
            "Generated {} flashcards via {} in {} ms",
            extraction.records.len(),
            extraction.recovered_by,
            processing_time_ms
        );

        Ok(GeneratedDeck {
            id: ArtifactId::new(),
            records: extraction.records,
            metadata: extraction.metadata,
            recovered_by: extraction.recovered_by,
            model_name: self.model_name.clone(),
            processing_time_ms,
        })
    }

    /// Regenerate an exam paper at the requested relative difficulty
    pub async fn regenerate_paper(
        &self,
        source_text: &str,
        difficulty: PaperDifficulty,
    ) -> Result<GeneratedPaper, ExtractorError> {
        let start_time = SystemTime::now();
        let text = normalize(source_text)?;
        info!(
            "Regenerating paper ({}) from {} chars of source text",
            difficulty.as_str(),
            text.chars().count()
        );

        let prompt = PaperPromptBuilder::new(text, difficulty)
            .with_max_source_chars(self.config.max_source_chars)
            .build()?;
        debug!("Prompt length: {} chars", prompt.len());

        let response = self.call_llm(prompt, Some(PAPER_SCHEMA)).await?;
        let extraction = extract_paper(&response)?;

        let processing_time_ms = elapsed_ms(start_time);
        info!(
            "Regenerated paper with {} questions via {} in {} ms",
            extraction.paper.questions.len(),
            extraction.recovered_by,
            processing_time_ms
        );

        Ok(GeneratedPaper {
            id: ArtifactId::new(),
            difficulty,
            paper: extraction.paper,
            recovered_by: extraction.recovered_by,
            model_name: self.model_name.clone(),
            processing_time_ms,
        })
    }

    /// Call the LLM on a blocking task, bounded by the generation timeout
    async fn call_llm(
        &self,
        prompt: String,
        schema: Option<&'static str>,
    ) -> Result<String, ExtractorError> {
        let llm = Arc::clone(&self.llm_provider);

        // LlmProvider is not async
        let task = tokio::task::spawn_blocking(move || {
            let response = match schema {
                Some(schema) => llm.generate_structured(&prompt, schema),
                None => llm.generate(&prompt),
            };
            response.map_err(|e| ExtractorError::Llm(e.to_string()))
        });

        let response = timeout(self.config.generation_timeout(), task)
            .await
            .map_err(|_| ExtractorError::Timeout)?
            .map_err(|e| ExtractorError::Llm(format!("Task join error: {}", e)))??;

        debug!("LLM response ({} chars): {}", response.len(), response);
        Ok(response)
    }
}

fn normalize(source_text: &str) -> Result<String, ExtractorError> {
    let document = SourceDocument::new(source_text);
    let text = document
        .normalized()
        .map_err(ExtractorError::InvalidArgument)?;
    debug!("Normalized source: {} -> {} bytes", document.byte_len(), text.len());
    Ok(text)
}

fn elapsed_ms(start_time: SystemTime) -> u64 {
    start_time
        .elapsed()
        .unwrap_or(Duration::from_secs(0))
        .as_millis() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputContract;
    use studytools_llm::MockProvider;

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = GeneratorConfig {
            max_source_chars: 0,
            ..Default::default()
        };
        let result = Generator::new(MockProvider::default(), config);
        assert!(matches!(result, Err(ExtractorError::Config(_))));
    }

    #[test]
    fn test_model_name_taken_from_provider() {
        let provider = MockProvider::default().with_model_name("test-model");
        let generator = Generator::new(provider, GeneratorConfig::default()).unwrap();
        assert_eq!(generator.model_name, "test-model");
        assert_eq!(generator.config().contract, OutputContract::JsonWithMetadata);
    }

    #[tokio::test]
    async fn test_invalid_request_makes_no_call() {
        let provider = MockProvider::default();
        let generator = Generator::new(provider.clone(), GeneratorConfig::default()).unwrap();

        let result = generator
            .generate_flashcards(GenerationRequest::new("   \n\t ", 5))
            .await;
        assert!(matches!(result, Err(ExtractorError::InvalidArgument(_))));

        let result = generator
            .generate_flashcards(GenerationRequest::new("Some notes", 0))
            .await;
        assert!(matches!(result, Err(ExtractorError::InvalidArgument(_))));

        assert_eq!(provider.call_count(), 0);
    }
}
