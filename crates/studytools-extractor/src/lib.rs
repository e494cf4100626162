//! StudyTools Extractor
//!
//! Builds flashcard and exam-paper prompts, and recovers structured records
//! from whatever the language model sends back.
//!
//! # Overview
//!
//! Model output is untrusted. It may be clean JSON, JSON wrapped in prose or
//! markdown fences, almost-JSON with trailing commas and raw line breaks
//! inside strings, a truncated array, or plain `QUESTION:` / `ANSWER:` text.
//! [`extract`] walks an ordered chain of [`RecoveryState`]s and stops at the
//! first one that yields at least one valid card.
//!
//! # Architecture
//!
//! ```text
//! Source text → PromptBuilder → LlmProvider → extract → FlashcardRecords
//! ```
//!
//! # Example Usage
//!
//! ```no_run
//! use studytools_extractor::{Generator, GeneratorConfig};
//! use studytools_domain::GenerationRequest;
//! use studytools_llm::MockProvider;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = MockProvider::new(r#"{"flashcards": [{"id": "1", "question": "Q", "answer": "A"}]}"#);
//! let generator = Generator::new(llm, GeneratorConfig::default())?;
//!
//! let request = GenerationRequest::new("Define opportunity cost. (2 marks)", 5);
//! let deck = generator.generate_flashcards(request).await?;
//!
//! println!("{} cards via {}", deck.records.len(), deck.recovered_by);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod config;
mod delimited;
mod error;
mod generator;
mod parser;
mod prompt;
mod review;
mod sanitize;
mod types;

#[cfg(test)]
mod tests;

pub use config::{GeneratorConfig, OutputContract};
pub use error::ExtractorError;
pub use generator::Generator;
pub use parser::{extract, extract_paper, EXCERPT_CHARS};
pub use prompt::{
    truncate_chars, PaperPromptBuilder, PromptBuilder, DEFAULT_MAX_SOURCE_CHARS,
    FLASHCARD_METADATA_SCHEMA, FLASHCARD_SCHEMA, PAPER_SCHEMA,
};
pub use review::pick_review_cards;
pub use types::{ExtractionResult, GeneratedDeck, GeneratedPaper, PaperExtraction, RecoveryState};
