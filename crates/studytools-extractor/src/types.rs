//! Result types for extraction and generation

use std::fmt;
use studytools_domain::{ArtifactId, DeckMetadata, ExamPaper, FlashcardRecord, PaperDifficulty};

/// One strategy in the ordered fallback chain, in the order they are tried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryState {
    /// The whole response parsed as JSON
    WholeJson,
    /// The span from the first `{` to the last `}` parsed as JSON
    DelimitedJsonBlock,
    /// The brace span parsed after character and structural repair
    Sanitized,
    /// The collection array alone parsed out of the sanitized text
    ArraySubstring,
    /// `QUESTION:` / `ANSWER:` blocks matched in plain text
    DelimitedText,
}

impl RecoveryState {
    /// Stable name used in logs and error messages
    pub fn as_str(&self) -> &'static str {
        match self {
            RecoveryState::WholeJson => "WHOLE_JSON_PARSE",
            RecoveryState::DelimitedJsonBlock => "DELIMITED_JSON_BLOCK_EXTRACTION",
            RecoveryState::Sanitized => "TEXT_SANITIZATION",
            RecoveryState::ArraySubstring => "ARRAY_SUBSTRING_RECOVERY",
            RecoveryState::DelimitedText => "DELIMITED_TEXT_PATTERN_MATCH",
        }
    }
}

impl fmt::Display for RecoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flashcards recovered from one model response.
///
/// `records` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractionResult {
    /// Cards in response order
    pub records: Vec<FlashcardRecord>,

    /// Deck metadata, when the response carried any
    pub metadata: Option<DeckMetadata>,

    /// State that produced the records
    pub recovered_by: RecoveryState,
}

/// A regenerated paper recovered from one model response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaperExtraction {
    /// The paper
    pub paper: ExamPaper,

    /// State that produced the paper
    pub recovered_by: RecoveryState,
}

/// Output of a full flashcard generation run
#[derive(Debug, Clone)]
pub struct GeneratedDeck {
    /// Identifier of this deck
    pub id: ArtifactId,

    /// Cards in response order
    pub records: Vec<FlashcardRecord>,

    /// Deck metadata, when the response carried any
    pub metadata: Option<DeckMetadata>,

    /// State that produced the records
    pub recovered_by: RecoveryState,

    /// Name of the LLM model used
    pub model_name: String,

    /// Wall time of the whole run in milliseconds
    pub processing_time_ms: u64,
}

/// Output of a paper regeneration run
#[derive(Debug, Clone)]
pub struct GeneratedPaper {
    /// Identifier of this paper
    pub id: ArtifactId,

    /// Requested difficulty relative to the source paper
    pub difficulty: PaperDifficulty,

    /// The paper
    pub paper: ExamPaper,

    /// State that produced the paper
    pub recovered_by: RecoveryState,

    /// Name of the LLM model used
    pub model_name: String,

    /// Wall time of the whole run in milliseconds
    pub processing_time_ms: u64,
}
