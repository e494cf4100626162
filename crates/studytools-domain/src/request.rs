//! Generation requests

/// Default number of flashcards requested when the caller does not say
pub const DEFAULT_CARD_COUNT: usize = 10;

/// What the caller wants generated from a source document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Source text the cards are drawn from
    pub source_text: String,

    /// Number of items requested (at least 1)
    pub count: usize,

    /// Optional subject label, e.g. "Business Management"
    pub subject: Option<String>,

    /// Optional difficulty or tone label, e.g. "exam revision"
    pub difficulty: Option<String>,
}

impl GenerationRequest {
    /// Create a request with no subject or difficulty
    pub fn new(source_text: impl Into<String>, count: usize) -> Self {
        Self {
            source_text: source_text.into(),
            count,
            subject: None,
            difficulty: None,
        }
    }

    /// Set the subject label
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the difficulty/tone label
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    /// Check the request invariants: non-empty text, count of at least one
    pub fn validate(&self) -> Result<(), String> {
        if self.source_text.trim().is_empty() {
            return Err("source text is empty".to_string());
        }
        if self.count < 1 {
            return Err(format!("count must be at least 1, got {}", self.count));
        }
        Ok(())
    }
}
