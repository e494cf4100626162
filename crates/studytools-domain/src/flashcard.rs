//! Flashcards - the validated output unit

/// Difficulty tag a model may attach to a card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardDifficulty {
    /// Recall of a single fact or definition
    Easy,

    /// Application of a concept
    Medium,

    /// Analysis or evaluation
    Hard,
}

impl CardDifficulty {
    /// Lowercase name used in the JSON contract
    pub fn as_str(&self) -> &'static str {
        match self {
            CardDifficulty::Easy => "easy",
            CardDifficulty::Medium => "medium",
            CardDifficulty::Hard => "hard",
        }
    }

    /// Parse leniently (case and surrounding whitespace ignored)
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "easy" => Some(CardDifficulty::Easy),
            "medium" => Some(CardDifficulty::Medium),
            "hard" => Some(CardDifficulty::Hard),
            _ => None,
        }
    }
}

impl std::str::FromStr for CardDifficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid difficulty: {}", s))
    }
}

/// A single question/answer pair.
///
/// Question and answer are never blank; the identifier is unique within the
/// response it was recovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlashcardRecord {
    /// Identifier, either supplied by the model or assigned sequentially
    pub id: String,

    /// Question text
    pub question: String,

    /// Answer text
    pub answer: String,

    /// Topic the card belongs to, when the model reported one
    pub topic: Option<String>,

    /// Difficulty, when the model reported a recognised one
    pub difficulty: Option<CardDifficulty>,
}

impl FlashcardRecord {
    /// Create a card without topic or difficulty
    pub fn new(
        id: impl Into<String>,
        question: impl Into<String>,
        answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            question: question.into(),
            answer: answer.into(),
            topic: None,
            difficulty: None,
        }
    }

    /// Check that question and answer both carry text
    pub fn validate(&self) -> Result<(), String> {
        if self.question.trim().is_empty() {
            return Err("question is empty".to_string());
        }
        if self.answer.trim().is_empty() {
            return Err("answer is empty".to_string());
        }
        Ok(())
    }
}

/// Deck-level metadata from the richer JSON contract
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckMetadata {
    /// Where the content came from, e.g. "Past Paper Content"
    pub source: Option<String>,

    /// Academic subject
    pub subject: Option<String>,

    /// Academic level (high school, undergraduate, ...)
    pub level: Option<String>,

    /// Topics covered by the deck
    pub topics: Vec<String>,
}

impl DeckMetadata {
    /// True when no field carries anything
    pub fn is_empty(&self) -> bool {
        self.source.is_none()
            && self.subject.is_none()
            && self.level.is_none()
            && self.topics.is_empty()
    }
}
