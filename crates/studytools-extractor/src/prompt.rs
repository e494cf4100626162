//! Prompt construction for flashcard generation and paper regeneration

use crate::config::OutputContract;
use crate::error::ExtractorError;
use studytools_domain::{GenerationRequest, PaperDifficulty};

/// Default cap on source text forwarded to the model, in characters
pub const DEFAULT_MAX_SOURCE_CHARS: usize = 4000;

/// Schema advertised for [`OutputContract::Json`]
pub const FLASHCARD_SCHEMA: &str = r#"{
  "flashcards": [
    {"id": "string", "question": "string", "answer": "string"}
  ]
}"#;

/// Schema advertised for [`OutputContract::JsonWithMetadata`]
pub const FLASHCARD_METADATA_SCHEMA: &str = r#"{
  "metadata": {
    "source": "string",
    "subject": "string",
    "level": "string",
    "topics": ["string"]
  },
  "flashcards": [
    {
      "id": "string",
      "question": "string",
      "answer": "string",
      "topic": "string",
      "difficulty": "easy|medium|hard"
    }
  ]
}"#;

/// Schema advertised for regenerated papers
pub const PAPER_SCHEMA: &str = r#"{
  "title": "string",
  "questions": [
    {"question": "string", "marks": 0}
  ]
}"#;

/// Longest prefix of `text` holding at most `max_chars` characters.
///
/// Never splits a multi-byte character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Builds flashcard generation prompts
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    text: String,
    count: usize,
    subject: Option<String>,
    difficulty: Option<String>,
    contract: OutputContract,
    max_source_chars: usize,
}

impl PromptBuilder {
    /// Create a new prompt builder
    pub fn new(text: impl Into<String>, count: usize) -> Self {
        Self {
            text: text.into(),
            count,
            subject: None,
            difficulty: None,
            contract: OutputContract::default(),
            max_source_chars: DEFAULT_MAX_SOURCE_CHARS,
        }
    }

    /// Start from a generation request
    pub fn from_request(request: &GenerationRequest) -> Self {
        Self {
            subject: request.subject.clone(),
            difficulty: request.difficulty.clone(),
            ..Self::new(request.source_text.clone(), request.count)
        }
    }

    /// Name the subject the cards should be about
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Ask for a particular difficulty or tone
    pub fn with_difficulty(mut self, difficulty: impl Into<String>) -> Self {
        self.difficulty = Some(difficulty.into());
        self
    }

    /// Choose the output contract
    pub fn with_contract(mut self, contract: OutputContract) -> Self {
        self.contract = contract;
        self
    }

    /// Change how much source text is forwarded
    pub fn with_max_source_chars(mut self, max_source_chars: usize) -> Self {
        self.max_source_chars = max_source_chars;
        self
    }

    /// Schema to pass alongside the prompt, if the contract declares one
    pub fn schema(&self) -> Option<&'static str> {
        match self.contract {
            OutputContract::Delimited => None,
            OutputContract::Json => Some(FLASHCARD_SCHEMA),
            OutputContract::JsonWithMetadata => Some(FLASHCARD_METADATA_SCHEMA),
        }
    }

    /// Build the complete prompt
    ///
    /// # Errors
    ///
    /// [`ExtractorError::InvalidArgument`] for an empty source text or a
    /// count below one.
    pub fn build(&self) -> Result<String, ExtractorError> {
        if self.text.trim().is_empty() {
            return Err(ExtractorError::InvalidArgument(
                "Cannot generate flashcards from empty text".to_string(),
            ));
        }
        if self.count < 1 {
            return Err(ExtractorError::InvalidArgument(
                "Flashcard count must be at least 1".to_string(),
            ));
        }

        let mut prompt = String::new();

        // 1. Task
        let subject_str = self
            .subject
            .as_deref()
            .map(|s| format!(" on the subject of {}", s))
            .unwrap_or_default();
        prompt.push_str(&format!(
            "Your task is to create {} high-quality flashcards from the following past paper content{}.\n",
            self.count, subject_str
        ));
        if let Some(difficulty) = &self.difficulty {
            prompt.push_str(&format!("Pitch the flashcards at this difficulty: {}.\n", difficulty));
        }
        prompt.push('\n');

        // 2. Card guidelines
        prompt.push_str(CARD_GUIDELINES);
        prompt.push_str("\n\n");

        // 3. Output contract
        match self.contract {
            OutputContract::Delimited => prompt.push_str(DELIMITED_FORMAT),
            OutputContract::Json | OutputContract::JsonWithMetadata => {
                prompt.push_str(JSON_FORMAT_INTRO);
                prompt.push('\n');
                prompt.push_str(self.schema().unwrap_or(FLASHCARD_SCHEMA));
                prompt.push_str("\n\n");
                prompt.push_str(JSON_FORMAT_RULES);
            }
        }
        prompt.push_str("\n\n");

        // 4. Source text
        prompt.push_str(SOURCE_INTRO);
        prompt.push_str("\n---\n");
        prompt.push_str(truncate_chars(&self.text, self.max_source_chars));
        prompt.push_str("\n---\n");

        Ok(prompt)
    }
}

/// Builds exam-paper regeneration prompts
#[derive(Debug, Clone)]
pub struct PaperPromptBuilder {
    text: String,
    difficulty: PaperDifficulty,
    max_source_chars: usize,
}

impl PaperPromptBuilder {
    /// Create a builder for the given source paper text
    pub fn new(text: impl Into<String>, difficulty: PaperDifficulty) -> Self {
        Self {
            text: text.into(),
            difficulty,
            max_source_chars: DEFAULT_MAX_SOURCE_CHARS,
        }
    }

    /// Change how much source text is forwarded
    pub fn with_max_source_chars(mut self, max_source_chars: usize) -> Self {
        self.max_source_chars = max_source_chars;
        self
    }

    /// Build the complete prompt
    pub fn build(&self) -> Result<String, ExtractorError> {
        if self.text.trim().is_empty() {
            return Err(ExtractorError::InvalidArgument(
                "Cannot regenerate a paper from empty text".to_string(),
            ));
        }

        let mut prompt = String::new();
        prompt.push_str(PAPER_TASK);
        prompt.push('\n');
        prompt.push_str(difficulty_instruction(self.difficulty));
        prompt.push_str("\n\n");
        prompt.push_str(JSON_FORMAT_INTRO);
        prompt.push('\n');
        prompt.push_str(PAPER_SCHEMA);
        prompt.push_str("\n\n");
        prompt.push_str(JSON_FORMAT_RULES);
        prompt.push_str("\n\n");
        prompt.push_str("Original paper:\n---\n");
        prompt.push_str(truncate_chars(&self.text, self.max_source_chars));
        prompt.push_str("\n---\n");
        Ok(prompt)
    }
}

fn difficulty_instruction(difficulty: PaperDifficulty) -> &'static str {
    match difficulty {
        PaperDifficulty::Easier => {
            "Make every question easier than its original counterpart: simpler command words, more scaffolding, fewer marks per step."
        }
        PaperDifficulty::Same => {
            "Keep every question at the same difficulty and mark allocation as its original counterpart."
        }
        PaperDifficulty::Harder => {
            "Make every question harder than its original counterpart: higher-order command words (analyse, evaluate), less scaffolding."
        }
    }
}

const CARD_GUIDELINES: &str = r#"Each flashcard should:
1. Focus on key concepts, definitions, or problem-solving techniques
2. Have a clear, concise question
3. Provide a comprehensive but succinct answer
4. Cover different topics from the content to ensure broad understanding
5. Use the subject-specific terminology found in the content"#;

const DELIMITED_FORMAT: &str = r#"Format each flashcard exactly as:
QUESTION: [question text]
ANSWER: [answer text]"#;

const JSON_FORMAT_INTRO: &str = "Return a single JSON object in exactly this format:";

const JSON_FORMAT_RULES: &str = r#"Rules:
- Return ONLY valid JSON, no markdown code blocks, no explanations before or after it
- Escape quotes and newlines inside string values
- Separate array elements with commas and do not leave trailing commas"#;

const SOURCE_INTRO: &str =
    "Do not search for additional information. Only use the content provided below:";

const PAPER_TASK: &str = "Your task is to write a new exam paper modelled on the past paper below. \
Cover the same topics and follow the same structure, but write fresh questions; do not copy the originals.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_prompt_contents() {
        let prompt = PromptBuilder::new("Define delegation. (2)", 8)
            .with_subject("Business Management")
            .with_contract(OutputContract::Delimited)
            .build()
            .unwrap();

        assert!(prompt.contains("create 8 high-quality flashcards"));
        assert!(prompt.contains("on the subject of Business Management"));
        assert!(prompt.contains("QUESTION: [question text]"));
        assert!(prompt.contains("ANSWER: [answer text]"));
        assert!(prompt.contains("Define delegation. (2)"));
        assert!(!prompt.contains("\"flashcards\""));
    }

    #[test]
    fn test_json_prompt_embeds_schema() {
        let builder = PromptBuilder::new("text", 3).with_contract(OutputContract::Json);
        let prompt = builder.build().unwrap();

        assert!(prompt.contains(FLASHCARD_SCHEMA));
        assert!(prompt.contains("Return ONLY valid JSON"));
        assert_eq!(builder.schema(), Some(FLASHCARD_SCHEMA));
    }

    #[test]
    fn test_metadata_prompt_is_default() {
        let builder = PromptBuilder::new("text", 3);
        let prompt = builder.build().unwrap();

        assert!(prompt.contains("\"metadata\""));
        assert!(prompt.contains("easy|medium|hard"));
        assert_eq!(builder.schema(), Some(FLASHCARD_METADATA_SCHEMA));
    }

    #[test]
    fn test_delimited_has_no_schema() {
        let builder = PromptBuilder::new("text", 1).with_contract(OutputContract::Delimited);
        assert_eq!(builder.schema(), None);
    }

    #[test]
    fn test_difficulty_interpolated() {
        let prompt = PromptBuilder::new("text", 2)
            .with_difficulty("exam revision")
            .build()
            .unwrap();
        assert!(prompt.contains("difficulty: exam revision."));
    }

    #[test]
    fn test_no_subject_clause_without_subject() {
        let prompt = PromptBuilder::new("text", 2).build().unwrap();
        assert!(!prompt.contains("on the subject of"));
    }

    #[test]
    fn test_zero_count_is_invalid() {
        let result = PromptBuilder::new("text", 0).build();
        assert!(matches!(result, Err(ExtractorError::InvalidArgument(_))));
    }

    #[test]
    fn test_empty_text_is_invalid() {
        let result = PromptBuilder::new("  \n", 5).build();
        assert!(matches!(result, Err(ExtractorError::InvalidArgument(_))));
    }

    #[test]
    fn test_source_text_truncated() {
        let text = format!("{}{}", "a".repeat(4000), "TAIL");
        let prompt = PromptBuilder::new(text, 1).build().unwrap();
        assert!(prompt.contains(&"a".repeat(4000)));
        assert!(!prompt.contains("TAIL"));
    }

    #[test]
    fn test_custom_truncation_limit() {
        let prompt = PromptBuilder::new("abcdefghij", 1)
            .with_max_source_chars(4)
            .build()
            .unwrap();
        assert!(prompt.contains("\n---\nabcd\n---\n"));
    }

    #[test]
    fn test_truncate_chars_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語テキスト", 3), "日本語");
        assert_eq!(truncate_chars("short", 100), "short");
        assert_eq!(truncate_chars("", 3), "");
    }

    #[test]
    fn test_from_request() {
        let request = GenerationRequest::new("Herzberg two-factor theory", 4)
            .with_subject("Business")
            .with_difficulty("hard");
        let prompt = PromptBuilder::from_request(&request).build().unwrap();
        assert!(prompt.contains("create 4 high-quality flashcards"));
        assert!(prompt.contains("on the subject of Business"));
        assert!(prompt.contains("difficulty: hard."));
        assert!(prompt.contains("Herzberg two-factor theory"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = PromptBuilder::new("same input", 3).with_subject("Economics");
        assert_eq!(builder.build().unwrap(), builder.build().unwrap());
    }

    #[test]
    fn test_paper_prompt() {
        let prompt = PaperPromptBuilder::new("1 Define motivation (2)", PaperDifficulty::Harder)
            .build()
            .unwrap();
        assert!(prompt.contains("harder than its original"));
        assert!(prompt.contains(PAPER_SCHEMA));
        assert!(prompt.contains("1 Define motivation (2)"));
    }

    #[test]
    fn test_paper_prompt_difficulty_variants() {
        let easier = PaperPromptBuilder::new("x", PaperDifficulty::Easier).build().unwrap();
        let same = PaperPromptBuilder::new("x", PaperDifficulty::Same).build().unwrap();
        assert!(easier.contains("easier than its original"));
        assert!(same.contains("same difficulty"));
    }

    #[test]
    fn test_paper_prompt_rejects_empty_text() {
        let result = PaperPromptBuilder::new("", PaperDifficulty::Same).build();
        assert!(matches!(result, Err(ExtractorError::InvalidArgument(_))));
    }
}
