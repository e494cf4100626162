//! Recover structured records from model output
//!
//! Responses are run through an ordered chain of recovery states, stopping
//! at the first one that yields at least one valid record:
//!
//! 1. `WHOLE_JSON_PARSE`: the whole response as JSON
//! 2. `DELIMITED_JSON_BLOCK_EXTRACTION`: the span from the first `{` to the last `}`
//! 3. `TEXT_SANITIZATION`: that span after quote-aware repair
//! 4. `ARRAY_SUBSTRING_RECOVERY`: the collection array alone, cut out of the repaired text
//! 5. `DELIMITED_TEXT_PATTERN_MATCH`: `QUESTION:` / `ANSWER:` blocks (flashcards only)
//!
//! States 2 to 4 are skipped when the response has no brace span. Elements
//! that fail validation are dropped with a warning; a state that keeps no
//! element counts as failed.

use crate::delimited::question_answer_pairs;
use crate::error::ExtractorError;
use crate::prompt::truncate_chars;
use crate::sanitize::{brace_span, collection_array, sanitize};
use crate::types::{ExtractionResult, PaperExtraction, RecoveryState};
use serde_json::{Map, Value};
use std::collections::HashSet;
use studytools_domain::{CardDifficulty, DeckMetadata, ExamPaper, ExamQuestion, FlashcardRecord};
use tracing::{debug, info, warn};

/// Length of the response prefix carried by `ExtractionFailure`
pub const EXCERPT_CHARS: usize = 200;

/// Recover flashcards from a model response
pub fn extract(raw: &str) -> Result<ExtractionResult, ExtractorError> {
    let (deck, recovered_by) = recover::<CardDeck>(raw)?;
    Ok(ExtractionResult {
        records: deck.records,
        metadata: deck.metadata,
        recovered_by,
    })
}

/// Recover an exam paper from a model response
pub fn extract_paper(raw: &str) -> Result<PaperExtraction, ExtractorError> {
    let (paper, recovered_by) = recover::<ExamPaper>(raw)?;
    Ok(PaperExtraction {
        paper,
        recovered_by,
    })
}

/// A collection that the recovery chain can decode
pub(crate) trait Decode: Sized {
    /// Key of the record array in the root mapping
    const COLLECTION_KEY: &'static str;

    /// Decode a parsed root value; `None` unless at least one record survives
    fn decode(root: &Value) -> Option<Self>;

    /// Decode plain `QUESTION:` / `ANSWER:` text, for collections that accept it
    fn decode_delimited(_text: &str) -> Option<Self> {
        None
    }

    /// Whether `decode_delimited` is meaningful for this collection
    fn accepts_delimited_text() -> bool {
        false
    }

    /// Number of records decoded
    fn record_count(&self) -> usize;
}

pub(crate) fn recover<D: Decode>(raw: &str) -> Result<(D, RecoveryState), ExtractorError> {
    debug!(
        "Recovering '{}' from {} byte response",
        D::COLLECTION_KEY,
        raw.len()
    );
    let mut attempted = Vec::new();

    attempted.push(RecoveryState::WholeJson);
    if let Some(decoded) = parse_and_decode::<D>(raw) {
        return Ok(recovered(decoded, RecoveryState::WholeJson));
    }

    if let Some(span) = brace_span(raw) {
        attempted.push(RecoveryState::DelimitedJsonBlock);
        if let Some(decoded) = parse_and_decode::<D>(span) {
            return Ok(recovered(decoded, RecoveryState::DelimitedJsonBlock));
        }

        if let Some(sanitized) = sanitize(span) {
            attempted.push(RecoveryState::Sanitized);
            if let Some(decoded) = parse_and_decode::<D>(&sanitized) {
                return Ok(recovered(decoded, RecoveryState::Sanitized));
            }

            attempted.push(RecoveryState::ArraySubstring);
            if let Some(decoded) = decode_array_substring::<D>(&sanitized) {
                return Ok(recovered(decoded, RecoveryState::ArraySubstring));
            }
        }
    } else {
        debug!("No brace span in response, skipping JSON repair states");
    }

    if D::accepts_delimited_text() {
        attempted.push(RecoveryState::DelimitedText);
        if let Some(decoded) = D::decode_delimited(raw) {
            return Ok(recovered(decoded, RecoveryState::DelimitedText));
        }
    }

    warn!(
        "Extraction failed for '{}' after {} states",
        D::COLLECTION_KEY,
        attempted.len()
    );
    Err(ExtractorError::ExtractionFailure {
        attempted,
        excerpt: excerpt(raw),
    })
}

fn recovered<D: Decode>(decoded: D, state: RecoveryState) -> (D, RecoveryState) {
    info!(
        "Recovered {} '{}' records via {}",
        decoded.record_count(),
        D::COLLECTION_KEY,
        state
    );
    (decoded, state)
}

fn parse_and_decode<D: Decode>(text: &str) -> Option<D> {
    match serde_json::from_str::<Value>(text) {
        Ok(root) => D::decode(&root),
        Err(e) => {
            debug!("JSON parse failed: {}", e);
            None
        }
    }
}

fn decode_array_substring<D: Decode>(text: &str) -> Option<D> {
    let array = collection_array(text, D::COLLECTION_KEY)?;
    let items = match serde_json::from_str::<Value>(&array) {
        Ok(items @ Value::Array(_)) => items,
        Ok(_) => return None,
        Err(e) => {
            debug!("Array substring parse failed: {}", e);
            return None;
        }
    };
    let mut root = Map::new();
    root.insert(D::COLLECTION_KEY.to_string(), items);
    D::decode(&Value::Object(root))
}

/// Bounded, char-safe prefix of the trimmed response
fn excerpt(raw: &str) -> String {
    let trimmed = raw.trim();
    let head = truncate_chars(trimmed, EXCERPT_CHARS);
    if head.len() < trimmed.len() {
        format!("{}...", head)
    } else {
        head.to_string()
    }
}

/// Non-blank string value of `key`
fn text_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

fn required_string(obj: &Map<String, Value>, key: &str) -> Result<String, String> {
    match obj.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(_) => Err(format!("'{}' is not a string", key)),
        None => Err(format!("missing '{}'", key)),
    }
}

/// Recovered flashcards plus optional deck metadata
struct CardDeck {
    records: Vec<FlashcardRecord>,
    metadata: Option<DeckMetadata>,
}

/// A validated card before ids are settled
struct CardCandidate {
    explicit_id: Option<String>,
    record: FlashcardRecord,
}

impl Decode for CardDeck {
    const COLLECTION_KEY: &'static str = "flashcards";

    fn decode(root: &Value) -> Option<Self> {
        let root = root.as_object()?;
        let items = root.get(Self::COLLECTION_KEY)?.as_array()?;

        let mut candidates = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match parse_card(item) {
                Ok(candidate) => candidates.push(candidate),
                Err(reason) => warn!("MalformedRecordDropped: flashcard {}: {}", idx, reason),
            }
        }

        if candidates.is_empty() {
            return None;
        }

        Some(CardDeck {
            records: assign_ids(candidates),
            metadata: parse_metadata(root),
        })
    }

    fn decode_delimited(text: &str) -> Option<Self> {
        let records: Vec<FlashcardRecord> = question_answer_pairs(text)
            .into_iter()
            .enumerate()
            .map(|(idx, (question, answer))| {
                FlashcardRecord::new((idx + 1).to_string(), question, answer)
            })
            .collect();

        if records.is_empty() {
            return None;
        }
        Some(CardDeck {
            records,
            metadata: None,
        })
    }

    fn accepts_delimited_text() -> bool {
        true
    }

    fn record_count(&self) -> usize {
        self.records.len()
    }
}

fn parse_card(item: &Value) -> Result<CardCandidate, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| "element is not a JSON object".to_string())?;

    let mut record = FlashcardRecord::new(
        String::new(),
        required_string(obj, "question")?,
        required_string(obj, "answer")?,
    );
    record.validate()?;

    record.topic = text_field(obj, "topic");
    record.difficulty = obj
        .get("difficulty")
        .and_then(Value::as_str)
        .and_then(CardDifficulty::parse);

    // Only string ids are kept; anything else is backfilled
    Ok(CardCandidate {
        explicit_id: text_field(obj, "id"),
        record,
    })
}

/// Settle card ids.
///
/// Explicit ids are kept, first occurrence wins. A card with no usable id
/// gets its 1-based position among surviving cards, moved forward past any
/// number already taken.
fn assign_ids(candidates: Vec<CardCandidate>) -> Vec<FlashcardRecord> {
    let mut taken: HashSet<String> = HashSet::new();
    let explicit: Vec<Option<String>> = candidates
        .iter()
        .map(|c| c.explicit_id.clone().filter(|id| taken.insert(id.clone())))
        .collect();

    let mut records = Vec::with_capacity(candidates.len());
    for (idx, (candidate, id)) in candidates.into_iter().zip(explicit).enumerate() {
        let id = match id {
            Some(id) => id,
            None => {
                let mut n = idx + 1;
                while taken.contains(&n.to_string()) {
                    n += 1;
                }
                let id = n.to_string();
                taken.insert(id.clone());
                id
            }
        };

        records.push(FlashcardRecord {
            id,
            ..candidate.record
        });
    }

    records
}

fn parse_metadata(root: &Map<String, Value>) -> Option<DeckMetadata> {
    let obj = root.get("metadata")?.as_object()?;
    let topics = obj
        .get("topics")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    let metadata = DeckMetadata {
        source: text_field(obj, "source"),
        subject: text_field(obj, "subject"),
        level: text_field(obj, "level"),
        topics,
    };

    (!metadata.is_empty()).then_some(metadata)
}

impl Decode for ExamPaper {
    const COLLECTION_KEY: &'static str = "questions";

    fn decode(root: &Value) -> Option<Self> {
        let root = root.as_object()?;
        let items = root.get(Self::COLLECTION_KEY)?.as_array()?;

        let mut questions = Vec::with_capacity(items.len());
        for (idx, item) in items.iter().enumerate() {
            match parse_question(item, questions.len() + 1) {
                Ok(question) => questions.push(question),
                Err(reason) => warn!("MalformedRecordDropped: question {}: {}", idx, reason),
            }
        }

        if questions.is_empty() {
            return None;
        }

        Some(ExamPaper {
            title: text_field(root, "title"),
            questions,
        })
    }

    fn record_count(&self) -> usize {
        self.questions.len()
    }
}

fn parse_question(item: &Value, number: usize) -> Result<ExamQuestion, String> {
    let obj = item
        .as_object()
        .ok_or_else(|| "element is not a JSON object".to_string())?;

    let text = required_string(obj, "question")?;
    if text.trim().is_empty() {
        return Err("question is empty".to_string());
    }

    Ok(ExamQuestion {
        number: number.to_string(),
        text,
        marks: obj.get("marks").and_then(parse_marks),
    })
}

/// Positive mark count from a number or a numeric string
fn parse_marks(value: &Value) -> Option<u32> {
    let marks = match value {
        Value::Number(n) => n.as_u64().and_then(|m| u32::try_from(m).ok()),
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }?;
    (marks > 0).then_some(marks)
}
