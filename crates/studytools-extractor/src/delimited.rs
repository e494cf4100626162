//! `QUESTION:` / `ANSWER:` block matching for plain-text responses

use regex::Regex;
use std::sync::LazyLock;

/// A question marker, then the shortest run up to the next answer marker
static QUESTION_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)QUESTION:\s*(.*?)\s*ANSWER:").expect("question block regex")
});

static QUESTION_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"QUESTION:").expect("question marker regex"));

/// Trimmed (question, answer) pairs in response order.
///
/// An answer runs until the next `QUESTION:` marker or the end of the text.
/// Pairs where either side is blank after trimming are skipped.
pub(crate) fn question_answer_pairs(text: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    let mut pos = 0;

    while let Some(caps) = QUESTION_BLOCK.captures_at(text, pos) {
        let Some(block) = caps.get(0) else { break };
        let question = caps.get(1).map_or("", |m| m.as_str()).trim();

        let answer_start = block.end();
        let answer_end = QUESTION_MARKER
            .find_at(text, answer_start)
            .map_or(text.len(), |m| m.start());
        let answer = text[answer_start..answer_end].trim();

        if !question.is_empty() && !answer.is_empty() {
            pairs.push((question.to_string(), answer.to_string()));
        }
        pos = answer_end;
    }

    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_blocks() {
        let text = "QUESTION: What is 2+2?\nANSWER: 4\n\nQUESTION: Capital of France?\nANSWER: Paris";
        let pairs = question_answer_pairs(text);
        assert_eq!(
            pairs,
            vec![
                ("What is 2+2?".to_string(), "4".to_string()),
                ("Capital of France?".to_string(), "Paris".to_string()),
            ]
        );
    }

    #[test]
    fn test_multiline_answer_and_preamble() {
        let text = "Here are your cards.\n\nQUESTION: Name two primes\nANSWER: 2\nand 3\n";
        let pairs = question_answer_pairs(text);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].1, "2\nand 3");
    }

    #[test]
    fn test_blank_pairs_skipped() {
        let text = "QUESTION: \nANSWER: orphan\nQUESTION: Real?\nANSWER: Yes\nQUESTION: Empty\nANSWER:   ";
        let pairs = question_answer_pairs(text);
        assert_eq!(pairs, vec![("Real?".to_string(), "Yes".to_string())]);
    }

    #[test]
    fn test_no_markers() {
        assert!(question_answer_pairs("I cannot help with that.").is_empty());
        assert!(question_answer_pairs("QUESTION: dangling with no answer").is_empty());
    }
}
