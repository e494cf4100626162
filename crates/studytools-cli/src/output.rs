//! Output formatting for the CLI.

use crate::config::OutputFormat;
use crate::error::Result;
use colored::*;
use serde_json::{json, Value};
use studytools_domain::{DeckMetadata, ExamPaper, FlashcardRecord};
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style, Width},
};

/// Widest a question or answer cell may get in table output
const CELL_WIDTH: usize = 60;

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format a deck of flashcards.
    pub fn format_cards(
        &self,
        records: &[FlashcardRecord],
        metadata: Option<&DeckMetadata>,
    ) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&deck_json(records, metadata))?),
            OutputFormat::Table => Ok(self.format_cards_table(records)),
            OutputFormat::Text => Ok(render_text(records)),
        }
    }

    /// Format a regenerated paper.
    pub fn format_paper(&self, paper: &ExamPaper) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(&paper_json(paper))?),
            OutputFormat::Table => Ok(self.format_paper_table(paper)),
            OutputFormat::Text => Ok(render_paper_text(paper)),
        }
    }

    fn format_cards_table(&self, records: &[FlashcardRecord]) -> String {
        if records.is_empty() {
            return self.colorize("No flashcards.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["ID", "Question", "Answer", "Topic", "Difficulty"]);
        for record in records {
            builder.push_record([
                record.id.as_str(),
                record.question.as_str(),
                record.answer.as_str(),
                record.topic.as_deref().unwrap_or("-"),
                record.difficulty.map(|d| d.as_str()).unwrap_or("-"),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Width::wrap(CELL_WIDTH)))
            .with(Modify::new(Rows::first()).with(Alignment::center()));
        table.to_string()
    }

    fn format_paper_table(&self, paper: &ExamPaper) -> String {
        let mut builder = Builder::default();
        builder.push_record(["No.", "Question", "Marks"]);
        for question in &paper.questions {
            let marks = question.marks.map(|m| m.to_string()).unwrap_or_else(|| "-".to_string());
            builder.push_record([question.number.as_str(), question.text.as_str(), marks.as_str()]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Width::wrap(CELL_WIDTH)))
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        let title = paper.title.as_deref().unwrap_or("Regenerated paper");
        format!(
            "{}\n{}\nTotal marks: {}",
            self.colorize(title, "cyan"),
            table,
            paper.total_marks()
        )
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            "cyan" => text.cyan().to_string(),
            _ => text.to_string(),
        }
    }
}

/// Plain-text deck: one `Flashcard #n` / `Q:` / `A:` block per card.
pub fn render_text(records: &[FlashcardRecord]) -> String {
    let mut out = String::new();
    for (idx, record) in records.iter().enumerate() {
        out.push_str(&format!(
            "Flashcard #{}\nQ: {}\nA: {}\n\n",
            idx + 1,
            record.question,
            record.answer
        ));
    }
    out
}

fn render_paper_text(paper: &ExamPaper) -> String {
    let mut out = String::new();
    if let Some(title) = &paper.title {
        out.push_str(title);
        out.push_str("\n\n");
    }
    for question in &paper.questions {
        out.push_str(&format!("{}. {}", question.number, question.text));
        if let Some(marks) = question.marks {
            out.push_str(&format!(" [{} marks]", marks));
        }
        out.push('\n');
    }
    out
}

/// JSON deck in the same shape the model is asked for, so it can be read back.
fn deck_json(records: &[FlashcardRecord], metadata: Option<&DeckMetadata>) -> Value {
    let cards: Vec<Value> = records
        .iter()
        .map(|r| {
            let mut card = json!({
                "id": r.id,
                "question": r.question,
                "answer": r.answer,
            });
            if let Some(topic) = &r.topic {
                card["topic"] = json!(topic);
            }
            if let Some(difficulty) = r.difficulty {
                card["difficulty"] = json!(difficulty.as_str());
            }
            card
        })
        .collect();

    let mut deck = json!({ "flashcards": cards });
    if let Some(m) = metadata {
        deck["metadata"] = json!({
            "source": m.source,
            "subject": m.subject,
            "level": m.level,
            "topics": m.topics,
        });
    }
    deck
}

fn paper_json(paper: &ExamPaper) -> Value {
    let questions: Vec<Value> = paper
        .questions
        .iter()
        .map(|q| json!({ "question": q.text, "marks": q.marks }))
        .collect();
    json!({ "title": paper.title, "questions": questions })
}
