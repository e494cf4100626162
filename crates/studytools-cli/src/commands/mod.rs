//! Command implementations.

pub mod config;
pub mod extract;
pub mod generate;
pub mod paper;
pub mod prompt;
pub mod review;

pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::generate::execute_generate;
pub use self::paper::execute_paper;
pub use self::prompt::execute_prompt;
pub use self::review::execute_review;

use crate::cli::CardRequestArgs;
use crate::error::Result;
use std::fs;
use std::io::{self, Read};
use std::path::Path;
use studytools_domain::{FlashcardRecord, GenerationRequest};

/// Read a file, or stdin when `input` is "-".
pub fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(buffer)
    } else {
        Ok(fs::read_to_string(input)?)
    }
}

/// Build a generation request from command-line arguments and source text.
pub fn build_request(args: &CardRequestArgs, source_text: String) -> GenerationRequest {
    let mut request = GenerationRequest::new(source_text, args.count);
    request.subject = args.subject.clone();
    request.difficulty = args.difficulty.clone();
    request
}

/// Write the plain-text rendering of a deck.
pub fn write_text_deck(path: &Path, records: &[FlashcardRecord]) -> Result<()> {
    fs::write(path, crate::output::render_text(records))?;
    Ok(())
}
