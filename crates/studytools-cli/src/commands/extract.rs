//! Extract command implementation.

use super::{read_input, write_text_deck};
use crate::cli::ExtractArgs;
use crate::error::Result;
use crate::output::Formatter;
use studytools_extractor::extract;

/// Execute the extract command: recover cards from a saved model response.
pub fn execute_extract(args: ExtractArgs, formatter: &Formatter) -> Result<()> {
    let raw = read_input(&args.input)?;
    let extraction = extract(&raw)?;

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Recovered {} flashcard(s) via {}",
            extraction.records.len(),
            extraction.recovered_by
        ))
    );
    println!(
        "{}",
        formatter.format_cards(&extraction.records, extraction.metadata.as_ref())?
    );

    if let Some(path) = args.output {
        write_text_deck(&path, &extraction.records)?;
        eprintln!("{}", formatter.success(&format!("Saved to {}", path.display())));
    }

    Ok(())
}
