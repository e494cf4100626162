//! Review command implementation.

use super::read_input;
use crate::cli::ReviewArgs;
use crate::error::Result;
use crate::output::Formatter;
use rand::rngs::StdRng;
use rand::SeedableRng;
use studytools_extractor::{extract, pick_review_cards};

/// Execute the review command: show a random subset of a saved deck.
pub fn execute_review(args: ReviewArgs, formatter: &Formatter) -> Result<()> {
    let raw = read_input(&args.input)?;
    let deck = extract(&raw)?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let picked = pick_review_cards(&deck.records, args.count, &mut rng)?;

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Reviewing {} of {} card(s)",
            picked.len(),
            deck.records.len()
        ))
    );
    println!("{}", formatter.format_cards(&picked, None)?);

    Ok(())
}
