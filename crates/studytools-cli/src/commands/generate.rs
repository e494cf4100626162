//! Generate command implementation.

use super::{build_request, read_input, write_text_deck};
use crate::cli::GenerateArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use studytools_extractor::Generator;
use studytools_llm::AnthropicProvider;

/// Execute the generate command.
pub async fn execute_generate(
    args: GenerateArgs,
    config: &Config,
    formatter: &Formatter,
) -> Result<()> {
    let text = read_input(&args.request.input)?;

    let mut generator_config = config.generator.clone();
    if let Some(contract) = args.request.contract {
        generator_config.contract = contract.into();
    }

    let provider = AnthropicProvider::new(config.provider_with_env_key()?)?;
    let generator = Generator::new(provider, generator_config)?;

    let request = build_request(&args.request, text);
    let deck = generator.generate_flashcards(request).await?;

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Deck {}: {} card(s) from {} via {} in {} ms",
            deck.id.short(),
            deck.records.len(),
            deck.model_name,
            deck.recovered_by,
            deck.processing_time_ms
        ))
    );
    if deck.records.len() < args.request.count {
        eprintln!(
            "{}",
            formatter.warning(&format!(
                "Asked for {} cards, model returned {}",
                args.request.count,
                deck.records.len()
            ))
        );
    }
    println!("{}", formatter.format_cards(&deck.records, deck.metadata.as_ref())?);

    if let Some(path) = args.output {
        write_text_deck(&path, &deck.records)?;
        eprintln!("{}", formatter.success(&format!("Saved to {}", path.display())));
    }

    Ok(())
}
