//! Paper command implementation.

use super::read_input;
use crate::cli::PaperArgs;
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use studytools_extractor::Generator;
use studytools_llm::AnthropicProvider;

/// Execute the paper command.
pub async fn execute_paper(args: PaperArgs, config: &Config, formatter: &Formatter) -> Result<()> {
    let text = read_input(&args.input)?;

    let provider = AnthropicProvider::new(config.provider_with_env_key()?)?;
    let generator = Generator::new(provider, config.generator.clone())?;
    let generated = generator.regenerate_paper(&text, args.difficulty.into()).await?;

    eprintln!(
        "{}",
        formatter.info(&format!(
            "Paper {} ({}): {} question(s) via {} in {} ms",
            generated.id.short(),
            generated.difficulty.as_str(),
            generated.paper.questions.len(),
            generated.recovered_by,
            generated.processing_time_ms
        ))
    );
    println!("{}", formatter.format_paper(&generated.paper)?);

    Ok(())
}
