//! Prompt command implementation.

use super::{build_request, read_input};
use crate::cli::{CardRequestArgs, PromptArgs};
use crate::config::Config;
use crate::error::{CliError, Result};
use studytools_domain::SourceDocument;
use studytools_extractor::PromptBuilder;

/// Execute the prompt command: print the prompt without calling a model.
pub fn execute_prompt(args: PromptArgs, config: &Config) -> Result<()> {
    let text = read_input(&args.request.input)?;
    println!("{}", render_prompt(&args.request, &text, config)?);
    Ok(())
}

/// The exact prompt `generate` would send for this request and source text.
fn render_prompt(args: &CardRequestArgs, source_text: &str, config: &Config) -> Result<String> {
    let text = SourceDocument::new(source_text)
        .normalized()
        .map_err(CliError::InvalidInput)?;
    let contract = args.contract.map(Into::into).unwrap_or(config.generator.contract);

    let request = build_request(args, text);
    let prompt = PromptBuilder::from_request(&request)
        .with_contract(contract)
        .with_max_source_chars(config.generator.max_source_chars)
        .build()?;
    Ok(prompt)
}
