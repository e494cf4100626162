//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// StudyTools - Turn past papers and notes into flashcards and mock papers.
#[derive(Debug, Parser)]
#[command(name = "studytools")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true)]
    pub format: Option<CliFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output (including raw model responses) to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// Plain text, one "Flashcard #n" block per card
    Text,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the prompt that would be sent for a flashcard request
    Prompt(PromptArgs),

    /// Recover flashcards from a saved model response
    Extract(ExtractArgs),

    /// Generate flashcards from source text
    Generate(GenerateArgs),

    /// Regenerate an exam paper at a different difficulty
    Paper(PaperArgs),

    /// Pick a random subset of a deck for review
    Review(ReviewArgs),

    /// Inspect or create the configuration file
    Config(ConfigArgs),
}

/// Arguments describing a flashcard request.
#[derive(Debug, Parser)]
pub struct CardRequestArgs {
    /// Source text file ("-" reads stdin)
    pub input: String,

    /// Number of flashcards to ask for
    #[arg(short = 'n', long, default_value_t = studytools_domain::request::DEFAULT_CARD_COUNT)]
    pub count: usize,

    /// Subject the cards should be about
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Difficulty or tone to aim for
    #[arg(short, long)]
    pub difficulty: Option<String>,

    /// Output contract to request (overrides the config file)
    #[arg(long, value_enum)]
    pub contract: Option<ContractArg>,
}

/// Arguments for the prompt command.
#[derive(Debug, Parser)]
pub struct PromptArgs {
    #[command(flatten)]
    pub request: CardRequestArgs,
}

/// Arguments for the extract command.
#[derive(Debug, Parser)]
pub struct ExtractArgs {
    /// File holding the raw model response ("-" reads stdin)
    pub input: String,

    /// Also write the cards as plain text to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the generate command.
#[derive(Debug, Parser)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub request: CardRequestArgs,

    /// Also write the cards as plain text to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the paper command.
#[derive(Debug, Parser)]
pub struct PaperArgs {
    /// Source paper text file ("-" reads stdin)
    pub input: String,

    /// Difficulty relative to the source paper
    #[arg(short, long, value_enum, default_value = "same")]
    pub difficulty: DifficultyArg,
}

/// Arguments for the review command.
#[derive(Debug, Parser)]
pub struct ReviewArgs {
    /// Deck file: JSON output of `generate`/`extract`, or a raw model response
    pub input: String,

    /// Number of cards to review
    #[arg(short = 'n', long, default_value = "5")]
    pub count: usize,

    /// Seed for a repeatable selection
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Arguments for the config command.
#[derive(Debug, Parser)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration file actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Print the configuration file path
    Path,

    /// Write a configuration file with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Output contract argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ContractArg {
    /// QUESTION: / ANSWER: blocks
    Delimited,
    /// Flashcard JSON
    Json,
    /// Flashcard JSON with deck metadata
    JsonWithMetadata,
}

/// Paper difficulty argument.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum DifficultyArg {
    /// Easier than the original
    Easier,
    /// Same difficulty as the original
    Same,
    /// Harder than the original
    Harder,
}

impl From<CliFormat> for crate::config::OutputFormat {
    fn from(format: CliFormat) -> Self {
        match format {
            CliFormat::Table => crate::config::OutputFormat::Table,
            CliFormat::Json => crate::config::OutputFormat::Json,
            CliFormat::Text => crate::config::OutputFormat::Text,
        }
    }
}

impl From<ContractArg> for studytools_extractor::OutputContract {
    fn from(contract: ContractArg) -> Self {
        match contract {
            ContractArg::Delimited => studytools_extractor::OutputContract::Delimited,
            ContractArg::Json => studytools_extractor::OutputContract::Json,
            ContractArg::JsonWithMetadata => studytools_extractor::OutputContract::JsonWithMetadata,
        }
    }
}

impl From<DifficultyArg> for studytools_domain::PaperDifficulty {
    fn from(difficulty: DifficultyArg) -> Self {
        match difficulty {
            DifficultyArg::Easier => studytools_domain::PaperDifficulty::Easier,
            DifficultyArg::Same => studytools_domain::PaperDifficulty::Same,
            DifficultyArg::Harder => studytools_domain::PaperDifficulty::Harder,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_command() {
        let cli = Cli::parse_from([
            "studytools",
            "generate",
            "notes.txt",
            "-n",
            "8",
            "--subject",
            "Chemistry",
            "--contract",
            "delimited",
        ]);
        match cli.command {
            Command::Generate(args) => {
                assert_eq!(args.request.input, "notes.txt");
                assert_eq!(args.request.count, 8);
                assert_eq!(args.request.subject.as_deref(), Some("Chemistry"));
                assert!(matches!(args.request.contract, Some(ContractArg::Delimited)));
                assert!(args.output.is_none());
            }
            _ => panic!("Expected Generate command"),
        }
    }

    #[test]
    fn test_default_card_count() {
        let cli = Cli::parse_from(["studytools", "prompt", "-"]);
        match cli.command {
            Command::Prompt(args) => assert_eq!(args.request.count, 10),
            _ => panic!("Expected Prompt command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["studytools", "extract", "raw.txt", "--format", "json", "-v"]);
        assert!(matches!(cli.format, Some(CliFormat::Json)));
        assert!(cli.verbose);
    }

    #[test]
    fn test_paper_difficulty_conversion() {
        let cli = Cli::parse_from(["studytools", "paper", "paper.txt", "-d", "harder"]);
        match cli.command {
            Command::Paper(args) => {
                let difficulty: studytools_domain::PaperDifficulty = args.difficulty.into();
                assert_eq!(difficulty, studytools_domain::PaperDifficulty::Harder);
            }
            _ => panic!("Expected Paper command"),
        }
    }

    #[test]
    fn test_config_init_command() {
        let cli = Cli::parse_from(["studytools", "config", "init", "--force", "-c", "cfg.toml"]);
        assert_eq!(cli.config.as_deref(), Some(std::path::Path::new("cfg.toml")));
        match cli.command {
            Command::Config(args) => {
                assert!(matches!(args.action, ConfigAction::Init { force: true }))
            }
            _ => panic!("Expected Config command"),
        }
    }

    #[test]
    fn test_missing_subcommand_is_error() {
        assert!(Cli::try_parse_from(["studytools"]).is_err());
    }
}
