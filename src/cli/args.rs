//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    batch::BatchArgs, completions::CompletionsArgs, config::ConfigCommands, origin::OriginArgs,
    parse::ParseArgs, row::RowArgs, schema::SchemaArgs,
};

#[derive(Parser)]
#[command(name = "ecotag")]
#[command(author, version, about = "Garment label feature extraction")]
#[command(long_about = "Turns scraped garment-label facts into fixed-schema feature rows for sustainability scoring.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Training CSV to derive use locations, distances and encodings from
    #[arg(long, global = true)]
    pub training_data: Option<PathBuf>,

    /// Seed for use-location sampling (default: random)
    #[arg(long, global = true)]
    pub seed: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build feature rows for products (JSON object, array or JSON Lines)
    Row(RowArgs),

    /// Build rows for a batch of products and export the accumulated table
    Batch(BatchArgs),

    /// Show how a fabric composition is parsed and averaged
    Parse(ParseArgs),

    /// Resolve country-of-origin text to a continent
    Origin(OriginArgs),

    /// Show the feature schema and registered encodings
    Schema(SchemaArgs),

    /// Configuration management
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically pick per command (yaml for rows, csv for batches)
    #[default]
    Auto,
    /// YAML format
    Yaml,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Tab-separated values (for piping)
    Tsv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Resolve `auto` against the configured default, then the command default
    pub fn resolve(self, configured: Option<&str>, fallback: OutputFormat) -> OutputFormat {
        if self != OutputFormat::Auto {
            return self;
        }
        configured
            .and_then(|s| OutputFormat::from_str(s, true).ok())
            .filter(|f| *f != OutputFormat::Auto)
            .unwrap_or(fallback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_format_resolution() {
        assert_eq!(
            OutputFormat::Json.resolve(Some("csv"), OutputFormat::Yaml),
            OutputFormat::Json
        );
        assert_eq!(
            OutputFormat::Auto.resolve(Some("TSV"), OutputFormat::Yaml),
            OutputFormat::Tsv
        );
        assert_eq!(
            OutputFormat::Auto.resolve(Some("bogus"), OutputFormat::Yaml),
            OutputFormat::Yaml
        );
        assert_eq!(
            OutputFormat::Auto.resolve(None, OutputFormat::Csv),
            OutputFormat::Csv
        );
    }
}
