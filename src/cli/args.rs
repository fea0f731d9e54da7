//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    catalog::CatalogArgs, compare::CompareArgs, completions::CompletionsArgs, eval::EvalArgs,
    graph::GraphArgs, init::InitArgs, params::ParamsArgs, report::ReportArgs,
    study::StudyCommands,
};

#[derive(Parser)]
#[command(name = "bptea")]
#[command(author, version, about = "Bioprocess techno-economic analysis")]
#[command(
    long_about = "Bioprocess techno-economic analysis.\n\nEvaluate CAPEX, OPEX and minimum selling price of a downstream-processing line, compare equipment alternatives, and keep studies as plain YAML files."
)]
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

    /// Enable verbose output (debug logging on stderr)
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Workspace root (default: auto-detect by finding .bptea/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new workspace
    Init(InitArgs),

    /// Study management
    #[command(subcommand)]
    Study(StudyCommands),

    /// Evaluate CAPEX, OPEX, production and minimum selling price
    Eval(EvalArgs),

    /// Compare the options of each alternative step against its baseline
    Compare(CompareArgs),

    /// List the process graph with the current selections
    Graph(GraphArgs),

    /// Export a study report (Markdown or JSON)
    Report(ReportArgs),

    /// List alternative steps, options and their cost coefficients
    Catalog(CatalogArgs),

    /// List parameter fields, units, domains and defaults
    Params(ParamsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (yaml for show, tsv for list)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// JSON format (for programming)
    Json,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
    /// Just IDs, one per line
    Id,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        <OutputFormat as ValueEnum>::from_str(s, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_long_help_names_the_tool() {
        let help = Cli::command().render_long_help().to_string();
        assert!(help.contains("techno-economic"));
        assert!(help.contains("eval"));
    }

    #[test]
    fn test_output_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<OutputFormat>(), Ok(OutputFormat::Json));
        assert!("xml".parse::<OutputFormat>().is_err());
    }
}
