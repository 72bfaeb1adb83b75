//! Command-line interface argument parsing and definitions
//!
//! This module defines the CLI structure using clap's derive API,
//! providing a type-safe and well-documented command interface.

use clap::{Parser, Subcommand, ValueEnum};
use is_terminal::IsTerminal;
use schemator_core::ErrorKind;
use std::path::PathBuf;

/// Schemator CLI - Schema-driven data extraction and transformation
///
/// Converts JSON or YAML documents into a new shape described by a
/// declarative schema of paths, nested schemas and filter chains.
#[derive(Parser, Debug)]
#[command(
    name = "schemator",
    version,
    author,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Enable verbose output (can be used multiple times for increased verbosity)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "SCHEMATOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format for results (defaults to the configured format)
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Convert a document (or a list of documents) with a schema
    Convert(ConvertArgs),

    /// List the built-in filters
    Filters,

    /// Manage configuration files and settings
    Config(ConfigArgs),

    /// Generate shell completions for the specified shell
    Completions(CompletionsArgs),
}

/// Arguments for the convert command
#[derive(Parser, Debug)]
pub struct ConvertArgs {
    /// Path to the schema file (JSON or YAML)
    #[arg(short, long, value_name = "SCHEMA")]
    pub schema: PathBuf,

    /// Input document (JSON or YAML); reads JSON from stdin when omitted
    #[arg(value_name = "INPUT")]
    pub input: Option<PathBuf>,

    /// Treat the input as a list and convert every item
    #[arg(short, long)]
    pub batch: bool,

    /// Path delimiter, overriding the configured one
    #[arg(short, long)]
    pub delimiter: Option<String>,

    /// Error category to tolerate (repeatable), e.g. cannot-get-value
    #[arg(short, long, value_name = "CATEGORY", value_parser = parse_category)]
    pub tolerate: Vec<ErrorKind>,

    /// Tolerate every tolerable error category
    #[arg(long, conflicts_with = "tolerate")]
    pub tolerate_all: bool,

    /// Output file path (stdout if not specified)
    #[arg(long = "save-to", value_name = "OUTPUT_FILE")]
    pub save_to: Option<PathBuf>,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Configuration management actions
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a default configuration file
    Init(ConfigInitArgs),

    /// Show the effective configuration
    Show(ConfigShowArgs),
}

/// Arguments for config init
#[derive(Parser, Debug)]
pub struct ConfigInitArgs {
    /// Where to write the file (defaults to .schemator.yaml)
    #[arg(value_name = "PATH")]
    pub path: Option<PathBuf>,

    /// Force overwrite existing config files
    #[arg(long)]
    pub force: bool,
}

/// Arguments for config show
#[derive(Parser, Debug)]
pub struct ConfigShowArgs {
    /// Show configuration in specified format
    #[arg(short, long, value_enum, default_value = "yaml")]
    pub format: ConfigFormat,
}

/// Configuration file formats
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// JSON format
    Json,
    /// YAML format
    Yaml,
}

/// Arguments for generating shell completions
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Output format options
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable formatted output
    Human,
    /// JSON output
    Json,
    /// YAML output
    Yaml,
    /// Pretty-printed JSON output
    JsonPretty,
}

/// Supported shells for completion generation
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum Shell {
    /// Bash shell
    Bash,
    /// Zsh shell
    Zsh,
    /// Fish shell
    Fish,
    /// PowerShell
    PowerShell,
    /// Elvish shell
    Elvish,
}

/// Parse an error category name for `--tolerate`
fn parse_category(value: &str) -> std::result::Result<ErrorKind, String> {
    let kind: ErrorKind = value.parse().map_err(|e: schemator_core::Error| e.to_string())?;
    if kind.is_tolerable() {
        Ok(kind)
    } else {
        Err(format!("'{}' errors can never be tolerated", kind))
    }
}

impl Cli {
    /// Parse command-line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the effective verbosity level (considering quiet flag)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    /// Check if colored output should be used
    pub fn use_color(&self) -> bool {
        !self.no_color && std::io::stdout().is_terminal()
    }
}

impl OutputFormat {
    /// Parse a format name from the configuration file
    pub fn from_name(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name, true).ok()
    }
}

impl Shell {
    /// Convert to clap_complete shell type
    pub fn to_clap_shell(self) -> clap_complete::Shell {
        match self {
            Shell::Bash => clap_complete::Shell::Bash,
            Shell::Zsh => clap_complete::Shell::Zsh,
            Shell::Fish => clap_complete::Shell::Fish,
            Shell::PowerShell => clap_complete::Shell::PowerShell,
            Shell::Elvish => clap_complete::Shell::Elvish,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        // Verify that the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_level() {
        let cli = Cli::parse_from(["schemator", "-vv", "filters"]);
        assert_eq!(cli.verbosity_level(), 2);

        let quiet_cli = Cli {
            quiet: true,
            ..cli
        };
        assert_eq!(quiet_cli.verbosity_level(), 0);
    }

    #[test]
    fn test_convert_args() {
        let cli = Cli::parse_from([
            "schemator",
            "convert",
            "--schema",
            "schema.yaml",
            "input.json",
            "--batch",
            "-t",
            "cannot-get-value",
            "--tolerate",
            "unsupported_key_type",
            "--delimiter",
            "/",
        ]);

        match cli.command {
            Commands::Convert(args) => {
                assert_eq!(args.schema, PathBuf::from("schema.yaml"));
                assert_eq!(args.input, Some(PathBuf::from("input.json")));
                assert!(args.batch);
                assert_eq!(
                    args.tolerate,
                    vec![ErrorKind::CannotGetValue, ErrorKind::UnsupportedKeyType]
                );
                assert_eq!(args.delimiter.as_deref(), Some("/"));
                assert!(!args.tolerate_all);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_intolerable_category_rejected() {
        let result = Cli::try_parse_from([
            "schemator",
            "convert",
            "--schema",
            "s.json",
            "--tolerate",
            "filter-error",
        ]);
        assert!(result.is_err());

        let result = Cli::try_parse_from([
            "schemator",
            "convert",
            "--schema",
            "s.json",
            "--tolerate",
            "no-such-category",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_tolerate_all_conflicts_with_tolerate() {
        let result = Cli::try_parse_from([
            "schemator",
            "convert",
            "--schema",
            "s.json",
            "--tolerate-all",
            "--tolerate",
            "cannot-get-value",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_output_format_from_name() {
        assert_eq!(OutputFormat::from_name("json-pretty"), Some(OutputFormat::JsonPretty));
        assert_eq!(OutputFormat::from_name("YAML"), Some(OutputFormat::Yaml));
        assert_eq!(OutputFormat::from_name("xml"), None);
    }
}
