//! Command line arguments for mailtrace.

use crate::LookupProfile;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Command to execute
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Look up services for an email address
    Search {
        /// Email address to look up
        email: String,
    },
    /// List the checkers of the selected profile
    List,
    /// Print version information
    Version,
}

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable terminal output
    #[default]
    Text,
    /// Machine-readable JSON
    Json,
}

/// Parsed command line arguments
#[derive(Debug, Clone, Parser)]
#[command(
    name = "mailtrace",
    version,
    about = "Find services where an email address may have a public profile or breach record",
    arg_required_else_help = true
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Checker set to run
    #[arg(long, global = true, value_enum)]
    pub profile: Option<LookupProfile>,

    /// Output format
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Per-checker timeout in milliseconds
    #[arg(long = "timeout", global = true, value_name = "MS")]
    pub timeout_ms: Option<u64>,

    /// Load configuration from a TOML file
    #[arg(long, global = true, value_name = "FILE", env = "MAILTRACE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Breach-database API key
    #[arg(long, global = true, value_name = "KEY")]
    pub api_key: Option<String>,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        action = clap::ArgAction::SetTrue,
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Include details and debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only show positive matches
    #[arg(short, long, global = true)]
    pub quiet: bool,
}
