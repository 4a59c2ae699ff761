use clap::{ArgAction, Parser, Subcommand};
use lessguard::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "lessguard",
    version,
    about = "Lint and fix Less and CSS stylesheets"
)]
pub struct Cli {
    /// Increase log verbosity (-v debug, -vv trace); RUST_LOG overrides
    #[arg(long, short, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint stylesheet files or directories
    Lint {
        /// Files or directories to lint
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Rewrite files in place where rules can fix them
        #[arg(long)]
        fix: bool,

        /// Output format
        #[arg(long, short, default_value = "pretty", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Treat warnings as errors
        #[arg(long)]
        strict: bool,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// List all built-in rules with descriptions
    ListRules,

    /// Show details for a rule
    Explain {
        /// Rule name (e.g., "global-variables")
        rule: String,
    },
}
