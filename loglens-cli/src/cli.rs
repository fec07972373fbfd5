//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Default configuration file looked up in the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "loglens.toml";

/// loglens -- classify, cluster and summarize application logs.
///
/// Use `loglens <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "loglens", version, about, long_about = None)]
pub struct Cli {
    /// Path to the loglens.toml configuration file (default: ./loglens.toml if present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Analyze one log file: classify events, cluster unknown errors, summarize.
    Analyze(AnalyzeArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- analyze ----

/// Analyze a single log file as one batch.
#[derive(Args, Debug)]
pub struct AnalyzeArgs {
    /// Log file to analyze.
    pub file: PathBuf,

    /// Override the number of clusters for unknown errors.
    #[arg(long)]
    pub clusters: Option<usize>,

    /// Override the per-batch event cap (at most 5000).
    #[arg(long)]
    pub max_events: Option<usize>,

    /// Skip the language-model summary and always use the built-in summary.
    #[arg(long)]
    pub no_llm: bool,
}

// ---- config ----

/// Manage loglens configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate a configuration file and report errors.
    Validate {
        /// Configuration file to validate (default: --config or ./loglens.toml).
        path: Option<PathBuf>,
    },
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, analysis, summary).
        #[arg(long)]
        section: Option<String>,
    },
}
