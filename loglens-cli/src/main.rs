//! loglens CLI -- command-line front end for the log analyzer.
//!
//! Loads `loglens.toml`, initializes logging, and dispatches to the
//! subcommand handlers in [`commands`].

mod cli;
mod commands;
mod error;
mod logging;
mod output;

use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use loglens_core::config::LoglensConfig;
use loglens_core::error::{ConfigError, LoglensError};

use crate::cli::{Cli, Commands, DEFAULT_CONFIG_PATH};
use crate::error::CliError;
use crate::output::OutputWriter;

/// Effective configuration together with where it came from.
struct LoadedConfig {
    path: PathBuf,
    config: LoglensConfig,
    from_file: bool,
}

/// Load configuration.
///
/// An explicit `--config` path must exist. Without one, `./loglens.toml` is
/// used when present and defaults plus environment overrides otherwise.
async fn load_config(explicit: Option<&Path>) -> Result<LoadedConfig, CliError> {
    if let Some(path) = explicit {
        let config = LoglensConfig::load(path).await?;
        return Ok(LoadedConfig {
            path: path.to_path_buf(),
            config,
            from_file: true,
        });
    }

    let path = PathBuf::from(DEFAULT_CONFIG_PATH);
    match LoglensConfig::load(&path).await {
        Ok(config) => Ok(LoadedConfig {
            path,
            config,
            from_file: true,
        }),
        Err(LoglensError::Config(ConfigError::FileNotFound { .. })) => Ok(LoadedConfig {
            path,
            config: LoglensConfig::from_env()?,
            from_file: false,
        }),
        Err(e) => Err(e.into()),
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let mut loaded = load_config(cli.config.as_deref()).await?;

    if let Some(level) = cli.log_level {
        loaded.config.general.log_level = level;
        loaded.config.validate()?;
    }

    logging::init_tracing(&loaded.config.general)
        .map_err(|e| CliError::Config(format!("logging: {e}")))?;
    loglens_core::metrics::describe_all();

    tracing::debug!(
        config = %loaded.path.display(),
        from_file = loaded.from_file,
        "configuration loaded"
    );

    let writer = OutputWriter::new(cli.output);

    match cli.command {
        Commands::Analyze(args) => commands::analyze::execute(args, &loaded.config, &writer).await,
        Commands::Config(args) => {
            commands::config::execute(
                args,
                &loaded.path,
                &loaded.config,
                loaded.from_file,
                &writer,
            )
            .await
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("error: {e}");
        process::exit(e.exit_code());
    }
}
