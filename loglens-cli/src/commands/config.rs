//! `loglens config` command handler

use std::io::Write;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use loglens_core::config::LoglensConfig;

use crate::cli::{ConfigAction, ConfigArgs};
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Sections accepted by `config show --section`.
const SECTIONS: &[&str] = &["general", "analysis", "summary"];

/// Execute the `config` command.
///
/// `config_path` is the file that was loaded, or the default path that was
/// looked up when `loaded_from_file` is false and the configuration comes
/// from defaults plus environment overrides.
pub async fn execute(
    args: ConfigArgs,
    config_path: &Path,
    config: &LoglensConfig,
    loaded_from_file: bool,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    match args.action {
        ConfigAction::Validate { path } => {
            let target = path.as_deref().unwrap_or(config_path);
            execute_validate(target, writer).await
        }
        ConfigAction::Show { section } => {
            let source = if loaded_from_file {
                config_path.display().to_string()
            } else {
                "defaults + environment".to_owned()
            };
            execute_show(&source, config, section, writer)
        }
    }
}

/// Execute the config validate subcommand.
///
/// # Errors
///
/// Returns `CliError::Config` if validation fails (missing file, invalid values, parse errors).
async fn execute_validate(config_path: &Path, writer: &OutputWriter) -> Result<(), CliError> {
    info!(path = %config_path.display(), "validating configuration");

    let report = match LoglensConfig::load(config_path).await {
        Ok(_) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: true,
            errors: Vec::new(),
        },
        Err(e) => ConfigValidationReport {
            source: config_path.display().to_string(),
            valid: false,
            errors: vec![e.to_string()],
        },
    };

    writer.render(&report)?;

    if !report.valid {
        return Err(CliError::Config("configuration is invalid".to_owned()));
    }

    Ok(())
}

/// Execute the config show subcommand.
///
/// Only the name of the credential variable is part of the configuration,
/// so nothing needs redacting.
fn execute_show(
    source: &str,
    config: &LoglensConfig,
    section: Option<String>,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let report = build_config_report(source, config, section)?;
    writer.render(&report)?;
    Ok(())
}

fn build_config_report(
    source: &str,
    config: &LoglensConfig,
    section: Option<String>,
) -> Result<ConfigReport, CliError> {
    let serialized = match section.as_deref() {
        None => toml::to_string_pretty(config),
        Some("general") => toml::to_string_pretty(&config.general),
        Some("analysis") => toml::to_string_pretty(&config.analysis),
        Some("summary") => toml::to_string_pretty(&config.summary),
        Some(other) => {
            return Err(CliError::Command(format!(
                "unknown section: {} (expected: {})",
                other,
                SECTIONS.join(", ")
            )));
        }
    };
    let config_toml = serialized.map_err(|e| CliError::Command(format!("serialization error: {e}")))?;

    let value = toml::from_str::<toml::Value>(&config_toml)
        .ok()
        .and_then(|v| serde_json::to_value(v).ok())
        .unwrap_or(serde_json::Value::Null);

    Ok(ConfigReport {
        source: source.to_owned(),
        section,
        config: value,
        config_toml,
    })
}

/// Configuration display report.
///
/// JSON output carries the configuration as a structured object; text output
/// prints the TOML form.
#[derive(Serialize)]
pub struct ConfigReport {
    /// Configuration source
    pub source: String,
    /// Optional section name (None = full config)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub section: Option<String>,
    /// Structured configuration
    pub config: serde_json::Value,
    /// Serialized TOML configuration
    #[serde(skip)]
    pub config_toml: String,
}

impl Render for ConfigReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        if let Some(ref section) = self.section {
            let section_label = format!("[{}]", section);
            writeln!(
                w,
                "Configuration {} (source: {})",
                section_label.bold(),
                self.source
            )?;
        } else {
            writeln!(w, "Configuration (source: {})", self.source.bold())?;
        }

        writeln!(w)?;
        write!(w, "{}", self.config_toml)?;

        Ok(())
    }
}

/// Configuration validation report.
#[derive(Serialize)]
pub struct ConfigValidationReport {
    /// Configuration file path
    pub source: String,
    /// Whether the configuration is valid
    pub valid: bool,
    /// Validation error messages (empty if valid)
    pub errors: Vec<String>,
}

impl Render for ConfigValidationReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Config Validation: {}", self.source.bold())?;

        if self.valid {
            writeln!(w, "  Result: {}", "VALID".green().bold())?;
        } else {
            writeln!(w, "  Result: {}", "INVALID".red().bold())?;
            for err in &self.errors {
                writeln!(w, "  Error: {}", err.red())?;
            }
        }

        Ok(())
    }
}
