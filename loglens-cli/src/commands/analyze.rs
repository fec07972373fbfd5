//! `loglens analyze` command handler

use std::io::Write;

use loglens_analyzer::{AnalysisReport, AnalyzerBuilder, AnalyzerConfig, AnalyzerConfigBuilder, OpenAiBackend};
use loglens_core::config::LoglensConfig;
use loglens_core::types::Severity;
use tracing::info;

use crate::cli::AnalyzeArgs;
use crate::error::CliError;
use crate::output::{OutputWriter, Render};

/// Longest message rendered in the text event table.
const MAX_MESSAGE_WIDTH: usize = 100;

/// Execute the `analyze` command.
///
/// The summary credential is resolved once here; the analyzer receives an
/// already-constructed backend or none.
pub async fn execute(
    args: AnalyzeArgs,
    config: &LoglensConfig,
    writer: &OutputWriter,
) -> Result<(), CliError> {
    let analyzer_config = analyzer_config(&args, config)?;

    let backend = if args.no_llm {
        None
    } else {
        OpenAiBackend::from_config(&config.summary)?
    };

    let analyzer = AnalyzerBuilder::new()
        .config(analyzer_config)
        .optional_backend(backend)
        .build()?;

    info!(
        file = %args.file.display(),
        llm = analyzer.has_summary_backend(),
        "analyzing log file"
    );

    let report = analyzer.analyze_file(&args.file).await?;
    writer.render(&report)?;

    Ok(())
}

/// Merge command-line overrides into the configured analysis settings.
fn analyzer_config(args: &AnalyzeArgs, config: &LoglensConfig) -> Result<AnalyzerConfig, CliError> {
    let mut builder = AnalyzerConfigBuilder::from_config(AnalyzerConfig::from_core(config));
    if let Some(n) = args.clusters {
        builder = builder.n_clusters(n);
    }
    if let Some(max) = args.max_events {
        builder = builder.max_events(max);
    }
    Ok(builder.build()?)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_owned()
    } else {
        let cut: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

impl Render for AnalysisReport {
    fn render_text(&self, w: &mut dyn Write) -> std::io::Result<()> {
        use colored::Colorize;

        writeln!(w, "Batch: {}", self.batch_id.to_string().bold())?;
        writeln!(
            w,
            "Lines: {} read, {} blank, {} unparsed",
            self.stats.lines_total, self.stats.lines_blank, self.stats.lines_unparsed
        )?;
        writeln!(w, "Events: {}", self.events.len())?;
        if self.stats.truncated {
            let dropped = format!(
                "{} events beyond the batch cap were dropped",
                self.stats.events_dropped
            );
            writeln!(w, "{}", dropped.yellow())?;
        }
        writeln!(w)?;

        if self.events.is_empty() {
            writeln!(w, "{}", "No log events recognized.".yellow())?;
        } else {
            writeln!(
                w,
                "{:<24} {:<6} {:<8} {:<9} {:<30} Message",
                "Timestamp", "Level", "Severity", "Category", "Component"
            )?;
            writeln!(w, "{}", "-".repeat(100))?;

            for e in &self.events {
                let severity_colored = match e.severity {
                    Severity::High => format!("{:<8}", e.severity).red().bold(),
                    Severity::Medium => format!("{:<8}", e.severity).yellow(),
                    Severity::Low => format!("{:<8}", e.severity).normal(),
                };
                writeln!(
                    w,
                    "{:<24} {:<6} {} {:<9} {:<30} {}",
                    e.event.timestamp,
                    e.event.level,
                    severity_colored,
                    e.category,
                    truncate(&e.event.component, 30),
                    truncate(e.event.message.trim(), MAX_MESSAGE_WIDTH)
                )?;
            }
        }
        writeln!(w)?;

        if self.clusters.is_empty() {
            writeln!(w, "Unknown-error clusters: none")?;
        } else {
            writeln!(w, "Unknown-error clusters: {}", self.clusters.len())?;
            for (id, members) in &self.clusters {
                writeln!(
                    w,
                    "  {} ({} messages)",
                    format!("Cluster {id}").bold(),
                    members.len()
                )?;
                for message in members {
                    writeln!(w, "    - {}", truncate(message.trim(), MAX_MESSAGE_WIDTH))?;
                }
            }
        }
        writeln!(w)?;

        writeln!(w, "Summary ({}):", self.summary_source.to_string().bold())?;
        for line in self.summary.lines() {
            writeln!(w, "  {line}")?;
        }

        Ok(())
    }
}
