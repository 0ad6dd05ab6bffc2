use super::{detection_options, resolve_config, select_sessions};
use crate::cli::{DetectionArgs, OutputFormat};
use crate::report::{render_report, ReportOptions};
use anyhow::{Context, Result};
use std::path::PathBuf;
use toolgram_patterns::{aggregate_analysis, AggregatedAnalysis, AnalyzeOptions};
use toolgram_sessions::load_session_inputs;
use toolgram_state::AnalysisConfig;
use tracing::info;

/// Handle the `analyze` command.
pub(crate) fn handle_analyze_command(
    session: Option<String>,
    days: Option<u32>,
    format: OutputFormat,
    verbose: bool,
    no_patterns: bool,
    detection: DetectionArgs,
    projects_dir: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(&detection.overrides(days, projects_dir))?;

    let Some(analysis) = run_analysis(&config, session.as_deref(), !no_patterns)? else {
        println!("No sessions found in the specified period.");
        return Ok(());
    };

    let options = ReportOptions {
        verbose,
        include_patterns: !no_patterns,
    };
    print!("{}", render_report(&analysis, format, options)?);
    Ok(())
}

/// Load the selected sessions and analyze them. `None` when nothing matched.
pub(crate) fn run_analysis(
    config: &AnalysisConfig,
    session: Option<&str>,
    include_patterns: bool,
) -> Result<Option<AggregatedAnalysis>> {
    let sessions = select_sessions(config, session)?;
    if sessions.is_empty() {
        return Ok(None);
    }
    info!(
        sessions = sessions.len(),
        projects_dir = %config.projects_dir.display(),
        "Found sessions to analyze"
    );

    let inputs = load_session_inputs(&sessions);
    let options = AnalyzeOptions {
        include_patterns,
        detection: detection_options(config),
    };
    let analysis =
        aggregate_analysis(&inputs, &options).context("Invalid pattern detection options")?;
    Ok(Some(analysis))
}
