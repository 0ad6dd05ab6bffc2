use super::{detection_options, resolve_config, select_sessions};
use crate::cli::{DetectionArgs, OutputFormat};
use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;
use toolgram_patterns::{
    calculate_pattern_stats, detect_patterns, find_pattern, OperationPattern, PatternMatch,
    PatternStats,
};
use toolgram_sessions::load_session_inputs;
use toolgram_state::AnalysisConfig;

const LISTED_PATTERNS: usize = 10;

/// Mined patterns of a single session.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SessionPatterns {
    pub session_id: String,
    pub stats: PatternStats,
    pub patterns: Vec<OperationPattern>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<SequenceSearch>,
}

/// Occurrences of a user-supplied tool sequence.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SequenceSearch {
    pub sequence: Vec<String>,
    pub matches: Vec<PatternMatch>,
}

/// Handle the `patterns` command.
pub(crate) fn handle_patterns_command(
    session: String,
    find: Vec<String>,
    format: OutputFormat,
    detection: DetectionArgs,
    projects_dir: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(&detection.overrides(None, projects_dir))?;
    let mined = mine_session(&config, &session, &find)?;

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&mined)?),
        OutputFormat::Text | OutputFormat::Markdown => print!("{}", render_session_patterns(&mined)),
    }
    Ok(())
}

pub(crate) fn mine_session(
    config: &AnalysisConfig,
    session_id: &str,
    find: &[String],
) -> Result<SessionPatterns> {
    let sessions = select_sessions(config, Some(session_id))?;
    let input = load_session_inputs(&sessions)
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("Session {session_id} could not be read"))?;

    let patterns = detect_patterns(&input.invocations, &detection_options(config))
        .context("Invalid pattern detection options")?;
    let search = (!find.is_empty()).then(|| SequenceSearch {
        sequence: find.to_vec(),
        matches: find_pattern(&input.invocations, find),
    });

    Ok(SessionPatterns {
        session_id: input.metrics.session_id,
        stats: calculate_pattern_stats(&patterns),
        patterns,
        search,
    })
}

fn render_session_patterns(mined: &SessionPatterns) -> String {
    let mut output = String::new();
    let stats = &mined.stats;

    let _ = writeln!(output, "Session: {}", mined.session_id);
    let _ = writeln!(output, "Patterns: {}", stats.total_patterns);
    if stats.total_patterns > 0 {
        let _ = writeln!(output, "Average frequency: {:.1}", stats.average_frequency);
        let _ = writeln!(
            output,
            "Average length: {:.1}",
            stats.average_sequence_length
        );
    }
    if let Some(tool) = &stats.most_common_tool {
        let _ = writeln!(output, "Most common tool: {tool}");
    }

    for pattern in mined.patterns.iter().take(LISTED_PATTERNS) {
        let _ = writeln!(
            output,
            "\n{} {} ({}x)",
            pattern.id,
            pattern.sequence.join(" -> "),
            pattern.frequency
        );
        if let Some(category) = pattern.category {
            let _ = writeln!(output, "  Category: {}", category.as_str());
        }
        if !pattern.common_commands.is_empty() {
            let _ = writeln!(output, "  Commands: {}", pattern.common_commands.join(", "));
        }
        if !pattern.common_file_paths.is_empty() {
            let _ = writeln!(output, "  Files: {}", pattern.common_file_paths.join(", "));
        }
    }

    if let Some(search) = &mined.search {
        let _ = writeln!(
            output,
            "\n{} found {} times",
            search.sequence.join(" -> "),
            search.matches.len()
        );
        for m in &search.matches {
            let _ = writeln!(output, "  #{} at {}", m.start_index, m.timestamp);
        }
    }
    output
}
