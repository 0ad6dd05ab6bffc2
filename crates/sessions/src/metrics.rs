//! Per-session metrics and loading of analysis inputs.

use crate::listing::SessionInfo;
use crate::parser::{parse_session, ParsedSession};
use chrono::DateTime;
use indexmap::IndexMap;
use std::collections::HashSet;
use toolgram_patterns::{SessionInput, SessionMetrics};
use tracing::warn;

/// Summarize one parsed transcript.
///
/// Start and end fall back to the file's modification time when the
/// transcript carries no timestamps.
pub fn calculate_session_metrics(info: &SessionInfo, parsed: &ParsedSession) -> SessionMetrics {
    let start_time = parsed
        .first_timestamp
        .clone()
        .unwrap_or_else(|| info.start_time.clone());
    let end_time = parsed
        .last_timestamp
        .clone()
        .unwrap_or_else(|| info.start_time.clone());

    let total_tool_calls = parsed.invocations.len();
    let error_count = parsed.results.iter().filter(|r| r.is_error).count();

    let mut tool_breakdown: IndexMap<String, usize> = IndexMap::new();
    for invocation in &parsed.invocations {
        *tool_breakdown
            .entry(invocation.tool_name.clone())
            .or_insert(0) += 1;
    }
    let unique_tools_used = parsed
        .invocations
        .iter()
        .map(|i| i.tool_name.as_str())
        .collect::<HashSet<_>>()
        .len();

    SessionMetrics {
        session_id: info.id.clone(),
        session_path: info.path.to_string_lossy().into_owned(),
        project_name: info.project.clone(),
        duration_minutes: duration_minutes(&start_time, &end_time),
        start_time,
        end_time,
        total_tool_calls,
        error_count,
        error_rate: if total_tool_calls > 0 {
            error_count as f64 / total_tool_calls as f64
        } else {
            0.0
        },
        unique_tools_used,
        user_message_count: parsed.user_message_count,
        assistant_message_count: parsed.assistant_message_count,
        tool_breakdown,
    }
}

fn duration_minutes(start: &str, end: &str) -> f64 {
    match (
        DateTime::parse_from_rfc3339(start),
        DateTime::parse_from_rfc3339(end),
    ) {
        (Ok(start), Ok(end)) => (end - start).num_milliseconds() as f64 / 1000.0 / 60.0,
        _ => 0.0,
    }
}

/// Parse every session into an analysis input.
///
/// Transcripts that cannot be read are skipped with a warning.
pub fn load_session_inputs(sessions: &[SessionInfo]) -> Vec<SessionInput> {
    sessions
        .iter()
        .filter_map(|info| match parse_session(&info.path) {
            Ok(parsed) => Some(into_input(info, parsed)),
            Err(e) => {
                warn!(session = %info.id, "Skipping unreadable session: {}", e);
                None
            }
        })
        .collect()
}

fn into_input(info: &SessionInfo, parsed: ParsedSession) -> SessionInput {
    SessionInput {
        metrics: calculate_session_metrics(info, &parsed),
        invocations: parsed.invocations,
        results: parsed.results,
    }
}
