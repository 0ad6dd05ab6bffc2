use super::{resolve_config, select_sessions};
use crate::cli::OutputFormat;
use anyhow::Result;
use std::fmt::Write;
use std::path::PathBuf;
use toolgram_sessions::SessionInfo;
use toolgram_state::ConfigOverrides;

/// Handle the `sessions` command.
pub(crate) fn handle_sessions_command(
    days: Option<u32>,
    project: Option<String>,
    format: OutputFormat,
    projects_dir: Option<PathBuf>,
) -> Result<()> {
    let config = resolve_config(&ConfigOverrides {
        projects_dir,
        days,
        ..Default::default()
    })?;

    let sessions: Vec<SessionInfo> = select_sessions(&config, None)?
        .into_iter()
        .filter(|s| project.as_deref().is_none_or(|p| s.project.contains(p)))
        .collect();

    if format == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&sessions)?);
        return Ok(());
    }

    if sessions.is_empty() {
        println!("No sessions found in the last {} days.", config.days);
        return Ok(());
    }
    print!("{}", render_session_list(&sessions, config.days));
    Ok(())
}

fn render_session_list(sessions: &[SessionInfo], days: u32) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Found {} sessions in the last {} days:\n",
        sessions.len(),
        days
    );
    for session in sessions {
        let started = session.start_time.get(..19).unwrap_or(session.start_time.as_str());
        let _ = writeln!(
            output,
            "  {}  {}  {}",
            started.replace('T', " "),
            session.id,
            session.project
        );
    }
    output
}
