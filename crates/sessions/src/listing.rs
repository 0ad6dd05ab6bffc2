//! Discovery of session transcripts under `~/.claude/projects/`.

use crate::error::SessionError;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// A session transcript on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    /// File stem of the transcript.
    pub id: String,
    pub path: PathBuf,
    /// Modification time of the transcript (RFC 3339, UTC).
    pub start_time: String,
    /// Name of the project directory holding the transcript.
    pub project: String,
}

/// List every `*.jsonl` transcript below `projects_dir`, sorted by path.
///
/// When `project_filter` is set, only project directories whose name
/// contains it are scanned. A missing `projects_dir` yields an empty list.
pub fn list_sessions(
    projects_dir: &Path,
    project_filter: Option<&str>,
) -> Result<Vec<SessionInfo>, SessionError> {
    let mut sessions = Vec::new();

    if !projects_dir.exists() {
        debug!(
            "Claude projects directory does not exist: {:?}",
            projects_dir
        );
        return Ok(sessions);
    }

    for project_entry in read_dir(projects_dir)? {
        let project = project_entry.map_err(|e| SessionError::io(projects_dir, e))?;
        let project_path = project.path();
        if !project_path.is_dir() {
            continue;
        }

        let project_name = project.file_name().to_string_lossy().into_owned();
        if let Some(filter) = project_filter {
            if !project_name.contains(filter) {
                continue;
            }
        }

        for session_entry in read_dir(&project_path)? {
            let session = session_entry.map_err(|e| SessionError::io(&project_path, e))?;
            let path = session.path();
            if !path.extension().map(|e| e == "jsonl").unwrap_or(false) {
                continue;
            }
            let Some(id) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let modified = session
                .metadata()
                .and_then(|m| m.modified())
                .map_err(|e| SessionError::io(&path, e))?;

            sessions.push(SessionInfo {
                id: id.to_string(),
                start_time: DateTime::<Utc>::from(modified)
                    .to_rfc3339_opts(SecondsFormat::Millis, true),
                project: project_name.clone(),
                path,
            });
        }
    }

    sessions.sort_by(|a, b| a.path.cmp(&b.path));
    debug!(count = sessions.len(), "Listed session transcripts");
    Ok(sessions)
}

/// Sessions whose start time falls within the last `days` days before `now`.
pub fn list_sessions_in_period(
    projects_dir: &Path,
    days: u32,
    now: DateTime<Utc>,
) -> Result<Vec<SessionInfo>, SessionError> {
    let cutoff = now - Duration::days(i64::from(days));

    Ok(list_sessions(projects_dir, None)?
        .into_iter()
        .filter(|s| {
            DateTime::parse_from_rfc3339(&s.start_time)
                .map(|t| t.with_timezone(&Utc) >= cutoff)
                .unwrap_or(false)
        })
        .collect())
}

/// Find a transcript by id across all projects.
pub fn find_session(projects_dir: &Path, id: &str) -> Result<SessionInfo, SessionError> {
    list_sessions(projects_dir, None)?
        .into_iter()
        .find(|s| s.id == id)
        .ok_or_else(|| SessionError::NotFound(id.to_string()))
}

fn read_dir(path: &Path) -> Result<fs::ReadDir, SessionError> {
    fs::read_dir(path).map_err(|e| SessionError::io(path, e))
}
