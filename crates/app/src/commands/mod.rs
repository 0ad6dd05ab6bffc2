//! CLI command handlers for the toolgram application.

mod analyze;
mod patterns;
mod sessions;

pub(crate) use analyze::handle_analyze_command;
pub(crate) use patterns::handle_patterns_command;
pub(crate) use sessions::handle_sessions_command;

use anyhow::{Context, Result};
use chrono::Utc;
use toolgram_patterns::DetectionOptions;
use toolgram_sessions::{find_session, list_sessions_in_period, SessionInfo};
use toolgram_state::{load_settings, AnalysisConfig, ConfigOverrides};

/// Resolve CLI overrides against the environment and the settings file.
pub(crate) fn resolve_config(overrides: &ConfigOverrides) -> Result<AnalysisConfig> {
    let settings = load_settings().context("Failed to load toolgram settings")?;
    AnalysisConfig::resolve(overrides, &settings)
}

pub(crate) fn detection_options(config: &AnalysisConfig) -> DetectionOptions {
    DetectionOptions {
        min_frequency: config.min_frequency,
        max_sequence_length: config.max_length,
        min_sequence_length: config.min_length,
        exclude_tools: config.exclude_tools.clone(),
    }
}

/// Pick the sessions to analyze: the named one, or every session in the window.
pub(crate) fn select_sessions(
    config: &AnalysisConfig,
    session_id: Option<&str>,
) -> Result<Vec<SessionInfo>> {
    match session_id {
        Some(id) => Ok(vec![find_session(&config.projects_dir, id)?]),
        None => list_sessions_in_period(&config.projects_dir, config.days, Utc::now())
            .with_context(|| {
                format!(
                    "Failed to list sessions under {}",
                    config.projects_dir.display()
                )
            }),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::path::Path;
    use toolgram_state::AnalysisConfig;

    pub(crate) fn config_for(projects_dir: &Path) -> AnalysisConfig {
        AnalysisConfig {
            projects_dir: projects_dir.to_path_buf(),
            days: 7,
            min_frequency: 2,
            max_length: 5,
            min_length: 2,
            exclude_tools: Vec::new(),
        }
    }
}
