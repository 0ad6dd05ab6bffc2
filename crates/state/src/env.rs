use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use tracing::warn;

/// Returns the user's home directory.
pub fn home_dir() -> Result<PathBuf> {
    #[cfg(unix)]
    if let Ok(home) = std::env::var("HOME") {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("home directory not found"))
}

/// Returns the projects directory set via `TOOLGRAM_PROJECTS_DIR`.
pub fn env_projects_dir() -> Option<PathBuf> {
    std::env::var("TOOLGRAM_PROJECTS_DIR")
        .ok()
        .filter(|s| !s.is_empty())
        .map(PathBuf::from)
}

/// Returns the default Claude Code projects directory (`~/.claude/projects`).
pub fn default_projects_dir() -> Result<PathBuf> {
    Ok(home_dir()?.join(".claude/projects"))
}

/// Returns the look-back window from `TOOLGRAM_DAYS`.
pub fn env_days() -> Option<u32> {
    std::env::var("TOOLGRAM_DAYS")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Returns the minimum pattern frequency from `TOOLGRAM_MIN_FREQUENCY`.
pub fn env_min_frequency() -> Option<usize> {
    std::env::var("TOOLGRAM_MIN_FREQUENCY")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Returns the maximum pattern length from `TOOLGRAM_MAX_LENGTH`.
pub fn env_max_length() -> Option<usize> {
    std::env::var("TOOLGRAM_MAX_LENGTH")
        .ok()
        .and_then(|s| s.parse().ok())
}

/// Returns tool names to exclude from `TOOLGRAM_EXCLUDE_TOOLS` (colon separated).
pub fn exclude_tools_from_env() -> Vec<String> {
    std::env::var("TOOLGRAM_EXCLUDE_TOOLS")
        .map(|s| {
            s.split(':')
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string)
                .collect::<Vec<String>>()
        })
        .unwrap_or_default()
}

/// Returns the path to the settings file.
pub fn settings_file() -> Option<PathBuf> {
    if let Ok(custom) = std::env::var("TOOLGRAM_SETTINGS") {
        return Some(PathBuf::from(custom));
    }
    home_dir().ok().map(|h| h.join(".claude/toolgram.json"))
}

/// Settings parsed from `toolgram.json`. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub projects_dir: Option<PathBuf>,
    #[serde(default)]
    pub days: Option<u32>,
    #[serde(default)]
    pub min_frequency: Option<usize>,
    #[serde(default)]
    pub max_length: Option<usize>,
    #[serde(default)]
    pub min_length: Option<usize>,
    #[serde(default)]
    pub exclude_tools: Option<Vec<String>>,
}

/// Loads settings from disk if available.
///
/// A missing file yields defaults. A file that is not valid settings JSON is
/// reported with a warning and also yields defaults.
pub fn load_settings() -> Result<Settings> {
    let Some(path) = settings_file() else {
        return Ok(Settings::default());
    };
    if !path.exists() {
        return Ok(Settings::default());
    }
    let text = fs::read_to_string(&path)?;
    match serde_json::from_str::<Settings>(&text) {
        Ok(settings) => Ok(settings),
        Err(e) => {
            warn!(path = %path.display(), "Ignoring malformed settings file: {}", e);
            Ok(Settings::default())
        }
    }
}
