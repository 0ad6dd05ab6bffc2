//! Shared test utilities for toolgram crates.
//!
//! This crate provides env-var guards, a temporary `$HOME` with a Claude
//! projects directory, and builders for JSONL transcript lines.

use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use std::time::SystemTime;

/// Serialize tests that mutate process-global state (env vars, cwd, etc).
///
/// Acquire this guard at the start of any test that modifies environment
/// variables to prevent race conditions between parallel tests.
pub fn env_guard() -> MutexGuard<'static, ()> {
    static TEST_SERIAL: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    TEST_SERIAL.lock().unwrap_or_else(|e| e.into_inner())
}

/// RAII guard for environment variables - restores original value on drop.
pub struct EnvVarGuard {
    key: &'static str,
    previous: Option<String>,
}

impl Drop for EnvVarGuard {
    fn drop(&mut self) {
        if let Some(v) = &self.previous {
            std::env::set_var(self.key, v);
        } else {
            std::env::remove_var(self.key);
        }
    }
}

/// Set an environment variable and return a guard that restores the original on drop.
///
/// # Example
/// ```
/// let _guard = toolgram_test_utils::set_env_var("MY_VAR", Some("value"));
/// // MY_VAR is set to "value"
/// // When _guard drops, MY_VAR is restored to its original value
/// ```
pub fn set_env_var(key: &'static str, value: Option<&str>) -> EnvVarGuard {
    let previous = std::env::var(key).ok();
    if let Some(val) = value {
        std::env::set_var(key, val);
    } else {
        std::env::remove_var(key);
    }
    EnvVarGuard { key, previous }
}

/// Temporary home directory with `~/.claude/projects/` created.
///
/// The tempdir is automatically cleaned up when this struct is dropped.
pub struct TestFixture {
    pub tempdir: tempfile::TempDir,
    /// Path to ~/.claude/projects in the temp environment
    pub projects_dir: PathBuf,
}

impl TestFixture {
    /// Create a new fixture. Does NOT set HOME - use `home_guard()` for that.
    pub fn new() -> std::io::Result<Self> {
        let tempdir = tempfile::tempdir()?;
        let projects_dir = tempdir.path().join(".claude/projects");
        std::fs::create_dir_all(&projects_dir)?;

        Ok(Self {
            tempdir,
            projects_dir,
        })
    }

    /// Get the path that should be set as HOME.
    pub fn home_path(&self) -> &Path {
        self.tempdir.path()
    }

    /// Create an RAII guard that sets HOME to this fixture's temp directory.
    pub fn home_guard(&self) -> EnvVarGuard {
        set_env_var("HOME", Some(self.home_path().to_str().unwrap()))
    }

    /// Write `<projects>/<project>/<id>.jsonl` from transcript lines.
    pub fn write_session(
        &self,
        project: &str,
        id: &str,
        lines: &[Value],
    ) -> std::io::Result<PathBuf> {
        let dir = self.projects_dir.join(project);
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(format!("{id}.jsonl"));
        let body: Vec<String> = lines.iter().map(Value::to_string).collect();
        std::fs::write(&path, body.join("\n") + "\n")?;
        Ok(path)
    }

    /// Like [`write_session`](Self::write_session), with the file's
    /// modification time set to `modified`.
    pub fn write_session_at(
        &self,
        project: &str,
        id: &str,
        lines: &[Value],
        modified: SystemTime,
    ) -> std::io::Result<PathBuf> {
        let path = self.write_session(project, id, lines)?;
        std::fs::File::options()
            .write(true)
            .open(&path)?
            .set_modified(modified)?;
        Ok(path)
    }
}

// ============================================================================
// Transcript lines
// ============================================================================

/// A user prompt entry.
pub fn user_prompt(timestamp: &str, text: &str) -> Value {
    json!({
        "type": "user",
        "timestamp": timestamp,
        "message": { "role": "user", "content": text }
    })
}

/// An assistant entry carrying a single `tool_use` block.
pub fn tool_use(timestamp: &str, id: &str, name: &str, input: Value) -> Value {
    json!({
        "type": "assistant",
        "timestamp": timestamp,
        "message": {
            "role": "assistant",
            "content": [{ "type": "tool_use", "id": id, "name": name, "input": input }]
        }
    })
}

/// A user entry carrying a single `tool_result` block.
pub fn tool_result(timestamp: &str, tool_use_id: &str, is_error: bool, content: &str) -> Value {
    json!({
        "type": "user",
        "timestamp": timestamp,
        "message": {
            "role": "user",
            "content": [{
                "type": "tool_result",
                "tool_use_id": tool_use_id,
                "is_error": is_error,
                "content": content
            }]
        }
    })
}
