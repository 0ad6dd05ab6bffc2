//! CLI integration tests for `toolgram analyze`, `sessions`, and `patterns`.
//!
//! Each test points `HOME` at a temporary directory seeded with transcripts
//! and runs the compiled binary.

use std::process::{Command, Output};

use anyhow::{Context, Result};
use serde_json::{json, Value};
use toolgram_test_utils::{tool_result, tool_use, user_prompt, TestFixture};

const CONFIG_VARS: [&str; 7] = [
    "TOOLGRAM_PROJECTS_DIR",
    "TOOLGRAM_DAYS",
    "TOOLGRAM_MIN_FREQUENCY",
    "TOOLGRAM_MAX_LENGTH",
    "TOOLGRAM_EXCLUDE_TOOLS",
    "TOOLGRAM_SETTINGS",
    "RUST_LOG",
];

fn toolgram(fixture: &TestFixture, args: &[&str]) -> Result<Output> {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_toolgram"));
    cmd.env("HOME", fixture.home_path()).args(args);
    for var in CONFIG_VARS {
        cmd.env_remove(var);
    }
    cmd.output()
        .with_context(|| format!("Failed to execute toolgram {}", args.join(" ")))
}

fn seed_tdd_session(fixture: &TestFixture, id: &str) -> Result<()> {
    let mut lines = vec![user_prompt("2025-01-18T10:00:00Z", "make the parser test pass")];
    for round in 0..3 {
        for (step, (tool, input)) in [
            ("Read", json!({"file_path": "src/parser.rs"})),
            ("Edit", json!({"file_path": "src/parser.rs"})),
            ("Bash", json!({"command": "cargo test parser"})),
        ]
        .into_iter()
        .enumerate()
        {
            let ts = format!("2025-01-18T10:{round:02}:{step:02}Z");
            let tool_id = format!("{id}-{round}-{step}");
            lines.push(tool_use(&ts, &tool_id, tool, input));
            lines.push(tool_result(&ts, &tool_id, false, "ok"));
        }
    }
    fixture.write_session("-home-me-parser", id, &lines)?;
    Ok(())
}

fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn given_recent_session_when_analyze_json_then_report_is_emitted() -> Result<()> {
    // GIVEN one recent transcript with a repeated Read -> Edit -> Bash loop
    let fixture = TestFixture::new()?;
    seed_tdd_session(&fixture, "session-1")?;

    // WHEN the user asks for a JSON report
    let output = toolgram(&fixture, &["analyze", "--format", "json"])?;
    let stdout = stdout_of(&output);
    assert!(
        output.status.success(),
        "analyze should succeed\nSTDOUT:\n{}\nSTDERR:\n{}",
        stdout,
        String::from_utf8_lossy(&output.stderr)
    );

    // THEN the report covers the session and its patterns
    let report: Value = serde_json::from_str(&stdout)?;
    assert_eq!(report["analyzedPeriod"]["totalSessions"], 1);
    assert_eq!(report["summary"]["totalToolCalls"], 9);
    assert!(!report["patterns"].as_array().context("patterns")?.is_empty());
    Ok(())
}

#[test]
fn given_no_sessions_when_analyze_then_exit_zero_with_message() -> Result<()> {
    let fixture = TestFixture::new()?;

    let output = toolgram(&fixture, &["analyze"])?;

    assert!(output.status.success());
    assert!(stdout_of(&output).contains("No sessions found in the specified period."));
    Ok(())
}

#[test]
fn given_unknown_session_when_analyze_then_command_fails() -> Result<()> {
    let fixture = TestFixture::new()?;
    seed_tdd_session(&fixture, "session-1")?;

    let output = toolgram(&fixture, &["analyze", "--session", "missing"])?;

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Session not found: missing"));
    Ok(())
}

#[test]
fn given_markdown_format_when_analyze_then_markdown_report() -> Result<()> {
    let fixture = TestFixture::new()?;
    seed_tdd_session(&fixture, "session-1")?;

    let output = toolgram(&fixture, &["analyze", "-f", "markdown", "--no-patterns"])?;
    let stdout = stdout_of(&output);

    assert!(output.status.success());
    assert!(stdout.starts_with("# Claude Code Log Analysis Report"));
    assert!(!stdout.contains("## Detected Patterns"));
    Ok(())
}

#[test]
fn given_sessions_when_listed_then_each_is_printed() -> Result<()> {
    let fixture = TestFixture::new()?;
    seed_tdd_session(&fixture, "session-1")?;
    seed_tdd_session(&fixture, "session-2")?;

    let output = toolgram(&fixture, &["sessions", "--format", "json"])?;
    assert!(output.status.success());

    let sessions: Value = serde_json::from_str(&stdout_of(&output))?;
    let ids: Vec<&str> = sessions
        .as_array()
        .context("session list")?
        .iter()
        .filter_map(|s| s["id"].as_str())
        .collect();
    assert_eq!(ids, vec!["session-1", "session-2"]);
    Ok(())
}

#[test]
fn given_session_when_patterns_then_stats_and_matches_are_printed() -> Result<()> {
    let fixture = TestFixture::new()?;
    seed_tdd_session(&fixture, "session-1")?;

    let output = toolgram(
        &fixture,
        &["patterns", "--session", "session-1", "--find", "Edit,Bash"],
    )?;
    let stdout = stdout_of(&output);

    assert!(output.status.success());
    assert!(stdout.contains("Session: session-1"));
    assert!(stdout.contains("Edit -> Bash found 3 times"));
    Ok(())
}
