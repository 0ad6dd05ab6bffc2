//! Tolerant parsing of a Claude Code JSONL transcript.

use crate::error::SessionError;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use toolgram_patterns::{ToolInvocation, ToolResult};
use tracing::debug;

const UNKNOWN_TOOL: &str = "unknown";

/// Everything extracted from one transcript.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSession {
    /// Tool calls in transcript order, with `is_error` joined from results.
    pub invocations: Vec<ToolInvocation>,
    pub results: Vec<ToolResult>,
    /// User entries that carry a prompt rather than only tool results.
    pub user_message_count: usize,
    pub assistant_message_count: usize,
    pub first_timestamp: Option<String>,
    pub last_timestamp: Option<String>,
}

/// Read and parse the transcript at `path`.
pub fn parse_session(path: &Path) -> Result<ParsedSession, SessionError> {
    let content = fs::read_to_string(path).map_err(|e| SessionError::io(path, e))?;
    let session_id = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("unknown");
    Ok(parse_session_content(&content, session_id))
}

/// Parse transcript text. Blank and malformed lines are skipped.
pub fn parse_session_content(content: &str, session_id: &str) -> ParsedSession {
    let mut parsed = ParsedSession::default();
    let mut tool_names: HashMap<String, String> = HashMap::new();

    for (line_no, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let entry: Value = match serde_json::from_str(line) {
            Ok(v) => v,
            Err(e) => {
                debug!(line = line_no + 1, "Skipping malformed transcript line: {}", e);
                continue;
            }
        };

        let timestamp = entry.get("timestamp").and_then(|t| t.as_str());
        if let Some(ts) = timestamp {
            if parsed.first_timestamp.is_none() {
                parsed.first_timestamp = Some(ts.to_string());
            }
            parsed.last_timestamp = Some(ts.to_string());
        }

        let body = entry.get("message").and_then(|m| m.get("content"));
        match entry.get("type").and_then(|t| t.as_str()) {
            Some("assistant") => {
                parsed.assistant_message_count += 1;
                let Some(blocks) = body.and_then(|c| c.as_array()) else {
                    continue;
                };
                for block in blocks.iter().filter(|b| block_type(b) == Some("tool_use")) {
                    if let Some(invocation) = tool_use(block, timestamp, session_id) {
                        if let Some(id) = &invocation.id {
                            tool_names.insert(id.clone(), invocation.tool_name.clone());
                        }
                        parsed.invocations.push(invocation);
                    }
                }
            }
            Some("user") => {
                let blocks = body.and_then(|c| c.as_array());
                let is_prompt = match blocks {
                    Some(blocks) => blocks.iter().any(|b| block_type(b) != Some("tool_result")),
                    None => body.is_some(),
                };
                if is_prompt {
                    parsed.user_message_count += 1;
                }

                for block in blocks
                    .into_iter()
                    .flatten()
                    .filter(|b| block_type(b) == Some("tool_result"))
                {
                    if let Some(result) = tool_result(block, timestamp, &tool_names) {
                        parsed.results.push(result);
                    }
                }
            }
            _ => {}
        }
    }

    let outcomes: HashMap<&str, bool> = parsed
        .results
        .iter()
        .map(|r| (r.tool_use_id.as_str(), r.is_error))
        .collect();
    let joined: Vec<Option<bool>> = parsed
        .invocations
        .iter()
        .map(|inv| inv.id.as_deref().and_then(|id| outcomes.get(id).copied()))
        .collect();
    for (invocation, is_error) in parsed.invocations.iter_mut().zip(joined) {
        invocation.is_error = is_error;
    }

    parsed
}

fn block_type(block: &Value) -> Option<&str> {
    block.get("type").and_then(|t| t.as_str())
}

fn tool_use(block: &Value, timestamp: Option<&str>, session_id: &str) -> Option<ToolInvocation> {
    let Some(name) = block.get("name").and_then(|n| n.as_str()) else {
        debug!("Skipping tool_use block without a name");
        return None;
    };
    let Some(timestamp) = timestamp else {
        debug!(tool = name, "Skipping tool_use block without a timestamp");
        return None;
    };

    let input = block.get("input").cloned().unwrap_or(Value::Null);
    let mut invocation = ToolInvocation::new(timestamp, name, input).with_session(session_id);
    if let Some(id) = block.get("id").and_then(|i| i.as_str()) {
        invocation = invocation.with_id(id);
    }
    Some(invocation)
}

fn tool_result(
    block: &Value,
    timestamp: Option<&str>,
    tool_names: &HashMap<String, String>,
) -> Option<ToolResult> {
    let tool_use_id = block.get("tool_use_id").and_then(|i| i.as_str())?;
    let is_error = block
        .get("is_error")
        .and_then(|e| e.as_bool())
        .unwrap_or(false);
    let error_message = if is_error {
        result_text(block.get("content"))
    } else {
        None
    };

    Some(ToolResult {
        timestamp: timestamp.unwrap_or_default().to_string(),
        tool_use_id: tool_use_id.to_string(),
        tool_name: tool_names
            .get(tool_use_id)
            .cloned()
            .unwrap_or_else(|| UNKNOWN_TOOL.to_string()),
        is_error,
        error_message,
    })
}

/// Text of a result body: either a plain string or the `text` blocks of an array.
fn result_text(content: Option<&Value>) -> Option<String> {
    match content? {
        Value::String(s) => Some(s.clone()),
        Value::Array(blocks) => {
            let text: Vec<&str> = blocks
                .iter()
                .filter_map(|b| b.get("text").and_then(|t| t.as_str()))
                .collect();
            (!text.is_empty()).then(|| text.join("\n"))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use toolgram_patterns::BashCategory;

    const TRANSCRIPT: &str = r#"{"type":"user","timestamp":"2025-01-18T10:00:00Z","message":{"role":"user","content":"fix the failing test"}}
{"type":"assistant","timestamp":"2025-01-18T10:00:05Z","message":{"role":"assistant","content":[{"type":"text","text":"Looking."},{"type":"tool_use","id":"t1","name":"Read","input":{"file_path":"src/lib.rs"}}]}}
{"type":"user","timestamp":"2025-01-18T10:00:06Z","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t1","content":"fn main() {}"}]}}
not json at all

{"type":"assistant","timestamp":"2025-01-18T10:00:10Z","message":{"role":"assistant","content":[{"type":"tool_use","id":"t2","name":"Bash","input":{"command":"cargo test"}}]}}
{"type":"user","timestamp":"2025-01-18T10:00:20Z","message":{"role":"user","content":[{"type":"tool_result","tool_use_id":"t2","is_error":true,"content":[{"type":"text","text":"test failed"}]}]}}
{"type":"summary","summary":"Fixing tests"}
"#;

    #[test]
    fn test_extracts_invocations_and_results() {
        let parsed = parse_session_content(TRANSCRIPT, "s1");

        assert_eq!(parsed.invocations.len(), 2);
        assert_eq!(parsed.invocations[0].tool_name, "Read");
        assert_eq!(parsed.invocations[0].file_path.as_deref(), Some("src/lib.rs"));
        assert_eq!(parsed.invocations[0].session_id.as_deref(), Some("s1"));
        assert_eq!(parsed.invocations[1].bash_category, Some(BashCategory::Test));
        assert_eq!(parsed.invocations[1].timestamp, "2025-01-18T10:00:10Z");

        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[1].tool_name, "Bash");
        assert!(parsed.results[1].is_error);
        assert_eq!(parsed.results[1].error_message.as_deref(), Some("test failed"));
        assert!(parsed.results[0].error_message.is_none());
    }

    #[test]
    fn test_joins_outcomes_onto_invocations() {
        let parsed = parse_session_content(TRANSCRIPT, "s1");
        assert_eq!(parsed.invocations[0].is_error, Some(false));
        assert_eq!(parsed.invocations[1].is_error, Some(true));
    }

    #[test]
    fn test_counts_messages_and_time_range() {
        let parsed = parse_session_content(TRANSCRIPT, "s1");
        assert_eq!(parsed.user_message_count, 1);
        assert_eq!(parsed.assistant_message_count, 2);
        assert_eq!(parsed.first_timestamp.as_deref(), Some("2025-01-18T10:00:00Z"));
        assert_eq!(parsed.last_timestamp.as_deref(), Some("2025-01-18T10:00:20Z"));
    }

    #[test]
    fn test_unmatched_result_has_unknown_tool() {
        let line = r#"{"type":"user","timestamp":"2025-01-18T10:00:00Z","message":{"content":[{"type":"tool_result","tool_use_id":"zz","content":"ok"}]}}"#;
        let parsed = parse_session_content(line, "s1");
        assert_eq!(parsed.results[0].tool_name, "unknown");
        assert_eq!(parsed.user_message_count, 0);
    }

    #[test]
    fn test_tool_use_without_timestamp_is_skipped() {
        let line = r#"{"type":"assistant","message":{"content":[{"type":"tool_use","id":"t1","name":"Read","input":{}}]}}"#;
        let parsed = parse_session_content(line, "s1");
        assert!(parsed.invocations.is_empty());
        assert_eq!(parsed.assistant_message_count, 1);
    }

    #[test]
    fn test_empty_content() {
        assert_eq!(parse_session_content("", "s1"), ParsedSession::default());
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = parse_session(Path::new("/nonexistent/session.jsonl")).unwrap_err();
        assert!(matches!(err, SessionError::Io { .. }));
    }
}
