//! Sequence extraction: reduce a raw tool log to the calls that take part in mining.

use crate::types::ToolInvocation;
use std::collections::HashSet;
use tracing::warn;

/// Return the invocations whose tool is not excluded, in their original order.
///
/// Records with an empty tool name or a timestamp that is not RFC 3339 are
/// skipped with a warning; the rest of the batch is still processed.
pub fn extract_sequence<'a>(
    invocations: &'a [ToolInvocation],
    exclude_tools: &HashSet<&str>,
) -> Vec<&'a ToolInvocation> {
    let mut sequence = Vec::with_capacity(invocations.len());

    for (index, invocation) in invocations.iter().enumerate() {
        if invocation.tool_name.trim().is_empty() {
            warn!(index, "Skipping tool invocation without a tool name");
            continue;
        }
        if chrono::DateTime::parse_from_rfc3339(&invocation.timestamp).is_err() {
            warn!(
                index,
                tool = %invocation.tool_name,
                timestamp = %invocation.timestamp,
                "Skipping tool invocation with unparseable timestamp"
            );
            continue;
        }
        if exclude_tools.contains(invocation.tool_name.as_str()) {
            continue;
        }
        sequence.push(invocation);
    }

    sequence
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(ts: &str, name: &str) -> ToolInvocation {
        ToolInvocation::new(ts, name, json!({}))
    }

    #[test]
    fn test_empty_input_yields_empty_sequence() {
        assert!(extract_sequence(&[], &HashSet::new()).is_empty());
    }

    #[test]
    fn test_excluded_tools_are_dropped_in_order() {
        let calls = vec![
            call("2025-01-18T10:00:00Z", "Read"),
            call("2025-01-18T10:00:01Z", "TodoWrite"),
            call("2025-01-18T10:00:02Z", "Edit"),
        ];
        let exclude: HashSet<&str> = ["TodoWrite"].into_iter().collect();
        let names: Vec<&str> = extract_sequence(&calls, &exclude)
            .iter()
            .map(|c| c.tool_name.as_str())
            .collect();
        assert_eq!(names, vec!["Read", "Edit"]);
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let calls = vec![
            call("2025-01-18T10:00:00Z", "Read"),
            call("yesterday", "Edit"),
            call("2025-01-18T10:00:02Z", ""),
            call("2025-01-18T10:00:03Z", "Bash"),
        ];
        let names: Vec<&str> = extract_sequence(&calls, &HashSet::new())
            .iter()
            .map(|c| c.tool_name.as_str())
            .collect();
        assert_eq!(names, vec!["Read", "Bash"]);
    }

    #[test]
    fn test_context_fields_are_carried_through() {
        let calls = vec![ToolInvocation::new(
            "2025-01-18T10:00:00Z",
            "Bash",
            json!({"command": "git status"}),
        )
        .with_session("s1")];
        let seq = extract_sequence(&calls, &HashSet::new());
        assert_eq!(seq[0].bash_command.as_deref(), Some("git status"));
        assert_eq!(seq[0].session_id.as_deref(), Some("s1"));
    }
}
