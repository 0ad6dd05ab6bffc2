//! Efficiency scoring over a batch of sessions.

use crate::types::{
    EfficiencyEvaluation, EfficiencyIssue, EfficiencyMetrics, IssueType, Priority,
    Recommendation, RecommendationType, SessionMetrics, Severity, ToolInvocation, ToolResult,
};
use std::collections::HashSet;
use tracing::debug;

/// Error rate above which a `high_error_rate` issue is raised.
pub const HIGH_ERROR_RATE_THRESHOLD: f64 = 0.10;
const SEVERE_ERROR_RATE: f64 = 0.20;
/// Retry rate above which an `excessive_retries` issue is raised.
pub const EXCESSIVE_RETRY_THRESHOLD: f64 = 0.15;
const SEVERE_RETRY_RATE: f64 = 0.25;

const MAX_ERROR_PENALTY: f64 = 30.0;
const MAX_RETRY_PENALTY: f64 = 20.0;

/// Tools whose consecutive calls on one file count as retries.
const RETRY_TOOLS: &[&str] = &["Edit", "Write"];

/// Score the batch and report the issues it shows.
///
/// Error totals come from `session_metrics`. When no session metrics are
/// given, errors are counted from `results` against the number of
/// invocations instead.
pub fn evaluate_efficiency(
    invocations: &[ToolInvocation],
    results: &[ToolResult],
    session_metrics: &[SessionMetrics],
) -> EfficiencyEvaluation {
    let (total_calls, total_errors) = if session_metrics.is_empty() {
        (
            invocations.len(),
            results.iter().filter(|r| r.is_error).count(),
        )
    } else {
        (
            session_metrics.iter().map(|m| m.total_tool_calls).sum(),
            session_metrics.iter().map(|m| m.error_count).sum(),
        )
    };
    let error_rate = ratio(total_errors, total_calls);

    let mut issues = Vec::new();
    let mut recommendations = Vec::new();

    if error_rate > HIGH_ERROR_RATE_THRESHOLD {
        issues.push(EfficiencyIssue {
            issue_type: IssueType::HighErrorRate,
            severity: if error_rate > SEVERE_ERROR_RATE {
                Severity::High
            } else {
                Severity::Medium
            },
            description: format!("Overall error rate is {:.1}%", error_rate * 100.0),
            affected_sessions: session_metrics
                .iter()
                .filter(|m| m.error_rate > HIGH_ERROR_RATE_THRESHOLD)
                .map(|m| m.session_id.clone())
                .collect(),
            suggested_fix: Some(
                "Review error patterns and consider adding validation steps".to_string(),
            ),
        });
        recommendations.push(Recommendation {
            id: "reduce-errors".to_string(),
            recommendation_type: RecommendationType::WorkflowImprovement,
            priority: Priority::High,
            title: "Reduce Tool Execution Errors".to_string(),
            description: "High error rate detected. Consider adding pre-validation steps or error handling patterns.".to_string(),
            expected_benefit: "Reduced retry attempts and faster task completion".to_string(),
            related_patterns: Vec::new(),
        });
    }

    let retries = count_retries(invocations);
    let retry_rate = ratio(retries, invocations.len());

    if retry_rate > EXCESSIVE_RETRY_THRESHOLD {
        issues.push(EfficiencyIssue {
            issue_type: IssueType::ExcessiveRetries,
            severity: if retry_rate > SEVERE_RETRY_RATE {
                Severity::High
            } else {
                Severity::Medium
            },
            description: format!("Retry rate is {:.1}%", retry_rate * 100.0),
            affected_sessions: session_metrics
                .iter()
                .map(|m| m.session_id.clone())
                .collect(),
            suggested_fix: Some(
                "Consider reading files before editing to understand context".to_string(),
            ),
        });
    }

    let tool_diversity = invocations
        .iter()
        .map(|c| c.tool_name.as_str())
        .collect::<HashSet<_>>()
        .len();
    let user_messages: usize = session_metrics.iter().map(|m| m.user_message_count).sum();
    let average_tools_per_task = if user_messages > 0 {
        total_calls as f64 / user_messages as f64
    } else {
        0.0
    };

    let overall_score = efficiency_score(error_rate, retry_rate);
    debug!(
        error_rate,
        retry_rate,
        overall_score,
        issues = issues.len(),
        "Efficiency evaluated"
    );

    EfficiencyEvaluation {
        overall_score,
        metrics: EfficiencyMetrics {
            error_rate,
            retry_rate,
            tool_diversity,
            average_tools_per_task,
        },
        issues,
        recommendations,
    }
}

/// Count Edit/Write calls that target the same file as the Edit/Write
/// immediately before them. Any other tool resets the tracker.
pub fn count_retries(invocations: &[ToolInvocation]) -> usize {
    let mut retries = 0;
    let mut last_file: Option<&str> = None;

    for call in invocations {
        if RETRY_TOOLS.contains(&call.tool_name.as_str()) {
            let path = call.file_path.as_deref();
            if path.is_some() && path == last_file {
                retries += 1;
            }
            last_file = path;
        } else {
            last_file = None;
        }
    }

    retries
}

/// `100 - min(error_rate * 100, 30) - min(retry_rate * 50, 20)`, floored at 0.
pub fn efficiency_score(error_rate: f64, retry_rate: f64) -> f64 {
    let error_penalty = (error_rate * 100.0).min(MAX_ERROR_PENALTY);
    let retry_penalty = (retry_rate * 50.0).min(MAX_RETRY_PENALTY);
    (100.0 - error_penalty - retry_penalty).max(0.0)
}

fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(name: &str, file: Option<&str>) -> ToolInvocation {
        let input = match file {
            Some(path) => json!({ "file_path": path }),
            None => json!({}),
        };
        ToolInvocation::new("2025-01-18T10:00:00Z", name, input)
    }

    fn metrics(id: &str, calls: usize, errors: usize, users: usize) -> SessionMetrics {
        SessionMetrics {
            session_id: id.to_string(),
            total_tool_calls: calls,
            error_count: errors,
            error_rate: ratio(errors, calls),
            user_message_count: users,
            ..Default::default()
        }
    }

    #[test]
    fn test_retry_on_same_file() {
        let calls = vec![
            call("Edit", Some("a.rs")),
            call("Edit", Some("a.rs")),
            call("Edit", Some("b.rs")),
        ];
        assert_eq!(count_retries(&calls), 1);
    }

    #[test]
    fn test_other_tool_resets_retry_tracker() {
        let calls = vec![
            call("Edit", Some("a.rs")),
            call("Read", Some("a.rs")),
            call("Write", Some("a.rs")),
            call("Write", Some("a.rs")),
        ];
        assert_eq!(count_retries(&calls), 1);
    }

    #[test]
    fn test_edits_without_path_are_not_retries() {
        let calls = vec![call("Edit", None), call("Edit", None)];
        assert_eq!(count_retries(&calls), 0);
    }

    #[test]
    fn test_high_error_rate_is_severe_above_twenty_percent() {
        let calls: Vec<ToolInvocation> = (0..10).map(|_| call("Read", None)).collect();
        let sessions = vec![metrics("s1", 10, 3, 2)];

        let eval = evaluate_efficiency(&calls, &[], &sessions);
        assert!((eval.metrics.error_rate - 0.3).abs() < 1e-9);
        assert_eq!(eval.issues.len(), 1);
        assert_eq!(eval.issues[0].issue_type, IssueType::HighErrorRate);
        assert_eq!(eval.issues[0].severity, Severity::High);
        assert_eq!(eval.issues[0].description, "Overall error rate is 30.0%");
        assert_eq!(eval.issues[0].affected_sessions, vec!["s1"]);
        assert_eq!(eval.recommendations[0].id, "reduce-errors");
        assert!((eval.overall_score - 70.0).abs() < 1e-9);
        assert!((eval.metrics.average_tools_per_task - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_moderate_error_rate_is_medium() {
        let sessions = vec![metrics("s1", 20, 3, 1), metrics("s2", 10, 1, 1)];
        let eval = evaluate_efficiency(&[], &[], &sessions);

        assert_eq!(eval.issues[0].severity, Severity::Medium);
        assert_eq!(eval.issues[0].affected_sessions, vec!["s1"]);
    }

    #[test]
    fn test_error_rate_falls_back_to_results() {
        let calls: Vec<ToolInvocation> = (0..4).map(|_| call("Bash", None)).collect();
        let results = vec![
            ToolResult {
                timestamp: "2025-01-18T10:00:00Z".into(),
                tool_use_id: "t1".into(),
                tool_name: "Bash".into(),
                is_error: true,
                error_message: None,
            },
            ToolResult {
                timestamp: "2025-01-18T10:00:01Z".into(),
                tool_use_id: "t2".into(),
                tool_name: "Bash".into(),
                is_error: false,
                error_message: None,
            },
        ];

        let eval = evaluate_efficiency(&calls, &results, &[]);
        assert!((eval.metrics.error_rate - 0.25).abs() < 1e-9);
        assert!(eval.issues[0].affected_sessions.is_empty());
    }

    #[test]
    fn test_excessive_retries_affect_every_session() {
        let calls = vec![
            call("Edit", Some("a.rs")),
            call("Edit", Some("a.rs")),
            call("Edit", Some("a.rs")),
            call("Read", None),
        ];
        let sessions = vec![metrics("s1", 4, 0, 1), metrics("s2", 0, 0, 0)];

        let eval = evaluate_efficiency(&calls, &[], &sessions);
        assert_eq!(eval.issues.len(), 1);
        assert_eq!(eval.issues[0].issue_type, IssueType::ExcessiveRetries);
        assert_eq!(eval.issues[0].severity, Severity::High);
        assert_eq!(eval.issues[0].description, "Retry rate is 50.0%");
        assert_eq!(eval.issues[0].affected_sessions, vec!["s1", "s2"]);
        assert!((eval.overall_score - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_batch_scores_full_marks() {
        let eval = evaluate_efficiency(&[], &[], &[]);
        assert_eq!(eval.overall_score, 100.0);
        assert_eq!(eval.metrics.tool_diversity, 0);
        assert!(eval.issues.is_empty());
        assert!(eval.recommendations.is_empty());
    }

    #[test]
    fn test_tool_diversity_counts_distinct_names() {
        let calls = vec![call("Read", None), call("Edit", None), call("Read", None)];
        let eval = evaluate_efficiency(&calls, &[], &[]);
        assert_eq!(eval.metrics.tool_diversity, 2);
    }
}

#[cfg(test)]
mod proptest_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: the score always lands in [0, 100].
        #[test]
        fn score_is_bounded(error_rate in 0.0f64..=10.0, retry_rate in 0.0f64..=10.0) {
            let score = efficiency_score(error_rate, retry_rate);
            prop_assert!((0.0..=100.0).contains(&score));
            prop_assert!(score >= 50.0);
        }

        /// Property: evaluation of arbitrary session totals stays in bounds.
        #[test]
        fn evaluation_score_is_bounded(
            totals in prop::collection::vec((0usize..50, 0usize..50), 0..6)
        ) {
            let sessions: Vec<SessionMetrics> = totals
                .iter()
                .enumerate()
                .map(|(i, (calls, errors))| SessionMetrics {
                    session_id: format!("s{i}"),
                    total_tool_calls: *calls,
                    error_count: *errors,
                    ..Default::default()
                })
                .collect();
            let eval = evaluate_efficiency(&[], &[], &sessions);
            prop_assert!((0.0..=100.0).contains(&eval.overall_score));
        }
    }
}
