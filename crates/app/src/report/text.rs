use super::{date_part, percent, ReportOptions};
use std::fmt::Write;
use toolgram_patterns::{
    AggregatedAnalysis, EfficiencyEvaluation, OperationPattern, Priority, Recommendation,
    SessionMetrics, Severity, SkillCandidate,
};

const RULE_WIDTH: usize = 50;
const TOP_TOOLS: usize = 5;
const TOP_PATTERNS: usize = 5;
const TOP_SKILLS: usize = 3;
const SESSION_ID_PREFIX: usize = 8;

/// Render the plain-text terminal report.
pub fn render_text(analysis: &AggregatedAnalysis, options: ReportOptions) -> String {
    let mut output = String::new();
    let summary = &analysis.summary;
    let period = &analysis.analyzed_period;

    let _ = writeln!(output, "\n=== Claude Code Log Analysis ===");
    let _ = writeln!(output, "{}", "-".repeat(RULE_WIDTH));
    let _ = writeln!(
        output,
        "\nAnalyzed Period: {} - {}",
        date_part(period.start.as_deref()),
        date_part(period.end.as_deref())
    );
    let _ = writeln!(output, "Total Sessions: {}", period.total_sessions);

    let _ = writeln!(output, "\n--- Summary ---");
    let _ = writeln!(output, "Total Tool Calls: {}", summary.total_tool_calls);
    let _ = writeln!(output, "Total Errors: {}", summary.total_errors);
    let _ = writeln!(output, "Error Rate: {}", percent(summary.overall_error_rate));

    let _ = writeln!(output, "\nMost Used Tools:");
    for tool in summary.most_used_tools.iter().take(TOP_TOOLS) {
        let _ = writeln!(output, "  {}: {} calls", tool.name, tool.count);
    }

    write_efficiency(&mut output, &analysis.efficiency);

    if options.include_patterns && !analysis.patterns.is_empty() {
        write_patterns(&mut output, &analysis.patterns);
    }

    if options.verbose {
        write_sessions(&mut output, &analysis.session_metrics);
    }

    if !analysis.skill_candidates.is_empty() {
        write_skills(&mut output, &analysis.skill_candidates);
    }

    if !summary.top_recommendations.is_empty() {
        write_recommendations(&mut output, &summary.top_recommendations);
    }

    let _ = writeln!(output, "\n{}", "-".repeat(RULE_WIDTH));
    output
}

fn write_efficiency(output: &mut String, efficiency: &EfficiencyEvaluation) {
    let metrics = &efficiency.metrics;
    let _ = writeln!(output, "\n--- Efficiency Score ---");
    let _ = writeln!(output, "Overall Score: {:.0}/100", efficiency.overall_score);
    let _ = writeln!(output, "  Error Rate: {}", percent(metrics.error_rate));
    let _ = writeln!(output, "  Retry Rate: {}", percent(metrics.retry_rate));
    let _ = writeln!(output, "  Tool Diversity: {} tools", metrics.tool_diversity);
    let _ = writeln!(
        output,
        "  Avg Tools/Task: {:.1}",
        metrics.average_tools_per_task
    );

    if efficiency.issues.is_empty() {
        return;
    }
    let _ = writeln!(output, "\nIssues:");
    for issue in &efficiency.issues {
        let _ = writeln!(
            output,
            "  {} {}",
            severity_marker(issue.severity),
            issue.description
        );
        if let Some(fix) = &issue.suggested_fix {
            let _ = writeln!(output, "    Fix: {fix}");
        }
    }
}

fn write_patterns(output: &mut String, patterns: &[OperationPattern]) {
    let _ = writeln!(output, "\n--- Detected Patterns ---");
    for pattern in patterns.iter().take(TOP_PATTERNS) {
        let _ = writeln!(
            output,
            "\n* {} ({}x)",
            pattern.sequence.join(" -> "),
            pattern.frequency
        );
        let _ = writeln!(
            output,
            "  First seen: {}",
            date_part(Some(pattern.first_seen.as_str()))
        );
        let _ = writeln!(
            output,
            "  Success rate: {:.0}%",
            pattern.success_rate * 100.0
        );
    }
}

fn write_sessions(output: &mut String, sessions: &[SessionMetrics]) {
    let _ = writeln!(output, "\n--- Session Details ---");
    for metrics in sessions {
        let short_id: String = metrics.session_id.chars().take(SESSION_ID_PREFIX).collect();
        let _ = writeln!(output, "\n{short_id}... ({})", metrics.project_name);
        let _ = writeln!(
            output,
            "  Duration: {:.1} minutes",
            metrics.duration_minutes
        );
        let _ = writeln!(output, "  Tool Calls: {}", metrics.total_tool_calls);
        let _ = writeln!(output, "  Errors: {}", metrics.error_count);
        let _ = writeln!(output, "  User Messages: {}", metrics.user_message_count);
    }
}

fn write_skills(output: &mut String, skills: &[SkillCandidate]) {
    let _ = writeln!(output, "\n--- Skill Candidates ---");
    for skill in skills.iter().take(TOP_SKILLS) {
        let _ = writeln!(output, "\n* {}", skill.name);
        let _ = writeln!(output, "  {}", skill.description);
        let _ = writeln!(output, "  Frequency: {} times", skill.expected_frequency);
        let _ = writeln!(output, "  Est. Time Saved: {}", skill.estimated_time_saved);
    }
}

fn write_recommendations(output: &mut String, recommendations: &[Recommendation]) {
    let _ = writeln!(output, "\n--- Recommendations ---");
    for rec in recommendations {
        let _ = writeln!(output, "\n{} {}", priority_marker(rec.priority), rec.title);
        let _ = writeln!(output, "  {}", rec.description);
        let _ = writeln!(output, "  Expected: {}", rec.expected_benefit);
    }
}

fn severity_marker(severity: Severity) -> &'static str {
    match severity {
        Severity::High => "[!!]",
        Severity::Medium => "[!]",
        Severity::Low => "[-]",
    }
}

fn priority_marker(priority: Priority) -> &'static str {
    match priority {
        Priority::High => "[HIGH]",
        Priority::Medium => "[MED]",
        Priority::Low => "[LOW]",
    }
}
