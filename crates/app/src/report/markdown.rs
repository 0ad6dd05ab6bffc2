use super::{date_part, percent};
use std::fmt::Write;
use toolgram_patterns::AggregatedAnalysis;

const TOP_TOOLS: usize = 10;
const TOP_PATTERNS: usize = 10;

/// Render the analysis as a Markdown document.
pub fn render_markdown(analysis: &AggregatedAnalysis) -> String {
    let mut output = String::new();
    let summary = &analysis.summary;
    let period = &analysis.analyzed_period;

    let _ = writeln!(output, "# Claude Code Log Analysis Report\n");
    let _ = writeln!(
        output,
        "**Period:** {} - {}",
        date_part(period.start.as_deref()),
        date_part(period.end.as_deref())
    );
    let _ = writeln!(output, "**Total Sessions:** {}\n", period.total_sessions);

    let _ = writeln!(output, "## Summary\n");
    let _ = writeln!(output, "| Metric | Value |");
    let _ = writeln!(output, "|--------|-------|");
    let _ = writeln!(output, "| Total Tool Calls | {} |", summary.total_tool_calls);
    let _ = writeln!(output, "| Total Errors | {} |", summary.total_errors);
    let _ = writeln!(
        output,
        "| Error Rate | {} |",
        percent(summary.overall_error_rate)
    );
    let _ = writeln!(
        output,
        "| Efficiency Score | {:.0}/100 |",
        analysis.efficiency.overall_score
    );

    let _ = writeln!(output, "\n## Most Used Tools\n");
    for tool in summary.most_used_tools.iter().take(TOP_TOOLS) {
        let _ = writeln!(output, "- **{}**: {} calls", tool.name, tool.count);
    }

    if !analysis.patterns.is_empty() {
        let _ = writeln!(output, "\n## Detected Patterns\n");
        for pattern in analysis.patterns.iter().take(TOP_PATTERNS) {
            let _ = writeln!(
                output,
                "### {} ({}x)\n",
                pattern.sequence.join(" → "),
                pattern.frequency
            );
            let _ = writeln!(
                output,
                "- First seen: {}",
                date_part(Some(pattern.first_seen.as_str()))
            );
            let _ = writeln!(
                output,
                "- Success rate: {:.0}%\n",
                pattern.success_rate * 100.0
            );
        }
    }

    if !analysis.skill_candidates.is_empty() {
        let _ = writeln!(output, "\n## Skill Candidates\n");
        for skill in &analysis.skill_candidates {
            let _ = writeln!(output, "### {}\n", skill.name);
            let _ = writeln!(output, "{}\n", skill.description);
            let _ = writeln!(
                output,
                "- **Frequency:** {} times",
                skill.expected_frequency
            );
            let _ = writeln!(output, "- **Time Saved:** {}\n", skill.estimated_time_saved);
        }
    }

    if !summary.top_recommendations.is_empty() {
        let _ = writeln!(output, "\n## Recommendations\n");
        for rec in &summary.top_recommendations {
            let _ = writeln!(
                output,
                "### [{}] {}\n",
                rec.priority.as_str().to_uppercase(),
                rec.title
            );
            let _ = writeln!(output, "{}\n", rec.description);
            let _ = writeln!(output, "**Expected Benefit:** {}\n", rec.expected_benefit);
        }
    }

    output
}
