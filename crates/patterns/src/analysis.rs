//! Multi-session aggregation: one call from parsed sessions to a full report.

use crate::efficiency::evaluate_efficiency;
use crate::error::PatternError;
use crate::mining::{detect_patterns, DetectionOptions};
use crate::skills::synthesize_skill_candidates;
use crate::types::{
    EfficiencyEvaluation, OperationPattern, Recommendation, SessionMetrics, SkillCandidate,
    ToolInvocation, ToolResult,
};
use chrono::{DateTime, FixedOffset};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

const SUMMARY_TOOLS: usize = 10;
const SUMMARY_PATTERNS: usize = 5;
const SUMMARY_RECOMMENDATIONS: usize = 3;

/// Everything parsed from one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    pub metrics: SessionMetrics,
    pub invocations: Vec<ToolInvocation>,
    pub results: Vec<ToolResult>,
}

/// Options for [`aggregate_analysis`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeOptions {
    /// Mine patterns and synthesize skills. When false both lists are empty.
    pub include_patterns: bool,
    pub detection: DetectionOptions,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            include_patterns: true,
            detection: DetectionOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzedPeriod {
    /// Earliest session start time.
    pub start: Option<String>,
    /// Latest session start time.
    pub end: Option<String>,
    pub total_sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternSummary {
    pub sequence: Vec<String>,
    pub frequency: usize,
}

/// Headline numbers of an analysis.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub total_tool_calls: usize,
    pub total_errors: usize,
    pub overall_error_rate: f64,
    /// Top 10 tools by call count.
    pub most_used_tools: Vec<ToolCount>,
    /// Top 5 patterns by frequency.
    pub most_frequent_patterns: Vec<PatternSummary>,
    /// First 3 recommendations of the efficiency evaluation.
    pub top_recommendations: Vec<Recommendation>,
}

/// Complete analysis of a batch of sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedAnalysis {
    pub analyzed_period: AnalyzedPeriod,
    pub session_metrics: Vec<SessionMetrics>,
    pub patterns: Vec<OperationPattern>,
    pub efficiency: EfficiencyEvaluation,
    pub skill_candidates: Vec<SkillCandidate>,
    pub summary: AnalysisSummary,
}

/// Analyze a batch of sessions.
///
/// Invocations and results are concatenated in session order before
/// evaluation and mining, so patterns may span session boundaries.
pub fn aggregate_analysis(
    sessions: &[SessionInput],
    options: &AnalyzeOptions,
) -> Result<AggregatedAnalysis, PatternError> {
    options.detection.validate()?;

    let invocations: Vec<ToolInvocation> = sessions
        .iter()
        .flat_map(|s| s.invocations.iter().cloned())
        .collect();
    let results: Vec<ToolResult> = sessions
        .iter()
        .flat_map(|s| s.results.iter().cloned())
        .collect();
    let session_metrics: Vec<SessionMetrics> =
        sessions.iter().map(|s| s.metrics.clone()).collect();

    let efficiency = evaluate_efficiency(&invocations, &results, &session_metrics);

    let patterns = if options.include_patterns {
        detect_patterns(&invocations, &options.detection)?
    } else {
        Vec::new()
    };
    let skill_candidates = synthesize_skill_candidates(&patterns);
    let summary = build_summary(&session_metrics, &patterns, &efficiency);

    info!(
        sessions = sessions.len(),
        tool_calls = invocations.len(),
        patterns = patterns.len(),
        skills = skill_candidates.len(),
        "Analysis complete"
    );

    Ok(AggregatedAnalysis {
        analyzed_period: analyzed_period(&session_metrics),
        session_metrics,
        patterns,
        efficiency,
        skill_candidates,
        summary,
    })
}

fn analyzed_period(metrics: &[SessionMetrics]) -> AnalyzedPeriod {
    // Unparseable start times sort before every valid one.
    let key = |m: &&SessionMetrics| -> (Option<DateTime<FixedOffset>>, String) {
        (
            DateTime::parse_from_rfc3339(&m.start_time).ok(),
            m.start_time.clone(),
        )
    };

    AnalyzedPeriod {
        start: metrics.iter().min_by_key(key).map(|m| m.start_time.clone()),
        end: metrics.iter().max_by_key(key).map(|m| m.start_time.clone()),
        total_sessions: metrics.len(),
    }
}

fn build_summary(
    metrics: &[SessionMetrics],
    patterns: &[OperationPattern],
    efficiency: &EfficiencyEvaluation,
) -> AnalysisSummary {
    let total_tool_calls: usize = metrics.iter().map(|m| m.total_tool_calls).sum();
    let total_errors: usize = metrics.iter().map(|m| m.error_count).sum();

    let mut tool_counts: IndexMap<&str, usize> = IndexMap::new();
    for session in metrics {
        for (tool, count) in &session.tool_breakdown {
            *tool_counts.entry(tool.as_str()).or_insert(0) += count;
        }
    }
    let mut most_used: Vec<(&str, usize)> = tool_counts.into_iter().collect();
    most_used.sort_by(|a, b| b.1.cmp(&a.1));

    let mut ranked: Vec<&OperationPattern> = patterns.iter().collect();
    ranked.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    AnalysisSummary {
        total_tool_calls,
        total_errors,
        overall_error_rate: if total_tool_calls > 0 {
            total_errors as f64 / total_tool_calls as f64
        } else {
            0.0
        },
        most_used_tools: most_used
            .into_iter()
            .take(SUMMARY_TOOLS)
            .map(|(name, count)| ToolCount {
                name: name.to_string(),
                count,
            })
            .collect(),
        most_frequent_patterns: ranked
            .into_iter()
            .take(SUMMARY_PATTERNS)
            .map(|p| PatternSummary {
                sequence: p.sequence.clone(),
                frequency: p.frequency,
            })
            .collect(),
        top_recommendations: efficiency
            .recommendations
            .iter()
            .take(SUMMARY_RECOMMENDATIONS)
            .cloned()
            .collect(),
    }
}
