//! Pattern mining and efficiency analysis over coding-agent tool logs.
//!
//! This crate is the I/O-free core of toolgram:
//! - N-gram mining of recurring tool sequences with sub-pattern suppression
//! - Efficiency scoring (error rate, edit retries) with issues and recommendations
//! - Skill candidate synthesis from mined patterns
//! - Merging and summarizing pattern sets across sessions
//!
//! # Example
//!
//! ```rust
//! use serde_json::json;
//! use toolgram_patterns::{detect_patterns, DetectionOptions, ToolInvocation};
//!
//! let calls: Vec<ToolInvocation> = ["Read", "Edit", "Read", "Edit"]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, tool)| ToolInvocation::new(format!("2025-01-18T10:00:0{i}Z"), *tool, json!({})))
//!     .collect();
//!
//! let patterns = detect_patterns(&calls, &DetectionOptions::default()).unwrap();
//! assert_eq!(patterns[0].sequence, vec!["Read", "Edit"]);
//! assert_eq!(patterns[0].frequency, 2);
//! ```

#![deny(unsafe_code)]

pub mod analysis;
pub mod bash;
pub mod efficiency;
pub mod error;
pub mod mining;
pub mod skills;
pub mod types;

pub use analysis::{
    aggregate_analysis, AggregatedAnalysis, AnalysisSummary, AnalyzeOptions, AnalyzedPeriod,
    PatternSummary, SessionInput, ToolCount,
};
pub use bash::{classify_bash_command, BashCategory};
pub use efficiency::{count_retries, efficiency_score, evaluate_efficiency};
pub use error::PatternError;
pub use mining::{
    calculate_pattern_stats, contains_subsequence, detect_patterns, extract_sequence,
    find_pattern, merge_patterns, DetectionOptions, PatternMatch,
};
pub use skills::{infer_skill_category, is_skill_eligible, synthesize_skill_candidates};
pub use types::{
    EfficiencyEvaluation, EfficiencyIssue, EfficiencyMetrics, IssueType, OperationPattern,
    PatternContext, PatternStats, Priority, Recommendation, RecommendationType, SessionMetrics,
    Severity, SkillCandidate, SkillCategory, SkillStep, ToolInvocation, ToolResult, BASH_TOOL,
};
