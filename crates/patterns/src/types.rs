//! Data model shared by the mining, evaluation, and synthesis stages.

use crate::bash::{classify_bash_command, BashCategory};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Name of the shell-execution tool.
pub const BASH_TOOL: &str = "Bash";

/// Tools whose input names a single file.
const FILE_TOOLS: &[&str] = &["Read", "Write", "Edit", "MultiEdit", "NotebookEdit"];

// ============================================================================
// Input Records
// ============================================================================

/// A single recorded tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInvocation {
    /// RFC 3339 timestamp of the assistant message carrying the call.
    pub timestamp: String,
    /// Tool identifier (e.g. "Read", "Edit", "Bash").
    pub tool_name: String,
    /// Raw tool input.
    #[serde(default)]
    pub tool_input: Map<String, Value>,
    /// `tool_use` block id, used to join results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Session this call was recorded in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    /// Whether the matching tool result reported an error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_error: Option<bool>,
    /// Shell command text, only for the `Bash` tool.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bash_command: Option<String>,
    /// Category of `bash_command`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bash_category: Option<BashCategory>,
    /// Target file of file-oriented tools.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl ToolInvocation {
    /// Build an invocation and derive the bash/file context from its input.
    pub fn new(timestamp: impl Into<String>, tool_name: impl Into<String>, input: Value) -> Self {
        let tool_name = tool_name.into();
        let tool_input = match input {
            Value::Object(map) => map,
            _ => Map::new(),
        };

        let bash_command = if tool_name == BASH_TOOL {
            tool_input
                .get("command")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        } else {
            None
        };
        let bash_category = bash_command.as_deref().map(classify_bash_command);

        let file_path = if FILE_TOOLS.contains(&tool_name.as_str()) {
            tool_input
                .get("file_path")
                .or_else(|| tool_input.get("notebook_path"))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        } else {
            None
        };

        Self {
            timestamp: timestamp.into(),
            tool_name,
            tool_input,
            id: None,
            session_id: None,
            is_error: None,
            bash_command,
            bash_category,
            file_path,
        }
    }

    /// Attach the `tool_use` id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Attach the owning session id.
    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Record the outcome reported by the matching tool result.
    pub fn with_error(mut self, is_error: bool) -> Self {
        self.is_error = Some(is_error);
        self
    }
}

/// Result block returned for a tool call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub timestamp: String,
    pub tool_use_id: String,
    /// Name of the tool that produced the result, when it could be resolved.
    pub tool_name: String,
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

/// Aggregate counts for one session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetrics {
    pub session_id: String,
    pub session_path: String,
    pub project_name: String,
    pub start_time: String,
    pub end_time: String,
    pub duration_minutes: f64,
    pub total_tool_calls: usize,
    pub error_count: usize,
    pub error_rate: f64,
    pub unique_tools_used: usize,
    pub user_message_count: usize,
    pub assistant_message_count: usize,
    /// Calls per tool, in first-use order.
    pub tool_breakdown: IndexMap<String, usize>,
}

// ============================================================================
// Mining Output
// ============================================================================

/// Where and in what surroundings a pattern occurred.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternContext {
    /// Session of the first call in the window ("aggregate" when unknown).
    pub session_id: String,
    pub timestamp: String,
    /// Up to two tools before and two after the window.
    pub surrounding_tools: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bash_commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub file_paths: Vec<String>,
}

/// A recurring contiguous tool sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationPattern {
    pub id: String,
    /// Ordered tool names; the pattern's identity.
    pub sequence: Vec<String>,
    pub frequency: usize,
    pub contexts: Vec<PatternContext>,
    pub first_seen: String,
    pub last_seen: String,
    /// Share of occurrences without a reported tool error (0.0 - 1.0).
    pub success_rate: f64,
    /// Dominant bash category across occurrences.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<BashCategory>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_commands: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub common_file_paths: Vec<String>,
}

/// Summary statistics over a pattern collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternStats {
    pub total_patterns: usize,
    pub average_frequency: f64,
    pub average_sequence_length: f64,
    pub most_common_tool: Option<String>,
}

// ============================================================================
// Efficiency
// ============================================================================

/// Severity of an efficiency issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
}

/// Priority of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueType {
    HighErrorRate,
    ExcessiveRetries,
    InefficientPattern,
    UnderutilizedTool,
}

/// A qualitative problem raised by the evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyIssue {
    #[serde(rename = "type")]
    pub issue_type: IssueType,
    pub severity: Severity,
    pub description: String,
    pub affected_sessions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggested_fix: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationType {
    PatternOptimization,
    ToolSuggestion,
    WorkflowImprovement,
    SkillCandidate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub id: String,
    #[serde(rename = "type")]
    pub recommendation_type: RecommendationType,
    pub priority: Priority,
    pub title: String,
    pub description: String,
    pub expected_benefit: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_patterns: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyMetrics {
    pub error_rate: f64,
    pub retry_rate: f64,
    /// Distinct tool names seen.
    pub tool_diversity: usize,
    pub average_tools_per_task: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EfficiencyEvaluation {
    /// Composite score (0 - 100).
    pub overall_score: f64,
    pub metrics: EfficiencyMetrics,
    pub issues: Vec<EfficiencyIssue>,
    pub recommendations: Vec<Recommendation>,
}

// ============================================================================
// Skill Candidates
// ============================================================================

/// Workflow family a skill candidate belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillCategory {
    Tdd,
    Refactoring,
    Debugging,
    Build,
    Git,
    Lint,
    Test,
    Docs,
    Other,
}

impl SkillCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            SkillCategory::Tdd => "tdd",
            SkillCategory::Refactoring => "refactoring",
            SkillCategory::Debugging => "debugging",
            SkillCategory::Build => "build",
            SkillCategory::Git => "git",
            SkillCategory::Lint => "lint",
            SkillCategory::Test => "test",
            SkillCategory::Docs => "docs",
            SkillCategory::Other => "other",
        }
    }
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillStep {
    /// 1-based position in the workflow.
    pub order: usize,
    pub action: String,
    pub tool_name: String,
}

/// A named, reusable workflow synthesized from a recurring pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCandidate {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: SkillCategory,
    pub trigger_conditions: Vec<String>,
    pub steps: Vec<SkillStep>,
    pub expected_frequency: usize,
    pub estimated_time_saved: String,
    pub source_patterns: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_files: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_commands: Vec<String>,
}
