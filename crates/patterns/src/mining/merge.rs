//! Cross-source pattern merging, lookup, and summary statistics.

use crate::types::{OperationPattern, PatternStats, ToolInvocation};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One place where a target sequence occurs in an invocation list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatch {
    /// Index of the first call of the run.
    pub start_index: usize,
    /// Timestamp of the first call of the run.
    pub timestamp: String,
}

/// Merge pattern sets mined from independent sources.
///
/// Patterns with the same sequence are combined: frequencies are summed,
/// contexts are concatenated, and the seen range is widened. The first
/// occurrence of a sequence keeps its id and remaining fields.
pub fn merge_patterns(pattern_sets: &[Vec<OperationPattern>]) -> Vec<OperationPattern> {
    let mut merged: IndexMap<Vec<String>, OperationPattern> = IndexMap::new();

    for pattern in pattern_sets.iter().flatten() {
        match merged.get_mut(&pattern.sequence) {
            Some(existing) => {
                existing.frequency += pattern.frequency;
                existing.contexts.extend(pattern.contexts.iter().cloned());
                if pattern.first_seen < existing.first_seen {
                    existing.first_seen = pattern.first_seen.clone();
                }
                if pattern.last_seen > existing.last_seen {
                    existing.last_seen = pattern.last_seen.clone();
                }
            }
            None => {
                merged.insert(pattern.sequence.clone(), pattern.clone());
            }
        }
    }

    let mut patterns: Vec<OperationPattern> = merged.into_values().collect();
    patterns.sort_by(|a, b| b.frequency.cmp(&a.frequency));
    patterns
}

/// Every position where `target` occurs as a contiguous run of tool names.
pub fn find_pattern(invocations: &[ToolInvocation], target: &[String]) -> Vec<PatternMatch> {
    if target.is_empty() || target.len() > invocations.len() {
        return Vec::new();
    }

    invocations
        .windows(target.len())
        .enumerate()
        .filter(|(_, window)| {
            window
                .iter()
                .zip(target)
                .all(|(call, name)| &call.tool_name == name)
        })
        .map(|(start_index, window)| PatternMatch {
            start_index,
            timestamp: window[0].timestamp.clone(),
        })
        .collect()
}

/// Summarize a pattern collection.
pub fn calculate_pattern_stats(patterns: &[OperationPattern]) -> PatternStats {
    if patterns.is_empty() {
        return PatternStats::default();
    }

    let count = patterns.len() as f64;
    let total_frequency: usize = patterns.iter().map(|p| p.frequency).sum();
    let total_length: usize = patterns.iter().map(|p| p.sequence.len()).sum();

    let mut tool_weights: IndexMap<&str, usize> = IndexMap::new();
    for pattern in patterns {
        for tool in &pattern.sequence {
            *tool_weights.entry(tool.as_str()).or_insert(0) += pattern.frequency;
        }
    }

    // strict comparison: the first tool to reach the maximum wins ties
    let mut most_common: Option<(&str, usize)> = None;
    for (tool, weight) in tool_weights {
        if most_common.map_or(weight > 0, |(_, best)| weight > best) {
            most_common = Some((tool, weight));
        }
    }

    PatternStats {
        total_patterns: patterns.len(),
        average_frequency: total_frequency as f64 / count,
        average_sequence_length: total_length as f64 / count,
        most_common_tool: most_common.map(|(tool, _)| tool.to_string()),
    }
}
