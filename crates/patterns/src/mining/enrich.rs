//! Turns the raw occurrences of a frequent n-gram into an [`OperationPattern`].

use crate::bash::BashCategory;
use crate::types::{OperationPattern, PatternContext, ToolInvocation};
use indexmap::IndexMap;
use std::hash::Hash;

/// Tools captured on each side of an occurrence.
const CONTEXT_SIZE: usize = 2;
/// Entries kept in `common_commands` / `common_file_paths`.
const TOP_ITEMS: usize = 5;
/// Session label for calls recorded without a session id.
const AGGREGATE_SESSION: &str = "aggregate";

/// Context gathered for a single occurrence.
struct Occurrence {
    context: PatternContext,
    categories: Vec<BashCategory>,
    has_outcome: bool,
    failed: bool,
}

/// Build the enriched pattern for `key`, which occurs at every index in `starts`.
pub(crate) fn enrich_pattern(
    id: String,
    key: &[&str],
    starts: &[usize],
    sequence: &[&ToolInvocation],
) -> OperationPattern {
    let occurrences: Vec<Occurrence> = starts
        .iter()
        .map(|&start| occurrence(sequence, start, key.len()))
        .collect();

    let first_seen = occurrences
        .iter()
        .map(|o| o.context.timestamp.as_str())
        .min()
        .unwrap_or_default()
        .to_string();
    let last_seen = occurrences
        .iter()
        .map(|o| o.context.timestamp.as_str())
        .max()
        .unwrap_or_default()
        .to_string();

    let common_commands: Vec<String> = top_items(
        occurrences
            .iter()
            .flat_map(|o| o.context.bash_commands.iter().map(String::as_str)),
        TOP_ITEMS,
    )
    .into_iter()
    .map(str::to_string)
    .collect();
    let common_file_paths: Vec<String> = top_items(
        occurrences
            .iter()
            .flat_map(|o| o.context.file_paths.iter().map(String::as_str)),
        TOP_ITEMS,
    )
    .into_iter()
    .map(str::to_string)
    .collect();
    let category = most_frequent(occurrences.iter().flat_map(|o| o.categories.iter().copied()));

    OperationPattern {
        id,
        sequence: key.iter().map(|s| s.to_string()).collect(),
        frequency: occurrences.len(),
        success_rate: success_rate(&occurrences),
        contexts: occurrences.into_iter().map(|o| o.context).collect(),
        first_seen,
        last_seen,
        category,
        common_commands,
        common_file_paths,
    }
}

fn occurrence(sequence: &[&ToolInvocation], start: usize, len: usize) -> Occurrence {
    let window = &sequence[start..start + len];
    let first = window[0];

    let mut bash_commands = Vec::new();
    let mut file_paths = Vec::new();
    let mut categories = Vec::new();
    for call in window {
        if let Some(cmd) = &call.bash_command {
            bash_commands.push(cmd.clone());
        }
        if let Some(category) = call.bash_category {
            categories.push(category);
        }
        if let Some(path) = &call.file_path {
            file_paths.push(path.clone());
        }
    }

    Occurrence {
        context: PatternContext {
            session_id: first
                .session_id
                .clone()
                .unwrap_or_else(|| AGGREGATE_SESSION.to_string()),
            timestamp: first.timestamp.clone(),
            surrounding_tools: surrounding_tools(sequence, start, len),
            bash_commands,
            file_paths,
        },
        categories,
        has_outcome: window.iter().any(|c| c.is_error.is_some()),
        failed: window.iter().any(|c| c.is_error == Some(true)),
    }
}

/// Up to [`CONTEXT_SIZE`] tool names before `start` and after `start + len`.
pub(crate) fn surrounding_tools(
    sequence: &[&ToolInvocation],
    start: usize,
    len: usize,
) -> Vec<String> {
    let before = start.saturating_sub(CONTEXT_SIZE)..start;
    let after_start = (start + len).min(sequence.len());
    let after = after_start..(start + len + CONTEXT_SIZE).min(sequence.len());

    sequence[before]
        .iter()
        .chain(sequence[after].iter())
        .map(|c| c.tool_name.clone())
        .collect()
}

/// Share of occurrences without a failed call. Occurrences with no recorded
/// outcome count as successful, so the rate is 1.0 without result data.
fn success_rate(occurrences: &[Occurrence]) -> f64 {
    if occurrences.is_empty() || !occurrences.iter().any(|o| o.has_outcome) {
        return 1.0;
    }
    let succeeded = occurrences.iter().filter(|o| !o.failed).count();
    succeeded as f64 / occurrences.len() as f64
}

/// The `limit` most frequent items; ties keep first-seen order.
pub(crate) fn top_items<T, I>(items: I, limit: usize) -> Vec<T>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut counts: IndexMap<T, usize> = IndexMap::new();
    for item in items {
        *counts.entry(item).or_insert(0) += 1;
    }

    let mut ranked: Vec<(T, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.into_iter().take(limit).map(|(item, _)| item).collect()
}

/// The most frequent item; the first-seen item wins ties.
pub(crate) fn most_frequent<T, I>(items: I) -> Option<T>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    top_items(items, 1).into_iter().next()
}
