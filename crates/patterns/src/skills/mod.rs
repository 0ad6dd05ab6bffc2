//! Skill candidate synthesis from mined patterns.

mod category;

pub use category::{category_description, infer_skill_category, trigger_conditions};

use crate::types::{OperationPattern, SkillCandidate, SkillCategory, SkillStep};
use std::collections::HashSet;
use tracing::debug;

/// Frequency below which no pattern qualifies. Read+Edit and Edit+Bash
/// shapes qualify from here.
pub const SKILL_MIN_FREQUENCY: usize = 5;
/// Frequency needed by any other multi-tool pattern.
pub const GENERIC_MIN_FREQUENCY: usize = 10;

const SECONDS_PER_STEP: usize = 5;
const DESCRIBED_COMMANDS: usize = 3;
const COMMAND_TOKENS: usize = 3;

/// Whether a pattern is worth turning into a skill.
///
/// Single-tool repetitions and patterns seen fewer than
/// [`SKILL_MIN_FREQUENCY`] times never qualify. Past that floor, Read+Edit
/// and Edit+Bash shapes qualify and everything else needs
/// [`GENERIC_MIN_FREQUENCY`].
pub fn is_skill_eligible(pattern: &OperationPattern) -> bool {
    let tools: HashSet<&str> = pattern.sequence.iter().map(String::as_str).collect();
    if tools.len() < 2 || pattern.frequency < SKILL_MIN_FREQUENCY {
        return false;
    }

    let has_read = tools.contains("Read");
    let has_edit = tools.contains("Edit");
    let has_bash = tools.contains("Bash");
    let meaningful = (has_read && has_edit) || (has_edit && has_bash);

    meaningful || pattern.frequency >= GENERIC_MIN_FREQUENCY
}

/// Turn the eligible patterns into named skill candidates.
///
/// Names are unique within one call; ids are `skill-N` over the eligible
/// patterns in input order.
pub fn synthesize_skill_candidates(patterns: &[OperationPattern]) -> Vec<SkillCandidate> {
    let (candidates, _) = patterns
        .iter()
        .filter(|p| is_skill_eligible(p))
        .enumerate()
        .fold(
            (Vec::new(), HashSet::new()),
            |(mut candidates, mut taken): (Vec<SkillCandidate>, HashSet<String>), (i, pattern)| {
                let category = infer_skill_category(pattern);
                let name = generate_skill_name(pattern, category, &taken);
                taken.insert(name.clone());
                candidates.push(build_candidate(i + 1, name, category, pattern));
                (candidates, taken)
            },
        );

    debug!(
        patterns = patterns.len(),
        candidates = candidates.len(),
        "Skill candidates synthesized"
    );
    candidates
}

/// Build a name from the first two tools, suffixed `-1`, `-2`, ... until it
/// is not in `taken`.
pub fn generate_skill_name(
    pattern: &OperationPattern,
    category: SkillCategory,
    taken: &HashSet<String>,
) -> String {
    let tool_part = pattern
        .sequence
        .iter()
        .take(2)
        .map(|t| {
            t.to_lowercase()
                .chars()
                .filter(|c| c.is_ascii_lowercase())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("-");

    let prefix = match category {
        SkillCategory::Other => "auto",
        other => other.as_str(),
    };
    let base = format!("{prefix}-{tool_part}");

    if !taken.contains(&base) {
        return base;
    }
    (1..)
        .map(|n| format!("{base}-{n}"))
        .find(|candidate| !taken.contains(candidate))
        .unwrap_or(base)
}

/// Category lead, up to three shortened commands, then the tool chain.
pub fn generate_skill_description(pattern: &OperationPattern, category: SkillCategory) -> String {
    let mut description = category_description(category).to_string();

    if !pattern.common_commands.is_empty() {
        let commands: Vec<String> = pattern
            .common_commands
            .iter()
            .take(DESCRIBED_COMMANDS)
            .map(|cmd| shorten_command(cmd))
            .collect();
        description.push_str(&format!(" ({})", commands.join(", ")));
    }

    description.push_str(&format!(": {}", pattern.sequence.join(" -> ")));
    description
}

fn shorten_command(command: &str) -> String {
    let tokens: Vec<&str> = command.split_whitespace().collect();
    let head = tokens
        .iter()
        .take(COMMAND_TOKENS)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if tokens.len() > COMMAND_TOKENS {
        format!("{head}...")
    } else {
        head
    }
}

fn build_candidate(
    index: usize,
    name: String,
    category: SkillCategory,
    pattern: &OperationPattern,
) -> SkillCandidate {
    SkillCandidate {
        id: format!("skill-{index}"),
        name,
        description: generate_skill_description(pattern, category),
        category,
        trigger_conditions: trigger_conditions(category),
        steps: pattern
            .sequence
            .iter()
            .enumerate()
            .map(|(i, tool)| SkillStep {
                order: i + 1,
                action: format!("Execute {tool}"),
                tool_name: tool.clone(),
            })
            .collect(),
        expected_frequency: pattern.frequency,
        estimated_time_saved: format!(
            "{} seconds per invocation",
            pattern.sequence.len() * SECONDS_PER_STEP
        ),
        source_patterns: vec![pattern.id.clone()],
        related_files: pattern.common_file_paths.clone(),
        related_commands: pattern.common_commands.clone(),
    }
}


#[cfg(test)]
mod proptest_tests {
    use super::tests::pattern;
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: names are unique within a synthesis run.
        #[test]
        fn names_are_unique(
            seqs in prop::collection::vec(
                prop::collection::vec(prop::sample::select(vec!["Read", "Edit", "Bash"]), 2..4),
                0..20,
            )
        ) {
            let patterns: Vec<OperationPattern> = seqs
                .iter()
                .enumerate()
                .map(|(i, seq)| pattern(&format!("p{i}"), seq, 10))
                .collect();
            let candidates = synthesize_skill_candidates(&patterns);
            let names: HashSet<&str> = candidates.iter().map(|c| c.name.as_str()).collect();
            prop_assert_eq!(names.len(), candidates.len());
        }
    }
}
