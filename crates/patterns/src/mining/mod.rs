//! N-gram mining of recurring tool sequences.
//!
//! Mining runs in four steps over a single ordered invocation list:
//!
//! 1. [`extract_sequence`] drops excluded tools and malformed records.
//! 2. Every contiguous window in the configured length range is counted.
//! 3. Windows below the frequency floor are discarded, and any survivor that
//!    occurs inside a longer survivor is suppressed.
//! 4. Each remaining window is enriched into an [`OperationPattern`] and the
//!    result is ranked by frequency.

mod enrich;
mod extract;
mod merge;
mod ngram;

pub use extract::extract_sequence;
pub use merge::{calculate_pattern_stats, find_pattern, merge_patterns, PatternMatch};
pub use ngram::contains_subsequence;

use crate::error::PatternError;
use crate::types::{OperationPattern, ToolInvocation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::debug;

/// Default minimum number of occurrences for a pattern.
pub const DEFAULT_MIN_FREQUENCY: usize = 2;
/// Default longest window length.
pub const DEFAULT_MAX_SEQUENCE_LENGTH: usize = 5;
/// Default shortest window length.
pub const DEFAULT_MIN_SEQUENCE_LENGTH: usize = 2;

/// Tuning knobs for [`detect_patterns`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DetectionOptions {
    pub min_frequency: usize,
    pub max_sequence_length: usize,
    pub min_sequence_length: usize,
    /// Tool names removed before mining.
    pub exclude_tools: Vec<String>,
}

impl Default for DetectionOptions {
    fn default() -> Self {
        Self {
            min_frequency: DEFAULT_MIN_FREQUENCY,
            max_sequence_length: DEFAULT_MAX_SEQUENCE_LENGTH,
            min_sequence_length: DEFAULT_MIN_SEQUENCE_LENGTH,
            exclude_tools: Vec::new(),
        }
    }
}

impl DetectionOptions {
    /// Reject option sets that cannot describe a mining run.
    pub fn validate(&self) -> Result<(), PatternError> {
        if self.min_frequency == 0 {
            return Err(PatternError::ZeroMinFrequency);
        }
        if self.min_sequence_length == 0 {
            return Err(PatternError::ZeroMinSequenceLength);
        }
        if self.min_sequence_length > self.max_sequence_length {
            return Err(PatternError::InvertedLengthBounds {
                min: self.min_sequence_length,
                max: self.max_sequence_length,
            });
        }
        Ok(())
    }
}

/// Mine the recurring tool sequences in `invocations`.
///
/// The result is deterministic: patterns are ranked by frequency, and equal
/// frequencies keep the order in which their windows were first counted
/// (shorter lengths first, then earlier start positions).
pub fn detect_patterns(
    invocations: &[ToolInvocation],
    options: &DetectionOptions,
) -> Result<Vec<OperationPattern>, PatternError> {
    options.validate()?;

    let exclude: HashSet<&str> = options.exclude_tools.iter().map(String::as_str).collect();
    let sequence = extract_sequence(invocations, &exclude);
    if sequence.len() < options.min_sequence_length {
        return Ok(Vec::new());
    }

    let counts = ngram::count_ngrams(
        &sequence,
        options.min_sequence_length,
        options.max_sequence_length,
    );
    let frequent: Vec<(&Vec<&str>, &Vec<usize>)> = counts
        .iter()
        .filter(|(_, starts)| starts.len() >= options.min_frequency)
        .collect();

    let keys: Vec<&[&str]> = frequent.iter().map(|(key, _)| key.as_slice()).collect();
    let maximal = ngram::maximal_keys(&keys);

    let mut patterns: Vec<OperationPattern> = frequent
        .iter()
        .zip(maximal)
        .filter(|(_, keep)| *keep)
        .enumerate()
        .map(|(i, ((key, starts), _))| {
            enrich::enrich_pattern(format!("pattern-{}", i + 1), key, starts, &sequence)
        })
        .collect();
    patterns.sort_by(|a, b| b.frequency.cmp(&a.frequency));

    debug!(
        calls = sequence.len(),
        windows = counts.len(),
        frequent = frequent.len(),
        patterns = patterns.len(),
        "Pattern mining complete"
    );

    Ok(patterns)
}


#[cfg(test)]
mod proptest_tests {
    use super::tests::calls;
    use super::*;
    use proptest::prelude::*;

    fn tool_names() -> impl Strategy<Value = Vec<&'static str>> {
        prop::collection::vec(prop::sample::select(vec!["Read", "Edit", "Bash", "Glob"]), 0..40)
    }

    fn options() -> impl Strategy<Value = DetectionOptions> {
        (1usize..4, 1usize..4, 0usize..3).prop_map(|(min_frequency, min_len, extra)| {
            DetectionOptions {
                min_frequency,
                min_sequence_length: min_len,
                max_sequence_length: min_len + extra,
                exclude_tools: Vec::new(),
            }
        })
    }

    proptest! {
        /// Property: the same input always yields the same output.
        #[test]
        fn detection_is_deterministic(names in tool_names(), opts in options()) {
            let invocations = calls(&names);
            let first = detect_patterns(&invocations, &opts).unwrap();
            let second = detect_patterns(&invocations, &opts).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Property: no surviving sequence occurs inside another survivor.
        #[test]
        fn survivors_are_not_sub_patterns(names in tool_names(), opts in options()) {
            let patterns = detect_patterns(&calls(&names), &opts).unwrap();
            for a in &patterns {
                for b in &patterns {
                    if a.sequence != b.sequence {
                        prop_assert!(!contains_subsequence(&b.sequence, &a.sequence));
                    }
                }
            }
        }

        /// Property: every pattern meets the frequency floor and its
        /// frequency is its real occurrence count.
        #[test]
        fn frequency_floor_holds(names in tool_names(), opts in options()) {
            let invocations = calls(&names);
            let patterns = detect_patterns(&invocations, &opts).unwrap();
            for p in &patterns {
                prop_assert!(p.frequency >= opts.min_frequency);
                prop_assert_eq!(p.frequency, find_pattern(&invocations, &p.sequence).len());
                prop_assert_eq!(p.frequency, p.contexts.len());
            }
        }

        /// Property: sequence lengths stay within the configured bounds.
        #[test]
        fn lengths_within_bounds(names in tool_names(), opts in options()) {
            let patterns = detect_patterns(&calls(&names), &opts).unwrap();
            for p in &patterns {
                prop_assert!(p.sequence.len() >= opts.min_sequence_length);
                prop_assert!(p.sequence.len() <= opts.max_sequence_length);
            }
            prop_assert!(patterns.windows(2).all(|w| w[0].frequency >= w[1].frequency));
        }

        /// Property: merging is associative in the per-sequence total frequency.
        #[test]
        fn merge_is_associative(
            a in tool_names(),
            b in tool_names(),
            c in tool_names(),
        ) {
            let opts = DetectionOptions::default();
            let pa = detect_patterns(&calls(&a), &opts).unwrap();
            let pb = detect_patterns(&calls(&b), &opts).unwrap();
            let pc = detect_patterns(&calls(&c), &opts).unwrap();

            let left = merge_patterns(&[merge_patterns(&[pa.clone(), pb.clone()]), pc.clone()]);
            let right = merge_patterns(&[pa, merge_patterns(&[pb, pc])]);

            let totals = |ps: &[OperationPattern]| -> Vec<(Vec<String>, usize)> {
                let mut v: Vec<_> = ps.iter().map(|p| (p.sequence.clone(), p.frequency)).collect();
                v.sort();
                v
            };
            prop_assert_eq!(totals(&left), totals(&right));
        }
    }
}
