//! Sliding-window n-gram counting and sub-pattern suppression.

use crate::types::ToolInvocation;
use indexmap::IndexMap;

/// Start indices of every window, keyed by the window's tool names.
///
/// Keys are kept in first-encountered order: shorter windows before longer
/// ones, earlier starts before later ones.
pub(crate) type NgramIndex<'a> = IndexMap<Vec<&'a str>, Vec<usize>>;

/// Count every contiguous window of length `min_len..=max_len`.
pub(crate) fn count_ngrams<'a>(
    sequence: &[&'a ToolInvocation],
    min_len: usize,
    max_len: usize,
) -> NgramIndex<'a> {
    let names: Vec<&'a str> = sequence.iter().map(|c| c.tool_name.as_str()).collect();
    let mut index = NgramIndex::new();

    for n in min_len..=max_len.min(names.len()) {
        for (start, window) in names.windows(n).enumerate() {
            index.entry(window.to_vec()).or_default().push(start);
        }
    }

    index
}

/// True when `needle` occurs in `haystack` as a contiguous run of elements.
pub fn contains_subsequence<T: PartialEq>(haystack: &[T], needle: &[T]) -> bool {
    if needle.is_empty() {
        return true;
    }
    if needle.len() > haystack.len() {
        return false;
    }
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Flag the keys that are not contained in any other key of the set.
///
/// Only strictly longer keys can contain a distinct key, so each key is
/// compared against the longer ones only.
pub(crate) fn maximal_keys(keys: &[&[&str]]) -> Vec<bool> {
    keys.iter()
        .map(|key| {
            !keys
                .iter()
                .filter(|other| other.len() > key.len())
                .any(|other| contains_subsequence(&other[..], &key[..]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn seq(names: &[&str]) -> Vec<ToolInvocation> {
        names
            .iter()
            .enumerate()
            .map(|(i, n)| ToolInvocation::new(format!("2025-01-18T10:00:{:02}Z", i), *n, json!({})))
            .collect()
    }

    #[test]
    fn test_count_ngrams_counts_every_window() {
        let calls = seq(&["A", "B", "A", "B"]);
        let refs: Vec<&ToolInvocation> = calls.iter().collect();
        let index = count_ngrams(&refs, 2, 3);

        assert_eq!(index.get(&vec!["A", "B"]).unwrap(), &vec![0, 2]);
        assert_eq!(index.get(&vec!["B", "A"]).unwrap(), &vec![1]);
        assert_eq!(index.get(&vec!["A", "B", "A"]).unwrap(), &vec![0]);
        assert_eq!(index.get(&vec!["B", "A", "B"]).unwrap(), &vec![1]);
        assert_eq!(index.len(), 4);
    }

    #[test]
    fn test_count_ngrams_preserves_first_seen_order() {
        let calls = seq(&["A", "B", "C"]);
        let refs: Vec<&ToolInvocation> = calls.iter().collect();
        let keys: Vec<Vec<&str>> = count_ngrams(&refs, 2, 3).into_keys().collect();
        assert_eq!(
            keys,
            vec![vec!["A", "B"], vec!["B", "C"], vec!["A", "B", "C"]]
        );
    }

    #[test]
    fn test_window_longer_than_sequence_is_skipped() {
        let calls = seq(&["A", "B"]);
        let refs: Vec<&ToolInvocation> = calls.iter().collect();
        let index = count_ngrams(&refs, 2, 5);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_contains_subsequence_is_element_aligned() {
        // A string join would report "Read" inside "ReadFile|Edit".
        let haystack = ["ReadFile", "Edit"];
        assert!(!contains_subsequence(&haystack, &["Read"]));
        assert!(contains_subsequence(&haystack, &["ReadFile"]));
        assert!(contains_subsequence(&["A|B", "C"], &["A|B", "C"]));
        assert!(!contains_subsequence(&["A", "B|C"], &["A", "B"]));
    }

    #[test]
    fn test_contains_subsequence_requires_contiguity() {
        assert!(!contains_subsequence(&["A", "X", "B"], &["A", "B"]));
        assert!(contains_subsequence(&["X", "A", "B"], &["A", "B"]));
    }

    #[test]
    fn test_maximal_keys_drops_contained_keys() {
        let ab: &[&str] = &["A", "B"];
        let bc: &[&str] = &["B", "C"];
        let abc: &[&str] = &["A", "B", "C"];
        let cd: &[&str] = &["C", "D"];
        assert_eq!(
            maximal_keys(&[ab, bc, abc, cd]),
            vec![false, false, true, true]
        );
    }
}
