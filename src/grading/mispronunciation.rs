//! Near-miss selection: which expected words were spoken *almost* right.

use std::collections::HashSet;

use crate::grading::align::AlignmentResult;
use crate::grading::distance::normalized_edit_distance;

/// Default cutoff on [`normalized_edit_distance`] for a substitution to count
/// as a mispronunciation rather than a different word.
pub const DEFAULT_MISPRONOUNCED_THRESHOLD: f64 = 0.4;

/// Expected words whose substitution stayed within `threshold`.
///
/// Only substitutions are considered (insertions, deletions and exact matches
/// are skipped).  The list follows first-occurrence order in the alignment and
/// holds each expected word at most once.
pub fn select_mispronounced(alignment: &AlignmentResult, threshold: f64) -> Vec<String> {
    let mut mispronounced = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();

    for pair in &alignment.aligned_pairs {
        let (Some(expected), Some(actual)) = (pair.expected.as_deref(), pair.actual.as_deref())
        else {
            continue;
        };
        if expected == actual {
            continue;
        }
        if normalized_edit_distance(expected, actual) <= threshold && seen.insert(expected) {
            mispronounced.push(expected.to_owned());
        }
    }
    mispronounced
}
