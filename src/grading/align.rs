//! Full-sequence word alignment between the expected script and the transcript.
//!
//! [`align_words`] fills an `(|expected|+1) × (|actual|+1)` edit-distance table
//! where the cost of pairing two tokens is `0` for exact string equality and
//! `1` otherwise, then backtracks from the bottom-right corner to recover one
//! optimal sequence of [`WordPair`]s.
//!
//! # Tie-break
//!
//! When several operations reach the same cell at the same cost the first one
//! in the order *delete, insert, match/substitute* wins.  This decides which of
//! several equal-cost alignments is returned for inputs with repeated or
//! ambiguous words, and downstream reports depend on it.

// ---------------------------------------------------------------------------
// WordPair
// ---------------------------------------------------------------------------

/// One step of an alignment.
///
/// Exactly one side is `None` for an insertion or deletion; both sides are
/// present for a match or substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPair {
    /// Token from the expected sequence, `None` for an insertion.
    pub expected: Option<String>,
    /// Token from the actual (transcribed) sequence, `None` for a deletion.
    pub actual: Option<String>,
}

impl WordPair {
    pub fn matched(expected: &str, actual: &str) -> Self {
        Self {
            expected: Some(expected.to_owned()),
            actual: Some(actual.to_owned()),
        }
    }

    pub fn deleted(expected: &str) -> Self {
        Self {
            expected: Some(expected.to_owned()),
            actual: None,
        }
    }

    pub fn inserted(actual: &str) -> Self {
        Self {
            expected: None,
            actual: Some(actual.to_owned()),
        }
    }

    /// Expected side, or `""` when absent.
    pub fn expected_str(&self) -> &str {
        self.expected.as_deref().unwrap_or("")
    }

    /// Actual side, or `""` when absent.
    pub fn actual_str(&self) -> &str {
        self.actual.as_deref().unwrap_or("")
    }

    /// Both sides present but different.
    pub fn is_substitution(&self) -> bool {
        matches!((&self.expected, &self.actual), (Some(e), Some(a)) if e != a)
    }
}

// ---------------------------------------------------------------------------
// AlignmentResult
// ---------------------------------------------------------------------------

/// Output of [`align_words`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignmentResult {
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
    /// Alignment steps in reading order (first word first).
    pub aligned_pairs: Vec<WordPair>,
}

impl AlignmentResult {
    /// Total number of edit operations (substitutions + insertions + deletions).
    pub fn errors(&self) -> usize {
        self.substitutions + self.insertions + self.deletions
    }
}

// ---------------------------------------------------------------------------
// align_words
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Delete,
    Insert,
    Equal,
    Substitute,
}

/// Align `expected` against `actual` with word-level edit distance.
///
/// Never fails: empty inputs produce pure insertions, pure deletions or an
/// empty alignment.
pub fn align_words(expected: &[String], actual: &[String]) -> AlignmentResult {
    let rows = expected.len() + 1;
    let cols = actual.len() + 1;
    let mut dp = vec![vec![0usize; cols]; rows];
    let mut back: Vec<Vec<Option<Step>>> = vec![vec![None; cols]; rows];

    for (i, row) in dp.iter_mut().enumerate().skip(1) {
        row[0] = i;
        back[i][0] = Some(Step::Delete);
    }
    for j in 1..cols {
        dp[0][j] = j;
        back[0][j] = Some(Step::Insert);
    }

    for i in 1..rows {
        for j in 1..cols {
            let diagonal = if expected[i - 1] == actual[j - 1] {
                (dp[i - 1][j - 1], Step::Equal)
            } else {
                (dp[i - 1][j - 1] + 1, Step::Substitute)
            };
            let options = [
                (dp[i - 1][j] + 1, Step::Delete),
                (dp[i][j - 1] + 1, Step::Insert),
                diagonal,
            ];

            // First strict minimum in option order.
            let mut best = options[0];
            for option in &options[1..] {
                if option.0 < best.0 {
                    best = *option;
                }
            }
            dp[i][j] = best.0;
            back[i][j] = Some(best.1);
        }
    }

    let mut result = AlignmentResult::default();
    let (mut i, mut j) = (expected.len(), actual.len());
    while i > 0 || j > 0 {
        match back[i][j] {
            Some(Step::Equal) => {
                result
                    .aligned_pairs
                    .push(WordPair::matched(&expected[i - 1], &actual[j - 1]));
                i -= 1;
                j -= 1;
            }
            Some(Step::Substitute) => {
                result.substitutions += 1;
                result
                    .aligned_pairs
                    .push(WordPair::matched(&expected[i - 1], &actual[j - 1]));
                i -= 1;
                j -= 1;
            }
            Some(Step::Delete) => {
                result.deletions += 1;
                result.aligned_pairs.push(WordPair::deleted(&expected[i - 1]));
                i -= 1;
            }
            Some(Step::Insert) => {
                result.insertions += 1;
                result.aligned_pairs.push(WordPair::inserted(&actual[j - 1]));
                j -= 1;
            }
            None => break,
        }
    }

    result.aligned_pairs.reverse();
    result
}
