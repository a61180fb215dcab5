//! Speech-analysis report types.
//!
//! Everything here is a plain value serialised with camelCase field names;
//! [`TurnSpeechAnalysis`] is written once per graded turn and never mutated
//! afterwards.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::grading::DEFAULT_MISPRONOUNCED_THRESHOLD;

/// Free-form key/value block attached to several report sections.
pub type Extra = Map<String, Value>;

// ---------------------------------------------------------------------------
// Tags
// ---------------------------------------------------------------------------

/// Alignment operation for one pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairOp {
    Match,
    Substitute,
    Insert,
    Delete,
}

/// Why a pair was not reported as a mispronunciation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    /// Extra word in the transcript.
    Insertion,
    /// Expected word missing from the transcript.
    Deletion,
    /// Spoken exactly as expected.
    ExactMatch,
    /// Substitution too different to be the same word mispronounced.
    TooFarFromExpected,
    /// Near miss of an expected word that was already reported.
    Deduped,
}

/// Why a word was reported as mispronounced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MispronouncedReason {
    NearMiss,
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Start/end offsets in seconds, when the ASR provider reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WordTiming {
    pub start: Option<f64>,
    pub end: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub idx: usize,
    pub text: String,
    pub confidence: Option<f64>,
    pub timing: Option<WordTiming>,
}

impl Token {
    pub fn new(idx: usize, text: impl Into<String>) -> Self {
        Self {
            idx,
            text: text.into(),
            confidence: None,
            timing: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Metadata echoes
// ---------------------------------------------------------------------------

/// ASR settings that produced the transcript.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AsrMeta {
    pub model: Option<String>,
    pub parameters: Extra,
    pub raw_response: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenizationMeta {
    pub lowercase: bool,
    pub strip_punctuation: bool,
    pub split_on_whitespace: bool,
    pub extra: Extra,
}

impl Default for TokenizationMeta {
    fn default() -> Self {
        Self {
            lowercase: true,
            strip_punctuation: true,
            split_on_whitespace: true,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentMeta {
    pub algorithm: String,
    pub ignore_insertions: bool,
    pub ignore_deletions: bool,
    pub threshold: f64,
    pub extra: Extra,
}

impl AlignmentMeta {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}

impl Default for AlignmentMeta {
    fn default() -> Self {
        Self {
            algorithm: "edit_distance".into(),
            ignore_insertions: true,
            ignore_deletions: true,
            threshold: DEFAULT_MISPRONOUNCED_THRESHOLD,
            extra: Extra::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MispronouncedLogicMeta {
    pub threshold: f64,
    pub dedupe: bool,
    pub ignore_insertions: bool,
    pub ignore_deletions: bool,
    pub extra: Extra,
}

impl MispronouncedLogicMeta {
    pub fn with_threshold(threshold: f64) -> Self {
        Self {
            threshold,
            ..Self::default()
        }
    }
}

impl Default for MispronouncedLogicMeta {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_MISPRONOUNCED_THRESHOLD,
            dedupe: true,
            ignore_insertions: true,
            ignore_deletions: true,
            extra: Extra::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Per-pair records
// ---------------------------------------------------------------------------

/// One alignment step with its edit distances.
///
/// `expected_idx` / `actual_idx` index into the respective token lists and
/// are `None` on the side that is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignedPair {
    pub op: PairOp,
    pub expected_idx: Option<usize>,
    pub actual_idx: Option<usize>,
    pub expected: String,
    pub actual: String,
    pub edit_distance: usize,
    pub normalized_edit_distance: f64,
}

/// A pair that was looked at and deliberately not reported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IgnoredDifference {
    pub op: PairOp,
    pub ignored_because: IgnoredReason,
    pub expected_idx: Option<usize>,
    pub actual_idx: Option<usize>,
    pub expected: String,
    pub actual: String,
    pub edit_distance: usize,
    pub normalized_edit_distance: f64,
}

impl IgnoredDifference {
    pub fn from_pair(pair: &AlignedPair, ignored_because: IgnoredReason) -> Self {
        Self {
            op: pair.op,
            ignored_because,
            expected_idx: pair.expected_idx,
            actual_idx: pair.actual_idx,
            expected: pair.expected.clone(),
            actual: pair.actual.clone(),
            edit_distance: pair.edit_distance,
            normalized_edit_distance: pair.normalized_edit_distance,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MispronouncedWord {
    pub expected: String,
    pub actual: String,
    pub expected_idx: Option<usize>,
    pub actual_idx: Option<usize>,
    pub normalized_edit_distance: f64,
    pub reason: MispronouncedReason,
    pub timing: Option<WordTiming>,
    pub deduped: bool,
}

// ---------------------------------------------------------------------------
// Summary + report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlignmentSummary {
    pub substitutions: usize,
    pub insertions: usize,
    pub deletions: usize,
    /// `max(0, expected tokens − substitutions − deletions)`.
    pub correct: usize,
    pub wer: f64,
}

/// Auditable record of how one turn was graded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TurnSpeechAnalysis {
    pub expected_text: String,
    pub asr_text: String,
    pub asr_meta: AsrMeta,
    pub tokenization_meta: TokenizationMeta,
    pub alignment_meta: AlignmentMeta,
    pub mispronounced_logic_meta: MispronouncedLogicMeta,
    pub expected_tokens: Vec<Token>,
    pub actual_tokens: Vec<Token>,
    pub aligned_pairs: Vec<AlignedPair>,
    pub alignment_summary: AlignmentSummary,
    pub mispronounced_words: Vec<MispronouncedWord>,
    pub ignored_differences: Vec<IgnoredDifference>,
    pub extra: Extra,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_serialise_in_snake_case() {
        assert_eq!(serde_json::to_value(PairOp::Substitute).unwrap(), "substitute");
        assert_eq!(
            serde_json::to_value(IgnoredReason::TooFarFromExpected).unwrap(),
            "too_far_from_expected"
        );
        assert_eq!(serde_json::to_value(IgnoredReason::ExactMatch).unwrap(), "exact_match");
        assert_eq!(serde_json::to_value(MispronouncedReason::NearMiss).unwrap(), "near_miss");
    }

    #[test]
    fn ignored_difference_uses_camel_case_keys() {
        let pair = AlignedPair {
            op: PairOp::Delete,
            expected_idx: Some(3),
            actual_idx: None,
            expected: "please".into(),
            actual: String::new(),
            edit_distance: 6,
            normalized_edit_distance: 1.0,
        };
        let value = serde_json::to_value(IgnoredDifference::from_pair(&pair, IgnoredReason::Deletion))
            .unwrap();
        assert_eq!(value["op"], "delete");
        assert_eq!(value["ignoredBecause"], "deletion");
        assert_eq!(value["expectedIdx"], 3);
        assert!(value["actualIdx"].is_null());
        assert_eq!(value["editDistance"], 6);
        assert_eq!(value["normalizedEditDistance"], 1.0);
    }

    #[test]
    fn metadata_defaults() {
        let tokenization = TokenizationMeta::default();
        assert!(tokenization.lowercase && tokenization.strip_punctuation);

        let alignment = AlignmentMeta::with_threshold(0.25);
        assert_eq!(alignment.algorithm, "edit_distance");
        assert_eq!(alignment.threshold, 0.25);

        let logic = MispronouncedLogicMeta::default();
        assert!(logic.dedupe);
        assert_eq!(logic.threshold, 0.4);
    }
}
