//! Turn scoring: confidence, fluency and hesitation on a 0–100 scale.
//!
//! ```text
//! strictness = 1 / clamp(leniency, 0.5, 1.5)
//!
//! hesitation = 100 − filler_ratio × 140 × strictness
//! confidence = 100 − wer × 110 × strictness
//! fluency    = 100 − filler_ratio × 80 × strictness
//!                  − mispronounced_ratio × 120 × strictness
//!                  − wer × 40 × strictness
//! ```
//!
//! The coefficients come from [`ScoreWeights`]; the defaults above are the
//! production values.  Every score is rounded half-to-even, then clamped.

use serde::{Deserialize, Serialize};

use crate::config::{ScoreWeights, ScoringConfig};
use crate::grading::align::{align_words, AlignmentResult};
use crate::grading::filler::count_fillers;
use crate::grading::mispronunciation::select_mispronounced;

/// Lower bound applied to the caller's leniency.
pub const MIN_LENIENCY: f64 = 0.5;
/// Upper bound applied to the caller's leniency.
pub const MAX_LENIENCY: f64 = 1.5;

// ---------------------------------------------------------------------------
// TurnScore
// ---------------------------------------------------------------------------

/// The three coaching scores for one graded turn, each in `0..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnScore {
    pub confidence: u8,
    pub fluency: u8,
    pub hesitation: u8,
}

impl TurnScore {
    /// Arithmetic mean of the three scores.
    pub fn mean(&self) -> f64 {
        (f64::from(self.confidence) + f64::from(self.fluency) + f64::from(self.hesitation)) / 3.0
    }
}

// ---------------------------------------------------------------------------
// ScoreReport
// ---------------------------------------------------------------------------

/// Scores plus the intermediate values they were computed from, so callers
/// can build the speech-analysis report without re-aligning.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreReport {
    pub score: TurnScore,
    pub wer: f64,
    pub filler_count: usize,
    pub total_tokens: usize,
    pub alignment: AlignmentResult,
    /// Deduplicated near-miss expected words in alignment order.
    pub mispronounced_words: Vec<String>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Clamp `leniency` into `[MIN_LENIENCY, MAX_LENIENCY]`.
///
/// `f64::min` ignores a `NaN` operand, so `NaN` ends up at `MAX_LENIENCY`.
pub fn clamp_leniency(leniency: f64) -> f64 {
    MIN_LENIENCY.max(MAX_LENIENCY.min(leniency))
}

/// `(substitutions + insertions + deletions) / max(1, expected_len)`.
pub fn word_error_rate(alignment: &AlignmentResult, expected_len: usize) -> f64 {
    alignment.errors() as f64 / expected_len.max(1) as f64
}

fn to_score(raw: f64) -> u8 {
    raw.round_ties_even().clamp(0.0, 100.0) as u8
}

// ---------------------------------------------------------------------------
// ScoreCalculator
// ---------------------------------------------------------------------------

/// Computes [`ScoreReport`]s with a fixed [`ScoringConfig`].
///
/// Pure and stateless apart from the configuration, so one calculator can be
/// shared freely between tasks.
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    config: ScoringConfig,
}

impl ScoreCalculator {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Score `actual` against `expected` at the given leniency (clamped to
    /// `[0.5, 1.5]`; higher is more forgiving).
    pub fn score(&self, expected: &[String], actual: &[String], leniency: f64) -> ScoreReport {
        let strictness = 1.0 / clamp_leniency(leniency);

        let fillers = count_fillers(actual);
        let filler_ratio = fillers.ratio();

        let alignment = align_words(expected, actual);
        let wer = word_error_rate(&alignment, expected.len());

        let mispronounced_words =
            select_mispronounced(&alignment, self.config.mispronounced_threshold);
        let mispronounced_ratio = mispronounced_words.len() as f64 / expected.len().max(1) as f64;

        let ScoreWeights {
            hesitation_filler,
            confidence_wer,
            fluency_filler,
            fluency_mispronounced,
            fluency_wer,
        } = self.config.weights;

        let hesitation = to_score(100.0 - filler_ratio * hesitation_filler * strictness);
        let confidence = to_score(100.0 - wer * confidence_wer * strictness);
        let fluency = to_score(
            100.0
                - filler_ratio * fluency_filler * strictness
                - mispronounced_ratio * fluency_mispronounced * strictness
                - wer * fluency_wer * strictness,
        );

        ScoreReport {
            score: TurnScore {
                confidence,
                fluency,
                hesitation,
            },
            wer,
            filler_count: fillers.fillers,
            total_tokens: fillers.total_tokens,
            alignment,
            mispronounced_words,
        }
    }
}
