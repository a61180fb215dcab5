//! Pure grading core: tokens → alignment → scores.
//!
//! # Data flow
//!
//! ```text
//! expected text ─┐                       ┌─▶ count_fillers ──────────┐
//!                ├─▶ tokenize ─▶ tokens ─┤                           ├─▶ TurnScore
//! asr text ──────┘                       └─▶ align_words ─▶ WER ─────┤
//!                                                 │                  │
//!                                                 └─▶ select_mispronounced
//! ```
//!
//! Nothing in here performs I/O or returns an error; every function is total
//! over its inputs and safe to call concurrently.
//!
//! # Quick start
//!
//! ```
//! use speech_coach::grading::{tokenize, ScoreCalculator};
//!
//! let expected = tokenize("I like coffee");
//! let actual = tokenize("i like cofee");
//! let report = ScoreCalculator::default().score(&expected, &actual, 1.0);
//!
//! assert_eq!(report.alignment.substitutions, 1);
//! assert_eq!(report.mispronounced_words, vec!["coffee"]);
//! ```

pub mod align;
pub mod distance;
pub mod filler;
pub mod mispronunciation;
pub mod scoring;
pub mod tokenize;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use align::{align_words, AlignmentResult, WordPair};
pub use distance::{edit_distance, normalized_edit_distance};
pub use filler::{count_fillers, FillerCount, FILLER_PHRASES, FILLER_WORDS};
pub use mispronunciation::{select_mispronounced, DEFAULT_MISPRONOUNCED_THRESHOLD};
pub use scoring::{
    clamp_leniency, word_error_rate, ScoreCalculator, ScoreReport, TurnScore, MAX_LENIENCY,
    MIN_LENIENCY,
};
pub use tokenize::tokenize;
