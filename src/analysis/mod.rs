//! Structured, auditable speech-analysis report.
//!
//! [`build_speech_analysis`] re-walks an alignment produced by
//! [`crate::grading::align_words`] and explains every word-level decision:
//! which pairs were reported as mispronounced and why every other pair was
//! ignored.  The resulting [`TurnSpeechAnalysis`] is serialised verbatim
//! (camelCase keys) next to the turn's scores.

pub mod builder;
pub mod types;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use builder::{build_speech_analysis, AnalysisInput};
pub use types::{
    AlignedPair, AlignmentMeta, AlignmentSummary, AsrMeta, Extra, IgnoredDifference,
    IgnoredReason, MispronouncedLogicMeta, MispronouncedReason, MispronouncedWord, PairOp, Token,
    TokenizationMeta, TurnSpeechAnalysis, WordTiming,
};
