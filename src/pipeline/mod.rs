//! Turn grading pipeline.
//!
//! This module wires the grading core to its two external collaborators and
//! produces the update payload for a script turn.
//!
//! # Architecture
//!
//! ```text
//! GradeRequest { user, session, turn_index, audio, leniency }
//!        │
//!        ▼
//! TurnGrader::grade()  ← async
//!        │
//!        ├─ validate against Script
//!        ├─ Transcriber::transcribe          → Transcript
//!        ├─ evaluate_turn                    → ScoreReport + TurnSpeechAnalysis
//!        └─ AudioStore::upload               → user_audio_url
//!
//! GradeOutcome { update: TurnUpdate, … } ──▶ Script::apply_update (caller)
//! ```
//!
//! [`evaluate_turn`] is the pure part and can be used without any I/O.

pub mod evaluate;
pub mod runner;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use evaluate::{evaluate_turn, TurnEvaluation};
pub use runner::{GradeError, GradeOutcome, GradeRequest, TurnGrader, ValidationError};
