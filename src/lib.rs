//! Speech-repetition grading.
//!
//! A learner reads a script line aloud; the recording is transcribed, aligned
//! word by word against the expected text and scored on confidence, fluency
//! and hesitation.  Alongside the scores an auditable per-word analysis
//! report explains every decision.
//!
//! | Module       | Role                                                   |
//! |--------------|--------------------------------------------------------|
//! | [`grading`]  | tokenizer, edit distance, alignment, fillers, scoring  |
//! | [`analysis`] | structured speech-analysis report                      |
//! | [`asr`]      | speech-to-text collaborator                            |
//! | [`storage`]  | learner audio upload collaborator                      |
//! | [`session`]  | script turns and their grading state                   |
//! | [`pipeline`] | turn-grading orchestrator                              |
//! | [`config`]   | settings and data directories                          |

pub mod analysis;
pub mod asr;
pub mod config;
pub mod grading;
pub mod pipeline;
pub mod session;
pub mod storage;
