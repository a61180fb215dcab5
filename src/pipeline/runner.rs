//! Turn-grading orchestrator: validate → transcribe → score → upload.
//!
//! [`TurnGrader`] is the only component that touches the outside world, and
//! only through its two collaborators ([`Transcriber`] and [`AudioStore`]).
//!
//! # Flow
//!
//! ```text
//! GradeRequest
//!   └─▶ validate ids, turn index, role, expected text, audio
//!         └─▶ transcriber.transcribe(audio)                  [await]
//!               └─▶ evaluate_turn (tokenize, score, report)   [pure]
//!                     └─▶ store.upload(audio, key)            [await]
//!                           └─▶ GradeOutcome { TurnUpdate, … }
//! ```
//!
//! Collaborator failures end the attempt immediately; nothing is retried here.

use std::sync::Arc;

use thiserror::Error;

use crate::asr::{Transcriber, TranscriptionError};
use crate::config::ScoringConfig;
use crate::session::{Role, Script, TurnState, TurnUpdate};
use crate::storage::{user_audio_key, AudioStore, StorageError};

use super::evaluate::evaluate_turn;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// The request cannot be graded as submitted.  Never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{0} must not be empty")]
    MissingIdentifier(&'static str),

    #[error("{0} may only contain ASCII letters, digits, '-' and '_'")]
    InvalidIdentifier(&'static str),

    #[error("turn index {index} out of range (script has {len} turns)")]
    TurnIndexOutOfRange { index: usize, len: usize },

    #[error("turn at position {position} is numbered {found}")]
    TurnIndexMismatch { position: usize, found: usize },

    #[error("turn {0} is not a user turn")]
    NotUserTurn(usize),

    #[error("turn {0} has no expected text")]
    EmptyExpectedText(usize),

    #[error("audio upload is empty")]
    EmptyAudio,
}

/// Why a grading attempt failed.
#[derive(Debug, Error)]
pub enum GradeError {
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationError),

    #[error("transcription failed: {0}")]
    Transcription(#[from] TranscriptionError),

    #[error("audio upload failed: {0}")]
    Storage(#[from] StorageError),
}

// ---------------------------------------------------------------------------
// Request / outcome
// ---------------------------------------------------------------------------

/// One learner recording to grade.
#[derive(Debug, Clone)]
pub struct GradeRequest<'a> {
    pub user_id: &'a str,
    pub session_id: &'a str,
    pub turn_index: usize,
    /// Encoded audio (MP3).
    pub audio: &'a [u8],
    /// `None` uses the configured default leniency.
    pub leniency: Option<f64>,
}

/// The update to persist plus diagnostic values.
#[derive(Debug, Clone, PartialEq)]
pub struct GradeOutcome {
    pub update: TurnUpdate,
    pub transcript_text: String,
    pub expected_text: String,
    pub wer: f64,
    pub filler_count: usize,
    pub total_tokens: usize,
}

// ---------------------------------------------------------------------------
// TurnGrader
// ---------------------------------------------------------------------------

/// Grades learner recordings of script turns.
///
/// ```rust,no_run
/// use speech_coach::config::AppConfig;
/// use speech_coach::pipeline::{GradeRequest, TurnGrader};
/// use speech_coach::session::{Role, Script, Turn};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AppConfig::load()?;
/// let grader = TurnGrader::new(
///     speech_coach::asr::from_config(&config.asr),
///     speech_coach::storage::from_config(&config.storage),
///     config.scoring.clone(),
/// );
///
/// let script = Script::new(vec![Turn::new(0, Role::User, "I like coffee")]);
/// let audio = std::fs::read("turn-0.mp3")?;
/// let outcome = grader
///     .grade(
///         &script,
///         GradeRequest {
///             user_id: "u1",
///             session_id: "s1",
///             turn_index: 0,
///             audio: &audio,
///             leniency: None,
///         },
///     )
///     .await?;
/// println!("{:?}", outcome.update.score);
/// # Ok(())
/// # }
/// ```
pub struct TurnGrader {
    transcriber: Arc<dyn Transcriber>,
    store: Arc<dyn AudioStore>,
    scoring: ScoringConfig,
    key_prefix: String,
}

impl TurnGrader {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        store: Arc<dyn AudioStore>,
        scoring: ScoringConfig,
    ) -> Self {
        Self {
            transcriber,
            store,
            scoring,
            key_prefix: "user-audio".into(),
        }
    }

    /// Override the first segment of uploaded audio keys.
    pub fn with_key_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = prefix.into();
        self
    }

    /// Grade `request` against the turn it names in `script`.
    ///
    /// `script` is not modified; apply the returned
    /// [`GradeOutcome::update`] to persist the result.
    pub async fn grade(
        &self,
        script: &Script,
        request: GradeRequest<'_>,
    ) -> Result<GradeOutcome, GradeError> {
        let expected_text = validate(script, &request)?;
        let index = request.turn_index;

        log::debug!("grader: transcribing turn {index} ({} bytes)", request.audio.len());
        let transcript = self.transcriber.transcribe(request.audio).await?;
        log::debug!("grader: transcript for turn {index} = {:?}", transcript.text);

        let leniency = request.leniency.unwrap_or(self.scoring.default_leniency);
        let evaluation = evaluate_turn(expected_text, &transcript, &self.scoring, leniency);
        let report = evaluation.report;
        log::debug!(
            "grader: turn {index} scored {:?} (wer={:.3}, fillers={}/{})",
            report.score,
            report.wer,
            report.filler_count,
            report.total_tokens
        );

        let key = user_audio_key(&self.key_prefix, request.user_id, request.session_id, index);
        let user_audio_url = self.store.upload(request.audio, &key).await?;
        log::debug!("grader: uploaded turn {index} audio to {user_audio_url}");

        let mispronounced_words =
            Some(report.mispronounced_words).filter(|words| !words.is_empty());

        Ok(GradeOutcome {
            update: TurnUpdate {
                index,
                score: Some(report.score),
                mispronounced_words,
                user_audio_url: Some(user_audio_url),
                speech_analysis: Some(evaluation.analysis),
            },
            transcript_text: transcript.text,
            expected_text: expected_text.to_owned(),
            wer: report.wer,
            filler_count: report.filler_count,
            total_tokens: report.total_tokens,
        })
    }
}

/// Ids become path segments of the object key.
fn check_identifier(id: &str, name: &'static str) -> Result<(), ValidationError> {
    if id.trim().is_empty() {
        return Err(ValidationError::MissingIdentifier(name));
    }
    if !id
        .bytes()
        .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
    {
        return Err(ValidationError::InvalidIdentifier(name));
    }
    Ok(())
}

/// Check the request against the script and return the turn's expected text.
fn validate<'s>(
    script: &'s Script,
    request: &GradeRequest<'_>,
) -> Result<&'s str, ValidationError> {
    check_identifier(request.user_id, "user id")?;
    check_identifier(request.session_id, "session id")?;

    let index = request.turn_index;
    let turn = script
        .turn(index)
        .ok_or(ValidationError::TurnIndexOutOfRange {
            index,
            len: script.turns.len(),
        })?;
    if turn.index != index {
        return Err(ValidationError::TurnIndexMismatch {
            position: index,
            found: turn.index,
        });
    }
    if turn.role != Role::User {
        return Err(ValidationError::NotUserTurn(index));
    }
    if turn.text.trim().is_empty() {
        return Err(ValidationError::EmptyExpectedText(index));
    }
    if request.audio.is_empty() {
        return Err(ValidationError::EmptyAudio);
    }
    if turn.state() == TurnState::Scored {
        log::warn!("grader: turn {index} already has a score; grading again");
    }
    Ok(&turn.text)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
