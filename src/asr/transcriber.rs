//! Core `Transcriber` trait, transcript type and errors.
//!
//! [`Transcriber`] is the only way the grading pipeline talks to a
//! speech-to-text provider.  It is object-safe and `Send + Sync` so it can be
//! held behind an `Arc<dyn Transcriber>`.  Retries and rate limiting belong to
//! the implementation, never to the caller.
//!
//! [`MockTranscriber`] (available under `#[cfg(test)]`) returns a
//! pre-configured response, for testing the pipeline without a provider.

use async_trait::async_trait;
use thiserror::Error;

use crate::analysis::{AsrMeta, Extra};

// ---------------------------------------------------------------------------
// TranscriptionError
// ---------------------------------------------------------------------------

/// Errors that can occur while transcribing learner audio.
#[derive(Debug, Clone, Error)]
pub enum TranscriptionError {
    /// HTTP transport or connection error, or a non-success status.
    #[error("ASR request failed: {0}")]
    Request(String),

    /// The provider did not answer within the configured timeout.
    #[error("ASR request timed out")]
    Timeout,

    /// The provider's response could not be parsed.
    #[error("failed to parse ASR response: {0}")]
    Parse(String),

    /// The provider answered without any transcript text.
    #[error("ASR returned no transcript text")]
    EmptyTranscript,

    /// No audio bytes were supplied.
    #[error("audio is empty")]
    EmptyAudio,

    /// Transcription is switched off in the configuration.
    #[error("ASR provider is disabled")]
    Disabled,
}

impl From<reqwest::Error> for TranscriptionError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            TranscriptionError::Timeout
        } else {
            TranscriptionError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Transcript
// ---------------------------------------------------------------------------

/// Transcript text plus the settings that produced it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transcript {
    /// Trimmed transcript text.
    pub text: String,
    /// Model identifier used by the provider.
    pub model: Option<String>,
    /// Request parameters echoed into the speech-analysis report.
    pub parameters: Extra,
}

impl Transcript {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Metadata block for the speech-analysis report.
    pub fn meta(&self) -> AsrMeta {
        AsrMeta {
            model: self.model.clone(),
            parameters: self.parameters.clone(),
            raw_response: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Async, thread-safe interface for speech-to-text providers.
#[async_trait]
pub trait Transcriber: Send + Sync {
    /// Transcribe encoded audio (e.g. MP3 bytes) into text.
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, TranscriptionError>;
}

// Compile-time assertion: Box<dyn Transcriber> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Transcriber>) {}
};

// ---------------------------------------------------------------------------
// DisabledTranscriber
// ---------------------------------------------------------------------------

/// Stand-in used when `AsrProvider::Disabled` is configured.
#[derive(Debug, Default)]
pub struct DisabledTranscriber;

#[async_trait]
impl Transcriber for DisabledTranscriber {
    async fn transcribe(&self, _audio: &[u8]) -> Result<Transcript, TranscriptionError> {
        Err(TranscriptionError::Disabled)
    }
}

// ---------------------------------------------------------------------------
// MockTranscriber  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response.
#[cfg(test)]
pub struct MockTranscriber {
    response: Result<Transcript, TranscriptionError>,
}

#[cfg(test)]
impl MockTranscriber {
    /// Create a mock that always returns `Ok` with `text` from `mock-asr`.
    pub fn ok(text: impl Into<String>) -> Self {
        let mut transcript = Transcript::new(text);
        transcript.model = Some("mock-asr".into());
        Self {
            response: Ok(transcript),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: TranscriptionError) -> Self {
        Self {
            response: Err(error),
        }
    }
}

#[cfg(test)]
#[async_trait]
impl Transcriber for MockTranscriber {
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, TranscriptionError> {
        // Enforce the non-empty audio contract even in the mock.
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
