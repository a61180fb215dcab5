//! Speech-to-text collaborator.
//!
//! * [`Transcriber`]: async trait implemented by every ASR backend.
//! * [`ApiTranscriber`]: OpenAI-compatible transcription endpoint.
//! * [`DisabledTranscriber`]: always fails; used when ASR is switched off.
//! * [`Transcript`] / [`TranscriptionError`]: result and error types.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use speech_coach::asr::{ApiTranscriber, Transcriber};
//! use speech_coach::config::AppConfig;
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = AppConfig::default();
//!     let asr = ApiTranscriber::from_config(&config.asr);
//!
//!     let audio = std::fs::read("turn-3.mp3").unwrap();
//!     let transcript = asr.transcribe(&audio).await.unwrap();
//!     println!("{}", transcript.text);
//! }
//! ```

pub mod api;
pub mod transcriber;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use api::ApiTranscriber;
pub use transcriber::{DisabledTranscriber, Transcriber, Transcript, TranscriptionError};

// test-only re-export so the pipeline tests can use the mock directly.
#[cfg(test)]
pub use transcriber::MockTranscriber;

use std::sync::Arc;

use crate::config::{AsrConfig, AsrProvider};

/// Build the configured transcriber.
pub fn from_config(config: &AsrConfig) -> Arc<dyn Transcriber> {
    match config.provider {
        AsrProvider::OpenAiCompatible => Arc::new(ApiTranscriber::from_config(config)),
        AsrProvider::Disabled => Arc::new(DisabledTranscriber),
    }
}
