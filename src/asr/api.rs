//! OpenAI-compatible `/v1/audio/transcriptions` client.
//!
//! All connection details come from [`AsrConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};

use crate::analysis::Extra;
use crate::asr::transcriber::{Transcriber, Transcript, TranscriptionError};
use crate::config::AsrConfig;

/// File name presented to the provider; the extension selects the decoder.
const UPLOAD_FILE_NAME: &str = "user_audio.mp3";

/// Uploads learner audio to an OpenAI-compatible transcription endpoint.
pub struct ApiTranscriber {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    estimated_tokens: u32,
}

impl ApiTranscriber {
    /// Build an `ApiTranscriber` from application config.
    ///
    /// The API key and model are resolved once here (config first, then the
    /// `OPENAI_API_KEY` / `OPENAI_ASR_MODEL` environment variables).
    pub fn from_config(config: &AsrConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_owned(),
            api_key: config.resolved_api_key(),
            model: config.resolved_model(),
            estimated_tokens: config.estimated_tokens,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/audio/transcriptions", self.base_url)
    }

    fn parameters(&self) -> Extra {
        let mut parameters = Extra::new();
        parameters.insert("model".into(), self.model.clone().into());
        parameters.insert("estimated_tokens".into(), self.estimated_tokens.into());
        parameters
    }
}

/// Pull the trimmed `text` field out of a transcription response.
fn transcript_text(json: &serde_json::Value) -> Result<String, TranscriptionError> {
    let text = json["text"]
        .as_str()
        .ok_or(TranscriptionError::EmptyTranscript)?
        .trim();
    if text.is_empty() {
        return Err(TranscriptionError::EmptyTranscript);
    }
    Ok(text.to_owned())
}

#[async_trait]
impl Transcriber for ApiTranscriber {
    /// Send `audio` as a multipart upload and return the transcript.
    ///
    /// The `Authorization: Bearer …` header is attached only when an API key
    /// is available.
    async fn transcribe(&self, audio: &[u8]) -> Result<Transcript, TranscriptionError> {
        if audio.is_empty() {
            return Err(TranscriptionError::EmptyAudio);
        }

        let file = Part::bytes(audio.to_vec())
            .file_name(UPLOAD_FILE_NAME)
            .mime_str("audio/mpeg")
            .map_err(|e| TranscriptionError::Request(e.to_string()))?;
        let form = Form::new()
            .text("model", self.model.clone())
            .text("response_format", "json")
            .part("file", file);

        let mut req = self.client.post(self.endpoint()).multipart(form);
        if let Some(key) = self.api_key.as_deref() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("asr: provider returned HTTP {status}");
            return Err(TranscriptionError::Request(format!("HTTP {status}")));
        }

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| TranscriptionError::Parse(e.to_string()))?;

        Ok(Transcript {
            text: transcript_text(&json)?,
            model: Some(self.model.clone()),
            parameters: self.parameters(),
        })
    }
}
