//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across tasks.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;
use crate::grading::DEFAULT_MISPRONOUNCED_THRESHOLD;

// ---------------------------------------------------------------------------
// ScoreWeights
// ---------------------------------------------------------------------------

/// Coefficients of the scoring model.
///
/// | Field                   | Score      | Multiplies            |
/// |-------------------------|------------|-----------------------|
/// | `hesitation_filler`     | hesitation | filler ratio          |
/// | `confidence_wer`        | confidence | word error rate       |
/// | `fluency_filler`        | fluency    | filler ratio          |
/// | `fluency_mispronounced` | fluency    | mispronounced ratio   |
/// | `fluency_wer`           | fluency    | word error rate       |
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub hesitation_filler: f64,
    pub confidence_wer: f64,
    pub fluency_filler: f64,
    pub fluency_mispronounced: f64,
    pub fluency_wer: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            hesitation_filler: 140.0,
            confidence_wer: 110.0,
            fluency_filler: 80.0,
            fluency_mispronounced: 120.0,
            fluency_wer: 40.0,
        }
    }
}

// ---------------------------------------------------------------------------
// ScoringConfig
// ---------------------------------------------------------------------------

/// Settings for the grading core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Leniency used when the caller does not supply one.  Clamped to
    /// `[0.5, 1.5]` at scoring time; higher is more forgiving.
    pub default_leniency: f64,
    /// Maximum normalized edit distance for a substitution to be reported as
    /// a mispronunciation.
    pub mispronounced_threshold: f64,
    /// Scoring model coefficients.
    pub weights: ScoreWeights,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            default_leniency: 1.0,
            mispronounced_threshold: DEFAULT_MISPRONOUNCED_THRESHOLD,
            weights: ScoreWeights::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// AsrProvider / AsrConfig
// ---------------------------------------------------------------------------

/// Selects which speech-to-text backend produces transcripts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AsrProvider {
    /// Any OpenAI-compatible `/v1/audio/transcriptions` endpoint.
    OpenAiCompatible,
    /// Transcription disabled; grading requests fail with a transcription error.
    Disabled,
}

impl Default for AsrProvider {
    fn default() -> Self {
        Self::OpenAiCompatible
    }
}

/// Settings for the speech-to-text provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrConfig {
    pub provider: AsrProvider,
    /// Base URL of the API, without the `/v1/...` path.
    pub base_url: String,
    /// API key; when `None` the `OPENAI_API_KEY` environment variable is used.
    pub api_key: Option<String>,
    /// Transcription model; `OPENAI_ASR_MODEL` overrides it at runtime.
    pub model: String,
    /// Maximum seconds to wait for a transcript.
    pub timeout_secs: u64,
    /// Token estimate recorded alongside the request for rate accounting.
    pub estimated_tokens: u32,
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            provider: AsrProvider::default(),
            base_url: "https://api.openai.com".into(),
            api_key: None,
            model: "gpt-4o-mini-transcribe".into(),
            timeout_secs: 60,
            estimated_tokens: 200,
        }
    }
}

impl AsrConfig {
    /// Configured key, falling back to `OPENAI_API_KEY`.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| std::env::var("OPENAI_API_KEY").ok())
            .filter(|k| !k.is_empty())
    }

    /// Configured model unless `OPENAI_ASR_MODEL` is set.
    pub fn resolved_model(&self) -> String {
        std::env::var("OPENAI_ASR_MODEL")
            .ok()
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| self.model.clone())
    }
}

// ---------------------------------------------------------------------------
// StorageBackend / StorageConfig
// ---------------------------------------------------------------------------

/// Where uploaded learner audio goes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum StorageBackend {
    /// S3-style object store reached with HTTP `PUT`.
    Http,
    /// A directory on the local filesystem (offline use).
    Local,
}

impl Default for StorageBackend {
    fn default() -> Self {
        Self::Local
    }
}

/// Settings for learner audio uploads.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Object store endpoint, e.g. `https://<account>.r2.cloudflarestorage.com`.
    pub endpoint: String,
    /// Bucket name; required by the HTTP backend.
    pub bucket: Option<String>,
    /// Public URL prefix used in returned links, when the bucket is exposed
    /// through a CDN or custom domain.
    pub public_base_url: Option<String>,
    /// Bearer token for the HTTP backend.
    pub api_token: Option<String>,
    /// First path segment of every learner audio key.
    pub key_prefix: String,
    /// `Content-Type` sent with uploads.
    pub content_type: String,
    /// Maximum seconds to wait for an upload.
    pub timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            endpoint: String::new(),
            bucket: None,
            public_base_url: None,
            api_token: None,
            key_prefix: "user-audio".into(),
            content_type: "audio/mpeg".into(),
            timeout_secs: 30,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use speech_coach::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert!(config.scoring.default_leniency > 0.0);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Grading core settings.
    pub scoring: ScoringConfig,
    /// Speech-to-text provider settings.
    pub asr: AsrConfig,
    /// Learner audio upload settings.
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `settings.toml`,
    /// creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&AppPaths::new().settings_file)
    }

    /// Save to an explicit path (useful for tests).
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
