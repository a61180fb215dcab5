//! `AudioStore` trait and its HTTP and local-filesystem implementations.

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use thiserror::Error;

use crate::config::StorageConfig;

// ---------------------------------------------------------------------------
// StorageError
// ---------------------------------------------------------------------------

/// Errors that can occur while uploading learner audio.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The HTTP backend has no bucket configured.
    #[error("no storage bucket configured")]
    MissingBucket,

    /// The HTTP backend has no endpoint configured.
    #[error("no storage endpoint configured")]
    MissingEndpoint,

    /// HTTP transport or connection error.
    #[error("upload request failed: {0}")]
    Request(String),

    /// The object store answered with a non-success status.
    #[error("upload rejected with HTTP {0}")]
    Status(u16),

    /// The key would resolve outside the local store's root.
    #[error("object key {0:?} escapes the storage root")]
    InvalidKey(String),

    /// Local filesystem error.
    #[error("local storage error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for StorageError {
    fn from(e: reqwest::Error) -> Self {
        StorageError::Request(e.to_string())
    }
}

// ---------------------------------------------------------------------------
// Keys and URLs
// ---------------------------------------------------------------------------

/// Object key for a learner's recording of one turn:
/// `{prefix}/{user_id}/{session_id}/turn-{turn_index}.mp3`.
pub fn user_audio_key(prefix: &str, user_id: &str, session_id: &str, turn_index: usize) -> String {
    format!(
        "{}/{user_id}/{session_id}/turn-{turn_index}.mp3",
        prefix.trim_end_matches('/')
    )
}

/// Public URL under which `key` is reachable.
///
/// Uses `public_base_url` when configured, otherwise
/// `{endpoint}/{bucket}/{key}`, otherwise the bare key.
pub fn public_url(config: &StorageConfig, key: &str) -> String {
    if let Some(base) = config.public_base_url.as_deref().filter(|b| !b.is_empty()) {
        return format!("{}/{key}", base.trim_end_matches('/'));
    }
    let endpoint = config.endpoint.trim_end_matches('/');
    match config.bucket.as_deref() {
        Some(bucket) if !endpoint.is_empty() => format!("{endpoint}/{bucket}/{key}"),
        _ => key.to_owned(),
    }
}

// ---------------------------------------------------------------------------
// AudioStore trait
// ---------------------------------------------------------------------------

/// Async, thread-safe interface for storing learner audio.
#[async_trait]
pub trait AudioStore: Send + Sync {
    /// Store `bytes` under `key` and return a URL the client can fetch.
    async fn upload(&self, bytes: &[u8], key: &str) -> Result<String, StorageError>;
}

// ---------------------------------------------------------------------------
// HttpAudioStore
// ---------------------------------------------------------------------------

/// Uploads with HTTP `PUT {endpoint}/{bucket}/{key}` (S3 / R2 style).
pub struct HttpAudioStore {
    client: reqwest::Client,
    config: StorageConfig,
}

impl HttpAudioStore {
    pub fn from_config(config: &StorageConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    fn object_url(&self, key: &str) -> Result<String, StorageError> {
        let bucket = self
            .config
            .bucket
            .as_deref()
            .filter(|b| !b.is_empty())
            .ok_or(StorageError::MissingBucket)?;
        let endpoint = self.config.endpoint.trim_end_matches('/');
        if endpoint.is_empty() {
            return Err(StorageError::MissingEndpoint);
        }
        Ok(format!("{endpoint}/{bucket}/{key}"))
    }
}

#[async_trait]
impl AudioStore for HttpAudioStore {
    async fn upload(&self, bytes: &[u8], key: &str) -> Result<String, StorageError> {
        let url = self.object_url(key)?;

        let mut req = self
            .client
            .put(&url)
            .header(reqwest::header::CONTENT_TYPE, self.config.content_type.as_str())
            .body(bytes.to_vec());
        if let Some(token) = self.config.api_token.as_deref().filter(|t| !t.is_empty()) {
            req = req.bearer_auth(token);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            log::warn!("storage: PUT {key} returned HTTP {status}");
            return Err(StorageError::Status(status.as_u16()));
        }

        Ok(public_url(&self.config, key))
    }
}

// ---------------------------------------------------------------------------
// LocalAudioStore
// ---------------------------------------------------------------------------

/// Writes uploads below a root directory and returns `file://` URLs.
#[derive(Debug, Clone)]
pub struct LocalAudioStore {
    root: PathBuf,
}

impl LocalAudioStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Keys must be relative paths made of plain segments.
fn is_contained_key(key: &str) -> bool {
    !key.is_empty()
        && Path::new(key)
            .components()
            .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

#[async_trait]
impl AudioStore for LocalAudioStore {
    async fn upload(&self, bytes: &[u8], key: &str) -> Result<String, StorageError> {
        if !is_contained_key(key) {
            log::warn!("storage: refusing key {key:?} outside {}", self.root.display());
            return Err(StorageError::InvalidKey(key.to_owned()));
        }
        let path = self.root.join(key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, bytes).await?;
        Ok(format!("file://{}", path.display()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
