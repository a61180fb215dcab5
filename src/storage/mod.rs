//! Learner audio storage collaborator.
//!
//! * [`AudioStore`]: async trait: `upload(bytes, key) -> url`.
//! * [`HttpAudioStore`]: S3/R2-style object store over HTTP `PUT`.
//! * [`LocalAudioStore`]: directory on disk, for offline use.
//! * [`user_audio_key`] / [`public_url`]: key layout and URL construction.

pub mod store;

pub use store::{
    public_url, user_audio_key, AudioStore, HttpAudioStore, LocalAudioStore, StorageError,
};

use std::sync::Arc;

use crate::config::{AppPaths, StorageBackend, StorageConfig};

/// Build the configured store.  The local backend writes below
/// [`AppPaths::audio_dir`].
pub fn from_config(config: &StorageConfig) -> Arc<dyn AudioStore> {
    match config.backend {
        StorageBackend::Http => Arc::new(HttpAudioStore::from_config(config)),
        StorageBackend::Local => Arc::new(LocalAudioStore::new(AppPaths::new().audio_dir)),
    }
}
