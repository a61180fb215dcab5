//! Where speech-coach keeps its files.
//!
//! ```text
//! <config dir>/speech-coach/settings.toml
//! <local data dir>/speech-coach/audio/<key prefix>/<user>/<session>/turn-<n>.mp3
//! ```
//!
//! The audio tree is only used by the local storage backend; the HTTP
//! backend keeps the same key layout in its bucket.  Platform directories
//! come from `dirs` (`~/.config` and `~/.local/share` on Linux,
//! `~/Library/Application Support` on macOS, `%APPDATA%` and
//! `%LOCALAPPDATA%` on Windows).

use std::path::{Path, PathBuf};

const APP_NAME: &str = "speech-coach";

/// Resolved locations of the settings file and the local audio store.
#[derive(Debug, Clone)]
pub struct AppPaths {
    pub config_dir: PathBuf,
    /// `settings.toml` read by [`AppConfig::load`](super::AppConfig::load).
    pub settings_file: PathBuf,
    /// Root handed to [`LocalAudioStore`](crate::storage::LocalAudioStore).
    pub audio_dir: PathBuf,
}

impl AppPaths {
    /// Platform directories, or `./speech-coach` when the platform has none.
    pub fn new() -> Self {
        let config_base = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        let data_base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        Self::from_bases(&config_base, &data_base)
    }

    /// Lay the tree out below explicit base directories.
    pub fn from_bases(config_base: &Path, data_base: &Path) -> Self {
        let config_dir = config_base.join(APP_NAME);
        Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            audio_dir: data_base.join(APP_NAME).join("audio"),
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_below_bases() {
        let paths = AppPaths::from_bases(Path::new("/cfg"), Path::new("/data"));
        assert_eq!(paths.config_dir, Path::new("/cfg/speech-coach"));
        assert_eq!(paths.settings_file, Path::new("/cfg/speech-coach/settings.toml"));
        assert_eq!(paths.audio_dir, Path::new("/data/speech-coach/audio"));
    }

    #[test]
    fn platform_paths_are_named_for_the_app() {
        let paths = AppPaths::new();
        assert!(paths.config_dir.ends_with(APP_NAME));
        assert!(paths.settings_file.ends_with("speech-coach/settings.toml"));
        assert!(paths.audio_dir.ends_with("speech-coach/audio"));
    }
}
