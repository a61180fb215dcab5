//! Configuration module.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for scoring, the
//! ASR provider and audio storage, `AppPaths` for cross-platform data
//! directories, and TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{
    AppConfig, AsrConfig, AsrProvider, ScoreWeights, ScoringConfig, StorageBackend,
    StorageConfig,
};
