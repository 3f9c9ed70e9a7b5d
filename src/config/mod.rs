//! Configuration module for Flowkey.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for the STT and
//! enhancer subsystems, `AppPaths` for cross-platform data directories, and
//! TOML persistence via `AppConfig::load` / `AppConfig::save`.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, EnhancerConfig, InteractionMode, PasteMode, SttConfig};
