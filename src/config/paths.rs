//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings + history):
//!   Windows: %APPDATA%\flowkey\
//!   macOS:   ~/Library/Application Support/flowkey/
//!   Linux:   ~/.config/flowkey/
//!
//! Data dir (models):
//!   Windows: %LOCALAPPDATA%\flowkey\
//!   macOS:   ~/Library/Application Support/flowkey/
//!   Linux:   ~/.local/share/flowkey/

use std::path::PathBuf;

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `config.toml` and `history.jsonl`.
    pub config_dir: PathBuf,
    /// Full path to `config.toml`.
    pub settings_file: PathBuf,
    /// Full path to `history.jsonl`.
    pub history_file: PathBuf,
    /// Directory for downloaded GGML model files.
    pub models_dir: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "flowkey";

    /// Resolves all paths using the `dirs` crate.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path (should be extremely rare in practice).
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let data_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("config.toml");
        let history_file = config_dir.join("history.jsonl");
        let models_dir = data_dir.join("models");

        Self {
            config_dir,
            settings_file,
            history_file,
            models_dir,
        }
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
