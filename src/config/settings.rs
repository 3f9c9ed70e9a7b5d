//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every field carries a `serde` default so a hand-edited partial file still
//! loads.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// InteractionMode
// ---------------------------------------------------------------------------

/// How the hotkey drives the recording session.
///
/// | Variant | Behaviour                                                |
/// |---------|----------------------------------------------------------|
/// | Toggle  | Each full combo press flips recording on / off           |
/// | Hold    | Recording is active exactly while the combo is held down |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionMode {
    /// Press once to start, press again to stop.
    Toggle,
    /// Push-to-talk: start on press, stop on release.
    Hold,
}

impl Default for InteractionMode {
    fn default() -> Self {
        Self::Toggle
    }
}

impl InteractionMode {
    /// Short lowercase label used in logs and history records.
    pub fn label(self) -> &'static str {
        match self {
            Self::Toggle => "toggle",
            Self::Hold => "hold",
        }
    }
}

// ---------------------------------------------------------------------------
// PasteMode
// ---------------------------------------------------------------------------

/// How transcribed text is delivered to the focused application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PasteMode {
    /// Copy to the clipboard, simulate the paste shortcut, then restore the
    /// previous clipboard content.
    Clipboard,
    /// Simulate keystrokes for each character.
    Type,
}

impl Default for PasteMode {
    fn default() -> Self {
        Self::Clipboard
    }
}

// ---------------------------------------------------------------------------
// SttConfig
// ---------------------------------------------------------------------------

/// Settings for the Whisper transcription engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SttConfig {
    /// GGML model name / file stem (e.g. `"tiny.en"`), resolved against the
    /// platform models directory as `<models_dir>/<model>.bin`.
    pub model: String,
}

impl Default for SttConfig {
    fn default() -> Self {
        Self {
            model: "tiny.en".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// EnhancerConfig
// ---------------------------------------------------------------------------

/// Settings for the optional LLM cleanup pass.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    /// Whether the enhancer runs at all.
    pub enabled: bool,
    /// Base URL of an OpenAI-compatible endpoint.
    ///
    /// Default targets a local Ollama instance.
    pub base_url: String,
    /// API key — `None` for local providers.
    pub api_key: Option<String>,
    /// Model identifier sent to the API (e.g. `"qwen2.5:3b"`).
    pub model: String,
    /// Sampling temperature (0.0 – 1.0).  Lower = more deterministic.
    pub temperature: f32,
    /// Maximum seconds to wait for a response before timing out.
    pub timeout_secs: u64,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            base_url: "http://localhost:11434".into(),
            api_key: None,
            model: "qwen2.5:3b".into(),
            temperature: 0.1,
            timeout_secs: 10,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `config.toml`.
///
/// # Persistence
///
/// ```rust,no_run
/// use flowkey::config::AppConfig;
///
/// // Load (returns Default when the file is missing)
/// let config = AppConfig::load().unwrap();
///
/// // Modify and save
/// // config.save().unwrap();
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Hotkey combo string, e.g. `"<cmd_r>"` or `"<cmd>+<shift>"`.
    ///
    /// Naming a left/right variant (`_l` / `_r` suffix) makes matching
    /// side-specific for the whole combo; otherwise left and right physical
    /// keys of the same modifier count as one key.
    pub hotkey: String,
    /// Hold (push-to-talk) or toggle recording.
    pub mode: InteractionMode,
    /// Capture sample rate in Hz.  Whisper expects 16 000.
    pub sample_rate: u32,
    /// Speech language as an ISO-639-1 code, or `None` for auto-detection.
    pub language: Option<String>,
    /// Deliver text into the focused application; when `false` the text is
    /// only printed to stdout.
    pub auto_paste: bool,
    /// Clipboard-paste or simulated typing.
    pub paste_mode: PasteMode,
    /// Rewrite spoken commands ("new paragraph", "new line") into breaks.
    pub enable_voice_commands: bool,
    /// Whisper engine settings.
    pub stt: SttConfig,
    /// LLM cleanup settings.
    pub enhancer: EnhancerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            hotkey: "<cmd_r>".into(),
            mode: InteractionMode::default(),
            sample_rate: 16_000,
            language: Some("en".into()),
            auto_paste: true,
            paste_mode: PasteMode::default(),
            enable_voice_commands: true,
            stt: SttConfig::default(),
            enhancer: EnhancerConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `config.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist yet
    /// (first-run scenario) so callers never need to special-case a missing
    /// file.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests and the `--config` flag).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to the platform-appropriate `config.toml`,
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

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    /// Verify that a default `AppConfig` can be serialised to TOML and
    /// deserialised back without any data loss.
    #[test]
    fn round_trip_toml() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("config.toml");

        let original = AppConfig::default();
        original.save_to(&path).expect("save");

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(original.hotkey, loaded.hotkey);
        assert_eq!(original.mode, loaded.mode);
        assert_eq!(original.sample_rate, loaded.sample_rate);
        assert_eq!(original.language, loaded.language);
        assert_eq!(original.auto_paste, loaded.auto_paste);
        assert_eq!(original.paste_mode, loaded.paste_mode);
        assert_eq!(original.enable_voice_commands, loaded.enable_voice_commands);
        assert_eq!(original.stt.model, loaded.stt.model);
        assert_eq!(original.enhancer.enabled, loaded.enhancer.enabled);
        assert_eq!(original.enhancer.base_url, loaded.enhancer.base_url);
        assert_eq!(original.enhancer.model, loaded.enhancer.model);
        assert_eq!(original.enhancer.timeout_secs, loaded.enhancer.timeout_secs);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");
        let default = AppConfig::default();

        assert_eq!(config.hotkey, default.hotkey);
        assert_eq!(config.mode, default.mode);
        assert_eq!(config.sample_rate, default.sample_rate);
    }

    /// A partial file (only some keys present) loads with defaults filled in.
    #[test]
    fn partial_file_fills_defaults() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("partial.toml");
        std::fs::write(&path, "hotkey = \"F9\"\nmode = \"hold\"\n").expect("write");

        let config = AppConfig::load_from(&path).expect("load");
        assert_eq!(config.hotkey, "F9");
        assert_eq!(config.mode, InteractionMode::Hold);
        // Untouched fields keep their defaults.
        assert_eq!(config.sample_rate, 16_000);
        assert!(config.auto_paste);
        assert!(!config.enhancer.enabled);
    }

    /// Verify default values match the documented behaviour.
    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.hotkey, "<cmd_r>");
        assert_eq!(cfg.mode, InteractionMode::Toggle);
        assert_eq!(cfg.sample_rate, 16_000);
        assert_eq!(cfg.language.as_deref(), Some("en"));
        assert!(cfg.auto_paste);
        assert_eq!(cfg.paste_mode, PasteMode::Clipboard);
        assert!(cfg.enable_voice_commands);
        assert_eq!(cfg.stt.model, "tiny.en");
        assert!(!cfg.enhancer.enabled);
        assert_eq!(cfg.enhancer.base_url, "http://localhost:11434");
    }

    /// Verify that modified non-default values survive a round trip.
    #[test]
    fn round_trip_modified_values() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("modified.toml");

        let mut cfg = AppConfig::default();
        cfg.hotkey = "<cmd>+<shift>".into();
        cfg.mode = InteractionMode::Hold;
        cfg.language = Some("th".into());
        cfg.paste_mode = PasteMode::Type;
        cfg.enhancer.enabled = true;
        cfg.enhancer.api_key = Some("sk-test".into());
        cfg.enhancer.timeout_secs = 30;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.hotkey, "<cmd>+<shift>");
        assert_eq!(loaded.mode, InteractionMode::Hold);
        assert_eq!(loaded.language.as_deref(), Some("th"));
        assert_eq!(loaded.paste_mode, PasteMode::Type);
        assert!(loaded.enhancer.enabled);
        assert_eq!(loaded.enhancer.api_key, Some("sk-test".into()));
        assert_eq!(loaded.enhancer.timeout_secs, 30);
    }

    #[test]
    fn interaction_mode_labels() {
        assert_eq!(InteractionMode::Toggle.label(), "toggle");
        assert_eq!(InteractionMode::Hold.label(), "hold");
    }
}
