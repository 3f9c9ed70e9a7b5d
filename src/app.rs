//! Daemon wiring and lifecycle.
//!
//! [`FlowApp::run`] builds every collaborator from configuration, connects
//! the three execution contexts, then parks on Ctrl+C:
//!
//! 1. Spawn the processing worker (inside the controller constructor).
//! 2. Start the cpal capture stream and the audio-feed thread that
//!    downmixes/resamples chunks into the shared [`AudioSession`].
//! 3. Start the key listener thread, wired straight into the controller.
//!
//! # Shutdown order
//!
//! On Ctrl+C: abort any in-flight recording (clip discarded) first, then
//! stop the key listener, then drop the capture stream and the controller —
//! dropping the controller closes the processing queue so the worker exits
//! after any clip it is already running.  Nothing is joined; `main` shuts
//! the runtime down in the background so an in-flight transcription can
//! never hang process exit.

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::audio::{resample, stereo_to_mono, AudioCapture, AudioChunk, AudioSession};
use crate::config::{AppConfig, AppPaths};
use crate::history::HistoryLog;
use crate::hotkey::{HotkeyCombo, HotkeyListener};
use crate::inject::{SystemEmitter, TextEmitter};
use crate::llm::{ApiEnhancer, Enhancer, FallbackEnhancer};
use crate::pipeline::{PipelineWorker, RecordingController};
use crate::stt::{MissingModelTranscriber, TranscribeParams, Transcriber, WhisperTranscriber};

// ---------------------------------------------------------------------------
// FlowApp
// ---------------------------------------------------------------------------

/// The assembled dictation daemon.
pub struct FlowApp {
    config: AppConfig,
}

impl FlowApp {
    /// Wrap a loaded configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Run until Ctrl+C.
    ///
    /// # Errors
    ///
    /// Fails fast on a malformed hotkey string; everything else degrades
    /// gracefully (missing model, unavailable microphone, absent enhancer
    /// backend) so the daemon still starts and logs what is wrong.
    pub async fn run(self) -> Result<()> {
        let config = self.config;
        let paths = AppPaths::new();

        let combo = HotkeyCombo::parse(&config.hotkey)
            .with_context(|| format!("invalid hotkey combo {:?}", config.hotkey))?;

        // ── Collaborators ────────────────────────────────────────────────
        let transcriber = build_transcriber(&config, &paths);
        let enhancer = build_enhancer(&config);

        log::info!("running in fully local mode");
        log::info!("hotkey: {} ({} mode)", config.hotkey, config.mode.label());
        log::info!("whisper model: {}", config.stt.model);
        log::info!(
            "enhancer: {}",
            enhancer
                .as_ref()
                .map_or_else(|| "disabled".to_string(), |e| e.status())
        );
        log::info!("press Ctrl+C to exit");

        let emitter: Arc<dyn TextEmitter> =
            Arc::new(SystemEmitter::new(config.auto_paste, config.paste_mode));
        let history = HistoryLog::new(paths.history_file.clone());

        let worker = PipelineWorker::new(
            transcriber,
            enhancer,
            emitter,
            history,
            config.language.clone(),
            config.enable_voice_commands,
            config.mode,
        );

        // ── Controller + worker task ─────────────────────────────────────
        let session = Arc::new(AudioSession::new(config.sample_rate));
        let controller = Arc::new(RecordingController::new(
            config.mode,
            combo,
            Arc::clone(&session),
            worker,
        ));

        // ── Audio capture + feed thread ──────────────────────────────────
        let _stream_handle = start_capture(Arc::clone(&session));

        // ── Key listener ─────────────────────────────────────────────────
        let listener = {
            let controller = Arc::clone(&controller);
            HotkeyListener::start(move |event| controller.handle_key(event))
        };

        // ── Park until Ctrl+C ────────────────────────────────────────────
        tokio::signal::ctrl_c()
            .await
            .context("failed to listen for Ctrl+C")?;

        log::info!("shutting down");
        controller.shutdown();
        drop(listener);

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Collaborator construction
// ---------------------------------------------------------------------------

/// Load the Whisper model, degrading to a stub engine when absent so the
/// daemon still launches.
fn build_transcriber(config: &AppConfig, paths: &AppPaths) -> Arc<dyn Transcriber> {
    let model_path = paths.models_dir.join(format!("{}.bin", config.stt.model));

    match WhisperTranscriber::load(&model_path, TranscribeParams::default()) {
        Ok(engine) => {
            log::info!("whisper model loaded: {}", model_path.display());
            Arc::new(engine)
        }
        Err(e) => {
            log::warn!(
                "could not load whisper model ({}): {e}; transcription will return an error",
                model_path.display()
            );
            Arc::new(MissingModelTranscriber::new(model_path.display().to_string()))
        }
    }
}

/// Build the enhancer chain when enabled; `None` skips the stage entirely.
fn build_enhancer(config: &AppConfig) -> Option<Arc<dyn Enhancer>> {
    if !config.enhancer.enabled {
        return None;
    }
    Some(Arc::new(FallbackEnhancer::new(ApiEnhancer::from_config(
        &config.enhancer,
    ))))
}

/// Start the cpal stream and the audio-feed thread.
///
/// The feed thread downmixes each chunk to mono, resamples it to the
/// session rate and appends it; the session drops chunks while no recording
/// is active.  Returns `None` (with a warning) when no input device is
/// available — the daemon still runs, clips will simply be empty.
fn start_capture(session: Arc<AudioSession>) -> Option<crate::audio::StreamHandle> {
    let capture = match AudioCapture::new() {
        Ok(capture) => capture,
        Err(e) => {
            log::warn!("audio capture unavailable: {e}");
            return None;
        }
    };

    let native_rate = capture.sample_rate();
    let channels = capture.channels();
    let target_rate = session.sample_rate();

    let (chunk_tx, chunk_rx) = std::sync::mpsc::channel::<AudioChunk>();

    std::thread::Builder::new()
        .name("audio-feed".into())
        .spawn(move || {
            while let Ok(chunk) = chunk_rx.recv() {
                if !session.is_recording() {
                    continue;
                }

                let mono = if chunk.channels > 1 {
                    stereo_to_mono(&chunk.samples, chunk.channels)
                } else {
                    chunk.samples
                };

                let converted = if chunk.sample_rate != target_rate {
                    resample(&mono, chunk.sample_rate, target_rate)
                } else {
                    mono
                };

                session.push_chunk(&converted);
            }
        })
        .expect("failed to spawn audio-feed thread");

    match capture.start(chunk_tx) {
        Ok(handle) => {
            log::info!("audio capture started ({native_rate} Hz, {channels} ch)");
            Some(handle)
        }
        Err(e) => {
            log::warn!("failed to start audio stream: {e}");
            None
        }
    }
}
