//! Core transcription trait and implementations.
//!
//! # Overview
//!
//! [`Transcriber`] is the interface the processing worker calls.  It is
//! object-safe and `Send + Sync` so it can be held behind an
//! `Arc<dyn Transcriber>` and invoked from the blocking thread pool.
//!
//! [`WhisperTranscriber`] is the production implementation wrapping a
//! `whisper_rs::WhisperContext`.  Construct it with
//! [`WhisperTranscriber::load`].
//!
//! [`MissingModelTranscriber`] stands in when no model file is present so
//! the daemon still launches (every clip then produces a logged error).
//!
//! [`MockTranscriber`] (under `#[cfg(test)]`) returns a pre-configured
//! response and counts its invocations — the tests use it as a spy to prove
//! that discarded clips never reach transcription.

use std::path::Path;

use thiserror::Error;
use whisper_rs::{FullParams, WhisperContext, WhisperContextParameters};

use crate::stt::transcribe::{SamplingStrategy, TranscribeParams};

// ---------------------------------------------------------------------------
// SttError
// ---------------------------------------------------------------------------

/// All errors that can arise from the transcription subsystem.
#[derive(Debug, Clone, Error)]
pub enum SttError {
    /// The GGML model file was not found at the given path.
    #[error("Model not found: {0}")]
    ModelNotFound(String),

    /// `whisper_rs` failed to initialise a `WhisperContext` or `WhisperState`.
    #[error("Whisper context initialisation failed: {0}")]
    ContextInit(String),

    /// An error occurred during the inference pass.
    #[error("Transcription error: {0}")]
    Transcription(String),
}

// ---------------------------------------------------------------------------
// Transcriber trait
// ---------------------------------------------------------------------------

/// Object-safe, thread-safe interface for speech-to-text engines.
///
/// # Contract
///
/// - `samples` must be mono `f32` PCM at 16 kHz.
/// - `language` is an optional ISO-639-1 hint; `None` lets the engine
///   auto-detect.
/// - Empty input returns `Ok("")` — only genuine model failures error.
pub trait Transcriber: Send + Sync {
    /// Transcribe `samples` and return the (possibly empty) transcript text.
    fn transcribe(&self, samples: &[f32], language: Option<&str>) -> Result<String, SttError>;
}

// Compile-time assertion: Box<dyn Transcriber> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn Transcriber>) {}
};

// ---------------------------------------------------------------------------
// WhisperTranscriber
// ---------------------------------------------------------------------------

/// Production engine that wraps a `whisper_rs::WhisperContext`.
///
/// A new `WhisperState` is created for every [`transcribe`] call so the
/// engine can be shared across threads without any locking.
///
/// [`transcribe`]: Transcriber::transcribe
pub struct WhisperTranscriber {
    ctx: WhisperContext,
    params: TranscribeParams,
}

impl std::fmt::Debug for WhisperTranscriber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WhisperTranscriber")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

// `WhisperContext` holds a raw pointer internally but declares
// `unsafe impl Send` and `unsafe impl Sync` in whisper-rs — the model
// weights are read-only after loading.  `TranscribeParams` is fully owned
// and trivially Send+Sync.
// SAFETY: WhisperContext is Send+Sync as declared by whisper-rs.
unsafe impl Send for WhisperTranscriber {}
unsafe impl Sync for WhisperTranscriber {}

impl WhisperTranscriber {
    /// Load a GGML model from `model_path` and prepare it for inference.
    ///
    /// # Errors
    ///
    /// - [`SttError::ModelNotFound`] — `model_path` does not exist.
    /// - [`SttError::ContextInit`]  — whisper-rs failed to load the file.
    pub fn load(model_path: impl AsRef<Path>, params: TranscribeParams) -> Result<Self, SttError> {
        let path = model_path.as_ref();

        if !path.exists() {
            return Err(SttError::ModelNotFound(path.display().to_string()));
        }

        let path_str = path.to_str().ok_or_else(|| {
            SttError::ModelNotFound(format!(
                "model path contains non-UTF-8 characters: {}",
                path.display()
            ))
        })?;

        let ctx_params = WhisperContextParameters::default();
        let ctx = WhisperContext::new_with_params(path_str, ctx_params)
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        Ok(Self { ctx, params })
    }
}

impl Transcriber for WhisperTranscriber {
    fn transcribe(&self, samples: &[f32], language: Option<&str>) -> Result<String, SttError> {
        if samples.is_empty() {
            return Ok(String::new());
        }

        // ── Build FullParams ──────────────────────────────────────────────
        // Convert our SamplingStrategy → whisper-rs's SamplingStrategy.
        use whisper_rs::SamplingStrategy as WS;
        let ws = match self.params.strategy {
            SamplingStrategy::Greedy { best_of } => WS::Greedy { best_of },
            SamplingStrategy::BeamSearch {
                beam_size,
                patience,
            } => WS::BeamSearch {
                beam_size,
                patience,
            },
        };

        let mut fp = FullParams::new(ws);

        // set_language takes an Option<&str> whose lifetime is tied to fp.
        // Both `fp` and the `language` borrow remain alive until
        // state.full() returns, so the borrow is valid.
        fp.set_language(language);
        fp.set_n_threads(self.params.n_threads);

        if self.params.suppress_progress {
            fp.set_print_progress(false);
            fp.set_print_realtime(false);
        }

        // ── Create per-call state and run inference ───────────────────────
        let mut state = self
            .ctx
            .create_state()
            .map_err(|e| SttError::ContextInit(e.to_string()))?;

        state
            .full(fp, samples)
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        // ── Collect segments into one transcript ──────────────────────────
        let n_segments = state
            .full_n_segments()
            .map_err(|e| SttError::Transcription(e.to_string()))?;

        let mut text = String::new();
        for i in 0..n_segments {
            let seg_text = state
                .full_get_segment_text(i)
                .map_err(|e| SttError::Transcription(format!("segment {i}: {e}")))?;
            let trimmed = seg_text.trim();
            if trimmed.is_empty() {
                continue;
            }
            if !text.is_empty() {
                text.push(' ');
            }
            text.push_str(trimmed);
        }

        Ok(text)
    }
}

// ---------------------------------------------------------------------------
// MissingModelTranscriber
// ---------------------------------------------------------------------------

/// Stand-in engine used when the configured model file is absent.
///
/// Every call fails with [`SttError::ModelNotFound`] carrying the expected
/// path, so the log tells the user exactly what to download and where.
#[derive(Debug)]
pub struct MissingModelTranscriber {
    path: String,
}

impl MissingModelTranscriber {
    /// Remember the path the model was expected at.
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Transcriber for MissingModelTranscriber {
    fn transcribe(&self, _samples: &[f32], _language: Option<&str>) -> Result<String, SttError> {
        Err(SttError::ModelNotFound(self.path.clone()))
    }
}

// ---------------------------------------------------------------------------
// MockTranscriber  (test-only)
// ---------------------------------------------------------------------------

/// A test double that returns a pre-configured response and counts calls.
///
/// # Example
///
/// ```rust,ignore
/// let engine = MockTranscriber::ok("hello");
/// let result = engine.transcribe(&vec![0.0f32; 1_600], Some("en"));
/// assert_eq!(result.unwrap(), "hello");
/// assert_eq!(engine.calls(), 1);
/// ```
#[cfg(test)]
pub struct MockTranscriber {
    response: Result<String, SttError>,
    calls: std::sync::atomic::AtomicUsize,
}

#[cfg(test)]
impl MockTranscriber {
    /// Create a mock that always returns `Ok(text)`.
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            response: Ok(text.into()),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Create a mock that always returns `Err(error)`.
    pub fn err(error: SttError) -> Self {
        Self {
            response: Err(error),
            calls: std::sync::atomic::AtomicUsize::new(0),
        }
    }

    /// Number of `transcribe` invocations so far.
    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }
}

#[cfg(test)]
impl Transcriber for MockTranscriber {
    fn transcribe(&self, samples: &[f32], _language: Option<&str>) -> Result<String, SttError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        if samples.is_empty() {
            return Ok(String::new());
        }
        self.response.clone()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // --- MockTranscriber ---

    #[test]
    fn mock_ok_returns_configured_text() {
        let engine = MockTranscriber::ok("hello world");
        let audio = vec![0.0f32; 1_600];
        assert_eq!(engine.transcribe(&audio, Some("en")).unwrap(), "hello world");
        assert_eq!(engine.calls(), 1);
    }

    #[test]
    fn mock_err_returns_configured_error() {
        let engine = MockTranscriber::err(SttError::Transcription("boom".into()));
        let audio = vec![0.0f32; 1_600];
        let err = engine.transcribe(&audio, None).unwrap_err();
        assert!(matches!(err, SttError::Transcription(_)));
    }

    #[test]
    fn mock_counts_every_call() {
        let engine = MockTranscriber::ok("x");
        let audio = vec![0.0f32; 100];
        let _ = engine.transcribe(&audio, None);
        let _ = engine.transcribe(&audio, None);
        assert_eq!(engine.calls(), 2);
    }

    #[test]
    fn empty_audio_is_an_empty_transcript_not_an_error() {
        let engine = MockTranscriber::ok("never");
        assert_eq!(engine.transcribe(&[], None).unwrap(), "");
    }

    // --- WhisperTranscriber::load missing path ---

    #[test]
    fn load_missing_model_returns_model_not_found() {
        let params = TranscribeParams::default();
        let result = WhisperTranscriber::load("/nonexistent/model.bin", params);
        assert!(
            matches!(result, Err(SttError::ModelNotFound(_))),
            "expected ModelNotFound, got: {result:?}"
        );
    }

    // --- MissingModelTranscriber ---

    #[test]
    fn missing_model_stub_always_errors_with_path() {
        let engine = MissingModelTranscriber::new("/some/model.bin");
        let err = engine.transcribe(&[0.0; 100], None).unwrap_err();
        assert!(err.to_string().contains("/some/model.bin"));
    }

    // --- Transcriber object safety ---

    #[test]
    fn box_dyn_transcriber_compiles() {
        // If this test compiles, the trait is object-safe.
        let engine: Box<dyn Transcriber> = Box::new(MockTranscriber::ok("ok"));
        let _ = engine.transcribe(&vec![0.0f32; 100], None);
    }

    // --- SttError display ---

    #[test]
    fn stt_error_display_model_not_found() {
        let e = SttError::ModelNotFound("/some/path.bin".into());
        assert!(e.to_string().contains("/some/path.bin"));
    }
}
