//! STT (Speech-to-Text) engine module.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use flowkey::stt::{Transcriber, TranscribeParams, WhisperTranscriber};
//!
//! let engine = WhisperTranscriber::load("models/tiny.en.bin", TranscribeParams::default())
//!     .expect("model not found — run `flowkey init` and download a model first");
//!
//! // samples: 16 kHz, mono, f32 PCM from the audio module
//! let samples: Vec<f32> = vec![0.0; 16_000]; // 1 s of silence
//! let text = engine.transcribe(&samples, Some("en")).unwrap();
//! println!("{text}");
//! ```

pub mod engine;
pub mod transcribe;

// ── Public re-exports ──────────────────────────────────────────────────────

pub use engine::{MissingModelTranscriber, SttError, Transcriber, WhisperTranscriber};
pub use transcribe::{SamplingStrategy, TranscribeParams};

// test-only re-export so other test modules can import the spy without
// `use flowkey::stt::engine::MockTranscriber`.
#[cfg(test)]
pub use engine::MockTranscriber;
