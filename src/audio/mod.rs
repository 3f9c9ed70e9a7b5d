//! Audio pipeline — microphone capture → downmix/resample → session buffers.
//!
//! # Pipeline
//!
//! ```text
//! Microphone → cpal callback → AudioChunk (mpsc) → stereo_to_mono
//!           → resample → AudioSession (only while recording) → Clip
//! ```
//!
//! The cpal stream runs continuously; [`AudioSession`] decides whether a
//! chunk is kept (recording active) or dropped (idle).  Stopping a session
//! assembles everything captured since `start()` into one [`Clip`].

pub mod capture;
pub mod resample;
pub mod session;

pub use capture::{AudioCapture, AudioChunk, CaptureError, StreamHandle};
pub use resample::{resample, stereo_to_mono};
pub use session::{AudioSession, Clip};
