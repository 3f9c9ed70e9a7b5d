//! Recording pipeline — state machine, single-worker processing, hand-off.
//!
//! # Pieces
//!
//! * [`RecordingState`] — the `Idle` / `Recording` / `Processing` lifecycle.
//! * [`RecordingController`] — consumes raw key events, drives the audio
//!   session, and enforces "at most one clip in flight".
//! * [`ProcessingQueue`] / [`PipelineWorker`] — the capacity-one hand-off
//!   and the tokio task that runs transcription → voice commands →
//!   enhancement → history + emission for each accepted clip.

pub mod controller;
pub mod state;
pub mod worker;

pub use controller::RecordingController;
pub use state::RecordingState;
pub use worker::{PipelineWorker, ProcessingQueue, SubmitError};
