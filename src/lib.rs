//! Flowkey — a fully local, hotkey-driven dictation assistant.
//!
//! A background daemon listens for a global keyboard combination, records
//! microphone audio while the combo is "active" (held down or toggled on),
//! and hands each finished clip to a single background worker that runs
//! speech-to-text, optional voice-command rewriting, optional LLM cleanup,
//! and finally emits the text into the focused application.
//!
//! # Architecture
//!
//! ```text
//! OS key events (rdev thread)
//!   └─▶ RecordingController ── start/stop ──▶ AudioSession
//!                │                                ▲
//!                │ submit(Clip)                   │ push_chunk
//!                ▼                                │
//!         ProcessingQueue                  audio-feed thread
//!        (one tokio task)                 (cpal → mono → 16 kHz)
//!                │
//!                └─▶ Transcriber → voice commands → Enhancer
//!                        └─▶ HistoryLog + emit_text
//! ```
//!
//! At most one clip is ever in flight: the controller refuses to start a new
//! recording while a previous clip is still being processed, and the
//! processing queue is a capacity-one, reject-if-busy hand-off rather than a
//! buffered queue.

pub mod app;
pub mod audio;
pub mod cli;
pub mod commands;
pub mod config;
pub mod history;
pub mod hotkey;
pub mod inject;
pub mod llm;
pub mod pipeline;
pub mod stt;
