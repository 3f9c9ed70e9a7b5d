//! The hotkey-driven recording state machine.
//!
//! [`RecordingController`] is the serialization point where the three
//! independently-clocked event sources meet: the OS key-event thread calls
//! [`handle_key`](RecordingController::handle_key), the worker task calls
//! the completion hook, and the audio-feed thread only ever touches the
//! session's own lock.  One mutex guards the pressed set, the activation
//! latch and the recording state together, so every decision sees a
//! consistent snapshot.
//!
//! # Event handling
//!
//! ```text
//! press   → matcher.press() ──full & !latch──▶ combo-satisfied edge
//! release → matcher.release() ──was full──▶ latch reset
//!                                └─ Hold mode & Recording ──▶ stop + submit
//! ```
//!
//! A combo-satisfied edge starts recording from `Idle`, stops it in Toggle
//! mode, and is ignored (with a busy advisory) while a previous clip is
//! still processing.  The handlers never block: the critical section covers
//! set/flag/state updates plus a non-blocking queue submit, and the session
//! stop is an in-memory drain.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::audio::AudioSession;
use crate::config::InteractionMode;
use crate::hotkey::{HotkeyCombo, HotkeyMatcher, KeyEvent};

use super::state::RecordingState;
use super::worker::{PipelineWorker, ProcessingQueue};

// ---------------------------------------------------------------------------
// ControllerInner
// ---------------------------------------------------------------------------

struct ControllerInner {
    matcher: HotkeyMatcher,
    /// True once the combo has triggered during the current unbroken press
    /// excursion; blocks autorepeat retriggers until the pressed set
    /// diverges from the combo.
    latch: bool,
    state: RecordingState,
    busy_rejections: u64,
}

// ---------------------------------------------------------------------------
// RecordingController
// ---------------------------------------------------------------------------

/// Drives recording start/stop from raw key events.
///
/// Construct with [`RecordingController::new`] (requires a tokio runtime
/// context — the processing worker is spawned immediately), wrap in an
/// `Arc`, and hand [`handle_key`](Self::handle_key) to the key listener.
pub struct RecordingController {
    mode: InteractionMode,
    session: Arc<AudioSession>,
    queue: ProcessingQueue,
    inner: Arc<Mutex<ControllerInner>>,
}

impl RecordingController {
    /// Clips shorter than this are discarded without submission.
    ///
    /// A hard floor, not configuration: sub-200 ms clips are key-bounce
    /// artifacts, and Whisper produces nothing useful from them anyway.
    pub const MIN_CLIP_DURATION: Duration = Duration::from_millis(200);

    /// Create the controller and spawn its processing worker.
    ///
    /// # Panics
    ///
    /// Panics when called outside a tokio runtime context (the worker task
    /// is spawned here).
    pub fn new(
        mode: InteractionMode,
        combo: HotkeyCombo,
        session: Arc<AudioSession>,
        worker: PipelineWorker,
    ) -> Self {
        let inner = Arc::new(Mutex::new(ControllerInner {
            matcher: HotkeyMatcher::new(combo),
            latch: false,
            state: RecordingState::Idle,
            busy_rejections: 0,
        }));

        // The completion hook is the only writer of Processing → Idle.  It
        // fires for every processed clip, success and failure alike.
        let completion_inner = Arc::clone(&inner);
        let queue = ProcessingQueue::spawn(worker, move || {
            let mut inner = completion_inner.lock().unwrap();
            inner.state = RecordingState::Idle;
            log::debug!("processing complete; back to idle");
        });

        Self {
            mode,
            session,
            queue,
            inner,
        }
    }

    /// Entry point for the key listener thread.
    pub fn handle_key(&self, event: KeyEvent) {
        match event {
            KeyEvent::Press(key) => self.on_press(key),
            KeyEvent::Release(key) => self.on_release(key),
        }
    }

    fn on_press(&self, key: rdev::Key) {
        let mut inner = self.inner.lock().unwrap();
        let satisfied = inner.matcher.press(key);

        // Edge-trigger: fire once per press excursion.  Autorepeat keeps
        // reporting satisfied while the combo stays held, so the latch is
        // what prevents retriggering.
        if satisfied && !inner.latch {
            inner.latch = true;
            self.on_combo_satisfied(&mut inner);
        }
    }

    fn on_release(&self, key: rdev::Key) {
        let mut inner = self.inner.lock().unwrap();
        let released_from_full = inner.matcher.release(key);

        if released_from_full {
            inner.latch = false;

            // Hold mode stops on the release edge; toggle mode only cares
            // about the latch reset so the next press can trigger again.
            if self.mode == InteractionMode::Hold && inner.state == RecordingState::Recording {
                self.finish_recording(&mut inner);
            }
        }
    }

    /// One combo-satisfied edge, state-dependent.
    fn on_combo_satisfied(&self, inner: &mut ControllerInner) {
        match inner.state {
            RecordingState::Processing => {
                inner.busy_rejections += 1;
                log::info!("still processing the previous clip");
            }
            RecordingState::Idle => {
                self.session.start();
                inner.state = RecordingState::Recording;
                log::info!("recording");
            }
            RecordingState::Recording => {
                if self.mode == InteractionMode::Toggle {
                    self.finish_recording(inner);
                }
                // Hold mode starts on press and stops on release; a repeat
                // satisfied edge while recording is meaningless.
            }
        }
    }

    /// Stop the session and either submit the clip or discard it.
    fn finish_recording(&self, inner: &mut ControllerInner) {
        let clip = self.session.stop();

        if clip.duration < Self::MIN_CLIP_DURATION || clip.is_empty() {
            log::info!("clip too short; discarding");
            inner.state = RecordingState::Idle;
            return;
        }

        log::info!("captured {:.1}s clip", clip.duration_secs());
        match self.queue.submit(clip) {
            Ok(()) => inner.state = RecordingState::Processing,
            Err(e) => {
                // Unreachable while the state machine holds its invariant
                // (we never record while processing), but a dropped clip
                // must not wedge the controller.
                log::warn!("clip dropped: {e}");
                inner.state = RecordingState::Idle;
            }
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> RecordingState {
        self.inner.lock().unwrap().state
    }

    /// How many combo triggers were ignored because a clip was processing.
    pub fn busy_rejections(&self) -> u64 {
        self.inner.lock().unwrap().busy_rejections
    }

    /// Abort any in-flight recording and discard its audio.
    ///
    /// Called on shutdown before the key listener is torn down.  A clip
    /// already submitted keeps processing on the detached worker; nothing
    /// blocks on it.
    pub fn shutdown(&self) {
        let mut inner = self.inner.lock().unwrap();
        if inner.state == RecordingState::Recording {
            let _ = self.session.stop();
            inner.state = RecordingState::Idle;
            log::debug!("recording aborted on shutdown");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
