//! Recording lifecycle states.
//!
//! One process-wide [`RecordingState`] value lives inside the controller's
//! lock and is the authority for every start/stop/ignore decision.

// ---------------------------------------------------------------------------
// RecordingState
// ---------------------------------------------------------------------------

/// The three states of the dictation lifecycle.
///
/// The state machine transitions are:
///
/// ```text
/// Idle ──combo satisfied──────────▶ Recording
/// Recording ──stop, clip ok───────▶ Processing
/// Recording ──stop, clip short────▶ Idle
/// Processing ──worker completed───▶ Idle        (success or failure alike)
/// ```
///
/// `Recording` and `Processing` are mutually exclusive: a combo satisfied
/// while `Processing` is ignored (busy advisory), which is what enforces
/// "at most one clip in flight".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordingState {
    /// Waiting for the hotkey combo.
    Idle,

    /// Microphone audio is being accumulated into the session.
    Recording,

    /// A finished clip is being transcribed/enhanced/emitted by the worker.
    Processing,
}

impl RecordingState {
    /// A short human-readable label for logs.
    pub fn label(self) -> &'static str {
        match self {
            RecordingState::Idle => "idle",
            RecordingState::Recording => "recording",
            RecordingState::Processing => "processing",
        }
    }
}

impl Default for RecordingState {
    fn default() -> Self {
        RecordingState::Idle
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_idle() {
        assert_eq!(RecordingState::default(), RecordingState::Idle);
    }

    #[test]
    fn labels() {
        assert_eq!(RecordingState::Idle.label(), "idle");
        assert_eq!(RecordingState::Recording.label(), "recording");
        assert_eq!(RecordingState::Processing.label(), "processing");
    }
}
