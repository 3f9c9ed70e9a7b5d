//! Text emission — delivering transcripts to the focused application.
//!
//! # Overview
//!
//! Depending on configuration, text is delivered one of three ways:
//!
//! 1. **Clipboard paste** — save the original clipboard, set the transcript,
//!    simulate Ctrl+V / ⌘V, restore the original content (best-effort).
//! 2. **Simulated typing** — type the transcript character by character.
//! 3. **Stdout** — print the transcript, either because auto-paste is off or
//!    because keyboard/clipboard automation is unavailable on this system.
//!
//! The degradation to stdout is deliberate: dictation output must never be
//! silently lost just because the desktop denies automation permissions.

pub mod clipboard;
pub mod keyboard;

pub use clipboard::{restore_clipboard, save_clipboard, set_clipboard};
pub use keyboard::{simulate_paste, type_text};

use thiserror::Error;

use crate::config::PasteMode;

// ---------------------------------------------------------------------------
// EmitError
// ---------------------------------------------------------------------------

/// All errors that can surface during text emission.
#[derive(Debug, Error)]
pub enum EmitError {
    /// Could not open or read the system clipboard.
    #[error("cannot access clipboard: {0}")]
    ClipboardAccess(String),

    /// Could not write text to the system clipboard.
    #[error("cannot set clipboard text: {0}")]
    ClipboardSet(String),

    /// Could not simulate a key press/release event.
    #[error("cannot simulate key press: {0}")]
    KeySimulation(String),
}

// ---------------------------------------------------------------------------
// emit_text  — free-function convenience API
// ---------------------------------------------------------------------------

/// Deliver `text` to the active application.
///
/// * Empty text is a no-op.
/// * `auto_paste == false` prints the text to stdout instead.
/// * Otherwise the configured [`PasteMode`] is attempted; if automation
///   fails the text is printed to stdout so it is never lost.
pub fn emit_text(text: &str, auto_paste: bool, paste_mode: PasteMode) {
    if text.is_empty() {
        return;
    }

    if !auto_paste {
        println!("{text}");
        return;
    }

    let result = match paste_mode {
        PasteMode::Clipboard => paste_via_clipboard(text),
        PasteMode::Type => type_text(text),
    };

    if let Err(e) = result {
        log::warn!("text automation unavailable ({e}); printing instead");
        println!("{text}");
    }
}

/// Full clipboard-paste sequence.
///
/// Steps (in order):
/// 1. Save the current clipboard plain-text content.
/// 2. Write `text` into the clipboard.
/// 3. Wait 50 ms (clipboard flush).
/// 4. Simulate Ctrl+V / ⌘V.
/// 5. Wait 100 ms (let the target app complete the paste).
/// 6. Restore the original clipboard content (best-effort; errors ignored).
///
/// # Errors
///
/// Returns the first [`EmitError`] encountered in steps 1–4.  The restore
/// in step 6 is always attempted but its result is discarded.
fn paste_via_clipboard(text: &str) -> Result<(), EmitError> {
    let saved = save_clipboard()?;

    set_clipboard(text)?;

    // Small delay so the clipboard manager flushes before the target reads it
    std::thread::sleep(std::time::Duration::from_millis(50));

    simulate_paste()?;

    // Let the target app finish pasting before we clobber the clipboard
    std::thread::sleep(std::time::Duration::from_millis(100));

    let _ = restore_clipboard(saved);

    Ok(())
}

// ---------------------------------------------------------------------------
// TextEmitter  — injectable interface for the processing worker
// ---------------------------------------------------------------------------

/// Object-safe emission interface so the worker can be tested with a spy.
pub trait TextEmitter: Send + Sync {
    /// Deliver `text` to the user's focused application.
    fn emit(&self, text: &str) -> Result<(), EmitError>;
}

/// Production emitter driving [`emit_text`] with the configured delivery
/// settings.
#[derive(Debug, Clone)]
pub struct SystemEmitter {
    auto_paste: bool,
    paste_mode: PasteMode,
}

impl SystemEmitter {
    /// Create an emitter with the given delivery settings.
    pub fn new(auto_paste: bool, paste_mode: PasteMode) -> Self {
        Self {
            auto_paste,
            paste_mode,
        }
    }
}

impl TextEmitter for SystemEmitter {
    /// Never fails: [`emit_text`] falls back to stdout on automation errors.
    fn emit(&self, text: &str) -> Result<(), EmitError> {
        emit_text(text, self.auto_paste, self.paste_mode);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_is_a_noop() {
        // Must not touch the clipboard or print anything.
        emit_text("", true, PasteMode::Clipboard);
    }

    #[test]
    fn system_emitter_with_auto_paste_off_never_fails() {
        let emitter = SystemEmitter::new(false, PasteMode::Clipboard);
        assert!(emitter.emit("printed, not pasted").is_ok());
    }

    #[test]
    fn emitter_is_object_safe() {
        let _: Box<dyn TextEmitter> = Box::new(SystemEmitter::new(false, PasteMode::Type));
    }
}
