//! Keyboard simulation helpers backed by the `enigo` crate.
//!
//! Provides [`simulate_paste`], which sends the OS-appropriate paste
//! shortcut to the currently focused window, and [`type_text`], which types
//! the text out character by character:
//!
//! | Platform | Paste shortcut |
//! |----------|----------------|
//! | macOS    | ⌘V (Meta + V) |
//! | Windows  | Ctrl+V |
//! | Linux    | Ctrl+V |

use enigo::{Direction, Enigo, Key, Keyboard, Settings};

use super::EmitError;

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Simulate the system paste shortcut in the currently focused window.
///
/// * **macOS** → Meta (⌘) + V
/// * **Windows / Linux** → Ctrl + V
///
/// A new [`Enigo`] instance is created for each call because `Enigo` is not
/// `Send` and the handle is cheap to construct.
///
/// # Errors
///
/// Returns [`EmitError::KeySimulation`] if the enigo backend cannot be
/// initialised or if any key event fails to be delivered.
pub fn simulate_paste() -> Result<(), EmitError> {
    let mut enigo =
        Enigo::new(&Settings::default()).map_err(|e| EmitError::KeySimulation(e.to_string()))?;

    #[cfg(target_os = "macos")]
    {
        // macOS: ⌘V
        enigo
            .key(Key::Meta, Direction::Press)
            .map_err(|e| EmitError::KeySimulation(e.to_string()))?;
        enigo
            .key(Key::Unicode('v'), Direction::Click)
            .map_err(|e| EmitError::KeySimulation(e.to_string()))?;
        enigo
            .key(Key::Meta, Direction::Release)
            .map_err(|e| EmitError::KeySimulation(e.to_string()))?;
    }

    #[cfg(not(target_os = "macos"))]
    {
        // Windows / Linux: Ctrl+V
        enigo
            .key(Key::Control, Direction::Press)
            .map_err(|e| EmitError::KeySimulation(e.to_string()))?;
        enigo
            .key(Key::Unicode('v'), Direction::Click)
            .map_err(|e| EmitError::KeySimulation(e.to_string()))?;
        enigo
            .key(Key::Control, Direction::Release)
            .map_err(|e| EmitError::KeySimulation(e.to_string()))?;
    }

    Ok(())
}

/// Type `text` into the focused window as simulated keystrokes.
///
/// Slower than clipboard paste but leaves the clipboard untouched; used
/// when the configured paste mode is `type`.
///
/// # Errors
///
/// Returns [`EmitError::KeySimulation`] if the enigo backend cannot be
/// initialised or the text cannot be delivered.
pub fn type_text(text: &str) -> Result<(), EmitError> {
    let mut enigo =
        Enigo::new(&Settings::default()).map_err(|e| EmitError::KeySimulation(e.to_string()))?;

    enigo
        .text(text)
        .map_err(|e| EmitError::KeySimulation(e.to_string()))
}
