//! Global hotkey handling: key identities, combo parsing, press tracking.
//!
//! # Design
//!
//! Raw `rdev` key events are normalized into [`KeyIdentity`] values before
//! any matching happens.  Whether left and right variants of a modifier
//! count as the same key is a property of the configured combo string, not
//! of the key itself: `"<cmd>+<shift>"` matches either command key, while
//! `"<cmd_r>"` matches only the right one.  The rule is simple — naming a
//! left/right variant anywhere in the combo makes matching side-specific
//! for the whole session.
//!
//! [`HotkeyCombo::parse`] accepts pynput-style strings (`"<cmd_r>"`,
//! `"<cmd>+<shift>"`) as well as bare spellings (`"cmd_r"`, `"right
//! command"`, `"F9"`).  Unrecognised key names are a configuration error;
//! unrecognised keys *at runtime* are simply ignored by the matcher.

pub mod listener;
pub mod matcher;

pub use listener::HotkeyListener;
pub use matcher::HotkeyMatcher;

use std::collections::HashSet;

use thiserror::Error;

// ---------------------------------------------------------------------------
// KeyEvent
// ---------------------------------------------------------------------------

/// A raw key transition as delivered by the OS listener thread.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum KeyEvent {
    /// A key went down (includes OS autorepeat events).
    Press(rdev::Key),
    /// A key came back up.
    Release(rdev::Key),
}

// ---------------------------------------------------------------------------
// SideMode
// ---------------------------------------------------------------------------

/// Whether left/right variants of a modifier are distinct identities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SideMode {
    /// Left and right collapse to one canonical identity.
    Agnostic,
    /// Left and right are distinct keys.
    Specific,
}

// ---------------------------------------------------------------------------
// KeyIdentity
// ---------------------------------------------------------------------------

/// A normalized, hashable token for a physical or logical key.
///
/// `Named` covers every key `rdev` can identify; `Coded` carries the raw
/// virtual-key code of keys `rdev` reports as `Key::Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyIdentity {
    /// A key with a known name (modifiers, letters, function keys, …).
    Named(rdev::Key),
    /// An unmapped key identified only by its virtual-key code.
    Coded(u32),
}

impl KeyIdentity {
    /// Normalize a raw key under the given side rule.
    ///
    /// In [`SideMode::Agnostic`] the right-hand variant of each modifier is
    /// folded onto its left-hand sibling so either physical key produces the
    /// same identity.  In [`SideMode::Specific`] the raw variant is kept.
    pub fn from_raw(key: rdev::Key, side: SideMode) -> Self {
        use rdev::Key;

        let key = match side {
            SideMode::Specific => key,
            SideMode::Agnostic => match key {
                Key::MetaRight => Key::MetaLeft,
                Key::ShiftRight => Key::ShiftLeft,
                Key::ControlRight => Key::ControlLeft,
                Key::AltGr => Key::Alt,
                other => other,
            },
        };

        match key {
            Key::Unknown(code) => Self::Coded(code),
            named => Self::Named(named),
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyParseError
// ---------------------------------------------------------------------------

/// Errors produced while parsing a combo string from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum HotkeyParseError {
    /// The combo string contained no key names at all.
    #[error("hotkey combo is empty")]
    EmptyCombo,

    /// A key name in the combo string was not recognised.
    #[error("unknown key name in hotkey combo: {0:?}")]
    UnknownKey(String),
}

// ---------------------------------------------------------------------------
// HotkeyCombo
// ---------------------------------------------------------------------------

/// The set of keys that must be simultaneously pressed to trigger.
///
/// Membership is order-independent; the trigger condition is exact equality
/// between the currently-pressed set and this set.
#[derive(Debug, Clone)]
pub struct HotkeyCombo {
    keys: HashSet<KeyIdentity>,
    side: SideMode,
}

impl HotkeyCombo {
    /// Parse a combo string like `"<cmd_r>"`, `"<cmd>+<shift>"` or `"F9"`.
    ///
    /// Tokens are separated by `+`; angle brackets, case, spaces and hyphens
    /// are insignificant (`"right command"` equals `"<cmd_r>"`).  The combo
    /// is side-specific exactly when at least one token names a left/right
    /// variant.
    ///
    /// # Errors
    ///
    /// [`HotkeyParseError::EmptyCombo`] when no tokens are present,
    /// [`HotkeyParseError::UnknownKey`] for an unrecognised key name.
    pub fn parse(spec: &str) -> Result<Self, HotkeyParseError> {
        let tokens: Vec<&str> = spec
            .split('+')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect();

        if tokens.is_empty() {
            return Err(HotkeyParseError::EmptyCombo);
        }

        let mut parsed = Vec::with_capacity(tokens.len());
        let mut side = SideMode::Agnostic;
        for token in tokens {
            let (key, names_side) = parse_key_name(token)?;
            if names_side {
                side = SideMode::Specific;
            }
            parsed.push(key);
        }

        let keys = parsed
            .into_iter()
            .map(|key| KeyIdentity::from_raw(key, side))
            .collect();

        Ok(Self { keys, side })
    }

    /// The side rule this combo was parsed under.
    pub fn side(&self) -> SideMode {
        self.side
    }

    /// Whether `id` belongs to this combo.
    pub fn contains(&self, id: &KeyIdentity) -> bool {
        self.keys.contains(id)
    }

    /// The full key set.
    pub fn keys(&self) -> &HashSet<KeyIdentity> {
        &self.keys
    }

    /// Number of keys in the combo.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// A combo is never empty after a successful parse.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

// ---------------------------------------------------------------------------
// parse_key_name
// ---------------------------------------------------------------------------

/// Parse one combo token into an `rdev::Key` plus whether the token names a
/// specific side.
///
/// Returns `Err(UnknownKey)` for unrecognised names so callers can surface a
/// configuration error instead of silently binding the wrong key.
fn parse_key_name(token: &str) -> Result<(rdev::Key, bool), HotkeyParseError> {
    use rdev::Key;

    let name = token
        .trim()
        .trim_start_matches('<')
        .trim_end_matches('>')
        .to_lowercase()
        .replace([' ', '-'], "_");

    let (key, names_side) = match name.as_str() {
        // Modifiers, side-agnostic spellings
        "cmd" | "command" | "super" | "win" | "meta" => (Key::MetaLeft, false),
        "shift" => (Key::ShiftLeft, false),
        "ctrl" | "control" => (Key::ControlLeft, false),
        "alt" | "option" => (Key::Alt, false),

        // Modifiers, side-specific spellings
        "cmd_l" | "left_cmd" | "left_command" => (Key::MetaLeft, true),
        "cmd_r" | "right_cmd" | "right_command" => (Key::MetaRight, true),
        "shift_l" | "left_shift" => (Key::ShiftLeft, true),
        "shift_r" | "right_shift" => (Key::ShiftRight, true),
        "ctrl_l" | "left_ctrl" | "left_control" => (Key::ControlLeft, true),
        "ctrl_r" | "right_ctrl" | "right_control" => (Key::ControlRight, true),
        "alt_l" | "left_alt" | "left_option" => (Key::Alt, true),
        "alt_r" | "right_alt" | "right_option" | "alt_gr" => (Key::AltGr, true),

        // Named non-modifiers
        "space" => (Key::Space, false),
        "enter" | "return" => (Key::Return, false),
        "tab" => (Key::Tab, false),
        "esc" | "escape" => (Key::Escape, false),
        "backspace" => (Key::Backspace, false),
        "caps_lock" | "capslock" => (Key::CapsLock, false),

        // Function keys
        "f1" => (Key::F1, false),
        "f2" => (Key::F2, false),
        "f3" => (Key::F3, false),
        "f4" => (Key::F4, false),
        "f5" => (Key::F5, false),
        "f6" => (Key::F6, false),
        "f7" => (Key::F7, false),
        "f8" => (Key::F8, false),
        "f9" => (Key::F9, false),
        "f10" => (Key::F10, false),
        "f11" => (Key::F11, false),
        "f12" => (Key::F12, false),

        // Letter keys
        "a" => (Key::KeyA, false),
        "b" => (Key::KeyB, false),
        "c" => (Key::KeyC, false),
        "d" => (Key::KeyD, false),
        "e" => (Key::KeyE, false),
        "f" => (Key::KeyF, false),
        "g" => (Key::KeyG, false),
        "h" => (Key::KeyH, false),
        "i" => (Key::KeyI, false),
        "j" => (Key::KeyJ, false),
        "k" => (Key::KeyK, false),
        "l" => (Key::KeyL, false),
        "m" => (Key::KeyM, false),
        "n" => (Key::KeyN, false),
        "o" => (Key::KeyO, false),
        "p" => (Key::KeyP, false),
        "q" => (Key::KeyQ, false),
        "r" => (Key::KeyR, false),
        "s" => (Key::KeyS, false),
        "t" => (Key::KeyT, false),
        "u" => (Key::KeyU, false),
        "v" => (Key::KeyV, false),
        "w" => (Key::KeyW, false),
        "x" => (Key::KeyX, false),
        "y" => (Key::KeyY, false),
        "z" => (Key::KeyZ, false),

        _ => return Err(HotkeyParseError::UnknownKey(token.to_owned())),
    };

    Ok((key, names_side))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
