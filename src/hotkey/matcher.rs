//! Pressed-set tracking against a configured [`HotkeyCombo`].
//!
//! [`HotkeyMatcher`] holds the set of combo keys currently down and answers
//! two questions per event: did this press make the pressed set exactly
//! equal the combo ("satisfied"), and did this release make it stop being
//! equal ("released from full")?
//!
//! The matcher carries no other state.  Edge-triggering — firing once per
//! press excursion even under OS autorepeat — is the caller's job via its
//! activation latch; the matcher only reports set equality.

use std::collections::HashSet;

use super::{HotkeyCombo, KeyIdentity};

// ---------------------------------------------------------------------------
// HotkeyMatcher
// ---------------------------------------------------------------------------

/// Tracks which combo keys are physically down.
///
/// Keys outside the combo (including unmapped `Coded` keys) never enter the
/// pressed set, so held bystander keys cannot block or spuriously trigger
/// the combo.
#[derive(Debug)]
pub struct HotkeyMatcher {
    combo: HotkeyCombo,
    pressed: HashSet<KeyIdentity>,
}

impl HotkeyMatcher {
    /// Create a matcher for `combo` with an empty pressed set.
    pub fn new(combo: HotkeyCombo) -> Self {
        Self {
            combo,
            pressed: HashSet::new(),
        }
    }

    /// Record a raw key-down event.
    ///
    /// Returns `true` when the pressed set now exactly equals the combo.
    /// Repeated presses of an already-down key (autorepeat) keep returning
    /// `true` while the combo stays fully held — callers must latch.
    pub fn press(&mut self, key: rdev::Key) -> bool {
        let id = KeyIdentity::from_raw(key, self.combo.side());
        if self.combo.contains(&id) {
            self.pressed.insert(id);
        }
        self.is_satisfied()
    }

    /// Record a raw key-up event.
    ///
    /// The identity is removed from the pressed set unconditionally.
    /// Returns `true` when this release made the pressed set stop equaling
    /// the combo (the "released from full" edge).
    pub fn release(&mut self, key: rdev::Key) -> bool {
        let id = KeyIdentity::from_raw(key, self.combo.side());
        let was_satisfied = self.is_satisfied();
        self.pressed.remove(&id);
        was_satisfied && !self.is_satisfied()
    }

    /// Whether the pressed set currently equals the combo.
    pub fn is_satisfied(&self) -> bool {
        self.pressed == *self.combo.keys()
    }

    /// Number of combo keys currently down.
    pub fn pressed_len(&self) -> usize {
        self.pressed.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
