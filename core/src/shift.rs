//! Shift / caps-lock sub-state.
//!
//! Independent from the composing state machine. A single tap toggles a
//! transient shift that drops after one passed-through character; two taps
//! inside the debounce window toggle a persistent caps-lock. Double-tap
//! detection only compares event timestamps, no timers are involved.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShiftState {
    #[default]
    Off,
    /// Transient: uppercase the next character only.
    On,
    CapsLock,
}

impl ShiftState {
    /// Whether passed-through letters should be uppercased.
    pub fn is_upper(self) -> bool {
        matches!(self, ShiftState::On | ShiftState::CapsLock)
    }
}

/// True when `now` follows `previous` by strictly less than `window`.
pub fn is_double_tap(previous: Option<Instant>, now: Instant, window: Duration) -> bool {
    previous.is_some_and(|prev| now.saturating_duration_since(prev) < window)
}

/// Tracks shift taps and the resulting `ShiftState`.
#[derive(Debug, Clone)]
pub struct ShiftTracker {
    state: ShiftState,
    last_tap: Option<Instant>,
    window: Duration,
}

impl ShiftTracker {
    pub fn new(window: Duration) -> Self {
        Self {
            state: ShiftState::Off,
            last_tap: None,
            window,
        }
    }

    pub fn state(&self) -> ShiftState {
        self.state
    }

    /// Register a shift tap at `at` and return the new state.
    pub fn tap(&mut self, at: Instant) -> ShiftState {
        if is_double_tap(self.last_tap, at, self.window) {
            // The pair is consumed so a third quick tap counts as single.
            self.last_tap = None;
            self.state = match self.state {
                ShiftState::CapsLock => ShiftState::Off,
                _ => ShiftState::CapsLock,
            };
        } else {
            self.last_tap = Some(at);
            self.state = match self.state {
                ShiftState::Off => ShiftState::On,
                ShiftState::On => ShiftState::Off,
                ShiftState::CapsLock => ShiftState::CapsLock,
            };
        }
        self.state
    }

    /// Called after a character went through to the target.
    pub fn character_committed(&mut self) {
        if self.state == ShiftState::On {
            self.state = ShiftState::Off;
        }
    }

    /// Apply the current casing to a passed-through character.
    pub fn apply(&self, ch: char) -> String {
        if self.state.is_upper() {
            ch.to_uppercase().collect()
        } else {
            ch.to_lowercase().collect()
        }
    }
}
