//! Session state snapshots and the collaborator traits around the session.
//!
//! The UI never reads session fields directly. After every handled event the
//! session hands an immutable `SessionSnapshot` to the registered
//! `SessionObserver`, and every commit is announced separately. Haptics go
//! through the fire-and-forget `Feedback` trait.

use crate::shift::ShiftState;
use crate::{CandidateList, InputMode, KeyboardLayout, TargetView};

/// Everything the UI needs to redraw after one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Raw syllable text being composed (shown beside the candidates).
    pub buffer: String,
    pub candidates: CandidateList,
    pub mode: InputMode,
    pub shift: ShiftState,
    pub layout: KeyboardLayout,
    /// Content and cursor of the active target, if it has a cursor.
    pub target_view: Option<TargetView>,
}

impl SessionSnapshot {
    /// True while a syllable is being composed.
    pub fn is_composing(&self) -> bool {
        !self.buffer.is_empty()
    }
}

/// Receiver for session notifications (candidate bar, panel views).
pub trait SessionObserver {
    /// Called once per handled event with the resulting state.
    fn state_changed(&self, snapshot: &SessionSnapshot);

    /// Called once per commit with the committed text.
    fn committed(&self, _text: &str) {}

    /// Called when a panel receives generated results.
    fn results_ready(&self, _results: &[String]) {}
}

/// Haptic/sound feedback sink. Never queried, never blocks.
pub trait Feedback {
    fn key_press(&self);
}

/// Feedback sink that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFeedback;

impl Feedback for NoFeedback {
    fn key_press(&self) {}
}
