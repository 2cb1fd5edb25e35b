//! Composing state machine.
//!
//! `InputSession` owns the syllable buffer, the candidate list, the input
//! mode, the shift state and the keyboard layout. It is `Idle` while the
//! buffer is empty and `Composing` otherwise. Every key event is handled to
//! completion (mutation, candidate recomputation, observer notification)
//! before the call returns.
//!
//! Commit rule, used whenever the buffer must be flushed without an explicit
//! selection: commit the first candidate if there is one, otherwise the raw
//! buffer text.

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use tracing::debug;

use crate::context::{Feedback, NoFeedback, SessionObserver, SessionSnapshot};
use crate::shift::{ShiftState, ShiftTracker};
use crate::{
    CandidateList, CandidateResolver, Config, KeyboardLayout, Lexicon, Panel, Preferences,
    SharedTarget, SyllableBuffer,
};

/// Which script letter keys produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    /// Letters accumulate into the syllable buffer.
    #[default]
    Chinese,
    /// Letters go straight to the target.
    Latin,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            InputMode::Chinese => InputMode::Latin,
            InputMode::Latin => InputMode::Chinese,
        }
    }
}

/// Discrete events sent by the keyboard UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyEvent {
    /// A character key (letter, digit, punctuation).
    Char(char),
    /// Multi-char text from the symbol layout, inserted verbatim.
    Punctuation(String),
    /// Backspace
    Delete,
    Space,
    Return,
    /// Shift tap at the given time.
    Shift(Instant),
    /// Chinese / Latin toggle.
    ModeSwitch,
    /// Switch key layout; asking for the current layout goes back to qwerty.
    Layout(KeyboardLayout),
    CursorLeft,
    CursorRight,
    /// Tap on a candidate in the candidate bar.
    SelectCandidate(String),
    /// Handled by the panel controller.
    PanelSwitch(Panel),
    /// Handled by the panel controller.
    SelectPanelResult(String),
}

/// Result of processing a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyResult {
    /// Key was handled by the session
    Handled,
    /// Key was ignored (stale selection, panel-level event)
    NotHandled,
}

/// The input session state machine.
pub struct InputSession {
    resolver: CandidateResolver,
    mode: InputMode,
    shift: ShiftTracker,
    layout: KeyboardLayout,
    buffer: SyllableBuffer,
    candidates: CandidateList,
    target: SharedTarget,
    observer: Option<Rc<dyn SessionObserver>>,
    feedback: Rc<dyn Feedback>,
    haptics: bool,
}

impl InputSession {
    /// Create a session writing into `target`.
    pub fn new(lexicon: Arc<Lexicon>, config: &Config, target: SharedTarget) -> Self {
        Self {
            resolver: CandidateResolver::with_config(lexicon, config),
            mode: InputMode::Chinese,
            shift: ShiftTracker::new(config.double_tap_window()),
            layout: KeyboardLayout::Qwerty,
            buffer: SyllableBuffer::new(),
            candidates: CandidateList::new(),
            target,
            observer: None,
            feedback: Rc::new(NoFeedback),
            haptics: true,
        }
    }

    /// Apply the preference record read at activation.
    pub fn apply_preferences(&mut self, prefs: &Preferences) {
        self.layout = prefs.keyboard_layout;
        self.haptics = prefs.haptic_enabled;
    }

    pub fn set_feedback(&mut self, feedback: Rc<dyn Feedback>) {
        self.feedback = feedback;
    }

    pub fn set_observer(&mut self, observer: Option<Rc<dyn SessionObserver>>) {
        self.observer = observer;
    }

    /// Point the session at another target and observer.
    ///
    /// Callers flush first; the buffer is expected to be empty here.
    pub fn bind(&mut self, target: SharedTarget, observer: Option<Rc<dyn SessionObserver>>) {
        self.target = target;
        self.observer = observer;
    }

    pub fn target(&self) -> &SharedTarget {
        &self.target
    }

    pub fn resolver(&self) -> &CandidateResolver {
        &self.resolver
    }

    pub fn mode(&self) -> InputMode {
        self.mode
    }

    pub fn shift(&self) -> ShiftState {
        self.shift.state()
    }

    pub fn layout(&self) -> KeyboardLayout {
        self.layout
    }

    pub fn set_layout(&mut self, layout: KeyboardLayout) {
        self.layout = layout;
    }

    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    pub fn candidates(&self) -> &CandidateList {
        &self.candidates
    }

    pub fn is_composing(&self) -> bool {
        !self.buffer.is_empty()
    }

    /// Current state as the UI sees it.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            buffer: self.buffer.as_str().to_string(),
            candidates: self.candidates.clone(),
            mode: self.mode,
            shift: self.shift.state(),
            layout: self.layout,
            target_view: self.target.borrow().view(),
        }
    }

    /// Send the current snapshot to the observer.
    pub fn publish(&self) {
        if let Some(observer) = &self.observer {
            observer.state_changed(&self.snapshot());
        }
    }

    /// Process a key event and notify the observer.
    ///
    /// Returns `KeyResult::NotHandled` for panel-level events and for
    /// selections that no longer match the candidate list; neither changes
    /// any state.
    pub fn process_key(&mut self, key: KeyEvent) -> KeyResult {
        let result = match key {
            KeyEvent::Char(ch) => self.handle_char(ch),
            KeyEvent::Punctuation(text) => {
                self.flush();
                self.insert(&text);
                KeyResult::Handled
            }
            KeyEvent::Delete => self.handle_delete(),
            KeyEvent::Space => self.handle_space(),
            KeyEvent::Return => {
                self.flush();
                self.insert("\n");
                KeyResult::Handled
            }
            KeyEvent::Shift(at) => {
                let state = self.shift.tap(at);
                debug!(?state, "shift tap");
                KeyResult::Handled
            }
            KeyEvent::ModeSwitch => {
                self.flush();
                self.mode = self.mode.toggled();
                debug!(mode = ?self.mode, "input mode switched");
                KeyResult::Handled
            }
            KeyEvent::Layout(layout) => {
                self.flush();
                self.layout = if self.layout == layout {
                    KeyboardLayout::Qwerty
                } else {
                    layout
                };
                KeyResult::Handled
            }
            KeyEvent::CursorLeft => {
                self.target.borrow_mut().move_cursor(-1);
                KeyResult::Handled
            }
            KeyEvent::CursorRight => {
                self.target.borrow_mut().move_cursor(1);
                KeyResult::Handled
            }
            KeyEvent::SelectCandidate(word) => self.select_candidate(&word),
            KeyEvent::PanelSwitch(_) | KeyEvent::SelectPanelResult(_) => KeyResult::NotHandled,
        };

        if result == KeyResult::Handled {
            self.publish();
        }
        result
    }

    fn handle_char(&mut self, ch: char) -> KeyResult {
        if self.mode == InputMode::Chinese && self.buffer.push(ch) {
            self.refresh_candidates();
            return KeyResult::Handled;
        }

        self.flush();
        let text = self.shift.apply(ch);
        self.insert(&text);
        self.shift.character_committed();
        KeyResult::Handled
    }

    fn handle_delete(&mut self) -> KeyResult {
        if self.buffer.pop().is_some() {
            self.refresh_candidates();
        } else if self.target.borrow_mut().delete_backward() {
            self.feedback();
        }
        KeyResult::Handled
    }

    fn handle_space(&mut self) -> KeyResult {
        if self.flush().is_none() {
            self.insert(" ");
        }
        KeyResult::Handled
    }

    fn select_candidate(&mut self, word: &str) -> KeyResult {
        if self.buffer.is_empty() || !self.candidates.contains(word) {
            debug!(word, "ignoring selection of a candidate not on display");
            return KeyResult::NotHandled;
        }
        self.commit(word);
        KeyResult::Handled
    }

    /// Flush the buffer with the commit rule. Returns the committed text, or
    /// `None` when there was nothing to flush.
    pub fn flush(&mut self) -> Option<String> {
        if self.buffer.is_empty() {
            return None;
        }
        let text = match self.candidates.first() {
            Some(first) => first.to_string(),
            None => self.buffer.as_str().to_string(),
        };
        self.commit(&text);
        Some(text)
    }

    /// Commit externally supplied text (e.g. a generated reply) through the
    /// same path as a selected candidate. Pending syllables are flushed first.
    pub fn commit_text(&mut self, text: &str) {
        self.flush();
        self.commit(text);
        self.publish();
    }

    fn commit(&mut self, text: &str) {
        self.target.borrow_mut().commit_text(text);
        self.feedback();
        self.buffer.clear();
        self.candidates = CandidateList::new();
        debug!(text, "committed");
        if let Some(observer) = &self.observer {
            observer.committed(text);
        }
    }

    /// Passthrough insertion (not a commit).
    fn insert(&mut self, text: &str) {
        self.target.borrow_mut().insert(text);
        self.feedback();
    }

    fn refresh_candidates(&mut self) {
        self.candidates = if self.buffer.is_empty() {
            CandidateList::new()
        } else {
            self.resolver.resolve(self.buffer.as_str())
        };
    }

    fn feedback(&self) {
        if self.haptics {
            self.feedback.key_press();
        }
    }
}
