//! Commit destinations for the input session.
//!
//! Two flavours exist:
//! - `AppendTarget` wraps a host document that exposes no cursor. Text only
//!   goes in (and comes out) at the host's insertion point.
//! - `CursorTarget` owns its text and an explicit cursor. Panels use it for
//!   their compose boxes.
//!
//! The session only talks to the `TextTarget` trait, so switching targets is
//! a reassignment of a `SharedTarget` handle.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared handle to whatever target is currently active.
pub type SharedTarget = Rc<RefCell<dyn TextTarget>>;

/// Read-only view of a cursor-addressable target for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetView {
    pub content: String,
    /// Cursor position in chars.
    pub cursor: usize,
}

/// Text editing capability the session writes through.
pub trait TextTarget {
    /// Insert text at the target's insertion point.
    fn insert(&mut self, text: &str);

    /// Delete one unit before the insertion point. Returns false when there
    /// was nothing to delete.
    fn delete_backward(&mut self) -> bool;

    /// The single write a commit performs.
    fn commit_text(&mut self, text: &str) {
        self.insert(text);
    }

    /// Move the cursor by `delta` chars. Targets without a cursor ignore it.
    fn move_cursor(&mut self, _delta: isize) -> bool {
        false
    }

    /// Cursor and content, for targets that have them.
    fn view(&self) -> Option<TargetView> {
        None
    }

    /// Drop any local text/cursor state.
    fn reset(&mut self) {}
}

/// Host-side document with an implicit insertion point.
pub trait HostDocument {
    fn insert_text(&mut self, text: &str);
    /// Delete before the insertion point; a no-op at the start of the document.
    fn delete_backward(&mut self);
}

/// In-memory host document where the insertion point is always the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringDocument {
    text: String,
}

impl StringDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl HostDocument for StringDocument {
    fn insert_text(&mut self, text: &str) {
        self.text.push_str(text);
    }

    fn delete_backward(&mut self) {
        self.text.pop();
    }
}

/// Target for a host document: no cursor, append/delete at the insertion point.
#[derive(Debug, Clone, Default)]
pub struct AppendTarget<D> {
    document: D,
}

impl<D: HostDocument> AppendTarget<D> {
    pub fn new(document: D) -> Self {
        Self { document }
    }

    pub fn document(&self) -> &D {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut D {
        &mut self.document
    }
}

impl<D: HostDocument> TextTarget for AppendTarget<D> {
    fn insert(&mut self, text: &str) {
        self.document.insert_text(text);
    }

    fn delete_backward(&mut self) -> bool {
        // Bounds belong to the host; from our side the delete always went out.
        self.document.delete_backward();
        true
    }
}

/// Owned text buffer with an explicit char cursor.
///
/// Invariant: `0 <= cursor <= content.chars().count()`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CursorTarget {
    content: String,
    cursor: usize,
}

impl CursorTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Cursor position in chars.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Length of the content in chars.
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Byte offset of char index `pos` (clamped to the end).
    fn byte_offset(&self, pos: usize) -> usize {
        self.content
            .char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }

    /// Splice `text` in at `cursor` and leave the cursor after it.
    /// A cursor past the end is clamped to the end.
    pub fn insert_at(&mut self, cursor: usize, text: &str) {
        let cursor = cursor.min(self.char_len());
        let at = self.byte_offset(cursor);
        self.content.insert_str(at, text);
        self.cursor = cursor + text.chars().count();
    }

    /// Remove the char before `cursor`. No-op at 0.
    pub fn delete_before(&mut self, cursor: usize) -> bool {
        let cursor = cursor.min(self.char_len());
        if cursor == 0 {
            return false;
        }
        let at = self.byte_offset(cursor - 1);
        self.content.remove(at);
        self.cursor = cursor - 1;
        true
    }

    /// Move the cursor by `delta`, clamped to `[0, char_len]`.
    /// Returns true if the cursor moved.
    pub fn move_by(&mut self, delta: isize) -> bool {
        let target = self
            .cursor
            .saturating_add_signed(delta)
            .min(self.char_len());
        let moved = target != self.cursor;
        self.cursor = target;
        moved
    }

    /// Move cursor to the end.
    pub fn move_to_end(&mut self) {
        self.cursor = self.char_len();
    }

    /// Replace the whole content, cursor at the end.
    pub fn set_content(&mut self, text: &str) {
        self.content = text.to_string();
        self.move_to_end();
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }
}

impl TextTarget for CursorTarget {
    fn insert(&mut self, text: &str) {
        self.insert_at(self.cursor, text);
    }

    fn delete_backward(&mut self) -> bool {
        self.delete_before(self.cursor)
    }

    fn move_cursor(&mut self, delta: isize) -> bool {
        self.move_by(delta)
    }

    fn view(&self) -> Option<TargetView> {
        Some(TargetView {
            content: self.content.clone(),
            cursor: self.cursor,
        })
    }

    fn reset(&mut self) {
        self.clear();
    }
}
