//! Pending syllable input for the composing state.
//!
//! The buffer stores raw letters typed in Chinese mode (e.g. "hao") before
//! they are committed. It only ever holds `[a-z]`; uppercase ASCII letters are
//! folded on the way in and everything else is refused.

/// Ordered `[a-z]` characters typed since the last commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyllableBuffer {
    text: String,
}

impl SyllableBuffer {
    /// Create a new empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the raw syllable text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Append a letter. Returns false (buffer untouched) for anything that
    /// is not an ASCII letter.
    pub fn push(&mut self, ch: char) -> bool {
        if !ch.is_ascii_alphabetic() {
            return false;
        }
        self.text.push(ch.to_ascii_lowercase());
        true
    }

    /// Remove the last letter (backspace).
    pub fn pop(&mut self) -> Option<char> {
        self.text.pop()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_folds_case_and_rejects_non_letters() {
        let mut buf = SyllableBuffer::new();
        assert!(buf.push('h'));
        assert!(buf.push('A'));
        assert!(!buf.push('1'));
        assert!(!buf.push('é'));
        assert!(!buf.push(' '));
        assert_eq!(buf.as_str(), "ha");
    }

    #[test]
    fn pop_and_clear() {
        let mut buf = SyllableBuffer::new();
        for ch in "hao".chars() {
            buf.push(ch);
        }
        assert_eq!(buf.pop(), Some('o'));
        assert_eq!(buf.as_str(), "ha");
        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.pop(), None);
    }
}
