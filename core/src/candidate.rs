//! Candidate list shown for the current syllable buffer.
//!
//! A `CandidateList` is a value: the session replaces it wholesale after
//! every buffer change and never edits one in place.

use std::sync::Arc;

/// Ordered, bounded list of candidate words.
///
/// Cloning is cheap (shared slice), so snapshots can carry the list without
/// copying every word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateList {
    words: Arc<[String]>,
}

impl CandidateList {
    /// Create an empty candidate list.
    pub fn new() -> Self {
        Self {
            words: Arc::from(Vec::new()),
        }
    }

    /// Build a list from words, keeping at most `limit` of them.
    pub fn from_words<I>(words: I, limit: usize) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let words: Vec<String> = words.into_iter().take(limit).collect();
        Self {
            words: words.into(),
        }
    }

    /// The candidate the commit rule picks.
    pub fn first(&self) -> Option<&str> {
        self.words.first().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// True if `word` is one of the current candidates.
    pub fn contains(&self, word: &str) -> bool {
        self.words.iter().any(|w| w == word)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl Default for CandidateList {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Vec<String>> for CandidateList {
    fn from(words: Vec<String>) -> Self {
        Self {
            words: words.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_words_truncates() {
        let words = (0..12).map(|i| i.to_string());
        let list = CandidateList::from_words(words, 9);
        assert_eq!(list.len(), 9);
        assert_eq!(list.first(), Some("0"));
        assert_eq!(list.get(8), Some("8"));
    }

    #[test]
    fn contains_and_empty() {
        let list = CandidateList::from(vec!["好".to_string(), "号".to_string()]);
        assert!(list.contains("号"));
        assert!(!list.contains("毫"));
        assert!(CandidateList::new().is_empty());
        assert_eq!(CandidateList::new().first(), None);
    }
}
