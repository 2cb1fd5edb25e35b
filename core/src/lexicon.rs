//! Syllable lexicon for lovekey-core
//!
//! Maps a lowercase Latin syllable (e.g. `"hao"`) to an ordered list of
//! candidate words. The order of each list is the priority order used by the
//! resolver. A lexicon is immutable once built; all mutation happens on
//! `LexiconBuilder`.
//!
//! Storage layout:
//! - an `fst::Map` from syllable to payload index; fst keys are kept in
//!   lexicographic byte order, which gives prefix scans a stable order
//! - a payload vector (`Vec<Vec<String>>`) indexed by the fst value
//!
//! On disk the two parts are `lexicon.fst` and `lexicon.bincode`.

use crate::{utils, Error, Result};
use fst::automaton::{Automaton, Str};
use fst::{IntoStreamer, Map, Streamer};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

pub const FST_FILE: &str = "lexicon.fst";
pub const PAYLOAD_FILE: &str = "lexicon.bincode";

/// Returns true if `s` is a valid syllable key: non-empty, only `[a-z]`.
pub fn is_syllable(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_lowercase())
}

/// Accumulates syllable → words mappings before freezing them into a `Lexicon`.
#[derive(Debug, Clone, Default)]
pub struct LexiconBuilder {
    entries: BTreeMap<String, Vec<String>>,
}

impl LexiconBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one word to a syllable's list.
    ///
    /// Words are NFC-normalized; a word already present for the syllable keeps
    /// its original position.
    pub fn insert(&mut self, syllable: &str, word: &str) -> Result<&mut Self> {
        if !is_syllable(syllable) {
            return Err(Error::InvalidSyllable(syllable.to_string()));
        }
        let word = utils::normalize(word);
        if word.is_empty() {
            return Err(Error::EmptyWord(syllable.to_string()));
        }
        let bucket = self.entries.entry(syllable.to_string()).or_default();
        if !bucket.contains(&word) {
            bucket.push(word);
        }
        Ok(self)
    }

    /// Append several words, in order.
    pub fn extend<I, W>(&mut self, syllable: &str, words: I) -> Result<&mut Self>
    where
        I: IntoIterator<Item = W>,
        W: AsRef<str>,
    {
        for w in words {
            self.insert(syllable, w.as_ref())?;
        }
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Freeze into an immutable lexicon.
    pub fn build(self) -> Result<Lexicon> {
        // BTreeMap iterates in key order, which is what the fst builder needs.
        let mut payloads = Vec::with_capacity(self.entries.len());
        let mut keys = Vec::with_capacity(self.entries.len());
        for (idx, (key, words)) in self.entries.into_iter().enumerate() {
            keys.push((key, idx as u64));
            payloads.push(words);
        }
        let index = Map::from_iter(keys)?;
        Ok(Lexicon { index, payloads })
    }
}

/// Immutable syllable → words dictionary.
#[derive(Clone)]
pub struct Lexicon {
    index: Map<Vec<u8>>,
    payloads: Vec<Vec<String>>,
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("syllables", &self.payloads.len())
            .finish()
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            index: Map::default(),
            payloads: Vec::new(),
        }
    }
}

impl Lexicon {
    /// Empty lexicon; every lookup returns nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Words for an exact syllable, in priority order.
    pub fn lookup(&self, syllable: &str) -> &[String] {
        self.index
            .get(syllable)
            .and_then(|idx| self.payloads.get(idx as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn contains(&self, syllable: &str) -> bool {
        self.index.contains_key(syllable)
    }

    /// All `(syllable, words)` pairs whose syllable starts with `prefix`,
    /// in lexicographic key order. Includes `prefix` itself when it is a key.
    pub fn prefixed(&self, prefix: &str) -> Vec<(String, &[String])> {
        let matcher = Str::new(prefix).starts_with();
        let mut stream = self.index.search(matcher).into_stream();
        let mut out = Vec::new();
        while let Some((key, idx)) = stream.next() {
            if let Some(words) = self.payloads.get(idx as usize) {
                out.push((String::from_utf8_lossy(key).into_owned(), words.as_slice()));
            }
        }
        out
    }

    /// Iterate every syllable in key order.
    pub fn syllables(&self) -> Vec<String> {
        let mut stream = self.index.stream();
        let mut out = Vec::with_capacity(self.payloads.len());
        while let Some((key, _)) = stream.next() {
            out.push(String::from_utf8_lossy(key).into_owned());
        }
        out
    }

    /// Number of syllables.
    pub fn len(&self) -> usize {
        self.payloads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payloads.is_empty()
    }

    /// Write `lexicon.fst` and `lexicon.bincode` into `dir`.
    pub fn save_dir<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        std::fs::write(dir.join(FST_FILE), self.index.as_fst().as_bytes())?;
        let writer = BufWriter::new(File::create(dir.join(PAYLOAD_FILE))?);
        bincode::serialize_into(writer, &self.payloads)?;
        Ok(())
    }

    /// Load a lexicon written by `save_dir`.
    pub fn load_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let bytes = std::fs::read(dir.join(FST_FILE))?;
        let index = Map::new(bytes)?;
        let reader = BufReader::new(File::open(dir.join(PAYLOAD_FILE))?);
        let payloads: Vec<Vec<String>> = bincode::deserialize_from(reader)?;

        let mut stream = index.stream();
        while let Some((_, idx)) = stream.next() {
            if idx as usize >= payloads.len() {
                return Err(Error::CorruptLexicon {
                    index: idx,
                    len: payloads.len(),
                });
            }
        }
        drop(stream);

        tracing::debug!(syllables = payloads.len(), dir = %dir.display(), "loaded lexicon");
        Ok(Self { index, payloads })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Lexicon {
        let mut b = LexiconBuilder::new();
        b.extend("an", ["安", "按"]).unwrap();
        b.extend("a", ["啊", "阿"]).unwrap();
        b.extend("ai", ["爱"]).unwrap();
        b.extend("ba", ["吧"]).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn insert_and_lookup() {
        let lx = sample();
        assert_eq!(lx.lookup("a"), ["啊", "阿"]);
        assert!(lx.lookup("zzz").is_empty());
        assert_eq!(lx.len(), 4);
    }

    #[test]
    fn prefixed_is_key_ordered() {
        let lx = sample();
        let keys: Vec<String> = lx.prefixed("a").into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["a", "ai", "an"]);
    }

    #[test]
    fn rejects_bad_keys_and_words() {
        let mut b = LexiconBuilder::new();
        assert!(matches!(b.insert("Ni", "你"), Err(Error::InvalidSyllable(_))));
        assert!(matches!(b.insert("", "你"), Err(Error::InvalidSyllable(_))));
        assert!(matches!(b.insert("ni", "  "), Err(Error::EmptyWord(_))));
    }

    #[test]
    fn duplicate_word_keeps_first_position() {
        let mut b = LexiconBuilder::new();
        b.extend("de", ["的", "得", "的"]).unwrap();
        let lx = b.build().unwrap();
        assert_eq!(lx.lookup("de"), ["的", "得"]);
    }

    #[test]
    fn save_and_load_dir_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let lx = sample();
        lx.save_dir(dir.path()).unwrap();
        let loaded = Lexicon::load_dir(dir.path()).unwrap();
        assert_eq!(loaded.syllables(), lx.syllables());
        assert_eq!(loaded.lookup("an"), ["安", "按"]);
    }
}
