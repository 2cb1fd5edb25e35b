//! lovekey-core
//!
//! Input session engine for the lovekey soft keyboard: the syllable lexicon,
//! the candidate resolver, the composing state machine and the two text target
//! flavours it commits into (host document vs. panel compose box).
//!
//! Public API:
//! - `Lexicon` / `LexiconBuilder` - syllable → ordered words, fst-indexed
//! - `CandidateResolver` - bounded prefix lookup with an LRU cache
//! - `InputSession` - composing state machine driven by `KeyEvent`s
//! - `TextTarget`, `AppendTarget`, `CursorTarget` - commit destinations
//! - `PanelController` - panel selector that rebinds targets and observers
//! - `PreferenceStore` - persisted keyboard preferences (memory or redb)
//! - `GenerationService` - contract for the external reply generator
//! - `Config` - tunables, loadable from TOML
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod error;
pub use error::{Error, Result};

pub mod lexicon;
pub use lexicon::{Lexicon, LexiconBuilder};

pub mod candidate;
pub use candidate::CandidateList;

pub mod resolver;
pub use resolver::{CandidateResolver, CANDIDATE_LIMIT};

pub mod syllable_buffer;
pub use syllable_buffer::SyllableBuffer;

pub mod shift;
pub use shift::{is_double_tap, ShiftState, ShiftTracker};

pub mod text_target;
pub use text_target::{
    AppendTarget, CursorTarget, HostDocument, SharedTarget, StringDocument, TargetView,
    TextTarget,
};

pub mod context;
pub use context::{Feedback, NoFeedback, SessionObserver, SessionSnapshot};

pub mod session;
pub use session::{InputMode, InputSession, KeyEvent, KeyResult};

pub mod preferences;
pub use preferences::{
    KeyboardLayout, MemoryPreferenceStore, PreferenceStore, Preferences, RedbPreferenceStore,
};

pub mod generation;
pub use generation::{GenerationError, GenerationRequest, GenerationService, Ticket};

pub mod panel;
pub use panel::{Panel, PanelController};

/// Engine tunables.
///
/// Every field has a default, so a TOML file only needs the keys it changes.
/// The candidate caps default to the product heuristics (9 overall, 3 per
/// prefix-matched syllable).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Maximum number of candidates shown for one buffer state. Values above
    /// `resolver::CANDIDATE_LIMIT` (9) are clamped.
    pub max_candidates: usize,
    /// How many words each prefix-matched syllable may contribute.
    pub prefix_words_per_key: usize,
    /// Maximum number of entries in the prefix -> candidates cache.
    pub max_cache_size: usize,
    /// Two shift taps closer than this toggle caps-lock.
    pub double_tap_window_ms: u64,
    /// Replies requested from the generator by the help-reply panel.
    pub help_reply_count: usize,
    /// Rewrites requested from the generator by the super-talk panel.
    pub super_talk_count: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_candidates: 9,
            prefix_words_per_key: 3,
            max_cache_size: 256,
            double_tap_window_ms: 300,
            help_reply_count: 5,
            super_talk_count: 4,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn double_tap_window(&self) -> Duration {
        Duration::from_millis(self.double_tap_window_ms)
    }
}

/// Utility helpers.
pub mod utils {
    /// Normalize input strings (NFC) and trim whitespace.
    pub fn normalize(s: &str) -> String {
        use unicode_normalization::UnicodeNormalization;
        s.nfc().collect::<String>().trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults_match_heuristics() {
        let cfg = Config::default();
        assert_eq!(cfg.max_candidates, 9);
        assert_eq!(cfg.prefix_words_per_key, 3);
        assert_eq!(cfg.double_tap_window(), Duration::from_millis(300));
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg = Config::from_toml_str("double_tap_window_ms = 250\n").unwrap();
        assert_eq!(cfg.double_tap_window_ms, 250);
        assert_eq!(cfg.max_candidates, 9);
        assert_eq!(cfg.help_reply_count, 5);
    }

    #[test]
    fn toml_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lovekey.toml");
        let mut cfg = Config::default();
        cfg.max_cache_size = 32;
        cfg.save_toml(&path).unwrap();
        assert_eq!(Config::load_toml(&path).unwrap(), cfg);
    }

    #[test]
    fn normalize_trims_and_composes() {
        // "e" + combining acute composes to a single scalar under NFC
        assert_eq!(utils::normalize("  e\u{301} "), "\u{e9}");
    }
}
