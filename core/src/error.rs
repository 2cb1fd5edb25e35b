//! Error type for the fallible edges of lovekey-core.
//!
//! The input session itself never fails; everything here comes from loading
//! or saving artifacts (lexicon files, TOML config, stored preferences).

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("fst index: {0}")]
    Fst(#[from] fst::Error),

    #[error("bincode payload: {0}")]
    Bincode(#[from] bincode::Error),

    #[error("toml parse: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("toml write: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preference storage: {0}")]
    Storage(#[from] redb::Error),

    /// Lexicon keys must be non-empty `[a-z]` strings.
    #[error("invalid syllable {0:?}: expected lowercase ascii letters")]
    InvalidSyllable(String),

    #[error("empty word for syllable {0:?}")]
    EmptyWord(String),

    /// Payload vector and key index disagree (corrupt or mismatched artifacts).
    #[error("lexicon index {index} out of range ({len} payloads)")]
    CorruptLexicon { index: u64, len: usize },

    #[error("bad preference value for {key}: {value:?}")]
    Preference { key: String, value: String },

    #[error("unknown panel {0:?}")]
    UnknownPanel(String),
}
