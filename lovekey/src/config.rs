//! Keyboard configuration that extends the base `Config` from core.
//!
//! This configuration includes:
//! - All engine options from `lovekey_core::Config` (flattened via serde)
//! - Where the reply generation service lives and how long to wait for it
//! - Where preferences and the compiled lexicon are stored
//!
//! # Example
//!
//! ```rust
//! use lovekey::KeyboardConfig;
//!
//! let config = KeyboardConfig::from_toml_str("max_candidates = 6\n").unwrap();
//! assert_eq!(config.base().max_candidates, 6);
//! assert!(config.endpoint.is_none());
//! ```

use std::path::{Path, PathBuf};

use lovekey_core::Result;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct KeyboardConfig {
    /// Engine tunables (candidate caps, cache size, shift window, reply counts)
    #[serde(flatten)]
    pub base: lovekey_core::Config,

    /// Base URL of the reply generation service. `None` uses canned replies.
    pub endpoint: Option<String>,

    /// Request timeout for the generation service.
    pub timeout_ms: u64,

    /// Redb file holding keyboard preferences.
    pub prefs_path: Option<PathBuf>,

    /// Directory with `lexicon.fst` + `lexicon.bincode`.
    pub lexicon_dir: Option<PathBuf>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            base: lovekey_core::Config::default(),
            endpoint: None,
            timeout_ms: 30_000,
            prefs_path: None,
            lexicon_dir: None,
        }
    }
}

impl KeyboardConfig {
    /// Get a reference to the base config
    pub fn base(&self) -> &lovekey_core::Config {
        &self.base
    }

    /// Get a mutable reference to the base config
    pub fn base_mut(&mut self) -> &mut lovekey_core::Config {
        &mut self.base
    }

    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Save configuration to a TOML file.
    pub fn save_toml<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        std::fs::write(path, self.to_toml_string()?)?;
        Ok(())
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}
