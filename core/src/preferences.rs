//! Keyboard preferences and their persistence.
//!
//! The session reads preferences once at activation (layout, haptics). The
//! store contract is deliberately small: load the whole record, save the
//! whole record.
//!
//! Backends:
//! - `MemoryPreferenceStore`: thread-safe in-memory record, for tests and
//!   hosts that persist elsewhere.
//! - `RedbPreferenceStore`: opaque string key/value pairs in a redb table.

use crate::{Error, Result};
use redb::ReadableTable;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, RwLock};

/// Key layout shown by the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardLayout {
    #[default]
    Qwerty,
    T9,
    Handwriting,
    Symbol,
    Number,
}

impl KeyboardLayout {
    pub const ALL: [KeyboardLayout; 5] = [
        KeyboardLayout::Qwerty,
        KeyboardLayout::T9,
        KeyboardLayout::Handwriting,
        KeyboardLayout::Symbol,
        KeyboardLayout::Number,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            KeyboardLayout::Qwerty => "qwerty",
            KeyboardLayout::T9 => "t9",
            KeyboardLayout::Handwriting => "handwriting",
            KeyboardLayout::Symbol => "symbol",
            KeyboardLayout::Number => "number",
        }
    }
}

impl fmt::Display for KeyboardLayout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyboardLayout {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|l| l.as_str() == s)
            .ok_or_else(|| Error::Preference {
                key: keys::KEYBOARD_TYPE.to_string(),
                value: s.to_string(),
            })
    }
}

/// Persisted user preferences relevant to the keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    pub keyboard_layout: KeyboardLayout,
    pub haptic_enabled: bool,
    pub sound_enabled: bool,
    /// Persona used by the help-reply panel.
    pub current_role_id: Option<String>,
    /// Personas pinned to the keyboard.
    pub keyboard_role_ids: Vec<String>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            keyboard_layout: KeyboardLayout::Qwerty,
            haptic_enabled: true,
            sound_enabled: false,
            current_role_id: None,
            keyboard_role_ids: Vec::new(),
        }
    }
}

/// Load/save contract for the preference record.
pub trait PreferenceStore {
    fn load(&self) -> Result<Preferences>;
    fn save(&self, prefs: &Preferences) -> Result<()>;
}

/// In-memory preference store.
#[derive(Clone, Debug, Default)]
pub struct MemoryPreferenceStore {
    inner: Arc<RwLock<Preferences>>,
}

impl MemoryPreferenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_preferences(prefs: Preferences) -> Self {
        Self {
            inner: Arc::new(RwLock::new(prefs)),
        }
    }
}

impl PreferenceStore for MemoryPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        Ok(self
            .inner
            .read()
            .map(|p| p.clone())
            .unwrap_or_default())
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        if let Ok(mut p) = self.inner.write() {
            *p = prefs.clone();
        }
        Ok(())
    }
}

mod keys {
    pub const KEYBOARD_TYPE: &str = "keyboard_type";
    pub const HAPTIC_ENABLED: &str = "haptic_enabled";
    pub const SOUND_ENABLED: &str = "sound_enabled";
    pub const CURRENT_ROLE_ID: &str = "current_role_id";
    pub const KEYBOARD_ROLE_IDS: &str = "keyboard_role_ids";
}

/// Redb-backed preference store.
///
/// Every field is its own string entry, so unknown or missing keys simply fall
/// back to defaults and other tools sharing the file can add keys freely.
pub struct RedbPreferenceStore {
    db: redb::Database,
    path: PathBuf,
}

impl RedbPreferenceStore {
    const TABLE_DEF: redb::TableDefinition<'static, &'static str, &'static str> =
        redb::TableDefinition::new("preferences");

    /// Create or open a redb database at `path`.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)?;
        }
        let db = redb::Database::create(path.as_ref()).map_err(redb::Error::from)?;
        Ok(Self {
            db,
            path: path.as_ref().to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_raw(&self) -> std::result::Result<Vec<(String, String)>, redb::Error> {
        let read_txn = self.db.begin_read()?;
        let table = match read_txn.open_table(Self::TABLE_DEF) {
            Ok(t) => t,
            Err(redb::TableError::TableDoesNotExist(_)) => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut out = Vec::new();
        for item in table.iter()? {
            let (k, v) = item?;
            out.push((k.value().to_string(), v.value().to_string()));
        }
        Ok(out)
    }

    fn write_raw(
        &self,
        entries: &[(&str, String)],
        removed: &[&str],
    ) -> std::result::Result<(), redb::Error> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(Self::TABLE_DEF)?;
            for (k, v) in entries {
                table.insert(*k, v.as_str())?;
            }
            for k in removed {
                table.remove(*k)?;
            }
        }
        write_txn.commit()?;
        Ok(())
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    value.parse::<bool>().map_err(|_| Error::Preference {
        key: key.to_string(),
        value: value.to_string(),
    })
}

impl PreferenceStore for RedbPreferenceStore {
    fn load(&self) -> Result<Preferences> {
        let mut prefs = Preferences::default();
        for (key, value) in self.read_raw()? {
            match key.as_str() {
                keys::KEYBOARD_TYPE => prefs.keyboard_layout = value.parse()?,
                keys::HAPTIC_ENABLED => prefs.haptic_enabled = parse_bool(&key, &value)?,
                keys::SOUND_ENABLED => prefs.sound_enabled = parse_bool(&key, &value)?,
                keys::CURRENT_ROLE_ID => prefs.current_role_id = Some(value),
                keys::KEYBOARD_ROLE_IDS => prefs.keyboard_role_ids = serde_json::from_str(&value)?,
                other => tracing::debug!(key = other, "ignoring unknown preference key"),
            }
        }
        Ok(prefs)
    }

    fn save(&self, prefs: &Preferences) -> Result<()> {
        let mut entries = vec![
            (keys::KEYBOARD_TYPE, prefs.keyboard_layout.as_str().to_string()),
            (keys::HAPTIC_ENABLED, prefs.haptic_enabled.to_string()),
            (keys::SOUND_ENABLED, prefs.sound_enabled.to_string()),
            (
                keys::KEYBOARD_ROLE_IDS,
                serde_json::to_string(&prefs.keyboard_role_ids)?,
            ),
        ];
        let mut removed = Vec::new();
        match &prefs.current_role_id {
            Some(id) => entries.push((keys::CURRENT_ROLE_ID, id.clone())),
            None => removed.push(keys::CURRENT_ROLE_ID),
        }
        self.write_raw(&entries, &removed)?;
        Ok(())
    }
}
