//! lovekey crate root
//!
//! Wires the `lovekey-core` session engine into a usable keyboard: the
//! built-in pinyin table, the persona catalogue, the reply generation clients
//! and the TOML configuration that ties them together.
//!
//! Public API exported here:
//! - `KeyboardConfig` from `config`
//! - `builtin_lexicon`, `load_lexicon` from `table`
//! - `HttpGenerationClient`, `CannedGenerationService` from `generation`
//! - `open_controller`, `generation_service` to assemble a keyboard

pub mod config;
pub mod generation;
pub mod personas;
pub mod table;

pub use lovekey_core::{
    AppendTarget, CursorTarget, GenerationService, InputMode, KeyEvent, KeyResult,
    KeyboardLayout, Panel, PanelController, SessionObserver, SessionSnapshot, SharedTarget,
    StringDocument,
};

pub use config::KeyboardConfig;
pub use generation::{CannedGenerationService, HttpGenerationClient, PolishResult};
pub use table::{builtin_lexicon, load_lexicon, BASIC_TABLE};

use std::sync::Arc;

use lovekey_core::{MemoryPreferenceStore, PreferenceStore, RedbPreferenceStore, Result};
use tracing::info;

/// Activate a keyboard on `host`: load the lexicon and the preference store
/// named by `config`, then bind a panel controller to the host. The reply
/// panels start out offering the quick replies and love templates.
pub fn open_controller(config: &KeyboardConfig, host: SharedTarget) -> Result<PanelController> {
    let lexicon = Arc::new(load_lexicon(config.lexicon_dir.as_deref())?);
    let store: Box<dyn PreferenceStore> = match &config.prefs_path {
        Some(path) => Box::new(RedbPreferenceStore::open(path)?),
        None => Box::new(MemoryPreferenceStore::new()),
    };
    info!(syllables = lexicon.len(), "keyboard activated");
    let mut controller = PanelController::new(lexicon, config.base(), host, store);
    controller.set_suggestions(Panel::HelpReply, personas::QUICK_REPLIES.iter().copied());
    controller.set_suggestions(Panel::SuperTalk, personas::LOVE_TEMPLATES.iter().copied());
    Ok(controller)
}

/// The generation service `config` asks for: HTTP when an endpoint is set,
/// canned replies otherwise.
pub fn generation_service(config: &KeyboardConfig) -> Box<dyn GenerationService> {
    match &config.endpoint {
        Some(url) => Box::new(HttpGenerationClient::new(url, config.timeout_ms)),
        None => Box::new(CannedGenerationService::new()),
    }
}
