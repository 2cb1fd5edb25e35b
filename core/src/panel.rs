//! Panel selector around the input session.
//!
//! The keyboard shows one panel at a time. Each panel decides where commits
//! land and who hears about them:
//!
//! | panel         | target                  | keys |
//! |---------------|-------------------------|------|
//! | `Keyboard`    | host document           | yes  |
//! | `HelpReply`   | own compose box         | yes  |
//! | `SuperTalk`   | own compose box         | yes  |
//! | `MoreOptions` | host document           | no   |
//!
//! Every transition flushes the buffer into the outgoing target first, bumps
//! the generation epoch and rebinds the session. Compose boxes start empty on
//! every entry, and the result list starts with the panel's suggestions.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use std::str::FromStr;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::generation::{GenerationError, GenerationRequest, GenerationService, Ticket};
use crate::{
    utils, Config, CursorTarget, Error, Feedback, InputSession, KeyEvent, KeyResult,
    KeyboardLayout, Lexicon, PreferenceStore, Preferences, Result, SessionObserver, SharedTarget,
    TargetView, TextTarget,
};

/// Default persona for help-reply when none is stored.
pub const DEFAULT_PERSONA: &str = "default";
/// Default identity for super-talk.
pub const DEFAULT_IDENTITY: &str = "general";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Panel {
    #[default]
    Keyboard,
    /// Suggest replies to a pasted message.
    HelpReply,
    /// Rewrite a draft in a chosen tone.
    SuperTalk,
    /// Layout picker and settings shortcuts.
    MoreOptions,
}

impl Panel {
    pub const ALL: [Panel; 4] = [
        Panel::Keyboard,
        Panel::HelpReply,
        Panel::SuperTalk,
        Panel::MoreOptions,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Panel::Keyboard => "keyboard",
            Panel::HelpReply => "help_reply",
            Panel::SuperTalk => "super_talk",
            Panel::MoreOptions => "more_options",
        }
    }

    /// Panels with their own compose box.
    pub fn has_compose_box(self) -> bool {
        matches!(self, Panel::HelpReply | Panel::SuperTalk)
    }

    /// Whether text keys reach the session while this panel is shown.
    pub fn accepts_keys(self) -> bool {
        self != Panel::MoreOptions
    }
}

impl fmt::Display for Panel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Panel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| Error::UnknownPanel(s.to_string()))
    }
}

/// Owns the session and swaps its target/observer as panels change.
pub struct PanelController {
    session: InputSession,
    current: Panel,
    host: SharedTarget,
    help_reply: Rc<RefCell<CursorTarget>>,
    super_talk: Rc<RefCell<CursorTarget>>,
    observers: HashMap<Panel, Rc<dyn SessionObserver>>,
    store: Box<dyn PreferenceStore>,
    prefs: Preferences,
    help_reply_count: usize,
    super_talk_count: usize,
    help_reply_persona: String,
    super_talk_identity: String,
    epoch: u64,
    next_seq: u64,
    pending: Option<Ticket>,
    results: Vec<String>,
    suggestions: HashMap<Panel, Vec<String>>,
}

impl PanelController {
    /// Activate the keyboard: read preferences once and bind the session to
    /// the host document.
    ///
    /// Unreadable preferences fall back to defaults; the keyboard must come up
    /// regardless.
    pub fn new(
        lexicon: Arc<Lexicon>,
        config: &Config,
        host: SharedTarget,
        store: Box<dyn PreferenceStore>,
    ) -> Self {
        let prefs = store.load().unwrap_or_else(|e| {
            warn!(error = %e, "failed to load preferences, using defaults");
            Preferences::default()
        });

        let mut session = InputSession::new(lexicon, config, host.clone());
        session.apply_preferences(&prefs);

        let help_reply_persona = prefs
            .current_role_id
            .clone()
            .unwrap_or_else(|| DEFAULT_PERSONA.to_string());

        Self {
            session,
            current: Panel::Keyboard,
            host,
            help_reply: Rc::new(RefCell::new(CursorTarget::new())),
            super_talk: Rc::new(RefCell::new(CursorTarget::new())),
            observers: HashMap::new(),
            store,
            prefs,
            help_reply_count: config.help_reply_count,
            super_talk_count: config.super_talk_count,
            help_reply_persona,
            super_talk_identity: DEFAULT_IDENTITY.to_string(),
            epoch: 0,
            next_seq: 0,
            pending: None,
            results: Vec::new(),
            suggestions: HashMap::new(),
        }
    }

    pub fn set_feedback(&mut self, feedback: Rc<dyn Feedback>) {
        self.session.set_feedback(feedback);
    }

    /// Register the observer for `panel`. Takes effect immediately when that
    /// panel is showing.
    pub fn set_observer(&mut self, panel: Panel, observer: Rc<dyn SessionObserver>) {
        self.observers.insert(panel, observer.clone());
        if panel == self.current {
            self.session.set_observer(Some(observer));
        }
    }

    pub fn current(&self) -> Panel {
        self.current
    }

    pub fn session(&self) -> &InputSession {
        &self.session
    }

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Results of the last accepted generation for the current panel.
    pub fn results(&self) -> &[String] {
        &self.results
    }

    /// One-tap texts offered when `panel` is entered.
    pub fn suggestions(&self, panel: Panel) -> &[String] {
        self.suggestions.get(&panel).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Set the texts shown in the result list of a compose panel before
    /// anything has been generated. Ignored for panels without a compose box.
    pub fn set_suggestions<I, S>(&mut self, panel: Panel, texts: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if !panel.has_compose_box() {
            return;
        }
        let texts: Vec<String> = texts.into_iter().map(Into::into).collect();
        if panel == self.current && self.pending.is_none() {
            self.results = texts.clone();
        }
        self.suggestions.insert(panel, texts);
    }

    /// Whether a generation request is waiting for delivery.
    pub fn is_generating(&self) -> bool {
        self.pending.is_some()
    }

    /// Compose-box state of a panel, `None` for panels without one.
    pub fn compose_box(&self, panel: Panel) -> Option<TargetView> {
        self.compose_target(panel).and_then(|t| t.borrow().view())
    }

    fn compose_target(&self, panel: Panel) -> Option<&Rc<RefCell<CursorTarget>>> {
        match panel {
            Panel::HelpReply => Some(&self.help_reply),
            Panel::SuperTalk => Some(&self.super_talk),
            Panel::Keyboard | Panel::MoreOptions => None,
        }
    }

    fn target_for(&self, panel: Panel) -> SharedTarget {
        match self.compose_target(panel) {
            Some(target) => target.clone() as SharedTarget,
            None => self.host.clone(),
        }
    }

    /// Persona (help-reply) or identity (super-talk) sent with requests.
    pub fn persona(&self, panel: Panel) -> Option<&str> {
        match panel {
            Panel::HelpReply => Some(&self.help_reply_persona),
            Panel::SuperTalk => Some(&self.super_talk_identity),
            Panel::Keyboard | Panel::MoreOptions => None,
        }
    }

    /// Pick the persona for a generating panel. Ignored for other panels.
    pub fn set_persona(&mut self, panel: Panel, persona: &str) {
        match panel {
            Panel::HelpReply => self.help_reply_persona = persona.to_string(),
            Panel::SuperTalk => self.super_talk_identity = persona.to_string(),
            Panel::Keyboard | Panel::MoreOptions => {}
        }
    }

    /// Route one key event. Panel-level events are handled here, everything
    /// else goes to the session while the current panel accepts keys.
    pub fn process_key(&mut self, key: KeyEvent) -> KeyResult {
        match key {
            KeyEvent::PanelSwitch(panel) => {
                self.switch_to(panel);
                KeyResult::Handled
            }
            KeyEvent::SelectPanelResult(text) => self.select_panel_result(&text),
            other if self.current.accepts_keys() => self.session.process_key(other),
            _ => KeyResult::NotHandled,
        }
    }

    /// Show `panel`. Switching to the panel already shown does nothing.
    pub fn switch_to(&mut self, panel: Panel) {
        if panel == self.current {
            return;
        }

        // The outgoing observer sees its buffer cleared before it is unbound.
        if self.session.flush().is_some() {
            self.session.publish();
        }

        self.epoch += 1;
        if self.pending.take().is_some() {
            debug!(from = %self.current, "abandoning in-flight generation");
        }
        self.results = self.suggestions(panel).to_vec();

        if let Some(target) = self.compose_target(panel) {
            target.borrow_mut().reset();
        }
        let target = self.target_for(panel);
        let observer = self.observers.get(&panel).cloned();
        self.session.bind(target, observer);

        debug!(from = %self.current, to = %panel, "panel switched");
        self.current = panel;
        self.session.publish();

        if !self.results.is_empty() {
            if let Some(observer) = self.observers.get(&panel) {
                observer.results_ready(&self.results);
            }
        }
    }

    /// Replace the current compose box with `text` and put the cursor at its
    /// end. Pending syllables are committed first.
    pub fn paste(&mut self, text: &str) -> KeyResult {
        let Some(target) = self.compose_target(self.current).cloned() else {
            return KeyResult::NotHandled;
        };
        self.session.flush();
        target.borrow_mut().set_content(text);
        self.session.publish();
        KeyResult::Handled
    }

    /// Persist a layout choice and go back to the keyboard.
    pub fn choose_layout(&mut self, layout: KeyboardLayout) {
        self.prefs.keyboard_layout = layout;
        if let Err(e) = self.store.save(&self.prefs) {
            warn!(error = %e, "failed to save keyboard layout");
        }
        self.session.set_layout(layout);
        if self.current == Panel::Keyboard {
            self.session.publish();
        } else {
            self.switch_to(Panel::Keyboard);
        }
    }

    /// Start a generation request for the current panel.
    ///
    /// Pending syllables are flushed into the compose box first. Returns
    /// `None` on panels without a compose box or when the box is blank.
    pub fn begin_generation(&mut self) -> Option<(Ticket, GenerationRequest)> {
        let count = match self.current {
            Panel::HelpReply => self.help_reply_count,
            Panel::SuperTalk => self.super_talk_count,
            Panel::Keyboard | Panel::MoreOptions => return None,
        };

        if self.session.flush().is_some() {
            self.session.publish();
        }

        let text = self
            .compose_target(self.current)
            .map(|t| utils::normalize(t.borrow().content()))
            .unwrap_or_default();
        if text.is_empty() {
            debug!(panel = %self.current, "nothing to generate from");
            return None;
        }

        self.next_seq += 1;
        let ticket = Ticket::new(self.current, self.epoch, self.next_seq);
        self.pending = Some(ticket);

        let persona = self.persona(self.current).unwrap_or(DEFAULT_PERSONA).to_string();
        let request = GenerationRequest {
            panel: self.current,
            text,
            persona,
            count,
        };
        Some((ticket, request))
    }

    /// Deliver the outcome of a request. Returns false when the ticket is
    /// stale (panel left, or a newer request was issued) and the outcome was
    /// dropped.
    ///
    /// Failures are shown as an empty result set.
    pub fn deliver(
        &mut self,
        ticket: Ticket,
        outcome: std::result::Result<Vec<String>, GenerationError>,
    ) -> bool {
        if self.pending != Some(ticket) {
            debug!(?ticket, "discarding stale generation result");
            return false;
        }
        self.pending = None;

        self.results = match outcome {
            Ok(results) => results
                .into_iter()
                .map(|r| r.trim().to_string())
                .filter(|r| !r.is_empty())
                .collect(),
            Err(e) => {
                warn!(error = %e, panel = %self.current, "generation failed");
                Vec::new()
            }
        };

        if let Some(observer) = self.observers.get(&self.current) {
            observer.results_ready(&self.results);
        }
        true
    }

    /// Run a request synchronously against `service`.
    pub fn generate_with(&mut self, service: &dyn GenerationService) -> bool {
        let Some((ticket, request)) = self.begin_generation() else {
            return false;
        };
        let outcome = service.generate(&request);
        self.deliver(ticket, outcome)
    }

    /// Send a chosen result to the host: leave the panel, then commit the text
    /// through the session like a selected candidate.
    pub fn select_panel_result(&mut self, text: &str) -> KeyResult {
        if !self.current.has_compose_box() || text.trim().is_empty() {
            return KeyResult::NotHandled;
        }
        self.switch_to(Panel::Keyboard);
        self.session.commit_text(text);
        KeyResult::Handled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AppendTarget, LexiconBuilder, MemoryPreferenceStore, SessionSnapshot, StringDocument};

    type Host = Rc<RefCell<AppendTarget<StringDocument>>>;

    fn lexicon() -> Arc<Lexicon> {
        let mut b = LexiconBuilder::new();
        b.extend("hao", ["好", "号", "毫"]).unwrap();
        b.extend("ni", ["你", "呢", "泥"]).unwrap();
        Arc::new(b.build().unwrap())
    }

    fn controller_with(store: MemoryPreferenceStore) -> (PanelController, Host) {
        let host: Host = Rc::new(RefCell::new(AppendTarget::new(StringDocument::new())));
        let ctl = PanelController::new(lexicon(), &Config::default(), host.clone(), Box::new(store));
        (ctl, host)
    }

    fn controller() -> (PanelController, Host) {
        controller_with(MemoryPreferenceStore::new())
    }

    fn host_text(host: &Host) -> String {
        host.borrow().document().text().to_string()
    }

    fn type_str(ctl: &mut PanelController, keys: &str) {
        for ch in keys.chars() {
            ctl.process_key(KeyEvent::Char(ch));
        }
    }

    #[derive(Default)]
    struct Recorder {
        snapshots: RefCell<Vec<SessionSnapshot>>,
        commits: RefCell<Vec<String>>,
        results: RefCell<Vec<Vec<String>>>,
    }

    impl SessionObserver for Recorder {
        fn state_changed(&self, snapshot: &SessionSnapshot) {
            self.snapshots.borrow_mut().push(snapshot.clone());
        }

        fn committed(&self, text: &str) {
            self.commits.borrow_mut().push(text.to_string());
        }

        fn results_ready(&self, results: &[String]) {
            self.results.borrow_mut().push(results.to_vec());
        }
    }

    #[test]
    fn panel_switch_flushes_into_outgoing_target() {
        let (mut ctl, host) = controller();
        let rec = Rc::new(Recorder::default());
        ctl.set_observer(Panel::Keyboard, rec.clone());
        type_str(&mut ctl, "ni");
        ctl.process_key(KeyEvent::PanelSwitch(Panel::HelpReply));
        assert_eq!(host_text(&host), "你");
        assert_eq!(*rec.commits.borrow(), ["你"]);
        assert!(!ctl.session().is_composing());

        // last snapshot the keyboard observer saw is idle
        let last = rec.snapshots.borrow().last().cloned().unwrap();
        assert!(last.buffer.is_empty());
        assert!(last.candidates.is_empty());

        type_str(&mut ctl, "hao");
        ctl.process_key(KeyEvent::PanelSwitch(Panel::Keyboard));
        assert_eq!(host_text(&host), "你");
    }

    #[test]
    fn compose_box_receives_commits_and_resets_on_entry() {
        let (mut ctl, host) = controller();
        ctl.switch_to(Panel::SuperTalk);
        type_str(&mut ctl, "ni");
        ctl.process_key(KeyEvent::Space);
        assert_eq!(ctl.compose_box(Panel::SuperTalk).unwrap().content, "你");
        assert_eq!(host_text(&host), "");

        ctl.switch_to(Panel::Keyboard);
        ctl.switch_to(Panel::SuperTalk);
        assert_eq!(ctl.compose_box(Panel::SuperTalk).unwrap().content, "");
    }

    #[test]
    fn more_options_ignores_text_keys() {
        let (mut ctl, host) = controller();
        ctl.switch_to(Panel::MoreOptions);
        assert_eq!(ctl.process_key(KeyEvent::Char('a')), KeyResult::NotHandled);
        assert_eq!(ctl.process_key(KeyEvent::Space), KeyResult::NotHandled);
        assert_eq!(host_text(&host), "");
    }

    #[test]
    fn choose_layout_persists_and_returns_to_keyboard() {
        let store = MemoryPreferenceStore::new();
        let (mut ctl, _host) = controller_with(store.clone());
        ctl.switch_to(Panel::MoreOptions);
        ctl.choose_layout(KeyboardLayout::T9);
        assert_eq!(ctl.current(), Panel::Keyboard);
        assert_eq!(ctl.session().layout(), KeyboardLayout::T9);
        assert_eq!(store.load().unwrap().keyboard_layout, KeyboardLayout::T9);
    }

    #[test]
    fn stored_role_becomes_help_reply_persona() {
        let store = MemoryPreferenceStore::with_preferences(Preferences {
            current_role_id: Some("humor_boy".to_string()),
            ..Preferences::default()
        });
        let (ctl, _host) = controller_with(store);
        assert_eq!(ctl.persona(Panel::HelpReply), Some("humor_boy"));
        assert_eq!(ctl.persona(Panel::SuperTalk), Some(DEFAULT_IDENTITY));
    }

    #[test]
    fn generation_request_uses_compose_box_and_persona() {
        let (mut ctl, _host) = controller();
        assert!(ctl.begin_generation().is_none());

        ctl.switch_to(Panel::HelpReply);
        assert!(ctl.begin_generation().is_none());

        type_str(&mut ctl, "nihao");
        let (ticket, req) = ctl.begin_generation().unwrap();
        assert_eq!(ticket.panel(), Panel::HelpReply);
        assert!(!ctl.session().is_composing());
        assert_eq!(req.panel, Panel::HelpReply);
        assert_eq!(req.persona, DEFAULT_PERSONA);
        assert_eq!(req.count, 5);
        assert!(!req.text.is_empty());
    }

    #[test]
    fn results_delivered_to_panel_observer() {
        let (mut ctl, _host) = controller();
        let rec = Rc::new(Recorder::default());
        ctl.set_observer(Panel::SuperTalk, rec.clone());
        ctl.switch_to(Panel::SuperTalk);
        type_str(&mut ctl, "ni");

        let service = |req: &GenerationRequest| -> std::result::Result<Vec<String>, GenerationError> {
            Ok(vec![format!("{}~", req.text), "  ".to_string()])
        };
        assert!(ctl.generate_with(&service));
        assert_eq!(ctl.results(), ["你~".to_string()]);
        assert_eq!(*rec.results.borrow(), vec![vec!["你~".to_string()]]);
        assert!(!rec.snapshots.borrow().is_empty());
    }

    #[test]
    fn failed_generation_yields_empty_results() {
        let (mut ctl, _host) = controller();
        ctl.switch_to(Panel::HelpReply);
        type_str(&mut ctl, "hao");
        let (ticket, _) = ctl.begin_generation().unwrap();
        assert!(ctl.deliver(ticket, Err(GenerationError::Status(502))));
        assert!(ctl.results().is_empty());
        assert!(!ctl.is_generating());
    }

    #[test]
    fn stale_tickets_are_dropped() {
        let (mut ctl, _host) = controller();
        ctl.switch_to(Panel::HelpReply);
        type_str(&mut ctl, "hao");
        let (first, _) = ctl.begin_generation().unwrap();
        let (second, _) = ctl.begin_generation().unwrap();
        assert!(!ctl.deliver(first, Ok(vec!["旧".to_string()])));
        assert!(ctl.deliver(second, Ok(vec!["新".to_string()])));
        assert_eq!(ctl.results(), ["新".to_string()]);

        let (third, _) = ctl.begin_generation().unwrap();
        ctl.switch_to(Panel::Keyboard);
        ctl.switch_to(Panel::HelpReply);
        assert!(!ctl.deliver(third, Ok(vec!["迟".to_string()])));
        assert!(ctl.results().is_empty());
    }

    #[test]
    fn selecting_result_commits_to_host() {
        let (mut ctl, host) = controller();
        host.borrow_mut().insert("在吗");
        ctl.switch_to(Panel::HelpReply);
        type_str(&mut ctl, "hao");
        assert_eq!(
            ctl.process_key(KeyEvent::SelectPanelResult("晚安".to_string())),
            KeyResult::Handled
        );
        assert_eq!(ctl.current(), Panel::Keyboard);
        assert_eq!(host_text(&host), "在吗晚安");
        assert_eq!(ctl.compose_box(Panel::HelpReply).unwrap().content, "好");
    }

    #[test]
    fn selecting_result_outside_panels_is_ignored() {
        let (mut ctl, host) = controller();
        assert_eq!(
            ctl.process_key(KeyEvent::SelectPanelResult("晚安".to_string())),
            KeyResult::NotHandled
        );
        assert_eq!(host_text(&host), "");
    }

    #[test]
    fn suggestions_seed_results_on_entry() {
        let (mut ctl, host) = controller();
        let rec = Rc::new(Recorder::default());
        ctl.set_observer(Panel::HelpReply, rec.clone());
        ctl.set_suggestions(Panel::HelpReply, ["好的", "收到"]);
        ctl.set_suggestions(Panel::Keyboard, ["ignored"]);
        assert!(ctl.suggestions(Panel::Keyboard).is_empty());
        assert!(ctl.results().is_empty());

        ctl.switch_to(Panel::HelpReply);
        assert_eq!(ctl.results(), ["好的", "收到"]);
        assert_eq!(*rec.results.borrow(), vec![vec!["好的".to_string(), "收到".to_string()]]);

        let pick = ctl.results()[1].clone();
        ctl.process_key(KeyEvent::SelectPanelResult(pick));
        assert_eq!(host_text(&host), "收到");
        assert!(ctl.results().is_empty());
    }

    #[test]
    fn paste_replaces_compose_box() {
        let (mut ctl, _host) = controller();
        assert_eq!(ctl.paste("在吗"), KeyResult::NotHandled);

        ctl.switch_to(Panel::HelpReply);
        type_str(&mut ctl, "ni");
        ctl.process_key(KeyEvent::Space);
        type_str(&mut ctl, "hao");
        assert_eq!(ctl.paste("今晚有空吗"), KeyResult::Handled);
        assert!(!ctl.session().is_composing());

        let view = ctl.compose_box(Panel::HelpReply).unwrap();
        assert_eq!(view.content, "今晚有空吗");
        assert_eq!(view.cursor, 5);

        type_str(&mut ctl, "ni");
        ctl.process_key(KeyEvent::Space);
        assert_eq!(ctl.compose_box(Panel::HelpReply).unwrap().content, "今晚有空吗你");
    }

    #[test]
    fn panel_names_parse() {
        for p in Panel::ALL {
            assert_eq!(p.as_str().parse::<Panel>().unwrap(), p);
        }
        assert!("settings".parse::<Panel>().is_err());
    }
}
