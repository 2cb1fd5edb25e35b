// core/tests/session_flow.rs
//
// End-to-end flows through the panel controller: typing into the host,
// composing a draft in a panel, generating and sending a reply.

use lovekey_core::{
    AppendTarget, Config, GenerationError, GenerationRequest, KeyEvent, KeyResult,
    KeyboardLayout, Lexicon, LexiconBuilder, Panel, PanelController, PreferenceStore,
    Preferences, RedbPreferenceStore, SessionObserver, SessionSnapshot, StringDocument,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;
use std::time::{Duration, Instant};

type Host = Rc<RefCell<AppendTarget<StringDocument>>>;

fn lexicon() -> Arc<Lexicon> {
    let mut b = LexiconBuilder::new();
    b.extend("ni", ["你", "呢", "泥"]).unwrap();
    b.extend("hao", ["好", "号", "毫"]).unwrap();
    b.extend("wan", ["晚", "完", "玩"]).unwrap();
    b.extend("an", ["安", "按", "暗", "岸"]).unwrap();
    Arc::new(b.build().unwrap())
}

fn host() -> Host {
    Rc::new(RefCell::new(AppendTarget::new(StringDocument::new())))
}

fn host_text(host: &Host) -> String {
    host.borrow().document().text().to_string()
}

fn press(ctl: &mut PanelController, keys: &str) {
    for ch in keys.chars() {
        let ev = match ch {
            ' ' => KeyEvent::Space,
            '\n' => KeyEvent::Return,
            c => KeyEvent::Char(c),
        };
        ctl.process_key(ev);
    }
}

#[derive(Default)]
struct Log {
    snapshots: RefCell<Vec<SessionSnapshot>>,
    commits: RefCell<Vec<String>>,
}

impl SessionObserver for Log {
    fn state_changed(&self, snapshot: &SessionSnapshot) {
        self.snapshots.borrow_mut().push(snapshot.clone());
    }

    fn committed(&self, text: &str) {
        self.commits.borrow_mut().push(text.to_string());
    }
}

#[test]
fn typing_into_host() {
    let host = host();
    let mut ctl = PanelController::new(
        lexicon(),
        &Config::default(),
        host.clone(),
        Box::new(lovekey_core::MemoryPreferenceStore::new()),
    );
    let log = Rc::new(Log::default());
    ctl.set_observer(Panel::Keyboard, log.clone());

    press(&mut ctl, "ni hao,");
    assert_eq!(host_text(&host), "你好,");
    assert_eq!(*log.commits.borrow(), ["你", "好"]);
    // one snapshot per key
    assert_eq!(log.snapshots.borrow().len(), 7);

    ctl.process_key(KeyEvent::ModeSwitch);
    let t0 = Instant::now();
    ctl.process_key(KeyEvent::Shift(t0));
    ctl.process_key(KeyEvent::Shift(t0 + Duration::from_millis(50)));
    press(&mut ctl, "ok\n");
    assert_eq!(host_text(&host), "你好,OK\n");
}

#[test]
fn reply_flow_through_help_panel() {
    let host = host();
    let mut ctl = PanelController::new(
        lexicon(),
        &Config::default(),
        host.clone(),
        Box::new(lovekey_core::MemoryPreferenceStore::new()),
    );
    let panel_log = Rc::new(Log::default());
    ctl.set_observer(Panel::HelpReply, panel_log.clone());

    assert_eq!(
        ctl.process_key(KeyEvent::PanelSwitch(Panel::HelpReply)),
        KeyResult::Handled
    );
    press(&mut ctl, "wan an ");
    ctl.process_key(KeyEvent::CursorLeft);
    ctl.process_key(KeyEvent::CursorLeft);
    press(&mut ctl, "ni ");
    let draft = ctl.compose_box(Panel::HelpReply).unwrap();
    assert_eq!(draft.content, "你晚安");
    assert_eq!(draft.cursor, 1);
    assert_eq!(host_text(&host), "");

    let echo = |req: &GenerationRequest| -> Result<Vec<String>, GenerationError> {
        Ok((1..=req.count).map(|i| format!("{}{}", req.text, i)).collect())
    };
    assert!(ctl.generate_with(&echo));
    assert_eq!(ctl.results().len(), 5);
    assert_eq!(ctl.results()[0], "你晚安1");

    let pick = ctl.results()[2].clone();
    ctl.process_key(KeyEvent::SelectPanelResult(pick));
    assert_eq!(ctl.current(), Panel::Keyboard);
    assert_eq!(host_text(&host), "你晚安3");
}

#[test]
fn layout_choice_survives_reactivation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.redb");

    {
        let store = RedbPreferenceStore::open(&path).unwrap();
        let mut ctl = PanelController::new(lexicon(), &Config::default(), host(), Box::new(store));
        ctl.switch_to(Panel::MoreOptions);
        ctl.choose_layout(KeyboardLayout::Handwriting);
    }

    let store = RedbPreferenceStore::open(&path).unwrap();
    assert_eq!(
        store.load().unwrap(),
        Preferences {
            keyboard_layout: KeyboardLayout::Handwriting,
            ..Preferences::default()
        }
    );
    let ctl = PanelController::new(lexicon(), &Config::default(), host(), Box::new(store));
    assert_eq!(ctl.session().layout(), KeyboardLayout::Handwriting);
}
