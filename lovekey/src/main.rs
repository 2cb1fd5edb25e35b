//! Interactive keyboard simulator.
//!
//! Each input line is either a command (starting with `:`) or a run of keys.
//! Letters compose pinyin, space commits, other characters pass through.
//!
//! Run with: cargo run -p lovekey -- --prefs /tmp/lovekey.redb

use std::cell::RefCell;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::rc::Rc;
use std::time::Instant;

use anyhow::{bail, Context};
use clap::Parser;
use lovekey::personas::{self, RoleKind};
use lovekey::{
    generation_service, open_controller, AppendTarget, InputMode, KeyEvent, KeyResult,
    KeyboardConfig, KeyboardLayout, Panel, PanelController, SessionObserver, SessionSnapshot,
    StringDocument,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "lovekey", about = "Drive the lovekey input session from a terminal")]
struct Args {
    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Redb preference file (overrides the config)
    #[arg(long)]
    prefs: Option<PathBuf>,

    /// Directory with a compiled lexicon (overrides the config)
    #[arg(long)]
    lexicon_dir: Option<PathBuf>,

    /// Reply generation service base URL (overrides the config)
    #[arg(long)]
    endpoint: Option<String>,
}

/// Prints candidate bar and panel updates.
struct Printer;

impl SessionObserver for Printer {
    fn state_changed(&self, snapshot: &SessionSnapshot) {
        if snapshot.is_composing() {
            let bar: Vec<String> = snapshot
                .candidates
                .iter()
                .enumerate()
                .map(|(i, w)| format!("{}.{}", i + 1, w))
                .collect();
            println!("  [{}] {}", snapshot.buffer, bar.join(" "));
        }
        if let Some(view) = &snapshot.target_view {
            let (before, after): (String, String) = {
                let chars: Vec<char> = view.content.chars().collect();
                (
                    chars[..view.cursor].iter().collect(),
                    chars[view.cursor..].iter().collect(),
                )
            };
            println!("  panel: {}|{}", before, after);
        }
    }

    fn committed(&self, text: &str) {
        println!("  ✓ {}", text);
    }

    fn results_ready(&self, results: &[String]) {
        if results.is_empty() {
            println!("  (no results)");
        }
        for (i, r) in results.iter().enumerate() {
            println!("  {}) {}", i + 1, r);
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lovekey=info")),
        )
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<KeyboardConfig> {
    let mut config = match &args.config {
        Some(path) => KeyboardConfig::load_toml(path)
            .with_context(|| format!("reading config {}", path.display()))?,
        None => KeyboardConfig::default(),
    };
    if args.prefs.is_some() {
        config.prefs_path = args.prefs.clone();
    }
    if args.lexicon_dir.is_some() {
        config.lexicon_dir = args.lexicon_dir.clone();
    }
    if args.endpoint.is_some() {
        config.endpoint = args.endpoint.clone();
    }
    Ok(config)
}

fn print_help() {
    println!("Keys: a-z compose, space commits, anything else passes through.");
    println!("Commands:");
    println!("  :panel <keyboard|help_reply|super_talk|more_options>");
    println!("  :select <n>    pick candidate n");
    println!("  :gen           generate from the panel's compose box");
    println!("  :pick <n>      send generated result n to the host");
    println!("  :persona <id>  set persona/identity for the current panel");
    println!("  :paste <text>  replace the panel's compose box");
    println!("  :layout <qwerty|t9|handwriting|symbol|number>");
    println!("  :mode :shift :del :enter :left :right");
    println!("  :roles :show :help :quit");
}

fn print_roles() {
    println!("Help-reply roles:");
    for role in personas::roles(RoleKind::HelpReply, None) {
        println!("  [{}] {}", role.category.label(), role);
    }
    println!("Super-talk identities:");
    for (id, name) in personas::IDENTITIES {
        println!("  {} ({})", name, id);
    }
}

fn nth_arg(arg: Option<&str>) -> anyhow::Result<usize> {
    let n: usize = arg
        .context("missing number")?
        .parse()
        .context("not a number")?;
    if n == 0 {
        bail!("numbers start at 1");
    }
    Ok(n - 1)
}

/// Returns false when the user asked to quit.
fn run_command(
    ctl: &mut PanelController,
    service: &dyn lovekey::GenerationService,
    line: &str,
) -> anyhow::Result<bool> {
    let mut parts = line.split_whitespace();
    let cmd = parts.next().unwrap_or_default();
    let arg = parts.next();

    let key = match cmd {
        ":quit" | ":q" => return Ok(false),
        ":help" => {
            print_help();
            return Ok(true);
        }
        ":roles" => {
            print_roles();
            return Ok(true);
        }
        ":show" => {
            let s = ctl.session();
            let mode = match s.mode() {
                InputMode::Chinese => "中",
                InputMode::Latin => "EN",
            };
            println!(
                "  panel={} mode={} shift={:?} layout={} persona={}",
                ctl.current(),
                mode,
                s.shift(),
                s.layout(),
                ctl.persona(ctl.current()).unwrap_or("-")
            );
            return Ok(true);
        }
        ":gen" => {
            if !ctl.generate_with(service) {
                println!("  nothing to generate from");
            }
            return Ok(true);
        }
        ":persona" => {
            let id = arg.context("missing persona id")?;
            if personas::find_role(id).is_none() && personas::identity_name(id).is_none() {
                println!("  unknown persona {}, using it anyway", id);
            }
            ctl.set_persona(ctl.current(), id);
            return Ok(true);
        }
        ":paste" => {
            let text = line[cmd.len()..].trim();
            if ctl.paste(text) == KeyResult::NotHandled {
                println!("  nothing to paste into");
            }
            return Ok(true);
        }
        ":layout" => {
            let layout: KeyboardLayout = arg.context("missing layout")?.parse()?;
            ctl.choose_layout(layout);
            return Ok(true);
        }
        ":panel" => KeyEvent::PanelSwitch(arg.context("missing panel")?.parse::<Panel>()?),
        ":select" => {
            let idx = nth_arg(arg)?;
            let word = ctl
                .session()
                .candidates()
                .get(idx)
                .context("no such candidate")?
                .to_string();
            KeyEvent::SelectCandidate(word)
        }
        ":pick" => {
            let idx = nth_arg(arg)?;
            let text = ctl.results().get(idx).context("no such result")?.clone();
            KeyEvent::SelectPanelResult(text)
        }
        ":mode" => KeyEvent::ModeSwitch,
        ":shift" => KeyEvent::Shift(Instant::now()),
        ":del" => KeyEvent::Delete,
        ":enter" => KeyEvent::Return,
        ":left" => KeyEvent::CursorLeft,
        ":right" => KeyEvent::CursorRight,
        other => bail!("unknown command {}", other),
    };

    if ctl.process_key(key) == KeyResult::NotHandled {
        println!("  (ignored)");
    }
    Ok(true)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();
    let config = load_config(&args)?;

    let host = Rc::new(RefCell::new(AppendTarget::new(StringDocument::new())));
    let mut ctl = open_controller(&config, host.clone()).context("activating keyboard")?;
    let printer = Rc::new(Printer);
    for panel in Panel::ALL {
        ctl.set_observer(panel, printer.clone());
    }
    let service = generation_service(&config);

    println!("lovekey - type pinyin, :help for commands");
    let stdin = io::stdin();
    loop {
        print!("{}> ", ctl.current());
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim_end_matches(['\n', '\r']);

        if line.starts_with(':') {
            match run_command(&mut ctl, service.as_ref(), line) {
                Ok(true) => {}
                Ok(false) => break,
                Err(e) => println!("  error: {:#}", e),
            }
        } else {
            for ch in line.chars() {
                let key = if ch == ' ' { KeyEvent::Space } else { KeyEvent::Char(ch) };
                ctl.process_key(key);
            }
        }
        println!("  host: {}", host.borrow().document().text());
    }

    Ok(())
}
