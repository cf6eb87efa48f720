use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use invaders_term::config::{FormationPolicy, GameConfig};
use invaders_term::display;
use invaders_term::scores::{self, HighScores};
use invaders_term::session::{Command, Flow, HeldKeys, Session};

// ── Simultaneous-input constants ──────────────────────────────────────────────

/// Min frames between shots while Space is held.
/// 15 frames @ 60 FPS = 4 shots/sec (keeps the bullet cap meaningful).
const SHOOT_COOLDOWN: u32 = 15;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 8 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 8;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormationArg {
    Synchronized,
    Independent,
}

impl From<FormationArg> for FormationPolicy {
    fn from(arg: FormationArg) -> Self {
        match arg {
            FormationArg::Synchronized => FormationPolicy::Synchronized,
            FormationArg::Independent => FormationPolicy::Independent,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "invaders_term", about = "Space Invaders in the terminal")]
struct Cli {
    /// JSON file overriding the default game constants.
    #[arg(long)]
    config: Option<PathBuf>,
    /// High-score file (defaults to ~/.invaders_term_scores.json).
    #[arg(long)]
    scores: Option<PathBuf>,
    /// Name recorded next to your scores.
    #[arg(long)]
    name: Option<String>,
    /// How the enemy formation turns at the field edges.
    #[arg(long, value_enum)]
    formation: Option<FormationArg>,
    /// Seed for enemy fire timing; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Write logs here (filter via RUST_LOG, default "info").
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn init_logging(path: Option<&Path>) -> Result<()> {
    // stderr would scribble over the alternate screen, so no file, no logger
    let Some(path) = path else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("installing logger")?;
    Ok(())
}

fn build_config(cli: &Cli) -> Result<GameConfig> {
    let mut config = match &cli.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(formation) = cli.formation {
        config.formation_policy = formation.into();
    }
    config.validate()?;
    Ok(config)
}

// ── Frame loop ────────────────────────────────────────────────────────────────

/// Maps a key press to a session command, if it is one.
fn command_for(code: KeyCode, modifiers: KeyModifiers) -> Option<Command> {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Enter => Some(Command::Confirm),
        KeyCode::Char('h') | KeyCode::Char('H') => Some(Command::ShowHighScores),
        KeyCode::Char('b') | KeyCode::Char('B') => Some(Command::Back),
        _ => None,
    }
}

/// Runs until the player quits.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and hand them to the session together, so
/// Space + ←/→ can be held at the same time.  Terminals with keyboard
/// enhancement also send `Release`, which drops the key at once.
fn run<W: Write>(
    out: &mut W,
    session: &mut Session,
    rng: &mut StdRng,
    rx: &mpsc::Receiver<Event>,
) -> Result<()> {
    let frame_time = Duration::from_micros(1_000_000 / session.game.config.tick_rate as u64);
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut shoot_cooldown: u32 = 0;
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    key_frame.insert(code.clone(), frame);
                    if let Some(command) = command_for(code, modifiers) {
                        if session.handle(command, rng) == Flow::Quit {
                            return Ok(());
                        }
                    }
                }
                KeyEventKind::Repeat => {
                    key_frame.insert(code.clone(), frame);
                }
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Held keys → one simulation step ───────────────────────────────────
        let mut keys = HeldKeys {
            left: is_held(&key_frame, &KeyCode::Left, frame)
                || is_held(&key_frame, &KeyCode::Char('a'), frame)
                || is_held(&key_frame, &KeyCode::Char('A'), frame),
            right: is_held(&key_frame, &KeyCode::Right, frame)
                || is_held(&key_frame, &KeyCode::Char('d'), frame)
                || is_held(&key_frame, &KeyCode::Char('D'), frame),
            fire: false,
        };
        if shoot_cooldown == 0 && is_held(&key_frame, &KeyCode::Char(' '), frame) {
            keys.fire = true;
            shoot_cooldown = SHOOT_COOLDOWN;
        }
        shoot_cooldown = shoot_cooldown.saturating_sub(1);

        session.update(keys, rng);
        display::render(out, session)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame_time {
            thread::sleep(frame_time - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref())?;
    let config = build_config(&cli)?;

    let scores_path = cli.scores.clone().unwrap_or_else(scores::default_path);
    let high_scores = HighScores::load(&scores_path);
    let name = cli
        .name
        .clone()
        .or_else(|| std::env::var("USER").ok())
        .unwrap_or_else(|| "PLAYER".to_string());
    let mut rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let mut session = Session::new(config, high_scores, name, &mut rng);
    info!("starting, high scores at {}", scores_path.display());

    let mut out = BufWriter::new(stdout());
    terminal::enable_raw_mode().context("enabling raw mode")?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = run(&mut out, &mut session, &mut rng, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!("exiting");
    result
}
