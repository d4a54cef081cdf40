use std::fs::OpenOptions;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::thread_rng;
use tracing_subscriber::EnvFilter;

use retro_arcade::config::{ArcadeConfig, LogConfig};
use retro_arcade::display::{self, ScoreNotice, TerminalSurface};
use retro_arcade::driver::{DriverExit, FrameDriver};
use retro_arcade::entities::{GameKind, Terminal};
use retro_arcade::input::InputListener;
use retro_arcade::scores::{
    record_final_score, GameScore, HttpScoreClient, MemScoreStore, ScoreRecorder,
};
use retro_arcade::session::Session;

const MAX_NAME_LEN: usize = 24;

#[derive(Debug, Parser)]
#[command(name = "retro_arcade", about = "Snake and Space Invaders in your terminal")]
struct Args {
    /// TOML config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Player name used for the high-score table.
    #[arg(long)]
    name: Option<String>,

    /// Skip the menu and start this game (snake | spaceinvaders).
    #[arg(long)]
    game: Option<GameKind>,

    /// Base URL of the score API, e.g. http://localhost:5000.
    #[arg(long)]
    score_api: Option<String>,
}

fn init_logging(log: &LogConfig) -> anyhow::Result<()> {
    let path = log.file_path();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .init();
    Ok(())
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(GameKind),
    EditName,
    Quit,
}

/// Next key press; release/repeat events and non-key events are skipped.
fn next_press(rx: &mpsc::Receiver<Event>) -> Option<KeyEvent> {
    loop {
        match rx.recv() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => return Some(key),
            Ok(_) => continue,
            Err(_) => return None,
        }
    }
}

fn is_quit(key: &KeyEvent) -> bool {
    matches!(key.code, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc)
        || (key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL))
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    player_name: &str,
) -> std::io::Result<MenuResult> {
    display::render_menu(out, player_name)?;

    // Block until the user makes a choice
    while let Some(key) = next_press(rx) {
        match key.code {
            KeyCode::Char('1') => return Ok(MenuResult::Start(GameKind::Snake)),
            KeyCode::Char('2') => return Ok(MenuResult::Start(GameKind::SpaceInvaders)),
            KeyCode::Char('n') | KeyCode::Char('N') => return Ok(MenuResult::EditName),
            _ if is_quit(&key) => return Ok(MenuResult::Quit),
            _ => {}
        }
    }
    Ok(MenuResult::Quit)
}

/// Returns the new name, or `None` when the prompt was cancelled.
fn prompt_name<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    current: &str,
) -> std::io::Result<Option<String>> {
    let mut buffer = current.to_string();
    loop {
        display::render_name_prompt(out, &buffer)?;
        let Some(key) = next_press(rx) else {
            return Ok(None);
        };
        match key.code {
            KeyCode::Enter => return Ok(Some(buffer.trim().to_string())),
            KeyCode::Esc => return Ok(None),
            KeyCode::Backspace => {
                buffer.pop();
            }
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                return Ok(None);
            }
            KeyCode::Char(c) if !c.is_control() && buffer.chars().count() < MAX_NAME_LEN => {
                buffer.push(c);
            }
            _ => {}
        }
    }
}

/// Returns `true` → quit program,  `false` → back to menu.
fn show_game_over<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    game: GameKind,
    ending: &Terminal,
    notice: &ScoreNotice,
    leaderboard: &[GameScore],
) -> std::io::Result<bool> {
    display::render_game_over(out, game, ending, notice, leaderboard)?;
    while let Some(key) = next_press(rx) {
        match key.code {
            KeyCode::Char('r') | KeyCode::Char('R') | KeyCode::Enter => return Ok(false),
            _ if is_quit(&key) => return Ok(true),
            _ => {}
        }
    }
    Ok(true)
}

// ── Score handoff ─────────────────────────────────────────────────────────────

fn report_score(
    recorder: &dyn ScoreRecorder,
    player_name: &str,
    game: GameKind,
    ending: &Terminal,
    limit: usize,
) -> (ScoreNotice, Vec<GameScore>) {
    let notice = match record_final_score(recorder, player_name, game, ending) {
        Ok(Some(_)) => ScoreNotice::Saved,
        Ok(None) => ScoreNotice::Discarded,
        Err(e) => {
            tracing::warn!(game = %game, "failed to save score: {e}");
            ScoreNotice::Failed
        }
    };
    let leaderboard = recorder
        .list_top_scores(game.as_str(), limit)
        .unwrap_or_else(|e| {
            tracing::warn!(game = %game, "failed to fetch high scores: {e}");
            Vec::new()
        });
    (notice, leaderboard)
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = ArcadeConfig::load(args.config.as_deref())?;
    config.apply_env();
    if let Some(name) = args.name {
        config.player_name = Some(name);
    }
    if let Some(url) = args.score_api {
        config.scores.api_url = Some(url);
    }
    config.validate()?;
    init_logging(&config.log)?;

    let recorder: Box<dyn ScoreRecorder> = match &config.scores.api_url {
        Some(url) => {
            tracing::info!(url = %url, "recording scores through the score api");
            Box::new(HttpScoreClient::new(url.as_str()))
        }
        None => {
            tracing::info!("no score api configured, keeping scores in memory");
            Box::new(MemScoreStore::new())
        }
    };

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the frame loop never has to block on I/O.
    let (tx, mut rx) = mpsc::channel::<Event>();
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

    let result = run(&mut out, &mut rx, &config, recorder.as_ref(), args.game);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        tracing::error!("arcade exited with an error: {e:#}");
    }
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mut mpsc::Receiver<Event>,
    config: &ArcadeConfig,
    recorder: &dyn ScoreRecorder,
    mut preselected: Option<GameKind>,
) -> anyhow::Result<()> {
    let mut player_name = config.player_name().to_string();
    let mut driver = FrameDriver::new(Duration::ZERO);
    let mut rng = thread_rng();

    loop {
        let game = match preselected.take() {
            Some(game) => game,
            None => match show_menu(out, rx, &player_name)? {
                MenuResult::Start(game) => game,
                MenuResult::EditName => {
                    if let Some(name) = prompt_name(out, rx, &player_name)? {
                        player_name = name;
                    }
                    continue;
                }
                MenuResult::Quit => break,
            },
        };

        let mut session = match game {
            GameKind::Snake => Session::snake(
                config.snake_playfield(),
                config.snake_rules(),
                player_name.as_str(),
                &mut rng,
            ),
            GameKind::SpaceInvaders => {
                Session::invaders(config.invaders_playfield(), player_name.as_str())
            }
        };
        let frame_interval = config.frame_interval(game);
        let mut listener =
            InputListener::new(config.fire_mode()).with_frame_interval(frame_interval);
        driver.set_frame_interval(frame_interval);

        // Drop whatever was typed in the menu (e.g. the release of `1`).
        while rx.try_recv().is_ok() {}

        tracing::info!(game = %game, player = %player_name, "session started");
        let token = driver.start();
        let exit = {
            let mut surface = TerminalSurface::new(out, &session);
            driver
                .run(token, &mut session, &mut listener, rx, &mut surface, &mut rng)
                .context("frame loop failed")?
        };

        match exit {
            DriverExit::Quit => break,
            DriverExit::Stopped => {
                tracing::info!(game = %game, score = session.score(), "session stopped");
            }
            DriverExit::Terminal(ending) => {
                let (notice, leaderboard) =
                    report_score(recorder, &player_name, game, &ending, config.scores.limit);
                if show_game_over(out, rx, game, &ending, &notice, &leaderboard)? {
                    break;
                }
            }
        }
    }

    driver.stop();
    Ok(())
}
