mod display;

use std::collections::HashMap;
use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal, ExecutableCommand, QueueableCommand,
};
use rand::thread_rng;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use animal_platformer::compute::{ability_for, attack, jump, tick, use_ability, Ability};
use animal_platformer::config::{
    default_levels, load_levels, resolve_asset_paths, AssetPaths, LevelDef, Roster,
    LOG_FILE_NAME,
};
use animal_platformer::controls::{self, button_at, TouchState};
use animal_platformer::entities::{AnimalKind, GameState, GameStatus, Input};
use animal_platformer::level::{acknowledge, new_game, start_game};
use animal_platformer::sprites::SpriteBank;

const FRAME: Duration = Duration::from_millis(33); // ≈30 FPS

/// Physics runs at twice the frame rate; gravity and speeds are per step.
const STEPS_PER_FRAME: u32 = 2;
const STEP_MS: u64 = 16;

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames. Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (≈133 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

fn any_held(key_frame: &HashMap<KeyCode, u64>, keys: &[KeyCode], frame: u64) -> bool {
    keys.iter().any(|key| is_held(key_frame, key, frame))
}

// ── Startup ───────────────────────────────────────────────────────────────────

/// Logs go to a file: the terminal is in raw mode while the game runs.
fn init_tracing(paths: &AssetPaths) {
    let Ok(file) = File::create(paths.root.join(LOG_FILE_NAME)) else {
        return;
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .compact()
        .init();
}

fn load_roster(paths: &AssetPaths) -> Roster {
    match Roster::load(&paths.characters) {
        Ok(roster) => roster,
        Err(err) => {
            warn!(error = %err, "roster_fallback_builtin");
            Roster::default()
        }
    }
}

fn load_level_set(paths: &AssetPaths) -> Vec<LevelDef> {
    if !paths.levels.exists() {
        debug!(path = %paths.levels.display(), "levels_file_absent_using_builtin");
        return default_levels();
    }
    match load_levels(&paths.levels) {
        Ok(levels) => {
            info!(count = levels.len(), "levels_loaded");
            levels
        }
        Err(err) => {
            warn!(error = %err, "levels_fallback_builtin");
            default_levels()
        }
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(AnimalKind),
    Quit,
}

fn describe(ability: Ability) -> &'static str {
    match ability {
        Ability::Leap { .. } => "huge leap",
        Ability::Dash { .. } => "damaging dash",
        Ability::Glide { .. } => "glide",
        Ability::Slide { .. } => "slide forward",
        Ability::Stomp { .. } => "area stomp",
    }
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    state: &GameState,
) -> std::io::Result<MenuResult> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    let (width, height) = terminal::size()?;
    let cx = width / 2;
    let cy = height / 2;

    let title = "★  ANIMAL  PLATFORMER  ★";
    out.queue(cursor::MoveTo(
        cx.saturating_sub(title.chars().count() as u16 / 2),
        cy.saturating_sub(6),
    ))?;
    out.queue(style::SetForegroundColor(Color::Cyan))?;
    out.queue(Print(title))?;

    out.queue(cursor::MoveTo(cx.saturating_sub(18), cy.saturating_sub(4)))?;
    out.queue(style::SetForegroundColor(Color::White))?;
    out.queue(Print("Choose your animal:"))?;

    for (i, kind) in AnimalKind::ALL.iter().enumerate() {
        let stats = state.roster.stats(*kind);
        let row = cy.saturating_sub(2) + i as u16;
        out.queue(cursor::MoveTo(cx.saturating_sub(18), row))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!("[{}] ", i + 1)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(format!("{:<9}", kind.name().to_uppercase())))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print(format!(
            " {} ({:.1}s)",
            describe(ability_for(*kind)),
            stats.ability_cooldown as f32 / 1000.0
        )))?;
    }

    out.queue(cursor::MoveTo(cx.saturating_sub(18), cy + 4))?;
    out.queue(style::SetForegroundColor(Color::DarkGrey))?;
    out.queue(Print(format!(
        "{} levels   ENTER : {}   Q : Quit",
        state.levels.len(),
        AnimalKind::ALL[0].name()
    )))?;

    out.queue(style::ResetColor)?;
    out.flush()?;

    // Block until the user makes a choice
    loop {
        let Ok(event) = rx.recv() else {
            return Ok(MenuResult::Quit);
        };
        if let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        {
            match code {
                KeyCode::Char(c @ '1'..='5') => {
                    let index = c as usize - '1' as usize;
                    return Ok(MenuResult::Start(AnimalKind::ALL[index]));
                }
                KeyCode::Enter => return Ok(MenuResult::Start(AnimalKind::ALL[0])),
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    return Ok(MenuResult::Quit);
                }
                _ => {}
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program, `false` → back to menu.
///
/// Held keys (left/right) are tracked in `key_frame` by the frame they were
/// last seen; one-shot actions (jump, attack, ability, acknowledge) fire on
/// the press event itself. Clicks on the control strip feed the same actions;
/// a click anywhere else acknowledges message screens.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut GameState,
    rx: &mpsc::Receiver<Event>,
    sprites: &SpriteBank,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut touch = TouchState::default();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            match event {
                Event::Key(KeyEvent {
                    code,
                    kind,
                    modifiers,
                    ..
                }) => match kind {
                    KeyEventKind::Press => {
                        key_frame.insert(code, frame);
                        match code {
                            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                                return Ok(true);
                            }
                            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                                return Ok(true);
                            }
                            KeyCode::Up | KeyCode::Char('w') | KeyCode::Char('W') => {
                                *state = jump(state);
                            }
                            KeyCode::Char(' ') => *state = attack(state),
                            KeyCode::Char('e') | KeyCode::Char('E') => {
                                *state = use_ability(state);
                            }
                            KeyCode::Enter => *state = acknowledge(state),
                            _ => {}
                        }
                    }
                    // Repeat: refresh timestamp so key stays "held"
                    KeyEventKind::Repeat => {
                        key_frame.insert(code, frame);
                    }
                    // Release: remove key immediately (keyboard-enhancement path)
                    KeyEventKind::Release => {
                        key_frame.remove(&code);
                    }
                },
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(_),
                    column,
                    row,
                    ..
                }) => {
                    let button = if row == display::touch_row(state) {
                        button_at(display::TOUCH_LEFT, column)
                    } else {
                        None
                    };
                    match button {
                        Some(button) => {
                            touch.press(button);
                            *state = controls::press(state, button);
                        }
                        None => *state = acknowledge(state),
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Up(_),
                    ..
                }) => touch.release(),
                _ => {}
            }
        }

        if state.status == GameStatus::Menu {
            return Ok(false);
        }

        let keys = Input {
            left: any_held(
                &key_frame,
                &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')],
                frame,
            ),
            right: any_held(
                &key_frame,
                &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')],
                frame,
            ),
        };
        let input = touch.merge(keys);
        for _ in 0..STEPS_PER_FRAME {
            *state = tick(state, input, STEP_MS, &mut rng);
        }

        let (width, height) = terminal::size()?;
        display::render(out, state, sprites, width, height)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let paths = resolve_asset_paths();
    init_tracing(&paths);
    info!(root = %paths.root.display(), "=== Animal Platformer startup ===");

    let roster = load_roster(&paths);
    let levels = load_level_set(&paths);
    let sprites = SpriteBank::load(&paths.sprites, &roster);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    out.execute(EnableMouseCapture)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
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

    let result = run(&mut out, &rx, levels, roster, &sprites);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(err) = &result {
        error!(error = %err, "terminal_io_failed");
    }
    info!("shutdown");
    result
}

fn run<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    levels: Vec<LevelDef>,
    roster: Roster,
    sprites: &SpriteBank,
) -> std::io::Result<()> {
    let mut state = new_game(levels, roster);

    loop {
        match show_menu(out, rx, &state)? {
            MenuResult::Quit => break,
            MenuResult::Start(kind) => {
                state = start_game(&state, kind);
                if game_loop(out, &mut state, rx, sprites)? {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
