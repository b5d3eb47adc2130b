mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Instant;

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};

use display::{button_at, draw_chrome, FinalScore, Layout, TerminalCanvas};
use road_shooter::audio::{MusicPlayer, TerminalAudio};
use road_shooter::input::{self, Command, Control};
use road_shooter::{GameConfig, GameController, GameEvent};

#[derive(Parser)]
#[command(name = "road-shooter")]
#[command(about = "Dodge and shoot the emoji traffic")]
struct Args {
    /// TOML file overriding the default tuning
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Background track (audio file path)
    #[arg(short, long)]
    track: Option<String>,
    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Do not ring the terminal bell on shots
    #[arg(long)]
    no_bell: bool,
}

/// Smallest terminal the play area is readable in.
const MIN_COLS: u16 = 60;
const MIN_ROWS: u16 = 20;

/// Frames a key stays "held" after its last press/repeat when the terminal
/// cannot report releases.  Longer than the usual OS repeat delay (~500 ms).
const HOLD_WINDOW: u64 = 36;

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Input model: terminals with keyboard enhancement send real releases.
/// Classic terminals only repeat presses, so a direction key that has been
/// silent for `HOLD_WINDOW` frames is treated as released.
fn game_loop<W: Write>(
    out: &mut W,
    controller: &mut GameController,
    rx: &mpsc::Receiver<Event>,
    keyboard_enhanced: bool,
) -> road_shooter::Result<()> {
    let period = controller.config().frame.period();
    let (width, height) = (controller.config().canvas.width, controller.config().canvas.height);

    let mut layout = Layout::current()?;
    // Maps each held direction key → the frame it was last seen.
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut notice: Option<FinalScore> = None;
    let mut mouse_steering = false;
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            match ev {
                Event::Key(KeyEvent { code, kind, modifiers, .. }) => {
                    if kind == KeyEventKind::Press
                        && code == KeyCode::Char('c')
                        && modifiers.contains(KeyModifiers::CONTROL)
                    {
                        return Ok(());
                    }
                    // Game-over notice blocks until dismissed.
                    if notice.is_some() {
                        if kind == KeyEventKind::Press {
                            notice = None;
                        }
                        continue;
                    }
                    match kind {
                        KeyEventKind::Press => {
                            if let Some(cmd) = input::command_for(&code) {
                                match cmd {
                                    Command::Start => controller.start()?,
                                    Command::Pause => {
                                        controller.pause();
                                    }
                                    Command::Resume => {
                                        controller.resume()?;
                                    }
                                    Command::Reset => controller.reset(),
                                    Command::Quit => return Ok(()),
                                }
                            } else if let Some(control) = input::key_down(&code) {
                                if input::direction_for(&code).is_some() {
                                    key_frame.insert(code, frame);
                                }
                                controller.control(control);
                            }
                        }
                        // Repeat: refresh timestamp so key stays "held"
                        KeyEventKind::Repeat => {
                            if key_frame.contains_key(&code) {
                                key_frame.insert(code, frame);
                            }
                        }
                        KeyEventKind::Release => {
                            key_frame.remove(&code);
                            if let Some(control) = input::key_up(&code) {
                                controller.control(control);
                            }
                        }
                    }
                }
                Event::Mouse(MouseEvent { kind, column, row, .. }) if notice.is_none() => {
                    match kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            if let Some(control) = button_at(&layout, column, row) {
                                mouse_steering = matches!(control, Control::Press(_));
                                controller.control(control);
                            }
                        }
                        MouseEventKind::Up(MouseButton::Left) if mouse_steering => {
                            mouse_steering = false;
                            controller.control(Control::ReleaseAll);
                        }
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    layout = Layout { cols, rows };
                    warn_if_small(&layout);
                }
                _ => {}
            }
        }

        // ── Synthesize releases for silent keys ───────────────────────────────
        if !keyboard_enhanced {
            let expired: Vec<KeyCode> = key_frame
                .iter()
                .filter(|&(_, &seen)| frame.saturating_sub(seen) > HOLD_WINDOW)
                .map(|(code, _)| code.clone())
                .collect();
            for code in expired {
                key_frame.remove(&code);
                if let Some(control) = input::key_up(&code) {
                    controller.control(control);
                }
            }
        }

        // ── Advance and draw ──────────────────────────────────────────────────
        let now = Instant::now();
        let dt = now - last;
        last = now;

        let events = {
            let mut canvas = TerminalCanvas::new(out, layout, width, height);
            controller.frame(dt, &mut canvas)?
        };
        for event in events {
            if let GameEvent::GameOver { points, level, time_elapsed } = event {
                key_frame.clear();
                notice = Some(FinalScore { points, level, time_elapsed });
            }
        }

        draw_chrome(
            out,
            &layout,
            controller.state(),
            controller.shoot_button_ready(),
            notice.as_ref(),
        )?;

        let elapsed = frame_start.elapsed();
        if elapsed < period {
            thread::sleep(period - elapsed);
        }
    }
}

fn warn_if_small(layout: &Layout) {
    if layout.cols < MIN_COLS || layout.rows < MIN_ROWS {
        log::warn!(
            "Terminal is {}x{}; at least {}x{} is recommended",
            layout.cols,
            layout.rows,
            MIN_COLS,
            MIN_ROWS
        );
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> road_shooter::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let mut config = GameConfig::load_or_default(args.config.as_deref())?;
    if args.track.is_some() {
        config.audio.track = args.track;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if args.no_bell {
        config.audio.bell = false;
    }
    config.validate()?;

    let mut audio = TerminalAudio::new(stdout(), config.audio.bell);
    if config.audio.track.is_some() {
        match MusicPlayer::open_default() {
            Ok(music) => audio = audio.with_music(music),
            Err(e) => log::warn!("No audio output, playing without music: {e}"),
        }
    }
    let mut controller = GameController::new(config, Box::new(audio))?;

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;
    if let Err(e) = out.execute(EnableMouseCapture) {
        log::warn!("Mouse capture unavailable, on-screen buttons disabled: {e}");
    }

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = match terminal::supports_keyboard_enhancement() {
        Ok(true) => out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .map_err(|e| log::warn!("Keyboard enhancement refused: {e}"))
            .is_ok(),
        Ok(false) => {
            log::info!("Terminal does not report key releases; using hold window");
            false
        }
        Err(e) => {
            log::warn!("Keyboard enhancement query failed: {e}");
            false
        }
    };
    if let Ok(layout) = Layout::current() {
        warn_if_small(&layout);
    }

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

    let result = game_loop(&mut out, &mut controller, &rx, keyboard_enhanced);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(DisableMouseCapture);
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        log::error!("{e}");
    }
    result
}
