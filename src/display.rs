//! Rendering layer. All terminal I/O lives here.
//!
//! The scene itself arrives through the `Canvas` impl, in canvas pixels that
//! are scaled onto the bordered play area.  Everything around it (HUD,
//! on-screen buttons, overlays) is drawn straight from the game state.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use road_shooter::entities::{GameState, GameStatus};
use road_shooter::input::{Control, Direction};
use road_shooter::render::{Canvas, Sprite};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_HUD: Color = Color::Yellow;
const C_HUD_STATUS: Color = Color::Cyan;
const C_PLAYER: Color = Color::White;
const C_WHEELS: Color = Color::DarkGrey;
const C_BULLET: Color = Color::Yellow;
const C_BUTTON: Color = Color::Green;
const C_BUTTON_COOLING: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;

// ── Layout ────────────────────────────────────────────────────────────────────

/// Terminal geometry.  Row 0 is the HUD, rows 1 and `rows-2` are the border,
/// the last row holds the on-screen controls.
#[derive(Clone, Copy, Debug)]
pub struct Layout {
    pub cols: u16,
    pub rows: u16,
}

impl Layout {
    pub fn current() -> std::io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self { cols, rows })
    }

    fn inner_width(&self) -> u16 {
        self.cols.saturating_sub(2)
    }

    fn inner_height(&self) -> u16 {
        self.rows.saturating_sub(4)
    }

    fn controls_row(&self) -> u16 {
        self.rows.saturating_sub(1)
    }
}

/// On-screen buttons, left to right on the controls row: label and control.
const BUTTONS: &[(&str, Control)] = &[
    ("[ ▲ ]", Control::Press(Direction::Up)),
    ("[ ▼ ]", Control::Press(Direction::Down)),
    ("[ ◀ ]", Control::Press(Direction::Left)),
    ("[ ▶ ]", Control::Press(Direction::Right)),
    ("[ FIRE ]", Control::ShootButton),
];

const BUTTON_GAP: u16 = 1;

/// Which on-screen button, if any, sits under a mouse click.
pub fn button_at(layout: &Layout, col: u16, row: u16) -> Option<Control> {
    if row != layout.controls_row() {
        return None;
    }
    let mut x = 1;
    for (label, control) in BUTTONS {
        let w = label.chars().count() as u16;
        if col >= x && col < x + w {
            return Some(*control);
        }
        x += w + BUTTON_GAP;
    }
    None
}

// ── Canvas ────────────────────────────────────────────────────────────────────

/// Maps canvas pixels onto the bordered play area.
pub struct TerminalCanvas<'a, W: Write> {
    out: &'a mut W,
    layout: Layout,
    width: f32,
    height: f32,
}

impl<'a, W: Write> TerminalCanvas<'a, W> {
    pub fn new(out: &'a mut W, layout: Layout, width: f32, height: f32) -> Self {
        Self {
            out,
            layout,
            width,
            height,
        }
    }

    fn col(&self, x: f32) -> f32 {
        1.0 + x / self.width * f32::from(self.layout.inner_width())
    }

    fn row(&self, y: f32) -> f32 {
        2.0 + y / self.height * f32::from(self.layout.inner_height())
    }

    /// Cell for a canvas point, or None outside the play area.
    fn cell(&self, x: f32, y: f32) -> Option<(u16, u16)> {
        if x < 0.0 || y < 0.0 || x >= self.width || y >= self.height {
            return None;
        }
        Some((self.col(x) as u16, self.row(y) as u16))
    }

    fn draw_border(&mut self) -> std::io::Result<()> {
        let w = self.layout.cols as usize;
        let h = self.layout.rows;

        self.out.queue(style::SetForegroundColor(C_BORDER))?;

        // Row 1: top bar
        self.out.queue(cursor::MoveTo(0, 1))?;
        self.out
            .queue(Print(format!("┌{}┐", "─".repeat(w.saturating_sub(2)))))?;

        // Row h-2: bottom bar
        self.out.queue(cursor::MoveTo(0, h.saturating_sub(2)))?;
        self.out
            .queue(Print(format!("└{}┘", "─".repeat(w.saturating_sub(2)))))?;

        // Side walls
        for row in 2..h.saturating_sub(2) {
            self.out.queue(cursor::MoveTo(0, row))?;
            self.out.queue(Print("│"))?;
            self.out
                .queue(cursor::MoveTo(self.layout.cols.saturating_sub(1), row))?;
            self.out.queue(Print("│"))?;
        }
        Ok(())
    }
}

impl<W: Write> Canvas for TerminalCanvas<'_, W> {
    fn clear(&mut self) -> std::io::Result<()> {
        self.out.queue(terminal::Clear(terminal::ClearType::All))?;
        self.draw_border()
    }

    fn draw_image(
        &mut self,
        sprite: Sprite,
        x: f32,
        y: f32,
        w: f32,
        h: f32,
    ) -> std::io::Result<()> {
        let Some((left, top)) = self.cell(x, y) else {
            return Ok(());
        };
        let right = (self.col(x + w) as u16).min(self.layout.cols.saturating_sub(1));
        let cells = right.saturating_sub(left).max(3) as usize;
        let tall = (self.row(y + h) as u16).saturating_sub(top) >= 2;

        match sprite {
            // Car, facing right:
            //   ▄██▀▄    ← body and windscreen
            //   ◉───◉    ← wheels (only when there is room)
            Sprite::Car => {
                self.out.queue(style::SetForegroundColor(C_PLAYER))?;
                self.out.queue(cursor::MoveTo(left, top))?;
                self.out.queue(Print(format!(
                    "▄{}▀▄",
                    "█".repeat(cells.saturating_sub(3))
                )))?;
                let wheel_row = top + 1;
                if tall && wheel_row < self.layout.rows.saturating_sub(2) {
                    self.out.queue(style::SetForegroundColor(C_WHEELS))?;
                    self.out.queue(cursor::MoveTo(left, wheel_row))?;
                    self.out.queue(Print(format!(
                        "◉{}◉",
                        "─".repeat(cells.saturating_sub(2))
                    )))?;
                }
            }
        }
        Ok(())
    }

    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> std::io::Result<()> {
        let Some((col, row)) = self.cell(x, y) else {
            return Ok(());
        };
        // Emoji take two cells; keep them off the right wall.
        if col + 2 >= self.layout.cols {
            return Ok(());
        }
        self.out.queue(style::ResetColor)?;
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(Print(text))?;
        Ok(())
    }

    fn fill_circle(&mut self, x: f32, y: f32, _radius: f32) -> std::io::Result<()> {
        let Some((col, row)) = self.cell(x, y) else {
            return Ok(());
        };
        self.out.queue(style::SetForegroundColor(C_BULLET))?;
        self.out.queue(cursor::MoveTo(col, row))?;
        self.out.queue(Print("●"))?;
        Ok(())
    }
}

// ── Chrome: HUD, buttons, overlays ────────────────────────────────────────────

/// Final numbers shown by the game-over notice.
#[derive(Clone, Copy, Debug)]
pub struct FinalScore {
    pub points: u32,
    pub level: u32,
    pub time_elapsed: u64,
}

/// Draw everything that is not part of the scene, then flush.
pub fn draw_chrome<W: Write>(
    out: &mut W,
    layout: &Layout,
    state: &GameState,
    shoot_ready: bool,
    notice: Option<&FinalScore>,
) -> std::io::Result<()> {
    draw_hud(out, layout, state)?;
    draw_controls(out, layout, shoot_ready)?;

    match (notice, state.status) {
        (Some(score), _) => draw_game_over(out, layout, score)?,
        (None, GameStatus::Ready) => draw_title(out, layout)?,
        (None, GameStatus::Paused) => draw_centered(
            out,
            layout,
            &[("║  PAUSED  ·  O resume  ║", Color::Cyan)],
        )?,
        (None, GameStatus::Playing) => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, layout.rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

fn draw_hud<W: Write>(out: &mut W, layout: &Layout, state: &GameState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, 0))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!(
        "Time: {}s   Speed: {}   Points: {}   Level: {}",
        state.time_elapsed, state.game_speed, state.points, state.level
    )))?;

    let tag = match state.status {
        GameStatus::Ready => "[ READY ]",
        GameStatus::Playing => "",
        GameStatus::Paused => "[ PAUSED ]",
    };
    if !tag.is_empty() {
        let x = layout.cols.saturating_sub(tag.chars().count() as u16 + 1);
        out.queue(cursor::MoveTo(x, 0))?;
        out.queue(style::SetForegroundColor(C_HUD_STATUS))?;
        out.queue(Print(tag))?;
    }
    Ok(())
}

fn draw_controls<W: Write>(out: &mut W, layout: &Layout, shoot_ready: bool) -> std::io::Result<()> {
    let row = layout.controls_row();
    let mut x = 1;
    for (label, control) in BUTTONS {
        let color = match control {
            Control::ShootButton if !shoot_ready => C_BUTTON_COOLING,
            _ => C_BUTTON,
        };
        out.queue(cursor::MoveTo(x, row))?;
        out.queue(style::SetForegroundColor(color))?;
        out.queue(Print(*label))?;
        x += label.chars().count() as u16 + BUTTON_GAP;
    }

    out.queue(cursor::MoveTo(x + 1, row))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("WASD/←↑↓→ move  SPACE shoot  P pause  O resume  R reset  Q quit"))?;
    Ok(())
}

fn draw_title<W: Write>(out: &mut W, layout: &Layout) -> std::io::Result<()> {
    draw_centered(
        out,
        layout,
        &[
            ("★  ROAD  SHOOTER  ★", Color::Cyan),
            ("", Color::White),
            ("Dodge the traffic, shoot it down.", Color::White),
            ("ENTER - Start", Color::Yellow),
        ],
    )
}

fn draw_game_over<W: Write>(out: &mut W, layout: &Layout, score: &FinalScore) -> std::io::Result<()> {
    let points = format!("You scored {} points.", score.points);
    let reached = format!("Level {} after {}s", score.level, score.time_elapsed);
    draw_centered(
        out,
        layout,
        &[
            ("╔════════════════════╗", Color::Red),
            ("║    GAME  OVER      ║", Color::Red),
            ("╚════════════════════╝", Color::Red),
            (points.as_str(), Color::Yellow),
            (reached.as_str(), Color::DarkGrey),
            ("Press any key", Color::White),
        ],
    )
}

fn draw_centered<W: Write>(
    out: &mut W,
    layout: &Layout,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let cx = layout.cols / 2;
    let start_row = (layout.rows / 2).saturating_sub(lines.len() as u16 / 2);
    for (i, (msg, color)) in lines.iter().enumerate() {
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, start_row + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }
    Ok(())
}
