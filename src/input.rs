//! Input vocabulary and the keyboard mapping onto it.
//!
//! Keyboard keys and the on-screen buttons both end up as a [`Control`];
//! lifecycle keys become a [`Command`].  Letter keys are case-sensitive.

use crossterm::event::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Direction {
    pub fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
        }
    }
}

/// A gameplay action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Direction key or on-screen arrow pressed.
    Press(Direction),
    /// Direction key released: stops motion on that axis only.
    Release(Axis),
    /// On-screen arrow released: stops all motion.
    ReleaseAll,
    /// Space bar.
    Shoot,
    /// On-screen shoot control, subject to its cooldown.
    ShootButton,
}

/// Lifecycle trigger from the control surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    Reset,
    Quit,
}

pub fn direction_for(code: &KeyCode) -> Option<Direction> {
    match code {
        KeyCode::Up | KeyCode::Char('w') => Some(Direction::Up),
        KeyCode::Down | KeyCode::Char('s') => Some(Direction::Down),
        KeyCode::Left | KeyCode::Char('a') => Some(Direction::Left),
        KeyCode::Right | KeyCode::Char('d') => Some(Direction::Right),
        _ => None,
    }
}

/// Control produced by a key press, if any.
pub fn key_down(code: &KeyCode) -> Option<Control> {
    match code {
        KeyCode::Char(' ') => Some(Control::Shoot),
        KeyCode::Char('f') => Some(Control::ShootButton),
        other => direction_for(other).map(Control::Press),
    }
}

/// Control produced by a key release, if any.
pub fn key_up(code: &KeyCode) -> Option<Control> {
    direction_for(code).map(|d| Control::Release(d.axis()))
}

pub fn command_for(code: &KeyCode) -> Option<Command> {
    match code {
        KeyCode::Enter => Some(Command::Start),
        KeyCode::Char('p') => Some(Command::Pause),
        KeyCode::Char('o') => Some(Command::Resume),
        KeyCode::Char('r') => Some(Command::Reset),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}
