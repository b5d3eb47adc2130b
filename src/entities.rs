//! All game entity types: pure data, no logic.
//!
//! Positions and sizes are in canvas pixels; the front end decides how a
//! pixel maps onto the screen.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameStatus {
    /// Session built but not running: before the first start and after a
    /// game over.
    Ready,
    Playing,
    Paused,
}

/// Vertical direction an obstacle is currently drifting in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Heading {
    Up,
    Down,
}

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Magnitude written into `dx`/`dy` while a direction is held.
    pub speed: f32,
    pub dx: f32,
    pub dy: f32,
}

impl Player {
    /// Muzzle point: middle of the right-hand edge.
    pub fn muzzle(&self) -> (f32, f32) {
        (self.x + self.width, self.y + self.height / 2.0)
    }
}

// ── Obstacles & projectiles ───────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct Obstacle {
    pub emoji: String,
    pub x: f32,
    /// Text baseline of the glyph.
    pub y: f32,
    /// Leftward pixels per frame; follows the global speed.
    pub speed: f32,
    pub heading: Heading,
    /// Vertical pixels per frame.
    pub dy: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bullet {
    /// Centre of the round.
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    /// Rightward pixels per frame.
    pub speed: f32,
}

// ── Session ───────────────────────────────────────────────────────────────────

/// One play-through.  Cloneable so pure update functions can
/// return a new copy without mutating the original.
#[derive(Clone, Debug, PartialEq)]
pub struct GameState {
    pub player: Player,
    /// Oldest first.
    pub obstacles: Vec<Obstacle>,
    pub bullets: Vec<Bullet>,
    /// Whole seconds of play.
    pub time_elapsed: u64,
    /// Global obstacle speed, ramped by the speed timer.
    pub game_speed: f32,
    pub points: u32,
    pub level: u32,
    pub status: GameStatus,
    pub frame: u64,
    pub width: f32,
    pub height: f32,
}
