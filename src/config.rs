//! Tunable constants, loaded from an optional TOML file.
//!
//! Every field has a default equal to the classic game's value, so an empty
//! file (or no file at all) reproduces the classic feel.

use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::error::{GameError, Result};

/// How obstacles that leave the left edge are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OffscreenRemoval {
    /// Drop the oldest obstacle whenever any obstacle is off-screen.
    #[default]
    Oldest,
    /// Drop exactly the obstacles that are off-screen.
    Exact,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct GameConfig {
    #[serde(default)]
    pub canvas: CanvasConfig,
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub player: PlayerConfig,
    #[serde(default)]
    pub obstacles: ObstacleConfig,
    #[serde(default)]
    pub bullets: BulletConfig,
    #[serde(default)]
    pub timers: TimerConfig,
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub controls: ControlsConfig,
    #[serde(default)]
    pub audio: AudioConfig,
    #[serde(default)]
    pub offscreen_removal: OffscreenRemoval,
    /// Fixed RNG seed; random per run when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self { width: 800.0, height: 600.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FrameConfig {
    pub hz: u32,
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self { hz: 60 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub start_x: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            start_x: 50.0,
            width: 80.0,
            height: 50.0,
            speed: 5.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ObstacleConfig {
    pub emojis: Vec<String>,
    /// Glyph box edge, used for hit boxes and the edge margins.
    pub size: f32,
    /// Vertical oscillation step per frame.
    pub step: f32,
    pub start_speed: f32,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            emojis: ["🚜", "🐃", "🚗", "🚜"].iter().map(|s| s.to_string()).collect(),
            size: 40.0,
            step: 5.0,
            start_speed: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BulletConfig {
    pub radius: f32,
    pub speed: f32,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self { radius: 5.0, speed: 7.0 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub spawn_ms: u64,
    pub elapsed_ms: u64,
    pub speed_ramp_ms: u64,
    /// Speed-ramp period used after a resume.
    pub resume_speed_ramp_ms: u64,
    pub score_ms: u64,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            spawn_ms: 2000,
            elapsed_ms: 1000,
            speed_ramp_ms: 5000,
            resume_speed_ramp_ms: 10000,
            score_ms: 1000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScoringConfig {
    pub tick_points: u32,
    pub kill_points: u32,
    pub points_per_level: u32,
    pub speed_step: f32,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            tick_points: 10,
            kill_points: 20,
            points_per_level: 100,
            speed_step: 0.5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Cooldown of the on-screen shoot control.
    pub shoot_cooldown_ms: u64,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self { shoot_cooldown_ms: 1000 }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Background track, an audio file path.
    pub track: Option<String>,
    /// Ring the terminal bell for the shot effect.
    pub bell: bool,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self { track: None, bell: true }
    }
}

impl TimerConfig {
    pub fn spawn(&self) -> Duration {
        Duration::from_millis(self.spawn_ms)
    }

    pub fn elapsed(&self) -> Duration {
        Duration::from_millis(self.elapsed_ms)
    }

    pub fn speed_ramp(&self) -> Duration {
        Duration::from_millis(self.speed_ramp_ms)
    }

    pub fn resume_speed_ramp(&self) -> Duration {
        Duration::from_millis(self.resume_speed_ramp_ms)
    }

    pub fn score(&self) -> Duration {
        Duration::from_millis(self.score_ms)
    }
}

impl FrameConfig {
    pub fn period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.hz.max(1)))
    }
}

impl GameConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::load(p),
            None => {
                log::info!("Using default config");
                Ok(Self::default())
            }
        }
    }

    /// Reject values the simulation cannot run with.
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: &str| Err(GameError::InvalidConfig(msg.to_string()));

        if !(self.canvas.width > 0.0 && self.canvas.height > 0.0) {
            return invalid("canvas dimensions must be positive");
        }
        if self.player.width > self.canvas.width || self.player.height > self.canvas.height {
            return invalid("player does not fit on the canvas");
        }
        if self.obstacles.emojis.is_empty() {
            return invalid("obstacles.emojis must not be empty");
        }
        if self.obstacles.size >= self.canvas.height {
            return invalid("obstacles.size must be smaller than the canvas height");
        }
        if self.frame.hz == 0 {
            return invalid("frame.hz must be non-zero");
        }
        if self.scoring.points_per_level == 0 {
            return invalid("scoring.points_per_level must be non-zero");
        }
        let t = &self.timers;
        if [t.spawn_ms, t.elapsed_ms, t.speed_ramp_ms, t.resume_speed_ramp_ms, t.score_ms]
            .contains(&0)
        {
            return invalid("timer periods must be non-zero");
        }
        Ok(())
    }
}
