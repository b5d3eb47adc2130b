//! The loop controller: owns the session, the timers and the audio sink,
//! and turns lifecycle triggers, input and frame deltas into state changes.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::audio::{AudioSink, SoundEffect};
use crate::compute::{self, init_state, reset_state};
use crate::config::GameConfig;
use crate::entities::{GameState, GameStatus};
use crate::error::Result;
use crate::input::Control;
use crate::render::{draw_scene, Canvas};
use crate::timers::{Scheduler, TimerHandle, TimerKind};

/// Something the front end may want to react to.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEvent {
    ObstacleSpawned,
    ObstacleDestroyed,
    ShotFired,
    SpeedRaised(f32),
    LevelUp(u32),
    /// The session has already been reset when this is seen; the final
    /// numbers travel with the event.
    GameOver { points: u32, level: u32, time_elapsed: u64 },
}

#[derive(Debug, Default)]
struct ActiveTimers {
    handles: Vec<TimerHandle>,
}

pub struct GameController<R: Rng = StdRng> {
    config: GameConfig,
    state: GameState,
    scheduler: Scheduler,
    timers: ActiveTimers,
    /// Stand-in for the pending animation-frame request.
    tick_scheduled: bool,
    rng: R,
    audio: Box<dyn AudioSink>,
    shoot_ready_at: Duration,
}

impl GameController<StdRng> {
    pub fn new(config: GameConfig, audio: Box<dyn AudioSink>) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::with_rng(config, audio, rng)
    }
}

impl<R: Rng> GameController<R> {
    pub fn with_rng(config: GameConfig, audio: Box<dyn AudioSink>, rng: R) -> Result<Self> {
        config.validate()?;
        let state = init_state(&config);
        Ok(Self {
            config,
            state,
            scheduler: Scheduler::new(),
            timers: ActiveTimers::default(),
            tick_scheduled: false,
            rng,
            audio,
            shoot_ready_at: Duration::ZERO,
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> GameStatus {
        self.state.status
    }

    pub fn is_ticking(&self) -> bool {
        self.tick_scheduled
    }

    pub fn active_timers(&self) -> usize {
        self.scheduler.active_count()
    }

    // ── Lifecycle ────────────────────────────────────────────────────────────

    /// Begin a fresh session.  Restarting mid-game replaces the running
    /// timers rather than stacking new ones on top.
    pub fn start(&mut self) -> Result<()> {
        self.halt();
        self.state = GameState {
            status: GameStatus::Playing,
            ..init_state(&self.config)
        };
        self.arm_timers(self.config.timers.speed_ramp())?;
        self.tick_scheduled = true;

        let track = self.config.audio.track.clone();
        self.with_audio("restart music", |a| {
            a.stop_music()?;
            a.play_music(track.as_deref())
        });
        log::info!("Game started");
        Ok(())
    }

    /// Freeze the session.  Returns false when there was nothing to pause.
    pub fn pause(&mut self) -> bool {
        if self.state.status != GameStatus::Playing {
            return false;
        }
        self.halt();
        self.state.status = GameStatus::Paused;
        self.with_audio("pause music", |a| a.pause_music());
        log::info!(
            "Paused at {}s with {} points",
            self.state.time_elapsed,
            self.state.points
        );
        true
    }

    /// Pick up where `pause` left off.  Timer phases start over from zero.
    pub fn resume(&mut self) -> Result<bool> {
        if self.state.status != GameStatus::Paused {
            return Ok(false);
        }
        self.state.status = GameStatus::Playing;
        let track = self.config.audio.track.clone();
        self.with_audio("resume music", |a| a.play_music(track.as_deref()));
        self.arm_timers(self.config.timers.resume_speed_ramp())?;
        self.tick_scheduled = true;
        log::info!("Resumed");
        Ok(true)
    }

    /// Restore the session values.  Scheduling and music are left alone.
    pub fn reset(&mut self) {
        self.state = reset_state(&self.state, &self.config);
        log::info!("Session reset");
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn control(&mut self, control: Control) -> Option<GameEvent> {
        match control {
            Control::Press(direction) => {
                self.state = compute::press_direction(&self.state, direction);
                None
            }
            Control::Release(axis) => {
                self.state = compute::release_axis(&self.state, axis);
                None
            }
            Control::ReleaseAll => {
                self.state = compute::release_all(&self.state);
                None
            }
            Control::Shoot => self.shoot(),
            Control::ShootButton => {
                let now = self.scheduler.now();
                if now < self.shoot_ready_at {
                    return None;
                }
                let fired = self.shoot();
                if fired.is_some() {
                    self.shoot_ready_at =
                        now + Duration::from_millis(self.config.controls.shoot_cooldown_ms);
                }
                fired
            }
        }
    }

    /// Whether the on-screen shoot control is currently accepting presses.
    pub fn shoot_button_ready(&self) -> bool {
        self.scheduler.now() >= self.shoot_ready_at
    }

    fn shoot(&mut self) -> Option<GameEvent> {
        if self.state.status != GameStatus::Playing {
            return None;
        }
        self.state = compute::shoot_bullet(&self.state, &self.config);
        self.with_audio("shot effect", |a| a.play_effect(SoundEffect::Shot));
        Some(GameEvent::ShotFired)
    }

    // ── Frame driving ────────────────────────────────────────────────────────

    /// Let `dt` of time pass: run due timers in order, draw the scene, then
    /// tick once if a tick is scheduled.
    pub fn frame<C: Canvas + ?Sized>(
        &mut self,
        dt: Duration,
        canvas: &mut C,
    ) -> Result<Vec<GameEvent>> {
        let mut events = Vec::new();

        for kind in self.scheduler.advance(dt) {
            self.on_timer(kind, &mut events);
        }

        draw_scene(canvas, &self.state)?;

        if self.tick_scheduled {
            let (next, report) = compute::tick(&self.state, &self.config);
            self.state = next;

            for _ in 0..report.kills {
                events.push(GameEvent::ObstacleDestroyed);
            }
            if report.kills > 0 {
                log::debug!("{} obstacle(s) destroyed, points {}", report.kills, self.state.points);
            }
            if report.level_up {
                events.push(GameEvent::LevelUp(self.state.level));
            }
            if report.crashed {
                events.push(self.game_over());
            }
        }

        Ok(events)
    }

    fn on_timer(&mut self, kind: TimerKind, events: &mut Vec<GameEvent>) {
        log::trace!("timer fired: {kind:?}");
        match kind {
            TimerKind::Spawn => {
                self.state = compute::create_obstacle(&self.state, &self.config, &mut self.rng);
                if let Some(o) = self.state.obstacles.last() {
                    log::debug!("Spawned {} at y={:.0}", o.emoji, o.y);
                }
                events.push(GameEvent::ObstacleSpawned);
            }
            TimerKind::Elapsed => {
                self.state = compute::increase_time(&self.state);
            }
            TimerKind::SpeedRamp => {
                self.state = compute::increase_speed(&self.state, &self.config);
                log::debug!("Speed raised to {}", self.state.game_speed);
                events.push(GameEvent::SpeedRaised(self.state.game_speed));
            }
            TimerKind::Score => {
                let before = self.state.level;
                self.state = compute::increase_points(&self.state, &self.config);
                if self.state.level > before {
                    log::debug!("Level {}", self.state.level);
                    events.push(GameEvent::LevelUp(self.state.level));
                }
            }
        }
    }

    fn game_over(&mut self) -> GameEvent {
        self.halt();
        self.with_audio("stop music", |a| a.stop_music());

        let event = GameEvent::GameOver {
            points: self.state.points,
            level: self.state.level,
            time_elapsed: self.state.time_elapsed,
        };
        log::info!(
            "Game over: {} points, level {}, {}s",
            self.state.points,
            self.state.level,
            self.state.time_elapsed
        );

        self.state = init_state(&self.config);
        event
    }

    // ── Scheduling ───────────────────────────────────────────────────────────

    fn arm_timers(&mut self, speed_ramp: Duration) -> Result<()> {
        let t = &self.config.timers;
        let plan = [
            (TimerKind::Spawn, t.spawn()),
            (TimerKind::Elapsed, t.elapsed()),
            (TimerKind::SpeedRamp, speed_ramp),
            (TimerKind::Score, t.score()),
        ];
        for (kind, period) in plan {
            let handle = self.scheduler.every(kind, period)?;
            self.timers.handles.push(handle);
        }
        Ok(())
    }

    /// Cancel the pending tick and every timer this controller armed.
    fn halt(&mut self) {
        self.tick_scheduled = false;
        for handle in self.timers.handles.drain(..) {
            self.scheduler.cancel(handle);
        }
    }

    fn with_audio<F>(&mut self, what: &str, f: F)
    where
        F: FnOnce(&mut dyn AudioSink) -> std::io::Result<()>,
    {
        if let Err(e) = f(self.audio.as_mut()) {
            log::warn!("Audio failed ({what}): {e}");
        }
    }
}
