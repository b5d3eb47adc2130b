use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::mock::StepRng;
use rand::rngs::StdRng;
use rand::SeedableRng;

use road_shooter::audio::{AudioSink, SoundEffect};
use road_shooter::entities::GameStatus;
use road_shooter::input::{Control, Direction};
use road_shooter::render::{Canvas, Sprite};
use road_shooter::{GameConfig, GameController, GameEvent};

// ── Fakes ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
enum Draw {
    Clear,
    Image(Sprite),
    Text(String),
    Circle,
}

#[derive(Default)]
struct RecordingCanvas {
    calls: Vec<Draw>,
}

impl Canvas for RecordingCanvas {
    fn clear(&mut self) -> std::io::Result<()> {
        self.calls.clear();
        self.calls.push(Draw::Clear);
        Ok(())
    }

    fn draw_image(&mut self, sprite: Sprite, _x: f32, _y: f32, _w: f32, _h: f32) -> std::io::Result<()> {
        self.calls.push(Draw::Image(sprite));
        Ok(())
    }

    fn fill_text(&mut self, text: &str, _x: f32, _y: f32) -> std::io::Result<()> {
        self.calls.push(Draw::Text(text.to_string()));
        Ok(())
    }

    fn fill_circle(&mut self, _x: f32, _y: f32, _radius: f32) -> std::io::Result<()> {
        self.calls.push(Draw::Circle);
        Ok(())
    }
}

#[derive(Clone, Default)]
struct RecordingAudio {
    log: Rc<RefCell<Vec<String>>>,
}

impl RecordingAudio {
    fn entries(&self) -> Vec<String> {
        self.log.borrow().clone()
    }
}

impl AudioSink for RecordingAudio {
    fn play_music(&mut self, track: Option<&str>) -> std::io::Result<()> {
        self.log.borrow_mut().push(format!("play {}", track.unwrap_or("-")));
        Ok(())
    }

    fn pause_music(&mut self) -> std::io::Result<()> {
        self.log.borrow_mut().push("pause".to_string());
        Ok(())
    }

    fn stop_music(&mut self) -> std::io::Result<()> {
        self.log.borrow_mut().push("stop".to_string());
        Ok(())
    }

    fn play_effect(&mut self, effect: SoundEffect) -> std::io::Result<()> {
        self.log.borrow_mut().push(format!("effect {effect:?}"));
        Ok(())
    }
}

struct BrokenAudio;

impl AudioSink for BrokenAudio {
    fn play_music(&mut self, _track: Option<&str>) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no device"))
    }

    fn pause_music(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no device"))
    }

    fn stop_music(&mut self) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no device"))
    }

    fn play_effect(&mut self, _effect: SoundEffect) -> std::io::Result<()> {
        Err(std::io::Error::new(std::io::ErrorKind::NotFound, "no device"))
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

fn controller_with(config: GameConfig) -> (GameController<StdRng>, RecordingAudio) {
    let audio = RecordingAudio::default();
    let c = GameController::with_rng(config, Box::new(audio.clone()), StdRng::seed_from_u64(7))
        .unwrap();
    (c, audio)
}

fn controller() -> (GameController<StdRng>, RecordingAudio) {
    let mut config = GameConfig::default();
    config.audio.track = Some("drive.mp3".to_string());
    controller_with(config)
}

fn run(c: &mut GameController<StdRng>, dt: Duration) -> Vec<GameEvent> {
    let mut canvas = RecordingCanvas::default();
    c.frame(dt, &mut canvas).unwrap()
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[test]
fn new_controller_is_idle() {
    let (c, _) = controller();
    assert_eq!(c.status(), GameStatus::Ready);
    assert!(!c.is_ticking());
    assert_eq!(c.active_timers(), 0);
}

#[test]
fn start_arms_timers_tick_and_music() {
    let (mut c, audio) = controller();
    c.start().unwrap();
    assert_eq!(c.status(), GameStatus::Playing);
    assert!(c.is_ticking());
    assert_eq!(c.active_timers(), 4);
    assert_eq!(audio.entries(), vec!["stop", "play drive.mp3"]);
}

#[test]
fn restart_does_not_stack_timers() {
    let (mut c, _) = controller();
    c.start().unwrap();
    c.start().unwrap();
    assert_eq!(c.active_timers(), 4);
}

#[test]
fn idle_frame_draws_but_does_not_tick() {
    let (mut c, _) = controller();
    let mut canvas = RecordingCanvas::default();
    c.frame(ms(5000), &mut canvas).unwrap();
    assert_eq!(canvas.calls, vec![Draw::Clear, Draw::Image(Sprite::Car)]);
    assert_eq!(c.state().frame, 0);
    assert_eq!(c.state().time_elapsed, 0);
}

#[test]
fn first_obstacle_spawns_at_two_seconds() {
    let (mut c, _) = controller();
    c.start().unwrap();
    let events = run(&mut c, ms(1999));
    assert!(!events.contains(&GameEvent::ObstacleSpawned));
    assert!(c.state().obstacles.is_empty());

    let events = run(&mut c, ms(1));
    assert_eq!(events, vec![GameEvent::ObstacleSpawned]);
    let o = &c.state().obstacles[0];
    assert!(c.config().obstacles.emojis.contains(&o.emoji));
    assert_eq!(o.speed, 2.0);
    // Spawned at x = 800, then moved once by this frame's tick.
    assert_eq!(o.x, 798.0);
}

#[test]
fn timers_drive_counters() {
    let (mut c, _) = controller();
    c.start().unwrap();
    let events = run(&mut c, ms(10_000));
    let s = c.state();
    assert_eq!(s.time_elapsed, 10);
    assert_eq!(s.points, 100);
    assert_eq!(s.level, 2);
    assert_eq!(s.game_speed, 3.0);
    assert_eq!(s.obstacles.len(), 5);
    assert!(s.obstacles.iter().all(|o| o.speed == 3.0));
    assert!(events.contains(&GameEvent::LevelUp(2)));
    assert!(events.contains(&GameEvent::SpeedRaised(2.5)));
    assert!(events.contains(&GameEvent::SpeedRaised(3.0)));
}

#[test]
fn pause_freezes_and_resume_restarts_phases() {
    let (mut c, audio) = controller();
    c.start().unwrap();
    run(&mut c, ms(1500));
    assert_eq!(c.state().time_elapsed, 1);
    assert_eq!(c.state().points, 10);

    assert!(c.pause());
    assert_eq!(c.status(), GameStatus::Paused);
    assert!(!c.is_ticking());
    assert_eq!(c.active_timers(), 0);
    let frame_before = c.state().frame;
    run(&mut c, ms(10_000));
    assert_eq!(c.state().time_elapsed, 1);
    assert_eq!(c.state().points, 10);
    assert_eq!(c.state().frame, frame_before);

    assert!(c.resume().unwrap());
    assert_eq!(c.status(), GameStatus::Playing);
    assert_eq!(c.active_timers(), 4);
    // Phase restarts from zero: the 500 ms left before the pause is forgotten.
    run(&mut c, ms(999));
    assert_eq!(c.state().time_elapsed, 1);
    run(&mut c, ms(1));
    assert_eq!(c.state().time_elapsed, 2);
    assert_eq!(c.state().points, 20);

    let log = audio.entries();
    assert_eq!(log[log.len() - 2..], ["pause", "play drive.mp3"]);
}

#[test]
fn speed_ramp_is_slower_after_resume() {
    let (mut c, _) = controller();
    c.start().unwrap();
    c.pause();
    c.resume().unwrap();
    run(&mut c, ms(5000));
    assert_eq!(c.state().game_speed, 2.0);
    run(&mut c, ms(5000));
    assert_eq!(c.state().game_speed, 2.5);
}

#[test]
fn pause_and_resume_are_noops_out_of_turn() {
    let (mut c, audio) = controller();
    assert!(!c.pause());
    assert!(!c.resume().unwrap());
    c.start().unwrap();
    assert!(!c.resume().unwrap());
    assert!(c.pause());
    assert!(!c.pause());
    assert_eq!(audio.entries().iter().filter(|e| *e == "pause").count(), 1);
}

#[test]
fn reset_keeps_running() {
    let (mut c, audio) = controller();
    c.start().unwrap();
    c.control(Control::Press(Direction::Right));
    run(&mut c, ms(3000));
    let before = audio.entries().len();

    c.reset();
    let s = c.state();
    assert_eq!(s.status, GameStatus::Playing);
    assert_eq!((s.player.x, s.player.y), (50.0, 275.0));
    assert_eq!((s.player.dx, s.player.dy), (0.0, 0.0));
    assert!(s.obstacles.is_empty());
    assert!(s.bullets.is_empty());
    assert_eq!((s.time_elapsed, s.points, s.level), (0, 0, 1));
    assert_eq!(s.game_speed, 2.0);
    assert!(c.is_ticking());
    assert_eq!(c.active_timers(), 4);
    assert_eq!(audio.entries().len(), before);
}

// ── Input ─────────────────────────────────────────────────────────────────────

#[test]
fn shooting_needs_a_running_game() {
    let (mut c, audio) = controller();
    assert_eq!(c.control(Control::Shoot), None);
    assert!(c.state().bullets.is_empty());
    assert!(audio.entries().is_empty());
}

#[test]
fn every_shot_plays_the_effect() {
    let (mut c, audio) = controller();
    c.start().unwrap();
    assert_eq!(c.control(Control::Shoot), Some(GameEvent::ShotFired));
    assert_eq!(c.control(Control::Shoot), Some(GameEvent::ShotFired));
    assert_eq!(c.state().bullets.len(), 2);
    let effects = audio.entries().iter().filter(|e| e.starts_with("effect")).count();
    assert_eq!(effects, 2);
}

#[test]
fn shoot_button_has_a_cooldown() {
    let (mut c, _) = controller();
    c.start().unwrap();
    assert_eq!(c.control(Control::ShootButton), Some(GameEvent::ShotFired));
    assert!(!c.shoot_button_ready());
    assert_eq!(c.control(Control::ShootButton), None);
    // Space bar is not throttled.
    assert_eq!(c.control(Control::Shoot), Some(GameEvent::ShotFired));

    run(&mut c, ms(999));
    assert_eq!(c.control(Control::ShootButton), None);
    run(&mut c, ms(1));
    assert!(c.shoot_button_ready());
    assert_eq!(c.control(Control::ShootButton), Some(GameEvent::ShotFired));
}

#[test]
fn movement_is_applied_on_the_next_tick() {
    let (mut c, _) = controller();
    c.start().unwrap();
    c.control(Control::Press(Direction::Down));
    run(&mut c, ms(16));
    assert_eq!(c.state().player.y, 280.0);
    c.control(Control::ReleaseAll);
    run(&mut c, ms(16));
    assert_eq!(c.state().player.y, 280.0);
}

#[test]
fn scene_is_drawn_before_the_tick() {
    let (mut c, _) = controller();
    c.start().unwrap();
    c.control(Control::Shoot);
    let mut canvas = RecordingCanvas::default();
    c.frame(ms(2000), &mut canvas).unwrap();
    assert_eq!(canvas.calls[0], Draw::Clear);
    assert_eq!(canvas.calls[1], Draw::Image(Sprite::Car));
    assert!(matches!(canvas.calls[2], Draw::Text(_)));
    assert_eq!(canvas.calls[3], Draw::Circle);
}

// ── Game over ─────────────────────────────────────────────────────────────────

/// Small arena where the first obstacle (y pinned by a zero RNG) must run
/// into a player parked at the left edge.
fn crash_config() -> GameConfig {
    let mut config = GameConfig::default();
    config.canvas.width = 200.0;
    config.canvas.height = 100.0;
    config.player.start_x = 0.0;
    config.player.width = 20.0;
    config.player.height = 20.0;
    config.obstacles.size = 20.0;
    config
}

#[test]
fn crash_ends_the_session_exactly_once() {
    let audio = RecordingAudio::default();
    let mut c = GameController::with_rng(crash_config(), Box::new(audio.clone()), StepRng::new(0, 0))
        .unwrap();
    c.start().unwrap();

    let mut canvas = RecordingCanvas::default();
    let mut game_overs = Vec::new();
    for _ in 0..1000 {
        for event in c.frame(ms(16), &mut canvas).unwrap() {
            if let GameEvent::GameOver { .. } = event {
                game_overs.push(event);
            }
        }
    }

    assert_eq!(game_overs.len(), 1);
    if let GameEvent::GameOver { points, time_elapsed, .. } = &game_overs[0] {
        assert!(*time_elapsed >= 2);
        assert!(*points >= 20);
    }

    assert_eq!(c.status(), GameStatus::Ready);
    assert!(!c.is_ticking());
    assert_eq!(c.active_timers(), 0);
    let s = c.state();
    assert!(s.obstacles.is_empty());
    assert_eq!((s.time_elapsed, s.points, s.level), (0, 0, 1));
    assert_eq!(audio.entries().last().map(String::as_str), Some("stop"));
}

#[test]
fn audio_failures_do_not_stop_play() {
    let mut c = GameController::with_rng(
        GameConfig::default(),
        Box::new(BrokenAudio),
        StdRng::seed_from_u64(1),
    )
    .unwrap();
    c.start().unwrap();
    assert_eq!(c.control(Control::Shoot), Some(GameEvent::ShotFired));
    assert!(c.pause());
    assert!(c.resume().unwrap());
}

#[test]
fn invalid_config_is_rejected() {
    let mut config = GameConfig::default();
    config.timers.spawn_ms = 0;
    let result = GameController::with_rng(
        config,
        Box::new(RecordingAudio::default()),
        StdRng::seed_from_u64(1),
    );
    assert!(result.is_err());
}
