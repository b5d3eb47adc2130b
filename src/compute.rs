//! Pure game-logic functions.
//!
//! Every public function takes an immutable reference to the current
//! `GameState` (plus the config and, where needed, an RNG handle) and returns
//! a brand-new `GameState`.  Side effects are limited to the injected RNG.

use rand::Rng;

use crate::config::{GameConfig, OffscreenRemoval};
use crate::entities::{Bullet, GameState, GameStatus, Heading, Obstacle, Player};
use crate::input::{Axis, Direction};

/// What a single tick did besides moving things.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Obstacles shot down this frame.
    pub kills: u32,
    /// An obstacle overlapped the player.
    pub crashed: bool,
    pub level_up: bool,
}

// ── Constructors ─────────────────────────────────────────────────────────────

pub fn init_player(config: &GameConfig) -> Player {
    let p = &config.player;
    Player {
        x: p.start_x,
        y: config.canvas.height / 2.0 - p.height / 2.0,
        width: p.width,
        height: p.height,
        speed: p.speed,
        dx: 0.0,
        dy: 0.0,
    }
}

/// Fresh session, not yet running.
pub fn init_state(config: &GameConfig) -> GameState {
    GameState {
        player: init_player(config),
        obstacles: Vec::new(),
        bullets: Vec::new(),
        time_elapsed: 0,
        game_speed: config.obstacles.start_speed,
        points: 0,
        level: 1,
        status: GameStatus::Ready,
        frame: 0,
        width: config.canvas.width,
        height: config.canvas.height,
    }
}

/// Restore every session value while keeping the lifecycle status.
pub fn reset_state(state: &GameState, config: &GameConfig) -> GameState {
    GameState {
        status: state.status,
        ..init_state(config)
    }
}

// ── Input-driven state transitions (pure) ───────────────────────────────────

pub fn press_direction(state: &GameState, direction: Direction) -> GameState {
    let mut player = state.player.clone();
    match direction {
        Direction::Up => player.dy = -player.speed,
        Direction::Down => player.dy = player.speed,
        Direction::Left => player.dx = -player.speed,
        Direction::Right => player.dx = player.speed,
    }
    GameState {
        player,
        ..state.clone()
    }
}

pub fn release_axis(state: &GameState, axis: Axis) -> GameState {
    let mut player = state.player.clone();
    match axis {
        Axis::Horizontal => player.dx = 0.0,
        Axis::Vertical => player.dy = 0.0,
    }
    GameState {
        player,
        ..state.clone()
    }
}

pub fn release_all(state: &GameState) -> GameState {
    GameState {
        player: Player {
            dx: 0.0,
            dy: 0.0,
            ..state.player.clone()
        },
        ..state.clone()
    }
}

/// Fire a bullet from the player's muzzle.  No cap on bullets in flight.
pub fn shoot_bullet(state: &GameState, config: &GameConfig) -> GameState {
    let (x, y) = state.player.muzzle();
    let mut bullets = state.bullets.clone();
    bullets.push(Bullet {
        x,
        y,
        radius: config.bullets.radius,
        speed: config.bullets.speed,
    });
    GameState {
        bullets,
        ..state.clone()
    }
}

// ── Timer-driven transitions ────────────────────────────────────────────────

/// Push one obstacle just past the right edge at a random height.
pub fn create_obstacle(state: &GameState, config: &GameConfig, rng: &mut impl Rng) -> GameState {
    let cfg = &config.obstacles;
    let emoji = cfg.emojis[rng.gen_range(0..cfg.emojis.len())].clone();
    let y = rng.gen::<f32>() * (state.height - cfg.size) + cfg.size;
    let mut obstacles = state.obstacles.clone();
    obstacles.push(Obstacle {
        emoji,
        x: state.width,
        y,
        speed: state.game_speed,
        heading: Heading::Down,
        dy: cfg.step,
    });
    GameState {
        obstacles,
        ..state.clone()
    }
}

pub fn increase_time(state: &GameState) -> GameState {
    GameState {
        time_elapsed: state.time_elapsed + 1,
        ..state.clone()
    }
}

/// Raise the global speed and carry it onto every live obstacle.
pub fn increase_speed(state: &GameState, config: &GameConfig) -> GameState {
    let game_speed = state.game_speed + config.scoring.speed_step;
    let obstacles = state
        .obstacles
        .iter()
        .map(|o| Obstacle {
            speed: game_speed,
            ..o.clone()
        })
        .collect();
    GameState {
        game_speed,
        obstacles,
        ..state.clone()
    }
}

/// Periodic score tick.
pub fn increase_points(state: &GameState, config: &GameConfig) -> GameState {
    award_points(state, config.scoring.tick_points, config)
}

/// Add points and promote the level for every boundary crossed.
/// The total saturates at `u32::MAX`.
pub fn award_points(state: &GameState, amount: u32, config: &GameConfig) -> GameState {
    let points = state.points.saturating_add(amount);
    let level = level_for(points, config).max(state.level);
    GameState {
        points,
        level,
        ..state.clone()
    }
}

pub fn level_for(points: u32, config: &GameConfig) -> u32 {
    points / config.scoring.points_per_level + 1
}

// ── Per-frame pieces ─────────────────────────────────────────────────────────

/// Move the player by its velocity and clamp it inside the canvas.
pub fn update_player(player: &Player, width: f32, height: f32) -> Player {
    let x = (player.x + player.dx).clamp(0.0, (width - player.width).max(0.0));
    let y = (player.y + player.dy).clamp(0.0, (height - player.height).max(0.0));
    Player {
        x,
        y,
        ..player.clone()
    }
}

/// Slide left and bob vertically, flipping heading past either band edge.
pub fn advance_obstacle(obstacle: &Obstacle, floor: f32) -> Obstacle {
    let mut o = obstacle.clone();
    o.x -= o.speed;
    match o.heading {
        Heading::Down => {
            o.y += o.dy;
            if o.y > floor {
                o.heading = Heading::Up;
            }
        }
        Heading::Up => {
            o.y -= o.dy;
            if o.y < 0.0 {
                o.heading = Heading::Down;
            }
        }
    }
    o
}

/// Advance every obstacle and drop the ones past the left edge.
///
/// With [`OffscreenRemoval::Oldest`] each off-screen sighting removes the
/// front of the queue, and the walk carries on at the next index, so the
/// entry that slid into the freed slot is not advanced this frame.
pub fn update_obstacles(obstacles: &[Obstacle], config: &GameConfig) -> Vec<Obstacle> {
    let size = config.obstacles.size;
    let floor = config.canvas.height - size;
    match config.offscreen_removal {
        OffscreenRemoval::Oldest => {
            let mut out = obstacles.to_vec();
            let mut i = 0;
            while i < out.len() {
                out[i] = advance_obstacle(&out[i], floor);
                if out[i].x < -size {
                    out.remove(0);
                }
                i += 1;
            }
            out
        }
        OffscreenRemoval::Exact => obstacles
            .iter()
            .map(|o| advance_obstacle(o, floor))
            .filter(|o| o.x >= -size)
            .collect(),
    }
}

/// Advance bullets rightward; discard those whose leading edge left the canvas.
pub fn update_bullets(bullets: &[Bullet], width: f32) -> Vec<Bullet> {
    bullets
        .iter()
        .map(|b| Bullet {
            x: b.x + b.speed,
            ..b.clone()
        })
        .filter(|b| b.x + b.radius <= width)
        .collect()
}

pub fn bullet_hits(obstacle: &Obstacle, bullet: &Bullet, size: f32) -> bool {
    let reach = size / 2.0 + bullet.radius;
    (obstacle.x - bullet.x).abs() < reach && (obstacle.y - bullet.y).abs() < reach
}

pub fn player_hits(player: &Player, obstacle: &Obstacle, size: f32) -> bool {
    (player.x - obstacle.x).abs() < player.width / 2.0 + size / 2.0
        && (player.y - obstacle.y).abs() < player.height / 2.0 + size / 2.0
}

/// Pair each obstacle with the first unused bullet inside its hit box.
/// Returns the survivors of both collections and the number of kills.
pub fn resolve_shots(
    obstacles: &[Obstacle],
    bullets: &[Bullet],
    size: f32,
) -> (Vec<Obstacle>, Vec<Bullet>, u32) {
    let mut used_bullets: Vec<usize> = Vec::new();
    let mut survivors: Vec<Obstacle> = Vec::with_capacity(obstacles.len());

    for obstacle in obstacles {
        let hit = bullets
            .iter()
            .enumerate()
            .find(|(bi, b)| !used_bullets.contains(bi) && bullet_hits(obstacle, b, size));
        match hit {
            Some((bi, _)) => used_bullets.push(bi),
            None => survivors.push(obstacle.clone()),
        }
    }

    let bullets: Vec<Bullet> = bullets
        .iter()
        .enumerate()
        .filter(|(i, _)| !used_bullets.contains(i))
        .map(|(_, b)| b.clone())
        .collect();

    (survivors, bullets, used_bullets.len() as u32)
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the simulation by one frame.
pub fn tick(state: &GameState, config: &GameConfig) -> (GameState, TickReport) {
    let size = config.obstacles.size;

    // ── 1. Player ────────────────────────────────────────────────────────────
    let player = update_player(&state.player, state.width, state.height);

    // ── 2. Obstacles ─────────────────────────────────────────────────────────
    let obstacles = update_obstacles(&state.obstacles, config);

    // ── 3. Bullets ───────────────────────────────────────────────────────────
    let bullets = update_bullets(&state.bullets, state.width);

    // ── 4. Collision: bullets ↔ obstacles ────────────────────────────────────
    let (obstacles, bullets, kills) = resolve_shots(&obstacles, &bullets, size);

    // ── 5. Collision: obstacles ↔ player ─────────────────────────────────────
    let crashed = obstacles.iter().any(|o| player_hits(&player, o, size));

    let next = GameState {
        player,
        obstacles,
        bullets,
        frame: state.frame + 1,
        ..state.clone()
    };
    let next = award_points(&next, kills.saturating_mul(config.scoring.kill_points), config);

    let report = TickReport {
        kills,
        crashed,
        level_up: next.level > state.level,
    };
    (next, report)
}
