//! Road Shooter: drive, dodge and shoot the emoji traffic.
//!
//! - `entities`: pure data for the session
//! - `compute`: pure per-frame and per-timer transitions
//! - `timers`: cancellable interval timers on a virtual clock
//! - `controller`: lifecycle, input and frame driving
//! - `render` / `audio`: seams to the presentation layer

pub mod audio;
pub mod compute;
pub mod config;
pub mod controller;
pub mod entities;
pub mod error;
pub mod input;
pub mod render;
pub mod timers;

pub use config::GameConfig;
pub use controller::{GameController, GameEvent};
pub use error::{GameError, Result};
