//! Drawing seam between the simulation and whatever surface shows it.

use crate::entities::GameState;

/// Bitmaps the scene can blit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sprite {
    Car,
}

/// A 2D surface addressed in canvas pixels.
pub trait Canvas {
    fn clear(&mut self) -> std::io::Result<()>;
    fn draw_image(&mut self, sprite: Sprite, x: f32, y: f32, w: f32, h: f32)
        -> std::io::Result<()>;
    /// `y` is the text baseline.
    fn fill_text(&mut self, text: &str, x: f32, y: f32) -> std::io::Result<()>;
    fn fill_circle(&mut self, x: f32, y: f32, radius: f32) -> std::io::Result<()>;
}

/// Issue the draw calls for one frame: clear, player, obstacles, bullets.
pub fn draw_scene<C: Canvas + ?Sized>(canvas: &mut C, state: &GameState) -> std::io::Result<()> {
    canvas.clear()?;

    let p = &state.player;
    canvas.draw_image(Sprite::Car, p.x, p.y, p.width, p.height)?;

    for obstacle in &state.obstacles {
        canvas.fill_text(&obstacle.emoji, obstacle.x, obstacle.y)?;
    }
    for bullet in &state.bullets {
        canvas.fill_circle(bullet.x, bullet.y, bullet.radius)?;
    }
    Ok(())
}
