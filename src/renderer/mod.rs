//! Rendering module
//!
//! The simulation only knows the [`DrawTarget`] contract. The WebGPU backend
//! batches the draw calls into a triangle list ([`SceneBuilder`]) and uploads
//! it once per frame ([`RenderState`]).

pub mod pipeline;
pub mod scene;
pub mod shapes;
pub mod vertex;

pub use pipeline::{RenderState, playfield_to_ndc};
pub use scene::SceneBuilder;
pub use vertex::{Palette, Vertex};

use crate::sim::{Ball, BrickGrid, GameSession, Paddle};

/// Something the game can draw itself onto
pub trait DrawTarget {
    /// Start a new frame
    fn clear(&mut self);
    fn draw_paddle(&mut self, paddle: &Paddle);
    /// Draw the visible bricks; broken ones are skipped
    fn draw_bricks(&mut self, bricks: &BrickGrid);
    fn draw_ball(&mut self, ball: &Ball);
}

/// Draw the current session state
pub fn render_frame<T: DrawTarget + ?Sized>(target: &mut T, session: &GameSession) {
    target.clear();
    target.draw_paddle(&session.paddle);
    target.draw_bricks(&session.bricks);
    target.draw_ball(&session.ball);
}
