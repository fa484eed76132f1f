//! Per-frame triangle batch built from draw calls

use glam::Vec2;

use super::DrawTarget;
use super::shapes;
use super::vertex::{Palette, Vertex};
use crate::sim::{Ball, BrickGrid, Paddle};

/// Collects one frame of geometry for upload
#[derive(Debug, Clone)]
pub struct SceneBuilder {
    vertices: Vec<Vertex>,
    palette: Palette,
    circle_segments: u32,
}

impl SceneBuilder {
    pub fn new(palette: Palette, circle_segments: u32) -> Self {
        Self {
            vertices: Vec::with_capacity(256),
            palette,
            circle_segments,
        }
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }
}

impl DrawTarget for SceneBuilder {
    fn clear(&mut self) {
        self.vertices.clear();
    }

    fn draw_paddle(&mut self, paddle: &Paddle) {
        shapes::rect(
            &mut self.vertices,
            Vec2::new(paddle.x, paddle.y()),
            Vec2::new(paddle.width, paddle.height),
            self.palette.paddle,
        );
    }

    fn draw_bricks(&mut self, bricks: &BrickGrid) {
        for brick in bricks.visible() {
            shapes::rect(
                &mut self.vertices,
                brick.pos,
                Vec2::new(brick.width, brick.height),
                self.palette.brick,
            );
        }
    }

    fn draw_ball(&mut self, ball: &Ball) {
        shapes::circle(
            &mut self.vertices,
            ball.pos,
            ball.radius,
            self.palette.ball,
            self.circle_segments,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::render_frame;
    use crate::sim::{BrickStatus, GameSession};

    #[test]
    fn test_frame_vertex_budget() {
        let mut session = GameSession::new();
        let mut scene = SceneBuilder::new(Palette::STANDARD, 12);

        render_frame(&mut scene, &session);
        // paddle + 15 bricks as quads, ball as a 12-triangle fan
        assert_eq!(scene.vertices().len(), 6 + 15 * 6 + 12 * 3);

        session.bricks.get_mut(3, 1).unwrap().status = BrickStatus::Broken;
        render_frame(&mut scene, &session);
        assert_eq!(scene.vertices().len(), 6 + 14 * 6 + 12 * 3);
    }

    #[test]
    fn test_draw_order_and_colors() {
        let session = GameSession::new();
        let mut scene = SceneBuilder::new(Palette::HIGH_CONTRAST, 8);
        render_frame(&mut scene, &session);

        let v = scene.vertices();
        assert_eq!(v[0].color, Palette::HIGH_CONTRAST.paddle);
        assert_eq!(v[0].position, [202.5, 310.0]);
        assert_eq!(v[6].color, Palette::HIGH_CONTRAST.brick);
        assert_eq!(v[v.len() - 1].color, Palette::HIGH_CONTRAST.ball);
    }
}
