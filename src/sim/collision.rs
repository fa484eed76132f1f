//! Collision detection and response
//!
//! Walls and the paddle are tested against the ball's *next* position; the
//! ball is never pushed back inside, only its velocity changes. Bricks are
//! tested against the ball's current center.

use glam::Vec2;

use super::state::{Ball, BrickGrid, BrickStatus, Paddle};
use crate::consts::{MAX_BOUNCE_ANGLE, PLAYFIELD_HEIGHT, PLAYFIELD_WIDTH};

/// A brick broken by the ball this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrickHit {
    pub column: usize,
    pub row: usize,
}

/// Ball's next x leaves [radius, width - radius]
#[inline]
pub fn hits_side_wall(ball: &Ball) -> bool {
    let x = ball.projected().x;
    x > PLAYFIELD_WIDTH - ball.radius || x < ball.radius
}

/// Ball's next y goes above the top wall
#[inline]
pub fn hits_top_wall(ball: &Ball) -> bool {
    ball.projected().y < ball.radius
}

/// Ball's next y crosses into the paddle plane
#[inline]
pub fn reaches_bottom(ball: &Ball) -> bool {
    ball.projected().y > PLAYFIELD_HEIGHT - ball.radius
}

/// Deflection angle for a ball at `ball_x` striking the paddle.
///
/// Zero at the paddle center, `±MAX_BOUNCE_ANGLE` at the edges. Only
/// bounded when `ball_x` actually lies over the paddle.
pub fn paddle_bounce_angle(ball_x: f32, paddle: &Paddle) -> f32 {
    let distance_from_center = ball_x - paddle.center();
    (distance_from_center / (paddle.width / 2.0)) * MAX_BOUNCE_ANGLE
}

/// Upward velocity of magnitude `speed` leaving at `angle` from vertical
#[inline]
pub fn bounce_velocity(angle: f32, speed: f32) -> Vec2 {
    Vec2::new(angle.sin() * speed, -angle.cos() * speed)
}

/// Break every visible brick whose interior contains the ball center.
///
/// Bricks are visited column-major. Each hit negates the ball's vertical
/// velocity, marks the brick Broken and decrements `remaining`. Broken
/// bricks are skipped, so a brick can never be credited twice.
pub fn check_brick_collisions(
    ball: &mut Ball,
    bricks: &mut BrickGrid,
    remaining: &mut usize,
) -> Vec<BrickHit> {
    let mut hits = Vec::new();

    for brick in bricks.iter_mut() {
        if !brick.is_visible() || !brick.contains(ball.pos) {
            continue;
        }

        ball.vel.y = -ball.vel.y;
        brick.status = BrickStatus::Broken;
        *remaining = remaining.saturating_sub(1);
        hits.push(BrickHit {
            column: brick.column,
            row: brick.row,
        });

        if *remaining == 0 {
            break;
        }
    }

    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::BALL_SPEED;
    use std::f32::consts::FRAC_PI_3;

    fn ball(x: f32, y: f32, dx: f32, dy: f32) -> Ball {
        Ball::at(Vec2::new(x, y), Vec2::new(dx, dy))
    }

    #[test]
    fn test_side_walls_use_projected_position() {
        assert!(hits_side_wall(&ball(469.0, 100.0, 2.0, 0.0)));
        assert!(!hits_side_wall(&ball(468.0, 100.0, 2.0, 0.0)));
        assert!(hits_side_wall(&ball(11.0, 100.0, -2.0, 0.0)));
        // Moving away from a wall the ball already overlaps still counts
        assert!(hits_side_wall(&ball(5.0, 100.0, 2.0, 0.0)));
    }

    #[test]
    fn test_top_and_bottom_thresholds() {
        assert!(hits_top_wall(&ball(100.0, 11.0, 0.0, -2.0)));
        assert!(!hits_top_wall(&ball(100.0, 12.0, 0.0, -2.0)));
        assert!(reaches_bottom(&ball(100.0, 309.0, 0.0, 2.0)));
        assert!(!reaches_bottom(&ball(100.0, 308.0, 0.0, 2.0)));
    }

    #[test]
    fn test_bounce_angle_center_and_edges() {
        let paddle = Paddle::default();
        assert_eq!(paddle_bounce_angle(paddle.center(), &paddle), 0.0);
        assert!((paddle_bounce_angle(paddle.x, &paddle) + FRAC_PI_3).abs() < 1e-6);
        assert!((paddle_bounce_angle(paddle.right(), &paddle) - FRAC_PI_3).abs() < 1e-6);
    }

    #[test]
    fn test_bounce_velocity_keeps_speed() {
        let center = bounce_velocity(0.0, BALL_SPEED);
        assert_eq!(center, Vec2::new(0.0, -2.0));

        let edge = bounce_velocity(-FRAC_PI_3, BALL_SPEED);
        assert!((edge.x - (-1.732_050_8)).abs() < 1e-4);
        assert!((edge.y - (-1.0)).abs() < 1e-4);
        assert!((edge.length() - BALL_SPEED).abs() < 1e-5);
    }

    #[test]
    fn test_brick_hit_breaks_and_reflects() {
        let mut bricks = BrickGrid::new();
        let mut remaining = bricks.len();
        // Inside brick (1, 0): x 115..190, y 30..50
        let mut b = ball(150.0, 40.0, 2.0, -2.0);

        let hits = check_brick_collisions(&mut b, &mut bricks, &mut remaining);
        assert_eq!(hits, vec![BrickHit { column: 1, row: 0 }]);
        assert_eq!(b.vel, Vec2::new(2.0, 2.0));
        assert_eq!(remaining, 14);
        assert!(!bricks.get(1, 0).unwrap().is_visible());

        // Same spot again: already broken, nothing happens
        let hits = check_brick_collisions(&mut b, &mut bricks, &mut remaining);
        assert!(hits.is_empty());
        assert_eq!(b.vel, Vec2::new(2.0, 2.0));
        assert_eq!(remaining, 14);
    }

    #[test]
    fn test_gap_between_bricks_is_empty() {
        let mut bricks = BrickGrid::new();
        let mut remaining = bricks.len();
        // Horizontal padding between columns 0 and 1
        let mut b = ball(110.0, 40.0, 0.0, -2.0);
        assert!(check_brick_collisions(&mut b, &mut bricks, &mut remaining).is_empty());
        assert_eq!(remaining, 15);
    }
}
