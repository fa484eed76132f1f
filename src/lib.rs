//! Brick Breaker - a classic ball-and-paddle arcade game
//!
//! Core modules:
//! - `sim`: Per-frame simulation (motion, collisions, round outcomes)
//! - `game`: Frame loop state machine wiring the simulation to its collaborators
//! - `platform`: Frame scheduling and notification seams
//! - `renderer`: WebGPU rendering pipeline
//! - `settings`: Player preferences

pub mod game;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use game::Game;
pub use settings::{QualityPreset, Settings};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_WIDTH: f32 = 480.0;
    pub const PLAYFIELD_HEIGHT: f32 = 320.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    /// Speed the ball is re-normalised to on every paddle hit (pixels/frame)
    pub const BALL_SPEED: f32 = 2.0;
    /// Velocity at session start and after every reset
    pub const BALL_START_VEL: (f32, f32) = (2.0, 2.0);
    /// Ball y after a reset (just above the paddle)
    pub const BALL_RESET_Y: f32 = PLAYFIELD_HEIGHT - 30.0;

    /// Paddle defaults - paddle sits on the bottom edge
    pub const PADDLE_WIDTH: f32 = 75.0;
    pub const PADDLE_HEIGHT: f32 = 10.0;
    /// Horizontal distance covered per frame while a key is held
    pub const PADDLE_STEP: f32 = 7.0;
    /// Steepest deflection off the paddle edges (60 degrees)
    pub const MAX_BOUNCE_ANGLE: f32 = std::f32::consts::FRAC_PI_3;

    /// Brick grid layout
    pub const BRICK_COLUMNS: usize = 5;
    pub const BRICK_ROWS: usize = 3;
    pub const BRICK_COUNT: usize = BRICK_COLUMNS * BRICK_ROWS;
    pub const BRICK_WIDTH: f32 = 75.0;
    pub const BRICK_HEIGHT: f32 = 20.0;
    pub const BRICK_PADDING: f32 = 10.0;
    pub const BRICK_OFFSET_TOP: f32 = 30.0;
    pub const BRICK_OFFSET_LEFT: f32 = 30.0;
}

/// Horizontal paddle position that centers it on the playfield
#[inline]
pub fn centered_paddle_x() -> f32 {
    (consts::PLAYFIELD_WIDTH - consts::PADDLE_WIDTH) / 2.0
}

/// Top-left corner of the brick at (column, row)
#[inline]
pub fn brick_origin(column: usize, row: usize) -> Vec2 {
    use consts::*;
    Vec2::new(
        column as f32 * (BRICK_WIDTH + BRICK_PADDING) + BRICK_OFFSET_LEFT,
        row as f32 * (BRICK_HEIGHT + BRICK_PADDING) + BRICK_OFFSET_TOP,
    )
}
