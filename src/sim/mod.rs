//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - One fixed step per display frame
//! - Stable iteration order (column-major over the brick grid)
//! - No rendering or platform dependencies

pub mod collision;
pub mod input;
pub mod state;
pub mod tick;

pub use collision::{BrickHit, bounce_velocity, check_brick_collisions, paddle_bounce_angle};
pub use input::{InputEvent, InputLatch, InputQueue, Key, PauseCommand};
pub use state::{
    Ball, Brick, BrickGrid, BrickStatus, GameEvent, GameSession, Paddle, RoundOutcome,
    SessionPhase,
};
pub use tick::{FrameOutcome, advance_frame};
