//! Game state and core simulation types
//!
//! Everything the frame driver mutates lives in [`GameSession`].

use glam::Vec2;

use super::input::InputLatch;
use crate::consts::*;
use crate::{brick_origin, centered_paddle_x};

/// Current phase of the frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Active gameplay
    Running,
    /// Frames keep rendering but geometry is frozen
    Paused,
    /// Round ended; waiting for the notification to return
    Resetting,
}

/// How a round ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    /// Every brick was broken
    Won,
    /// Ball reached the bottom edge away from the paddle
    Lost,
}

impl RoundOutcome {
    /// Message shown to the player when the round ends
    pub fn message(&self) -> &'static str {
        match self {
            RoundOutcome::Won => "You Win!",
            RoundOutcome::Lost => "Game over!",
        }
    }
}

/// Something notable that happened during a frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Ball reflected off a side or the top wall
    WallBounce,
    /// Ball deflected by the paddle at the given angle (radians from vertical)
    PaddleHit { angle: f32 },
    /// A brick went from Visible to Broken
    BrickBroken { column: usize, row: usize },
    /// Round ended
    RoundOver(RoundOutcome),
}

/// The ball
#[derive(Debug, Clone, PartialEq)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

impl Ball {
    /// Ball at the playfield center, as at session start
    pub fn new() -> Self {
        Self::at(
            Vec2::new(PLAYFIELD_WIDTH / 2.0, PLAYFIELD_HEIGHT / 2.0),
            Vec2::from(BALL_START_VEL),
        )
    }

    /// Ball at an explicit position and velocity
    pub fn at(pos: Vec2, vel: Vec2) -> Self {
        Self {
            pos,
            vel,
            radius: BALL_RADIUS,
        }
    }

    /// Position the ball will occupy after one more step
    #[inline]
    pub fn projected(&self) -> Vec2 {
        self.pos + self.vel
    }

    pub fn speed(&self) -> f32 {
        self.vel.length()
    }
}

impl Default for Ball {
    fn default() -> Self {
        Self::new()
    }
}

/// The player's paddle (x is its left edge, y is fixed at the bottom)
#[derive(Debug, Clone, PartialEq)]
pub struct Paddle {
    pub x: f32,
    pub width: f32,
    pub height: f32,
}

impl Default for Paddle {
    fn default() -> Self {
        Self {
            x: centered_paddle_x(),
            width: PADDLE_WIDTH,
            height: PADDLE_HEIGHT,
        }
    }
}

impl Paddle {
    /// Top edge of the paddle
    #[inline]
    pub fn y(&self) -> f32 {
        PLAYFIELD_HEIGHT - self.height
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn center(&self) -> f32 {
        self.x + self.width / 2.0
    }

    /// Whether a horizontal position lies over the paddle (edges included)
    #[inline]
    pub fn spans(&self, x: f32) -> bool {
        x >= self.x && x <= self.right()
    }

    /// Apply one frame of held-key movement. Right wins when both are held.
    pub fn apply_input(&mut self, input: &InputLatch) {
        if input.right_held && self.right() < PLAYFIELD_WIDTH {
            self.x += PADDLE_STEP;
        } else if input.left_held && self.x > 0.0 {
            self.x -= PADDLE_STEP;
        }
        // Steps are not a divisor of the travel range, so the last one overshoots
        self.x = self.x.clamp(0.0, PLAYFIELD_WIDTH - self.width);
    }
}

/// Brick visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrickStatus {
    Visible,
    Broken,
}

/// A brick in the grid
#[derive(Debug, Clone, PartialEq)]
pub struct Brick {
    pub column: usize,
    pub row: usize,
    /// Top-left corner
    pub pos: Vec2,
    pub width: f32,
    pub height: f32,
    pub status: BrickStatus,
}

impl Brick {
    pub fn new(column: usize, row: usize) -> Self {
        Self {
            column,
            row,
            pos: brick_origin(column, row),
            width: BRICK_WIDTH,
            height: BRICK_HEIGHT,
            status: BrickStatus::Visible,
        }
    }

    #[inline]
    pub fn is_visible(&self) -> bool {
        self.status == BrickStatus::Visible
    }

    /// Strict containment: a point on the border is not inside
    pub fn contains(&self, point: Vec2) -> bool {
        point.x > self.pos.x
            && point.x < self.pos.x + self.width
            && point.y > self.pos.y
            && point.y < self.pos.y + self.height
    }
}

/// Fixed brick grid stored flat in column-major order
#[derive(Debug, Clone, PartialEq)]
pub struct BrickGrid {
    bricks: Vec<Brick>,
}

impl BrickGrid {
    pub fn new() -> Self {
        let mut bricks = Vec::with_capacity(BRICK_COUNT);
        for column in 0..BRICK_COLUMNS {
            for row in 0..BRICK_ROWS {
                bricks.push(Brick::new(column, row));
            }
        }
        Self { bricks }
    }

    /// Flat index of (column, row)
    #[inline]
    pub fn index(column: usize, row: usize) -> usize {
        column * BRICK_ROWS + row
    }

    pub fn get(&self, column: usize, row: usize) -> Option<&Brick> {
        if column >= BRICK_COLUMNS || row >= BRICK_ROWS {
            return None;
        }
        self.bricks.get(Self::index(column, row))
    }

    pub fn get_mut(&mut self, column: usize, row: usize) -> Option<&mut Brick> {
        if column >= BRICK_COLUMNS || row >= BRICK_ROWS {
            return None;
        }
        self.bricks.get_mut(Self::index(column, row))
    }

    /// All bricks, column-major
    pub fn iter(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Brick> {
        self.bricks.iter_mut()
    }

    /// Visible bricks, column-major
    pub fn visible(&self) -> impl Iterator<Item = &Brick> {
        self.bricks.iter().filter(|b| b.is_visible())
    }

    pub fn len(&self) -> usize {
        self.bricks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bricks.is_empty()
    }

    /// Make every brick visible again
    pub fn restore_all(&mut self) {
        for brick in &mut self.bricks {
            brick.status = BrickStatus::Visible;
        }
    }
}

impl Default for BrickGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Complete game session
#[derive(Debug, Clone)]
pub struct GameSession {
    pub ball: Ball,
    pub paddle: Paddle,
    pub bricks: BrickGrid,
    /// Visible bricks left; the round is won when this reaches zero
    pub bricks_remaining: usize,
    /// Held keys, updated only from drained input events
    pub input: InputLatch,
    pub phase: SessionPhase,
    /// Frames advanced since the session was created
    pub frame_count: u64,
    /// Rounds completed, by outcome
    pub rounds_won: u32,
    pub rounds_lost: u32,
    /// Events produced by the most recent frame
    pub events: Vec<GameEvent>,
}

impl GameSession {
    pub fn new() -> Self {
        Self {
            ball: Ball::new(),
            paddle: Paddle::default(),
            bricks: BrickGrid::new(),
            bricks_remaining: BRICK_COUNT,
            input: InputLatch::default(),
            phase: SessionPhase::Running,
            frame_count: 0,
            rounds_won: 0,
            rounds_lost: 0,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == SessionPhase::Running
    }

    /// Flip between Running and Paused; no effect while resetting
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            SessionPhase::Running => SessionPhase::Paused,
            SessionPhase::Paused => SessionPhase::Running,
            SessionPhase::Resetting => SessionPhase::Resetting,
        };
    }

    /// Running becomes Paused; every other phase is left alone
    pub fn pause(&mut self) {
        if self.phase == SessionPhase::Running {
            self.phase = SessionPhase::Paused;
        }
    }

    /// Restore ball, paddle and bricks for a new round.
    ///
    /// Held keys survive the reset; the phase is left to the frame loop.
    pub fn reset_round(&mut self) {
        self.ball = Ball::at(
            Vec2::new(PLAYFIELD_WIDTH / 2.0, BALL_RESET_Y),
            Vec2::from(BALL_START_VEL),
        );
        self.paddle = Paddle::default();
        self.bricks.restore_all();
        self.bricks_remaining = BRICK_COUNT;
    }

    /// Tally a finished round
    pub fn record_outcome(&mut self, outcome: RoundOutcome) {
        match outcome {
            RoundOutcome::Won => self.rounds_won += 1,
            RoundOutcome::Lost => self.rounds_lost += 1,
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
