//! Per-frame simulation step
//!
//! Advances the session by exactly one display frame.

use super::collision::{
    bounce_velocity, check_brick_collisions, hits_side_wall, hits_top_wall, paddle_bounce_angle,
    reaches_bottom,
};
use super::input::{InputQueue, PauseCommand};
use super::state::{GameEvent, GameSession, RoundOutcome, SessionPhase};
use crate::consts::BALL_SPEED;

/// What the frame loop should do after a step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Session is paused or resetting; nothing moved
    Idle,
    /// Normal frame; schedule the next one
    Continue,
    /// Round ended this frame; the session is now Resetting
    RoundOver(RoundOutcome),
}

/// Advance the game by one frame.
///
/// Order matters: drain input, move paddle, move ball, bounce off walls or
/// the paddle, then break bricks. Bounce decisions look at the ball's next
/// position while brick hits use the position just committed.
pub fn advance_frame(session: &mut GameSession, input: &mut InputQueue) -> FrameOutcome {
    session.events.clear();

    for event in input.drain() {
        match session.input.apply(event) {
            Some(PauseCommand::Toggle) => {
                session.toggle_pause();
                log::info!("Pause toggled: {:?}", session.phase);
            }
            Some(PauseCommand::Pause) => session.pause(),
            None => {}
        }
    }

    if !session.is_running() {
        return FrameOutcome::Idle;
    }

    session.frame_count += 1;

    session.paddle.apply_input(&session.input);

    let ball = &mut session.ball;
    ball.pos += ball.vel;

    if hits_side_wall(ball) {
        ball.vel.x = -ball.vel.x;
        session.events.push(GameEvent::WallBounce);
    }

    if hits_top_wall(ball) {
        ball.vel.y = -ball.vel.y;
        session.events.push(GameEvent::WallBounce);
    } else if reaches_bottom(ball) {
        if session.paddle.spans(ball.pos.x) {
            let angle = paddle_bounce_angle(ball.pos.x, &session.paddle);
            ball.vel = bounce_velocity(angle, BALL_SPEED);
            session.events.push(GameEvent::PaddleHit { angle });
            log::trace!("Paddle hit at {:.1} rad", angle);
        } else {
            return end_round(session, RoundOutcome::Lost);
        }
    }

    let hits = check_brick_collisions(
        &mut session.ball,
        &mut session.bricks,
        &mut session.bricks_remaining,
    );
    for hit in hits {
        log::debug!(
            "Brick ({}, {}) broken, {} left",
            hit.column,
            hit.row,
            session.bricks_remaining
        );
        session.events.push(GameEvent::BrickBroken {
            column: hit.column,
            row: hit.row,
        });
    }

    if session.bricks_remaining == 0 {
        return end_round(session, RoundOutcome::Won);
    }

    FrameOutcome::Continue
}

fn end_round(session: &mut GameSession, outcome: RoundOutcome) -> FrameOutcome {
    session.phase = SessionPhase::Resetting;
    session.record_outcome(outcome);
    session.events.push(GameEvent::RoundOver(outcome));
    log::info!(
        "Round over: {:?} after {} frames (won {}, lost {})",
        outcome,
        session.frame_count,
        session.rounds_won,
        session.rounds_lost
    );
    FrameOutcome::RoundOver(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::input::{InputEvent, Key};
    use crate::sim::state::{Ball, BrickStatus};
    use glam::Vec2;

    fn session_with_ball(x: f32, y: f32, dx: f32, dy: f32) -> GameSession {
        let mut session = GameSession::new();
        session.ball = Ball::at(Vec2::new(x, y), Vec2::new(dx, dy));
        session
    }

    #[test]
    fn test_ball_moves_by_velocity() {
        let mut session = GameSession::new();
        let mut input = InputQueue::new();
        let before = session.ball.clone();

        let outcome = advance_frame(&mut session, &mut input);
        assert_eq!(outcome, FrameOutcome::Continue);
        assert_eq!(session.ball.pos, before.pos + before.vel);
        assert_eq!(session.frame_count, 1);
    }

    #[test]
    fn test_paddle_follows_queued_keys() {
        let mut session = GameSession::new();
        let mut input = InputQueue::new();

        input.push(InputEvent::KeyDown(Key::Left));
        advance_frame(&mut session, &mut input);
        assert_eq!(session.paddle.x, 202.5 - 7.0);
        assert!(input.is_empty());

        // Latch stays held without new events
        advance_frame(&mut session, &mut input);
        assert_eq!(session.paddle.x, 202.5 - 14.0);

        input.push(InputEvent::KeyUp(Key::Left));
        advance_frame(&mut session, &mut input);
        assert_eq!(session.paddle.x, 202.5 - 14.0);
    }

    #[test]
    fn test_dead_center_paddle_hit_goes_straight_up() {
        let mut session = session_with_ball(240.0, 307.0, 0.0, 2.0);
        let mut input = InputQueue::new();

        let outcome = advance_frame(&mut session, &mut input);
        assert_eq!(outcome, FrameOutcome::Continue);
        assert_eq!(session.ball.vel, Vec2::new(0.0, -2.0));
        assert_eq!(session.events, vec![GameEvent::PaddleHit { angle: 0.0 }]);
    }

    #[test]
    fn test_left_edge_paddle_hit_is_steepest() {
        // Lands exactly on the paddle's left edge (x = 202.5)
        let mut session = session_with_ball(200.5, 307.0, 2.0, 2.0);
        let mut input = InputQueue::new();

        advance_frame(&mut session, &mut input);
        assert!((session.ball.vel.x - (-1.732)).abs() < 1e-3);
        assert!((session.ball.vel.y - (-1.0)).abs() < 1e-4);
    }

    #[test]
    fn test_missing_paddle_loses_round() {
        let mut session = session_with_ball(100.0, 307.0, 2.0, 2.0);
        let mut input = InputQueue::new();

        let outcome = advance_frame(&mut session, &mut input);
        assert_eq!(outcome, FrameOutcome::RoundOver(RoundOutcome::Lost));
        assert_eq!(session.phase, SessionPhase::Resetting);
        assert_eq!(session.rounds_lost, 1);

        // No further movement until the loop resets the round
        let pos = session.ball.pos;
        assert_eq!(advance_frame(&mut session, &mut input), FrameOutcome::Idle);
        assert_eq!(session.ball.pos, pos);
    }

    #[test]
    fn test_top_wall_bounce() {
        let mut session = session_with_ball(300.0, 13.0, 2.0, -2.0);
        let mut input = InputQueue::new();

        advance_frame(&mut session, &mut input);
        assert_eq!(session.ball.pos, Vec2::new(302.0, 11.0));
        assert_eq!(session.ball.vel, Vec2::new(2.0, 2.0));
        assert_eq!(session.events, vec![GameEvent::WallBounce]);
    }

    #[test]
    fn test_breaking_last_brick_wins() {
        let mut session = session_with_ball(60.0, 45.0, 2.0, -2.0);
        for brick in session.bricks.iter_mut() {
            if (brick.column, brick.row) != (0, 0) {
                brick.status = BrickStatus::Broken;
            }
        }
        session.bricks_remaining = 1;
        let mut input = InputQueue::new();

        let outcome = advance_frame(&mut session, &mut input);
        assert_eq!(outcome, FrameOutcome::RoundOver(RoundOutcome::Won));
        assert_eq!(session.rounds_won, 1);
        assert_eq!(
            session.events,
            vec![
                GameEvent::BrickBroken { column: 0, row: 0 },
                GameEvent::RoundOver(RoundOutcome::Won),
            ]
        );
    }

    #[test]
    fn test_broken_brick_is_not_hit_again() {
        // Ball drifts slowly through brick (2, 1): x 200..275, y 60..80
        let mut session = session_with_ball(230.0, 62.0, 0.0, 0.5);
        let mut input = InputQueue::new();

        advance_frame(&mut session, &mut input);
        assert_eq!(session.bricks_remaining, 14);
        assert_eq!(session.ball.vel.y, -0.5);

        // Still inside the broken brick on the next frame
        advance_frame(&mut session, &mut input);
        assert_eq!(session.bricks_remaining, 14);
        assert_eq!(session.ball.vel.y, -0.5);
    }

    #[test]
    fn test_pause_freezes_geometry() {
        let mut session = GameSession::new();
        let mut input = InputQueue::new();
        input.push(InputEvent::KeyDown(Key::Pause));
        input.push(InputEvent::KeyDown(Key::Right));

        let pos = session.ball.pos;
        assert_eq!(advance_frame(&mut session, &mut input), FrameOutcome::Idle);
        assert_eq!(session.phase, SessionPhase::Paused);
        assert_eq!(session.ball.pos, pos);
        assert_eq!(session.paddle.x, 202.5);
        // Keys pressed while paused are still latched
        assert!(session.input.right_held);

        input.push(InputEvent::KeyDown(Key::Pause));
        assert_eq!(advance_frame(&mut session, &mut input), FrameOutcome::Continue);
        assert_eq!(session.paddle.x, 209.5);
    }
}
