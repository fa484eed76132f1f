//! Frame loop state machine
//!
//! [`Game`] owns the session and drives it one display frame at a time. It
//! keeps at most one frame request outstanding, and ends a round by
//! cancelling that request, notifying the player, resetting, and scheduling a
//! fresh frame rather than re-entering the loop.

use crate::platform::{FrameRequestId, FrameScheduler, Notifier};
use crate::renderer::{DrawTarget, render_frame};
use crate::sim::{
    FrameOutcome, GameSession, InputEvent, InputQueue, RoundOutcome, SessionPhase, advance_frame,
};

/// A running game bound to its platform collaborators
pub struct Game<S: FrameScheduler, N: Notifier> {
    session: GameSession,
    input: InputQueue,
    scheduler: S,
    notifier: N,
    pending_frame: Option<FrameRequestId>,
}

impl<S: FrameScheduler, N: Notifier> Game<S, N> {
    pub fn new(scheduler: S, notifier: N) -> Self {
        Self {
            session: GameSession::new(),
            input: InputQueue::new(),
            scheduler,
            notifier,
            pending_frame: None,
        }
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut GameSession {
        &mut self.session
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// The frame request currently waiting to fire
    pub fn pending_frame(&self) -> Option<FrameRequestId> {
        self.pending_frame
    }

    /// Queue an input event for the next frame
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Queue a DOM key transition. Returns false for keys the game ignores.
    pub fn push_key(&mut self, name: &str, pressed: bool) -> bool {
        self.input.push_key(name, pressed)
    }

    /// Release both direction keys (e.g. the window lost focus)
    pub fn release_keys(&mut self) {
        self.input.push(InputEvent::ReleaseAll);
    }

    /// Queue a pause. Only a running session is affected, and repeated
    /// requests before the next frame still leave it paused.
    pub fn request_pause(&mut self) {
        self.input.push(InputEvent::PauseRequested);
    }

    /// Begin the frame loop. A no-op while a frame is already pending.
    pub fn start(&mut self) {
        if self.pending_frame.is_none() {
            log::info!("Frame loop started");
            self.schedule_next();
        }
    }

    /// Cancel the pending frame, if any
    pub fn stop(&mut self) {
        if let Some(id) = self.pending_frame.take() {
            self.scheduler.cancel_frame(id);
            log::info!("Frame loop stopped");
        }
    }

    /// Handle one display refresh: step, draw, and schedule the next frame
    pub fn on_frame<T: DrawTarget + ?Sized>(&mut self, target: &mut T) -> FrameOutcome {
        // The request that brought us here has fired
        self.pending_frame = None;

        let outcome = advance_frame(&mut self.session, &mut self.input);
        match outcome {
            FrameOutcome::RoundOver(result) => self.reset_round(result, target),
            FrameOutcome::Continue | FrameOutcome::Idle => {
                render_frame(target, &self.session);
                self.schedule_next();
            }
        }
        outcome
    }

    /// End the current round and start a new one.
    ///
    /// The notifier may block; no frame is pending while it runs, so play
    /// resumes only after it returns.
    pub fn reset_round<T: DrawTarget + ?Sized>(&mut self, outcome: RoundOutcome, target: &mut T) {
        self.session.phase = SessionPhase::Resetting;
        if let Some(id) = self.pending_frame.take() {
            self.scheduler.cancel_frame(id);
        }

        self.notifier.notify(outcome);

        self.session.reset_round();
        self.session.phase = SessionPhase::Running;
        render_frame(target, &self.session);
        self.schedule_next();
    }

    fn schedule_next(&mut self) {
        if let Some(stale) = self.pending_frame.take() {
            log::warn!("Frame {:?} still pending, cancelling it", stale);
            self.scheduler.cancel_frame(stale);
        }
        self.pending_frame = self.scheduler.request_frame();
        if self.pending_frame.is_none() {
            log::error!("Frame request refused, loop halted");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{LogNotifier, ManualScheduler};
    use crate::renderer::{Palette, SceneBuilder};
    use crate::sim::{Ball, BrickStatus};
    use glam::Vec2;

    type TestGame = Game<ManualScheduler, LogNotifier>;

    fn game() -> (TestGame, SceneBuilder) {
        (
            Game::new(ManualScheduler::new(), LogNotifier::default()),
            SceneBuilder::new(Palette::STANDARD, 8),
        )
    }

    /// Fire pending frames until `frames` have run or the loop halts
    fn pump(game: &mut TestGame, scene: &mut SceneBuilder, frames: usize) {
        for _ in 0..frames {
            if game.scheduler_mut().fire().is_none() {
                break;
            }
            game.on_frame(scene);
            assert_eq!(game.scheduler().outstanding(), 1);
        }
    }

    fn assert_fresh_round(session: &GameSession) {
        assert_eq!(session.ball.pos, Vec2::new(240.0, 290.0));
        assert_eq!(session.ball.vel, Vec2::new(2.0, 2.0));
        assert_eq!(session.paddle.x, 202.5);
        assert_eq!(session.bricks_remaining, 15);
        assert!(session.bricks.iter().all(|b| b.is_visible()));
        assert_eq!(session.phase, SessionPhase::Running);
    }

    #[test]
    fn test_start_is_idempotent() {
        let (mut game, _) = game();
        game.start();
        game.start();
        assert_eq!(game.scheduler().requested, 1);
        assert_eq!(game.scheduler().outstanding(), 1);
        assert!(game.pending_frame().is_some());

        game.stop();
        assert_eq!(game.scheduler().outstanding(), 0);
        assert!(game.pending_frame().is_none());
    }

    #[test]
    fn test_single_outstanding_frame_across_rounds() {
        let (mut game, mut scene) = game();
        game.start();
        pump(&mut game, &mut scene, 3000);
        assert_eq!(game.session().frame_count, 3000);
        assert!(game.session().rounds_lost > 0);
        assert_eq!(
            game.notifier().history.len() as u32,
            game.session().rounds_lost + game.session().rounds_won
        );
    }

    #[test]
    fn test_unattended_ball_is_lost_and_round_resets() {
        let (mut game, mut scene) = game();
        game.start();

        // From (240, 160) moving (2, 2) the ball reaches the bottom at x = 390
        pump(&mut game, &mut scene, 74);
        assert!(game.notifier().history.is_empty());
        pump(&mut game, &mut scene, 1);

        assert_eq!(game.notifier().history, vec![RoundOutcome::Lost]);
        assert_eq!(game.session().rounds_lost, 1);
        assert_fresh_round(game.session());
        // Reset state was drawn immediately
        assert_eq!(scene.vertices()[0].position, [202.5, 310.0]);
    }

    #[test]
    fn test_clearing_the_grid_wins_and_resets() {
        let (mut game, mut scene) = game();
        {
            let session = game.session_mut();
            for brick in session.bricks.iter_mut() {
                if (brick.column, brick.row) != (4, 2) {
                    brick.status = BrickStatus::Broken;
                }
            }
            session.bricks_remaining = 1;
            // Brick (4, 2) spans x 370..445, y 90..110
            session.ball = Ball::at(Vec2::new(400.0, 98.0), Vec2::new(-2.0, 2.0));
        }
        game.start();
        pump(&mut game, &mut scene, 1);

        assert_eq!(game.notifier().history, vec![RoundOutcome::Won]);
        assert_eq!(game.session().rounds_won, 1);
        assert_fresh_round(game.session());
    }

    #[test]
    fn test_reset_cancels_pending_frame() {
        let (mut game, mut scene) = game();
        game.start();
        game.reset_round(RoundOutcome::Lost, &mut scene);

        assert_eq!(game.scheduler().cancelled, 1);
        assert_eq!(game.scheduler().outstanding(), 1);
        assert_fresh_round(game.session());
    }

    #[test]
    fn test_paused_frames_keep_loop_alive() {
        let (mut game, mut scene) = game();
        game.start();
        pump(&mut game, &mut scene, 1);

        game.request_pause();
        pump(&mut game, &mut scene, 10);
        assert_eq!(game.session().phase, SessionPhase::Paused);
        assert_eq!(game.session().frame_count, 1);
        // Paused sessions ignore further pause requests from focus loss
        game.request_pause();
        assert!(game.push_key("Escape", true));
        pump(&mut game, &mut scene, 1);
        assert_eq!(game.session().phase, SessionPhase::Running);
        assert_eq!(game.session().frame_count, 2);
    }

    #[test]
    fn test_release_keys_stops_paddle() {
        let (mut game, mut scene) = game();
        game.start();
        assert!(game.push_key("ArrowRight", true));
        pump(&mut game, &mut scene, 2);
        assert_eq!(game.session().paddle.x, 216.5);

        game.release_keys();
        pump(&mut game, &mut scene, 2);
        assert_eq!(game.session().paddle.x, 216.5);
    }

    #[test]
    fn test_blur_then_hidden_tab_stays_paused() {
        let (mut game, mut scene) = game();
        game.start();

        // blur and visibilitychange both land before the next frame
        game.release_keys();
        game.request_pause();
        game.release_keys();
        game.request_pause();
        pump(&mut game, &mut scene, 1);

        assert_eq!(game.session().phase, SessionPhase::Paused);
        assert_eq!(game.session().frame_count, 0);
    }

    #[test]
    fn test_pause_key_then_focus_loss_stays_paused() {
        let (mut game, mut scene) = game();
        game.start();

        assert!(game.push_key("p", true));
        game.request_pause();
        pump(&mut game, &mut scene, 1);

        assert_eq!(game.session().phase, SessionPhase::Paused);
    }
}
