//! Headless platform: manually pumped frames and logged notifications

use super::{FrameRequestId, FrameScheduler, Notifier};
use crate::sim::RoundOutcome;

/// Frame scheduler driven by the caller instead of a display
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: i32,
    pending: Vec<FrameRequestId>,
    /// Total requests ever made
    pub requested: u32,
    /// Total requests cancelled before firing
    pub cancelled: u32,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests that have neither fired nor been cancelled
    pub fn outstanding(&self) -> usize {
        self.pending.len()
    }

    /// Fire the oldest outstanding request, if any
    pub fn fire(&mut self) -> Option<FrameRequestId> {
        if self.pending.is_empty() {
            return None;
        }
        Some(self.pending.remove(0))
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> Option<FrameRequestId> {
        self.next_id += 1;
        let id = FrameRequestId(self.next_id);
        self.pending.push(id);
        self.requested += 1;
        Some(id)
    }

    fn cancel_frame(&mut self, id: FrameRequestId) {
        let before = self.pending.len();
        self.pending.retain(|&p| p != id);
        if self.pending.len() < before {
            self.cancelled += 1;
        }
    }
}

/// Notifier that logs the message and returns immediately
#[derive(Debug, Default)]
pub struct LogNotifier {
    /// Every outcome notified so far, oldest first
    pub history: Vec<RoundOutcome>,
}

impl Notifier for LogNotifier {
    fn notify(&mut self, outcome: RoundOutcome) {
        log::info!("{}", outcome.message());
        self.history.push(outcome);
    }
}
