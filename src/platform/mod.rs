//! Platform abstraction layer
//!
//! The frame loop talks to its host through two seams:
//! - [`FrameScheduler`]: "call me again next display refresh", cancellable
//! - [`Notifier`]: end-of-round message, allowed to block
//!
//! The browser implementations live in the binary; the headless ones here
//! drive native runs and tests.

pub mod headless;

pub use headless::{LogNotifier, ManualScheduler};

use crate::sim::RoundOutcome;

/// Handle for an outstanding frame request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameRequestId(pub i32);

/// Schedules the next invocation of the frame loop
pub trait FrameScheduler {
    /// Ask for one callback at the next display refresh.
    /// Returns `None` if the host refused the request.
    fn request_frame(&mut self) -> Option<FrameRequestId>;

    /// Cancel a request that has not fired yet
    fn cancel_frame(&mut self, id: FrameRequestId);
}

/// Shows the end-of-round message
pub trait Notifier {
    /// Must not return until the frame loop may resume
    fn notify(&mut self, outcome: RoundOutcome);
}
