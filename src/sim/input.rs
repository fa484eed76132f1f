//! Keyboard input as messages
//!
//! Event handlers never touch geometry. They push [`InputEvent`]s, and the
//! frame driver drains the queue into the [`InputLatch`] before moving anything.

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    /// Toggles pause on key down
    Pause,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value. Unrecognized keys are ignored.
    pub fn from_key_name(name: &str) -> Option<Self> {
        match name {
            "Left" | "ArrowLeft" => Some(Key::Left),
            "Right" | "ArrowRight" => Some(Key::Right),
            "Escape" | "p" | "P" => Some(Key::Pause),
            _ => None,
        }
    }
}

/// A key transition or focus change reported by the platform
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    KeyDown(Key),
    KeyUp(Key),
    /// Focus lost: drop both direction keys
    ReleaseAll,
    /// Pause if running. Repeats are harmless, unlike `KeyDown(Pause)`.
    PauseRequested,
}

/// What an applied event asks of the session phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PauseCommand {
    Toggle,
    Pause,
}

/// Held-key flags read by the paddle each frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputLatch {
    pub left_held: bool,
    pub right_held: bool,
}

impl InputLatch {
    pub fn set_left_held(&mut self, held: bool) {
        self.left_held = held;
    }

    pub fn set_right_held(&mut self, held: bool) {
        self.right_held = held;
    }

    /// Apply one event, returning any phase change it asks for
    pub fn apply(&mut self, event: InputEvent) -> Option<PauseCommand> {
        match event {
            InputEvent::KeyDown(Key::Left) => self.set_left_held(true),
            InputEvent::KeyUp(Key::Left) => self.set_left_held(false),
            InputEvent::KeyDown(Key::Right) => self.set_right_held(true),
            InputEvent::KeyUp(Key::Right) => self.set_right_held(false),
            InputEvent::KeyDown(Key::Pause) => return Some(PauseCommand::Toggle),
            InputEvent::KeyUp(Key::Pause) => {}
            InputEvent::ReleaseAll => self.release_all(),
            InputEvent::PauseRequested => return Some(PauseCommand::Pause),
        }
        None
    }

    /// Release both directions (focus lost)
    pub fn release_all(&mut self) {
        self.left_held = false;
        self.right_held = false;
    }
}

/// Pending input events, in arrival order
#[derive(Debug, Default)]
pub struct InputQueue {
    events: Vec<InputEvent>,
}

impl InputQueue {
    pub fn new() -> Self {
        Self {
            events: Vec::with_capacity(16),
        }
    }

    /// Push a new input event (called from platform event handlers)
    pub fn push(&mut self, event: InputEvent) {
        self.events.push(event);
    }

    /// Push the event for a DOM key name, if it is one we handle
    pub fn push_key(&mut self, name: &str, pressed: bool) -> bool {
        let Some(key) = Key::from_key_name(name) else {
            return false;
        };
        self.push(if pressed {
            InputEvent::KeyDown(key)
        } else {
            InputEvent::KeyUp(key)
        });
        true
    }

    /// Take all pending events, leaving the queue empty
    pub fn drain(&mut self) -> Vec<InputEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }
}
