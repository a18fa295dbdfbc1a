//! Short lived messages for the player, such as a rejected drop.

use std::time::{Duration, Instant};

pub const ITEM_PLACED: &str = "Item placed!";
pub const INVALID_PLACEMENT: &str = "Invalid placement!";
pub const ROTATION_BLOCKED: &str = "Can't rotate here!";
pub const GAME_RESET: &str = "Game reset!";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackKind {
    Success,
    Error,
    Info,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Info,
            message: message.into(),
        }
    }
}

/// Holds at most one message. A new message replaces the current one and restarts the clock.
pub struct FeedbackSlot {
    duration: Duration,
    current: Option<(Feedback, Instant)>,
}

impl FeedbackSlot {
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            current: None,
        }
    }

    pub fn show(&mut self, feedback: Feedback, now: Instant) {
        self.current = Some((feedback, now + self.duration));
    }

    /// The current message, unless it has expired by `now`
    pub fn current(&self, now: Instant) -> Option<&Feedback> {
        match self.current {
            Some((ref feedback, expires)) if now < expires => Some(feedback),
            _ => None,
        }
    }

    pub fn clear(&mut self) {
        self.current = None;
    }
}
