//! The transient success/failure indicator shown after a submission.

use std::time::{Duration, Instant};

/// How long a terminal result stays visible.
pub const FEEDBACK_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubmissionResult {
    #[default]
    Unknown,
    Success,
    Failure,
}

/// A result plus the single pending deadline that reverts it to `Unknown`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Feedback {
    result: SubmissionResult,
    expires_at: Option<Instant>,
}

impl Feedback {
    pub fn result(&self) -> SubmissionResult {
        self.result
    }

    pub fn expires_at(&self) -> Option<Instant> {
        self.expires_at
    }

    /// Shows `result` and (re)arms the deadline. An earlier deadline is
    /// replaced, so it can never clear this newer result.
    pub fn settle(&mut self, result: SubmissionResult, now: Instant) {
        self.result = result;
        self.expires_at = Some(now + FEEDBACK_DELAY);
    }

    /// Reverts to `Unknown` once the deadline has passed. Returns whether
    /// anything changed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) if now >= deadline => {
                *self = Self::default();
                true
            }
            _ => false,
        }
    }
}
