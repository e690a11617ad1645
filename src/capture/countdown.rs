use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared cancellation flag for a scheduled countdown.
///
/// Clones observe the same flag: whoever scheduled the next tick keeps a clone and skips the
/// tick once the owner cancels.
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// A fresh, live token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Cancel every clone of this token.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// `true` once [`CancelToken::cancel`] was called on any clone.
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}

/// Result of advancing a [`Countdown`] by one tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CountdownStep {
    /// Still counting; this many ticks remain.
    Remaining(u32),
    /// The last tick elapsed; the token is released.
    Fire,
    /// The countdown was cancelled before this tick.
    Cancelled,
}

/// A finite countdown owning the token acquired when it started.
#[derive(Debug)]
pub struct Countdown {
    remaining: u32,
    token: CancelToken,
}

impl Countdown {
    /// Start counting down from `from` (clamped to at least one tick).
    pub fn start(from: u32) -> Self {
        Self {
            remaining: from.max(1),
            token: CancelToken::new(),
        }
    }

    /// Ticks left before firing.
    pub fn remaining(&self) -> u32 {
        self.remaining
    }

    /// Clone of the countdown's token.
    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    /// Advance by one tick.
    pub fn tick(&mut self) -> CountdownStep {
        if self.token.is_cancelled() {
            return CountdownStep::Cancelled;
        }
        if self.remaining <= 1 {
            self.remaining = 0;
            self.token.cancel();
            return CountdownStep::Fire;
        }
        self.remaining -= 1;
        CountdownStep::Remaining(self.remaining)
    }

    /// Release the token without firing.
    pub fn cancel(&mut self) {
        self.remaining = 0;
        self.token.cancel();
    }
}

impl Drop for Countdown {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/capture/countdown.rs"]
mod tests;
