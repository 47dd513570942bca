//! Cancellation signals for the busy wait
//!
//! The controller holds its busy line high while it works. A panel that is
//! unplugged or wedged never releases it, so every wait consults a
//! [`Cancellation`] between polls.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Decides when a busy wait gives up.
pub trait Cancellation {
    /// Called once when a new busy wait starts
    fn begin_wait(&mut self) {}

    /// Checked before every poll of the busy line
    fn is_cancelled(&mut self) -> bool;
}

/// Wait as long as the controller stays busy
#[derive(Debug, Clone, Copy, Default)]
pub struct Never;

impl Cancellation for Never {
    fn is_cancelled(&mut self) -> bool {
        false
    }
}

/// Give up after a fixed number of polls per wait.
///
/// With the default 1 ms poll interval, `PollLimit::new(5000)` is roughly a
/// five second timeout.
#[derive(Debug, Clone, Copy)]
pub struct PollLimit {
    max_polls: u32,
    polls: u32,
}

impl PollLimit {
    /// Allow up to `max_polls` polls in each wait
    pub const fn new(max_polls: u32) -> Self {
        PollLimit {
            max_polls,
            polls: 0,
        }
    }
}

impl Cancellation for PollLimit {
    fn begin_wait(&mut self) {
        self.polls = 0;
    }

    fn is_cancelled(&mut self) -> bool {
        if self.polls >= self.max_polls {
            return true;
        }
        self.polls += 1;
        false
    }
}

/// Cancelled once the flag is set, e.g. from a signal handler or watchdog thread
impl Cancellation for &AtomicBool {
    fn is_cancelled(&mut self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

impl Cancellation for Arc<AtomicBool> {
    fn is_cancelled(&mut self) -> bool {
        self.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_limit_resets_between_waits() {
        let mut limit = PollLimit::new(2);

        limit.begin_wait();
        assert!(!limit.is_cancelled());
        assert!(!limit.is_cancelled());
        assert!(limit.is_cancelled());

        limit.begin_wait();
        assert!(!limit.is_cancelled());
    }

    #[test]
    fn zero_poll_limit_cancels_immediately() {
        let mut limit = PollLimit::new(0);
        limit.begin_wait();
        assert!(limit.is_cancelled());
    }

    #[test]
    fn atomic_flag_cancels_when_set() {
        let flag = Arc::new(AtomicBool::new(false));
        let mut cancel = Arc::clone(&flag);
        assert!(!cancel.is_cancelled());

        flag.store(true, Ordering::Relaxed);
        assert!(cancel.is_cancelled());

        let mut borrowed = &*flag;
        assert!(borrowed.is_cancelled());
    }

    #[test]
    fn never_is_never_cancelled() {
        let mut never = Never;
        never.begin_wait();
        assert!(!never.is_cancelled());
    }
}
