//! Pacing hook run after each finished upload task

use std::time::Duration;

/// Cosmetic pause after a progress bar is stopped, so the terminal settles
/// before the next log line is printed.
pub trait Pacer {
    fn settle(&self);
}

/// Sleeps for a fixed delay.
#[derive(Debug, Clone, Copy)]
pub struct SleepPacer {
    delay: Duration,
}

impl SleepPacer {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(50);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SleepPacer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl Pacer for SleepPacer {
    fn settle(&self) {
        if !self.delay.is_zero() {
            std::thread::sleep(self.delay);
        }
    }
}

/// Does nothing. Used by tests and non-interactive runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoPacing;

impl Pacer for NoPacing {
    fn settle(&self) {}
}
