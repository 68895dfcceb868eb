//! Run lock serializing mirror runs

use std::sync::{Arc, Mutex, MutexGuard};

/// Whether a mirror run is in progress
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunState {
    #[default]
    Idle,
    Running,
}

/// Mutual exclusion token for mirror runs.
///
/// There is no waiting: a caller either gets the lock right away or gives up.
/// Release happens when the returned [`RunGuard`] is dropped, so every exit
/// path of a run (success, error, panic) frees it.
#[derive(Debug, Default)]
pub struct RunLock {
    state: Mutex<RunState>,
}

impl RunLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of the lock.
    pub fn state(&self) -> RunState {
        *self.lock_state()
    }

    /// Move `Idle -> Running` if possible.
    ///
    /// Returns `None` while another run holds the lock.
    pub fn try_acquire(self: &Arc<Self>) -> Option<RunGuard> {
        let mut state = self.lock_state();
        match *state {
            RunState::Running => None,
            RunState::Idle => {
                *state = RunState::Running;
                Some(RunGuard {
                    lock: Arc::clone(self),
                })
            }
        }
    }

    fn release(&self) {
        *self.lock_state() = RunState::Idle;
    }

    fn lock_state(&self) -> MutexGuard<'_, RunState> {
        // The guarded value is a plain enum, a poisoned lock still holds a valid state
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Held for the duration of one mirror run.
#[derive(Debug)]
pub struct RunGuard {
    lock: Arc<RunLock>,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_acquire_fails_while_held() {
        let lock = Arc::new(RunLock::new());

        let guard = lock.try_acquire().expect("first acquire");
        assert_eq!(lock.state(), RunState::Running);
        assert!(lock.try_acquire().is_none());

        drop(guard);
        assert_eq!(lock.state(), RunState::Idle);
        assert!(lock.try_acquire().is_some());
    }

    #[test]
    fn test_guard_released_on_panic() {
        let lock = Arc::new(RunLock::new());
        let lock_ref = Arc::clone(&lock);

        let result = std::thread::spawn(move || {
            let _guard = lock_ref.try_acquire().expect("acquire");
            panic!("copy blew up");
        })
        .join();

        assert!(result.is_err());
        assert_eq!(lock.state(), RunState::Idle);
    }
}
