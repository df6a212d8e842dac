//! Advisory busy lock
//!
//! Serializes the high-level display operations (refresh, brightness,
//! drawing) against each other. The lock is not tied to an owner: a
//! transaction completion releases it on behalf of the operation that took
//! it, possibly from interrupt context.

use core::hint::spin_loop;

use portable_atomic::{AtomicBool, Ordering};

use crate::error::Error;

/// Single-flag spinlock, `true` while held
#[derive(Debug, Default)]
pub struct BusyLock {
    held: AtomicBool,
}

impl BusyLock {
    pub const fn new() -> Self {
        Self {
            held: AtomicBool::new(false),
        }
    }

    /// Claim the lock if it is free
    pub fn try_acquire(&self) -> Result<(), Error> {
        self.held
            .compare_exchange(false, true, Ordering::Acquire, Ordering::Relaxed)
            .map(|_| ())
            .map_err(|_| Error::Busy)
    }

    /// Wait until the lock is free, then claim it
    ///
    /// Only returns once a completion (or another context) has released
    /// the lock. Not reentrant.
    pub fn spin_acquire(&self) {
        while self.try_acquire().is_err() {
            while self.held.load(Ordering::Relaxed) {
                spin_loop();
            }
        }
    }

    /// Free the lock
    pub fn release(&self) {
        self.held.store(false, Ordering::Release);
    }

    /// Whether an operation currently holds the lock
    pub fn is_locked(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }
}
