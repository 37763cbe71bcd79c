
use std::cell::Cell;

/// Holds a pool's lock for as long as it lives.
///
/// Every state-changing pool operation takes one before reading state and keeps it across
/// its ledger calls, so an operation reentering the pool through a ledger is rejected
/// instead of observing half-applied state.
#[derive(Debug)]
pub struct PoolGuard<'a> {
    lock: &'a Cell<bool>,
}

/// Errors that can occur when creating a pool guard.
#[derive(Debug, PartialEq, Eq)]
pub enum PoolGuardError {
    AlreadyLocked,
}

impl<'a> PoolGuard<'a> {
    /// Takes the lock. Fails if another guard over the same lock is alive.
    pub fn new(lock: &'a Cell<bool>) -> Result<Self, PoolGuardError> {
        if lock.replace(true) {
            return Err(PoolGuardError::AlreadyLocked);
        }
        Ok(PoolGuard { lock })
    }
}

impl Drop for PoolGuard<'_> {
    fn drop(&mut self) {
        self.lock.set(false);
    }
}
