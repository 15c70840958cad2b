//! Per-origin admission locks
//!
//! An origin holds the lock while one of its account requests is in
//! flight. Acquisition never waits: a second request from the same origin
//! is turned away immediately.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Set of origins with a request in flight.
///
/// Cloning yields another handle to the same set.
#[derive(Debug, Clone, Default)]
pub struct OriginLocks {
    inner: Arc<Mutex<HashSet<String>>>,
}

impl OriginLocks {
    /// Create an empty lock set
    pub fn new() -> Self {
        Self::default()
    }

    /// Lock `origin`, or return `None` if it is already locked.
    ///
    /// The lock is released when the returned guard is dropped.
    pub fn try_acquire(&self, origin: &str) -> Option<OriginLockGuard> {
        let mut locked = self.inner.lock();
        if !locked.insert(origin.to_string()) {
            return None;
        }
        debug!(origin = %origin, "Origin lock acquired");

        Some(OriginLockGuard {
            locks: Arc::clone(&self.inner),
            origin: origin.to_string(),
        })
    }

    /// Check whether `origin` is locked
    pub fn is_locked(&self, origin: &str) -> bool {
        self.inner.lock().contains(origin)
    }

    /// Number of locked origins
    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    /// True when no origin is locked
    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }
}

/// Releases an origin lock on drop
#[derive(Debug)]
#[must_use = "the origin is unlocked as soon as the guard is dropped"]
pub struct OriginLockGuard {
    locks: Arc<Mutex<HashSet<String>>>,
    origin: String,
}

impl OriginLockGuard {
    /// Locked origin
    pub fn origin(&self) -> &str {
        &self.origin
    }
}

impl Drop for OriginLockGuard {
    fn drop(&mut self) {
        self.locks.lock().remove(&self.origin);
        debug!(origin = %self.origin, "Origin lock released");
    }
}
