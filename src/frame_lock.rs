//! Scoped exclusion between script-driven mutation and a render thread.
//!
//! Scripts run on one thread, but an embedding application may read object
//! state from a separate render thread. Mutations that move an object
//! between areas or otherwise change several fields at once hold a
//! [`FrameGuard`] so the renderer never observes a half-updated object.
//!
//! ```
//! use nwscript::FrameLock;
//!
//! let lock = FrameLock::new();
//! let renderer = lock.clone();
//!
//! {
//!     let _frame = lock.lock();
//!     assert!(renderer.try_lock().is_none());
//! }
//! assert!(renderer.try_lock().is_some());
//! ```

use std::sync::{Arc, Mutex, MutexGuard, TryLockError};

/// Shared "lock frame / unlock frame" mutex.
///
/// Clones share the same lock.
#[derive(Debug, Clone, Default)]
pub struct FrameLock {
    mutex: Arc<Mutex<()>>,
}

impl FrameLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block until the frame is exclusively held.
    ///
    /// A guard dropped during a panic does not poison later frames; the lock
    /// protects no data of its own.
    pub fn lock(&self) -> FrameGuard<'_> {
        let guard = self
            .mutex
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        FrameGuard { _guard: guard }
    }

    /// Take the frame without blocking, if it is free.
    pub fn try_lock(&self) -> Option<FrameGuard<'_>> {
        match self.mutex.try_lock() {
            Ok(guard) => Some(FrameGuard { _guard: guard }),
            Err(TryLockError::Poisoned(poisoned)) => Some(FrameGuard {
                _guard: poisoned.into_inner(),
            }),
            Err(TryLockError::WouldBlock) => None,
        }
    }
}

/// RAII guard; the frame is released on drop.
pub struct FrameGuard<'a> {
    _guard: MutexGuard<'a, ()>,
}
