//! Named advisory locks.
//!
//! Holding lock `X` excludes every other holder of `X` and nobody else. Locks
//! are created on first use and kept for the lifetime of the registry.
//!
//! # Lock order
//!
//! Code that needs both a page lock and the project lock must take the page
//! lock first. Nothing takes them the other way round.

use parking_lot::{ArcMutexGuard, Mutex, RawMutex};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::trace;

/// Name of a lockable section.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum LockName {
    /// Read-modify-write of one page record.
    Page(String),
    /// Read-modify-write of any project record or the project list.
    Projects,
}

impl fmt::Display for LockName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Page(id) => write!(f, "page:{id}"),
            Self::Projects => f.write_str("projects"),
        }
    }
}

/// Registry of named mutexes.
#[derive(Default)]
pub struct NamedLocks {
    registry: Mutex<HashMap<LockName, Arc<Mutex<()>>>>,
}

/// RAII guard for a named lock. Dropping it releases the lock.
pub struct NamedLockGuard {
    name: LockName,
    _guard: ArcMutexGuard<RawMutex, ()>,
}

impl Drop for NamedLockGuard {
    fn drop(&mut self) {
        trace!(lock = %self.name, "released");
    }
}

impl NamedLocks {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Blocks until `name` is free, then holds it until the guard drops.
    pub fn lock(&self, name: LockName) -> NamedLockGuard {
        let mutex = {
            let mut registry = self.registry.lock();
            Arc::clone(registry.entry(name.clone()).or_default())
        };

        let guard = mutex.lock_arc();
        trace!(lock = %name, "acquired");
        NamedLockGuard {
            name,
            _guard: guard,
        }
    }

    /// Shorthand for [`LockName::Page`].
    pub fn page(&self, page_id: &str) -> NamedLockGuard {
        self.lock(LockName::Page(page_id.to_string()))
    }

    /// Shorthand for [`LockName::Projects`].
    pub fn projects(&self) -> NamedLockGuard {
        self.lock(LockName::Projects)
    }

    /// Number of distinct names ever locked.
    pub fn len(&self) -> usize {
        self.registry.lock().len()
    }

    /// True if no lock was ever taken.
    pub fn is_empty(&self) -> bool {
        self.registry.lock().is_empty()
    }
}
