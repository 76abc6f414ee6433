//! Shared handle for using one repository from several threads.
//!
//! Readers share the lock; every mutation takes the writer lock, so a
//! reader never sees a half-applied association.

use crate::repository::MemoryRepository;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<MemoryRepository>>,
}

impl SharedStore {
    pub fn new(repo: MemoryRepository) -> Self {
        Self {
            inner: Arc::new(RwLock::new(repo)),
        }
    }

    /// Shared read access. A poisoned lock is recovered: every repository
    /// mutation validates before it changes anything.
    pub fn read(&self) -> RwLockReadGuard<'_, MemoryRepository> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Exclusive access for mutations
    pub fn write(&self) -> RwLockWriteGuard<'_, MemoryRepository> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}
