//! Counting lock bounding concurrent downloads.

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore as TokioSemaphore};

/// A lock that admits up to `capacity` holders at once.
#[derive(Debug, Clone)]
pub struct Semaphore {
    inner: Arc<TokioSemaphore>,
    capacity: usize,
}

/// A held slot. Dropping it frees the slot.
#[derive(Debug)]
pub struct SemaphoreGuard {
    _permit: OwnedSemaphorePermit,
}

impl Semaphore {
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            inner: Arc::new(TokioSemaphore::new(capacity)),
            capacity,
        }
    }

    /// Wait for a free slot.
    pub async fn lock(&self) -> SemaphoreGuard {
        let permit = Arc::clone(&self.inner)
            .acquire_owned()
            .await
            .expect("prefetch semaphore is never closed");
        SemaphoreGuard { _permit: permit }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of free slots.
    pub fn available(&self) -> usize {
        self.inner.available_permits()
    }
}
