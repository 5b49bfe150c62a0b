//! Eager prefetching file manager.

use super::budget::PrefetchBudget;
use super::prefetcher::Prefetcher;
use crate::config::PrefetchConfig;
use crate::semaphore::Semaphore;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tracing::{debug, trace};
use vf_error::{Result, VfError};
use vf_traits::{BucketStore, FileManager, SharedIterator};
use vf_types::LogContent;

/// A [`FileManager`] that downloads files ahead of consumption.
///
/// A background task walks the enumerator and starts a fetch for every
/// file, bounded by a download slot count and an in-flight byte budget.
/// Bytes stay reserved until the consumer hands the content back with
/// [`put`](FileManager::put).
///
/// With more than one slot, content is delivered in completion order
/// rather than enumeration order.
pub struct PrefetchFileManager {
    ready: mpsc::Receiver<LogContent>,
    errors: mpsc::Receiver<VfError>,
    budget: Arc<PrefetchBudget>,
    semaphore: Semaphore,
}

impl PrefetchFileManager {
    /// Start prefetching every file of `iterator` from `store`.
    ///
    /// Must be called within a tokio runtime.
    pub fn spawn(
        store: Arc<dyn BucketStore>,
        iterator: SharedIterator,
        config: &PrefetchConfig,
    ) -> Self {
        let capacity = config.ready_capacity.max(1);
        let (ready_tx, ready_rx) = mpsc::channel(capacity);
        let (error_tx, error_rx) = mpsc::channel(capacity);

        let budget = Arc::new(PrefetchBudget::new(config.max_bytes));
        let semaphore = Semaphore::new(config.max_concurrent);

        debug!(
            max_bytes = config.max_bytes,
            max_concurrent = semaphore.capacity(),
            ready_capacity = capacity,
            "Starting prefetch"
        );

        let prefetcher = Prefetcher {
            store,
            iterator,
            budget: Arc::clone(&budget),
            semaphore: semaphore.clone(),
            ready: ready_tx,
            errors: error_tx,
        };
        tokio::spawn(prefetcher.run());

        Self {
            ready: ready_rx,
            errors: error_rx,
            budget,
            semaphore,
        }
    }

    /// Snapshot of the prefetch state.
    pub fn stats(&self) -> PrefetchStats {
        PrefetchStats {
            in_flight_bytes: self.budget.in_flight(),
            outstanding_handles: self.budget.outstanding_handles(),
            available_slots: self.semaphore.available(),
            max_bytes: self.budget.max_bytes(),
            max_concurrent: self.semaphore.capacity(),
        }
    }
}

impl FileManager for PrefetchFileManager {
    fn poll_get(&mut self, cx: &mut Context<'_>) -> Poll<Result<Option<LogContent>>> {
        // Errors already queued take precedence over ready content.
        if let Ok(err) = self.errors.try_recv() {
            return Poll::Ready(Err(err));
        }

        match self.ready.poll_recv(cx) {
            Poll::Ready(Some(content)) => {
                trace!(key = content.key(), bytes = content.len(), "Content ready");
                Poll::Ready(Ok(Some(content)))
            }
            // The ready queue closes only after every fetch task finished,
            // so any error still queued was sent before completion.
            Poll::Ready(None) => match self.errors.try_recv() {
                Ok(err) => Poll::Ready(Err(err)),
                Err(_) => Poll::Ready(Ok(None)),
            },
            Poll::Pending => match self.errors.poll_recv(cx) {
                Poll::Ready(Some(err)) => Poll::Ready(Err(err)),
                _ => Poll::Pending,
            },
        }
    }

    fn put(&mut self, content: LogContent) {
        match self.budget.release_handle(content.id()) {
            Some(size) => trace!(key = content.key(), size, "Released content"),
            None => trace!(key = content.key(), "Ignoring unknown content"),
        }
    }
}

impl std::fmt::Debug for PrefetchFileManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefetchFileManager")
            .field("stats", &self.stats())
            .finish()
    }
}

/// Statistics about the prefetch state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefetchStats {
    /// Compressed bytes dispatched but not yet handed back.
    pub in_flight_bytes: u64,

    /// Delivered content not yet handed back.
    pub outstanding_handles: usize,

    /// Download slots currently free.
    pub available_slots: usize,

    pub max_bytes: u64,
    pub max_concurrent: usize,
}
