//! In-flight byte accounting.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Notify;
use tracing::trace;
use vf_types::ContentId;

/// Tracks the compressed size of every file between dispatch and hand-back.
///
/// The dispatch loop is the only task that reserves; fetch tasks and the
/// consumer release. Each release wakes the dispatch loop.
#[derive(Debug)]
pub(crate) struct PrefetchBudget {
    max_bytes: u64,
    in_flight: AtomicU64,
    handles: Mutex<HashMap<ContentId, u64>>,
    released: Notify,
}

impl PrefetchBudget {
    pub(crate) fn new(max_bytes: u64) -> Self {
        Self {
            max_bytes,
            in_flight: AtomicU64::new(0),
            handles: Mutex::new(HashMap::new()),
            released: Notify::new(),
        }
    }

    pub(crate) fn max_bytes(&self) -> u64 {
        self.max_bytes
    }

    pub(crate) fn in_flight(&self) -> u64 {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub(crate) fn outstanding_handles(&self) -> usize {
        self.handles.lock().len()
    }

    /// Whether a file of `size` bytes may start now.
    ///
    /// Anything fits when nothing is in flight, so one oversized file
    /// cannot stall the pipeline.
    pub(crate) fn fits(&self, size: u64) -> bool {
        let in_flight = self.in_flight();
        in_flight == 0 || in_flight.saturating_add(size) <= self.max_bytes
    }

    /// Wait until a file of `size` bytes fits.
    pub(crate) async fn wait_for(&self, size: u64) {
        while !self.fits(size) {
            trace!(
                size,
                in_flight = self.in_flight(),
                max_bytes = self.max_bytes,
                "Waiting for prefetch budget"
            );
            // notify_one stores a permit, so a release between the check
            // and this await is not lost.
            self.released.notified().await;
        }
    }

    pub(crate) fn reserve(&self, size: u64) {
        self.in_flight.fetch_add(size, Ordering::SeqCst);
    }

    /// Return bytes to the budget and wake the dispatch loop.
    pub(crate) fn release(&self, size: u64) {
        let _ = self
            .in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(current.saturating_sub(size))
            });
        self.released.notify_one();
    }

    /// Remember that `id` holds `size` reserved bytes.
    pub(crate) fn track(&self, id: ContentId, size: u64) {
        self.handles.lock().insert(id, size);
    }

    /// Release the bytes held by `id`. Unknown handles release nothing.
    pub(crate) fn release_handle(&self, id: ContentId) -> Option<u64> {
        let size = self.handles.lock().remove(&id)?;
        self.release(size);
        Some(size)
    }
}
