//! Background fetch dispatch.

use super::budget::PrefetchBudget;
use crate::compression::decompress;
use crate::semaphore::{Semaphore, SemaphoreGuard};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, trace, warn};
use vf_error::{Result, VfError};
use vf_traits::{BucketStore, SharedIterator};
use vf_types::{LogContent, LogFile};

/// Drains an enumerator and fetches every file it yields.
///
/// Runs as a single background task. Each file gets its own fetch task,
/// started once the byte budget allows it and a download slot is free.
pub(crate) struct Prefetcher {
    pub(crate) store: Arc<dyn BucketStore>,
    pub(crate) iterator: SharedIterator,
    pub(crate) budget: Arc<PrefetchBudget>,
    pub(crate) semaphore: Semaphore,
    pub(crate) ready: mpsc::Sender<LogContent>,
    pub(crate) errors: mpsc::Sender<VfError>,
}

impl Prefetcher {
    pub(crate) async fn run(self) {
        let tracker = TaskTracker::new();
        let mut dispatched = 0u64;

        loop {
            let file = {
                let mut iterator = self.iterator.lock().await;
                if !iterator.advance().await {
                    break;
                }
                iterator.current()
            };

            if file.is_placeholder() {
                continue;
            }

            if self.ready.is_closed() {
                debug!("Content receiver dropped, stopping dispatch");
                break;
            }

            let size = file.size_bytes;
            tokio::select! {
                biased;
                _ = self.ready.closed() => {
                    debug!("Content receiver dropped while waiting for budget");
                    break;
                }
                _ = self.budget.wait_for(size) => {}
            }
            self.budget.reserve(size);

            // Slots are taken here, in dispatch order, so a single slot
            // delivers files in enumeration order.
            let slot = tokio::select! {
                biased;
                _ = self.ready.closed() => {
                    debug!("Content receiver dropped while waiting for a slot");
                    self.budget.release(size);
                    break;
                }
                slot = self.semaphore.lock() => slot,
            };

            trace!(
                key = %file.key,
                size,
                in_flight = self.budget.in_flight(),
                "Dispatching fetch"
            );
            dispatched += 1;

            tracker.spawn(fetch(
                Arc::clone(&self.store),
                file,
                Arc::clone(&self.budget),
                self.ready.clone(),
                self.errors.clone(),
                slot,
            ));
        }

        let closed = self.iterator.lock().await.close();
        if let Err(err) = closed {
            error!(error = %err, "Enumeration stopped with an error");
            let _ = self.errors.send(err).await;
        }

        tracker.close();
        tracker.wait().await;

        debug!(dispatched, "Prefetch dispatch finished");
        // Dropping `self.ready` here closes the ready queue.
    }
}

async fn fetch(
    store: Arc<dyn BucketStore>,
    file: LogFile,
    budget: Arc<PrefetchBudget>,
    ready: mpsc::Sender<LogContent>,
    errors: mpsc::Sender<VfError>,
    _slot: SemaphoreGuard,
) {
    let size = file.size_bytes;

    match download(store.as_ref(), &file).await {
        Ok(content) => {
            debug!(
                key = %file.key,
                compressed = size,
                bytes = content.len(),
                "Prefetch completed"
            );
            budget.track(content.id(), size);
            if let Err(mpsc::error::SendError(content)) = ready.send(content).await {
                budget.release_handle(content.id());
            }
        }
        Err(err) => {
            warn!(key = %file.key, error = %err, "Prefetch failed");
            budget.release(size);
            let _ = errors.send(err).await;
        }
    }
}

async fn download(store: &dyn BucketStore, file: &LogFile) -> Result<LogContent> {
    let raw = store.fetch_object(&file.bucket, &file.key).await?;
    let data = decompress(&file.key, raw).await?;
    Ok(LogContent::new(file.key.clone(), data))
}
