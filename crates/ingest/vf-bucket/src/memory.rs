//! In-memory [`BucketStore`] for tests and local replays.

use async_trait::async_trait;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::ops::Bound;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use vf_error::{BucketError, FetchError, Result};
use vf_traits::{BucketStore, ListPage, ListedObject};

/// Default number of entries per listing page (the S3 maximum).
pub const DEFAULT_PAGE_SIZE: usize = 1000;

/// A bucket held in memory.
///
/// Objects are listed in key order, `page_size` entries per page, with the
/// last key of a page as the continuation cursor. Empty objects are listed
/// with size zero, like directory placeholders in S3.
///
/// Failures and latency can be injected per page and per key, and fetch
/// activity is counted so tests can observe concurrency.
#[derive(Debug)]
pub struct MemoryBucketStore {
    page_size: usize,
    objects: RwLock<BTreeMap<String, Bytes>>,
    failing_keys: RwLock<HashSet<String>>,
    fetch_delays: RwLock<HashMap<String, Duration>>,
    fail_list_at_page: RwLock<Option<usize>>,
    list_calls: AtomicUsize,
    fetch_calls: AtomicUsize,
    active_fetches: AtomicUsize,
    peak_fetches: AtomicUsize,
}

impl Default for MemoryBucketStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBucketStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            objects: RwLock::new(BTreeMap::new()),
            failing_keys: RwLock::new(HashSet::new()),
            fetch_delays: RwLock::new(HashMap::new()),
            fail_list_at_page: RwLock::new(None),
            list_calls: AtomicUsize::new(0),
            fetch_calls: AtomicUsize::new(0),
            active_fetches: AtomicUsize::new(0),
            peak_fetches: AtomicUsize::new(0),
        }
    }

    /// Set the number of entries per listing page (at least 1).
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Add an object (builder pattern).
    pub fn with_object(self, key: impl Into<String>, data: impl Into<Bytes>) -> Self {
        self.insert(key, data);
        self
    }

    /// Add or replace an object.
    pub fn insert(&self, key: impl Into<String>, data: impl Into<Bytes>) {
        self.objects.write().insert(key.into(), data.into());
    }

    /// Make every fetch of `key` fail.
    pub fn fail_fetch(&self, key: impl Into<String>) {
        self.failing_keys.write().insert(key.into());
    }

    /// Delay every fetch of `key`.
    pub fn delay_fetch(&self, key: impl Into<String>, delay: Duration) {
        self.fetch_delays.write().insert(key.into(), delay);
    }

    /// Make the listing call with this zero-based index fail.
    pub fn fail_listing_at(&self, page: usize) {
        *self.fail_list_at_page.write() = Some(page);
    }

    /// Number of listing calls served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of fetch calls started so far.
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Highest number of fetches observed running at once.
    pub fn peak_concurrent_fetches(&self) -> usize {
        self.peak_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BucketStore for MemoryBucketStore {
    async fn list_page(&self, bucket: &str, cursor: Option<&str>) -> Result<ListPage> {
        let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
        if *self.fail_list_at_page.read() == Some(call) {
            return Err(BucketError::List(format!(
                "injected listing failure for bucket '{bucket}' at page {call}"
            ))
            .into());
        }

        let objects = self.objects.read();
        let lower = match cursor {
            Some(after) => Bound::Excluded(after.to_string()),
            None => Bound::Unbounded,
        };

        let mut remaining = objects.range((lower, Bound::Unbounded));
        let entries: Vec<ListedObject> = remaining
            .by_ref()
            .take(self.page_size)
            .map(|(key, data)| ListedObject::new(key.clone(), data.len() as u64))
            .collect();
        let has_more = remaining.next().is_some();

        let next_cursor = if has_more {
            entries.last().map(|entry| entry.key.clone())
        } else {
            None
        };

        Ok(ListPage {
            entries,
            next_cursor,
            has_more,
        })
    }

    async fn fetch_object(&self, _bucket: &str, key: &str) -> Result<Bytes> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let active = self.active_fetches.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_fetches.fetch_max(active, Ordering::SeqCst);

        let delay = self.fetch_delays.read().get(key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let result = if self.failing_keys.read().contains(key) {
            Err(FetchError::Download {
                key: key.to_string(),
                reason: "injected download failure".to_string(),
            }
            .into())
        } else {
            self.objects
                .read()
                .get(key)
                .cloned()
                .ok_or_else(|| {
                    FetchError::Download {
                        key: key.to_string(),
                        reason: "NoSuchKey".to_string(),
                    }
                    .into()
                })
        };

        self.active_fetches.fetch_sub(1, Ordering::SeqCst);
        result
    }
}
