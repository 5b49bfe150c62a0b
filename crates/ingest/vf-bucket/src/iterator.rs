//! Continuation-cursor bucket enumerator.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};
use vf_error::{Result, VfError};
use vf_traits::{BucketIterator, BucketStore};
use vf_types::LogFile;

/// Enumerates every flow log file in a bucket, one listing page at a time.
///
/// Pages are requested lazily: a new page is fetched only once every
/// descriptor of the current page has been consumed. Zero-size entries
/// (directory placeholders) are skipped. A listing failure or an
/// unparseable key ends the iteration; the error is returned by
/// [`close`](BucketIterator::close).
pub struct BucketStateIterator {
    store: Arc<dyn BucketStore>,
    bucket: String,

    /// Descriptors of the current page
    files: Vec<LogFile>,

    /// Index into `files`; `None` before the first element of a page
    position: Option<usize>,

    /// Continuation token for the next page
    cursor: Option<String>,

    /// No further pages will be requested
    done: bool,

    pages_fetched: u64,
    error: Option<VfError>,
}

impl BucketStateIterator {
    pub fn new(store: Arc<dyn BucketStore>, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
            files: Vec::new(),
            position: None,
            cursor: None,
            done: false,
            pages_fetched: 0,
            error: None,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Number of listing pages requested so far.
    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    fn page_exhausted(&self) -> bool {
        match self.position {
            Some(pos) => pos + 1 >= self.files.len(),
            None => self.files.is_empty(),
        }
    }

    async fn fetch_page(&mut self) -> Result<()> {
        let page = self
            .store
            .list_page(&self.bucket, self.cursor.as_deref())
            .await?;
        self.pages_fetched += 1;

        let mut files = Vec::with_capacity(page.entries.len());
        for entry in page.entries {
            if entry.size_bytes == 0 {
                continue;
            }
            files.push(LogFile::parse(&self.bucket, &entry.key, entry.size_bytes)?);
        }

        debug!(
            bucket = %self.bucket,
            page = self.pages_fetched,
            files = files.len(),
            has_more = page.has_more,
            "Fetched listing page"
        );

        self.files = files;
        self.position = None;
        self.done = !page.has_more || page.next_cursor.is_none();
        self.cursor = page.next_cursor;
        Ok(())
    }

    fn fail(&mut self, err: VfError) {
        error!(bucket = %self.bucket, error = %err, "Bucket enumeration failed");
        self.files.clear();
        self.position = None;
        self.done = true;
        self.error = Some(err);
    }
}

#[async_trait]
impl BucketIterator for BucketStateIterator {
    async fn advance(&mut self) -> bool {
        while self.page_exhausted() {
            if self.done {
                self.files.clear();
                self.position = None;
                return false;
            }
            if let Err(err) = self.fetch_page().await {
                self.fail(err);
                return false;
            }
        }

        self.position = Some(self.position.map_or(0, |pos| pos + 1));
        true
    }

    fn current(&self) -> LogFile {
        self.position
            .and_then(|pos| self.files.get(pos))
            .cloned()
            .unwrap_or_default()
    }

    fn close(&mut self) -> Result<()> {
        self.files = Vec::new();
        self.position = None;
        self.done = true;
        self.error.take().map_or(Ok(()), Err)
    }
}

impl std::fmt::Debug for BucketStateIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketStateIterator")
            .field("bucket", &self.bucket)
            .field("buffered", &self.files.len())
            .field("position", &self.position)
            .field("cursor", &self.cursor)
            .field("done", &self.done)
            .field("pages_fetched", &self.pages_fetched)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryBucketStore;
    use bytes::Bytes;
    use vf_error::BucketError;

    fn key(n: usize) -> String {
        format!(
            "AWSLogs/123456789012/vpcflowlogs/us-east-1/2024/01/15/\
             123456789012_vpcflowlogs_us-east-1_fl-0abc_20240115T{:02}{:02}Z_h{n:04}.log.gz",
            n / 60,
            n % 60
        )
    }

    fn store(count: usize, page_size: usize) -> Arc<MemoryBucketStore> {
        let store = MemoryBucketStore::new().with_page_size(page_size);
        for n in 0..count {
            store.insert(key(n), Bytes::from(format!("content-{n}")));
        }
        Arc::new(store)
    }

    async fn drain(iter: &mut BucketStateIterator) -> Vec<LogFile> {
        let mut files = Vec::new();
        while iter.advance().await {
            files.push(iter.current());
        }
        files
    }

    #[tokio::test]
    async fn test_empty_bucket() {
        let store = store(0, 10);
        let mut iter = BucketStateIterator::new(store.clone(), "flow-logs");

        assert!(!iter.advance().await);
        assert_eq!(iter.current(), LogFile::default());
        assert!(iter.close().is_ok());
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_pages_are_concatenated_in_order() {
        let store = store(7, 3);
        let mut iter = BucketStateIterator::new(store.clone(), "flow-logs");

        let files = drain(&mut iter).await;

        let keys: Vec<String> = files.iter().map(|f| f.key.clone()).collect();
        let expected: Vec<String> = (0..7).map(key).collect();
        assert_eq!(keys, expected);
        assert_eq!(files[0].bucket, "flow-logs");
        assert_eq!(files[0].region, "us-east-1");
        assert_eq!(iter.pages_fetched(), 3);
        assert_eq!(store.list_calls(), 3);
        assert!(iter.close().is_ok());
    }

    #[tokio::test]
    async fn test_exhausted_iterator_stays_exhausted() {
        let store = store(2, 1);
        let mut iter = BucketStateIterator::new(store.clone(), "flow-logs");

        assert_eq!(drain(&mut iter).await.len(), 2);
        let calls = store.list_calls();

        assert!(!iter.advance().await);
        assert!(!iter.advance().await);
        assert_eq!(store.list_calls(), calls);
        assert_eq!(iter.current(), LogFile::default());
    }

    #[tokio::test]
    async fn test_placeholders_are_skipped() {
        let store = store(2, 10);
        store.insert("AWSLogs/", Bytes::new());
        store.insert("AWSLogs/123456789012/", Bytes::new());
        let mut iter = BucketStateIterator::new(store, "flow-logs");

        let files = drain(&mut iter).await;

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.size_bytes > 0));
    }

    #[tokio::test]
    async fn test_page_of_only_placeholders_keeps_fetching() {
        let store = MemoryBucketStore::new().with_page_size(2);
        store.insert("0/", Bytes::new());
        store.insert("1/", Bytes::new());
        store.insert(key(1), Bytes::from_static(b"x"));
        let mut iter = BucketStateIterator::new(Arc::new(store), "flow-logs");

        assert!(iter.advance().await);
        assert_eq!(iter.current().key, key(1));
        assert!(!iter.advance().await);
    }

    #[tokio::test]
    async fn test_unparseable_key_aborts() {
        let store = store(3, 10);
        store.insert("AWSLogs/not-a-flow-log.txt", Bytes::from_static(b"x"));
        let mut iter = BucketStateIterator::new(store, "flow-logs");

        assert!(!iter.advance().await);
        assert_eq!(iter.current(), LogFile::default());
        assert!(matches!(
            iter.close(),
            Err(VfError::Bucket(BucketError::Parse { .. }))
        ));
    }

    #[tokio::test]
    async fn test_listing_failure_after_first_page() {
        let store = store(4, 2);
        store.fail_listing_at(1);
        let mut iter = BucketStateIterator::new(store, "flow-logs");

        let files = drain(&mut iter).await;

        assert_eq!(files.len(), 2);
        assert!(matches!(
            iter.close(),
            Err(VfError::Bucket(BucketError::List(_)))
        ));
        // The error is handed out once
        assert!(iter.close().is_ok());
    }

    #[tokio::test]
    async fn test_close_without_advance() {
        let store = store(3, 10);
        let mut iter = BucketStateIterator::new(store.clone(), "flow-logs");

        assert!(iter.close().is_ok());
        assert!(!iter.advance().await);
        assert_eq!(store.list_calls(), 0);
    }

    #[tokio::test]
    async fn test_close_mid_iteration_stops() {
        let store = store(5, 2);
        let mut iter = BucketStateIterator::new(store, "flow-logs");

        assert!(iter.advance().await);
        assert!(iter.close().is_ok());
        assert!(!iter.advance().await);
    }
}
