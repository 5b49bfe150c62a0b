//! Filtering decorator for enumerators.

use async_trait::async_trait;
use tracing::trace;
use vf_error::Result;
use vf_traits::BucketIterator;
use vf_types::LogFile;

use super::LogFileFilter;

/// Yields only the descriptors of `inner` accepted by `filter`.
#[derive(Debug)]
pub struct FilteredIterator<I, F> {
    inner: I,
    filter: F,
    skipped: u64,
}

impl<I, F> FilteredIterator<I, F>
where
    I: BucketIterator,
    F: LogFileFilter,
{
    pub fn new(inner: I, filter: F) -> Self {
        Self {
            inner,
            filter,
            skipped: 0,
        }
    }

    /// Number of descriptors rejected so far.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

#[async_trait]
impl<I, F> BucketIterator for FilteredIterator<I, F>
where
    I: BucketIterator,
    F: LogFileFilter,
{
    async fn advance(&mut self) -> bool {
        while self.inner.advance().await {
            let file = self.inner.current();
            if self.filter.matches(&file) {
                return true;
            }
            self.skipped += 1;
            trace!(key = %file.key, "Filtered out");
        }
        false
    }

    fn current(&self) -> LogFile {
        self.inner.current()
    }

    fn close(&mut self) -> Result<()> {
        self.inner.close()
    }
}
