//! Bucket enumeration trait.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;
use vf_error::Result;
use vf_types::LogFile;

/// Scans a bucket and converts listing responses into [`LogFile`] records.
///
/// # Usage
///
/// ```ignore
/// while iterator.advance().await {
///     let file = iterator.current();
///     // ...
/// }
/// iterator.close()?;
/// ```
#[async_trait]
pub trait BucketIterator: Send {
    /// Pushes the cursor one record forward so that [`current`](Self::current)
    /// returns the next value.
    ///
    /// Returns `false` once every record has been produced, or when fetching
    /// records failed. The failure is reported by [`close`](Self::close).
    async fn advance(&mut self) -> bool;

    /// The record under the cursor, or [`LogFile::default`] when exhausted.
    fn current(&self) -> LogFile;

    /// Releases resources and returns the error, if any, that stopped iteration.
    fn close(&mut self) -> Result<()>;
}

#[async_trait]
impl<I: BucketIterator + ?Sized> BucketIterator for Box<I> {
    async fn advance(&mut self) -> bool {
        (**self).advance().await
    }

    fn current(&self) -> LogFile {
        (**self).current()
    }

    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
}

/// An enumerator shared between a stream reader and its file manager.
///
/// The manager drains it while the reader keeps the ability to close it.
pub type SharedIterator = Arc<Mutex<Box<dyn BucketIterator>>>;

/// Wrap an enumerator for sharing.
pub fn shared(iterator: impl BucketIterator + 'static) -> SharedIterator {
    Arc::new(Mutex::new(Box::new(iterator)))
}
