//! Byte stream over every file of a bucket.

use std::io;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use tokio::io::{AsyncRead, ReadBuf};
use tracing::debug;
use vf_error::Result;
use vf_traits::{BucketIterator, FetchPolicy, FileManager, SharedIterator, shared};
use vf_types::LogContent;

/// Reads the decompressed content of every enumerated file as one stream.
///
/// The file manager is started by the first read. Errors surface as
/// `io::Error` wrapping a [`VfError`](vf_error::VfError)
/// (see [`vf_error::from_io_error`]); the stream stays usable, so the caller
/// may read again to continue with the remaining files.
///
/// # Example
///
/// ```ignore
/// let policy = PrefetchPolicy::new(store.clone(), PrefetchConfig::default())?;
/// let mut reader = BucketReader::new(BucketStateIterator::new(store, "flow-logs"), policy);
///
/// tokio::io::copy(&mut reader, &mut tokio::io::stdout()).await?;
/// reader.close().await?;
/// ```
pub struct BucketReader {
    iterator: SharedIterator,
    policy: Box<dyn FetchPolicy>,
    manager: Option<Box<dyn FileManager>>,
    active: Option<LogContent>,
    exhausted: bool,
}

impl BucketReader {
    pub fn new(
        iterator: impl BucketIterator + 'static,
        policy: impl FetchPolicy + 'static,
    ) -> Self {
        Self::from_shared(shared(iterator), policy)
    }

    /// Build over an enumerator that is already shared.
    pub fn from_shared(iterator: SharedIterator, policy: impl FetchPolicy + 'static) -> Self {
        Self {
            iterator,
            policy: Box::new(policy),
            manager: None,
            active: None,
            exhausted: false,
        }
    }

    /// Whether end of stream was reached or the reader was closed.
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Stop reading and close the enumerator.
    ///
    /// Every later read returns end of stream, even while background
    /// fetches are still running. Returns the error that stopped
    /// enumeration, if the enumerator still holds one.
    pub async fn close(&mut self) -> Result<()> {
        self.exhausted = true;

        if let Some(mut manager) = self.manager.take() {
            if let Some(content) = self.active.take() {
                manager.put(content);
            }
        }
        self.active = None;

        debug!("Closing bucket reader");
        self.iterator.lock().await.close()
    }
}

impl AsyncRead for BucketReader {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();

        if buf.remaining() == 0 || this.exhausted {
            return Poll::Ready(Ok(()));
        }

        let manager = this
            .manager
            .get_or_insert_with(|| this.policy.start(Arc::clone(&this.iterator)));

        loop {
            let content = match this.active.as_mut() {
                Some(content) => content,
                None => match ready!(manager.poll_get(cx)) {
                    Ok(Some(content)) => this.active.insert(content),
                    Ok(None) => {
                        debug!("Bucket stream exhausted");
                        this.exhausted = true;
                        return Poll::Ready(Ok(()));
                    }
                    Err(err) => return Poll::Ready(Err(err.into())),
                },
            };

            let before = buf.filled().len();
            ready!(Pin::new(&mut *content).poll_read(cx, buf))?;
            let produced = buf.filled().len() - before;

            if content.is_drained() {
                if let Some(content) = this.active.take() {
                    manager.put(content);
                }
                if produced == 0 {
                    continue;
                }
            }

            return Poll::Ready(Ok(()));
        }
    }
}

impl std::fmt::Debug for BucketReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BucketReader")
            .field("started", &self.manager.is_some())
            .field("active", &self.active)
            .field("exhausted", &self.exhausted)
            .finish()
    }
}
