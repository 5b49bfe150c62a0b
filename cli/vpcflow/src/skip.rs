//! Read policy that continues past lost files.

use std::io;
use std::pin::Pin;
use std::task::{Context, Poll, ready};
use tokio::io::{AsyncRead, ReadBuf};
use tracing::{error, warn};
use vf_error::{ErrorCategory, classify_error, from_io_error};

/// Wraps a bucket stream and reads through file-level failures.
///
/// Per-file errors (download, decompression) drop that file's content and
/// reading continues. A terminal enumeration error is recorded too; the
/// stream then still yields the files already being fetched before EOF.
/// Any other error is returned to the caller.
#[derive(Debug)]
pub struct SkipFileErrors<R> {
    inner: R,
    skipped: Vec<String>,
    terminal: Option<String>,
    bytes_read: u64,
}

impl<R> SkipFileErrors<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            skipped: Vec::new(),
            terminal: None,
            bytes_read: 0,
        }
    }

    /// Messages of the per-file errors skipped so far.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    /// The error that stopped enumeration, if any.
    pub fn terminal(&self) -> Option<&str> {
        self.terminal.as_deref()
    }

    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn get_mut(&mut self) -> &mut R {
        &mut self.inner
    }
}

impl<R: AsyncRead + Unpin> AsyncRead for SkipFileErrors<R> {
    fn poll_read(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        loop {
            let before = buf.filled().len();
            let err = match ready!(Pin::new(&mut this.inner).poll_read(cx, buf)) {
                Ok(()) => {
                    this.bytes_read += (buf.filled().len() - before) as u64;
                    return Poll::Ready(Ok(()));
                }
                Err(err) => err,
            };

            match from_io_error(&err).map(classify_error) {
                Some(ErrorCategory::PerFile) => {
                    warn!(error = %err, "Skipping file");
                    this.skipped.push(err.to_string());
                }
                Some(ErrorCategory::Terminal) => {
                    error!(error = %err, "Enumeration stopped, draining fetched files");
                    this.terminal = Some(err.to_string());
                }
                _ => return Poll::Ready(Err(err)),
            }
        }
    }
}
