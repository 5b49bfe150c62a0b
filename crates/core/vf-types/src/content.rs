//! Decompressed content handles.

use bytes::Bytes;
use std::io::{Cursor, Read};
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::task::{Context, Poll};
use tokio::io::{AsyncRead, ReadBuf};

static NEXT_CONTENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a [`LogContent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentId(u64);

impl ContentId {
    fn next() -> Self {
        Self(NEXT_CONTENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A consumable, fully decompressed content stream for one fetched file.
///
/// Handles are not `Clone`: each one has its own [`ContentId`] so that the
/// component which produced it can recognize it again when it is handed back.
pub struct LogContent {
    id: ContentId,
    key: String,
    data: Cursor<Bytes>,
}

impl LogContent {
    /// Wrap decompressed bytes read from `key`.
    pub fn new(key: impl Into<String>, data: Bytes) -> Self {
        Self {
            id: ContentId::next(),
            key: key.into(),
            data: Cursor::new(data),
        }
    }

    /// Identity of this handle.
    pub fn id(&self) -> ContentId {
        self.id
    }

    /// Storage key the content was fetched from.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Total decompressed length in bytes.
    pub fn len(&self) -> u64 {
        self.data.get_ref().len() as u64
    }

    /// Whether the decompressed content is empty.
    pub fn is_empty(&self) -> bool {
        self.data.get_ref().is_empty()
    }

    /// Bytes not yet read.
    pub fn remaining(&self) -> u64 {
        self.len().saturating_sub(self.data.position())
    }

    /// Whether every byte has been read.
    pub fn is_drained(&self) -> bool {
        self.remaining() == 0
    }
}

impl std::fmt::Debug for LogContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogContent")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("len", &self.len())
            .field("remaining", &self.remaining())
            .finish()
    }
}

impl AsyncRead for LogContent {
    fn poll_read(
        mut self: Pin<&mut Self>,
        cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<std::io::Result<()>> {
        Pin::new(&mut self.data).poll_read(cx, buf)
    }
}

impl Read for LogContent {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.data.read(buf)
    }
}
