//! Decompression of downloaded objects.

use async_compression::tokio::bufread::{GzipDecoder, ZstdDecoder};
use bytes::Bytes;
use tokio::io::{AsyncRead, AsyncReadExt};
use vf_error::{FetchError, Result};

/// Compression codec of a stored object, inferred from its key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Compression {
    Gzip,
    Zstd,
}

impl Compression {
    /// `.zst`/`.zstd` (case-insensitive) is zstd. Flow logs are delivered
    /// gzip-framed, so every other key is gzip.
    pub fn from_key(key: &str) -> Self {
        let lower = key.to_ascii_lowercase();
        if lower.ends_with(".zst") || lower.ends_with(".zstd") {
            Compression::Zstd
        } else {
            Compression::Gzip
        }
    }
}

/// Fully decompress a downloaded object.
pub async fn decompress(key: &str, data: Bytes) -> Result<Bytes> {
    match Compression::from_key(key) {
        Compression::Gzip => {
            let mut decoder = GzipDecoder::new(&data[..]);
            decoder.multiple_members(true);
            read_all(key, decoder, data.len()).await
        }
        Compression::Zstd => {
            let mut decoder = ZstdDecoder::new(&data[..]);
            decoder.multiple_members(true);
            read_all(key, decoder, data.len()).await
        }
    }
}

async fn read_all<R: AsyncRead + Unpin>(key: &str, mut reader: R, hint: usize) -> Result<Bytes> {
    let mut out = Vec::with_capacity(hint.saturating_mul(4));
    reader
        .read_to_end(&mut out)
        .await
        .map_err(|e| FetchError::Decompress {
            key: key.to_string(),
            reason: e.to_string(),
        })?;
    Ok(Bytes::from(out))
}
