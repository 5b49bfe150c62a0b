//! vf-prefetch - concurrent fetching for vpcflow-stream.
//!
//! This crate turns an enumerator of flow log files into a single byte
//! stream of their decompressed content:
//!
//! - [`PrefetchFileManager`] downloads and decompresses files ahead of
//!   consumption, bounded by a download slot count and a byte budget
//! - [`PrefetchPolicy`] plugs it into a [`BucketReader`]
//! - [`BucketReader`] exposes everything as one [`tokio::io::AsyncRead`]
//!
//! # Ordering
//!
//! Content arrives in enumeration order only with a single download slot
//! (`max_concurrent == 1`). With more slots, fast downloads overtake slow
//! ones.

pub mod compression;
pub mod config;
pub mod policy;
pub mod prefetch;
pub mod reader;
pub mod semaphore;

pub use compression::{Compression, decompress};
pub use config::{
    DEFAULT_MAX_BYTES, DEFAULT_MAX_CONCURRENT, DEFAULT_READY_CAPACITY, PrefetchConfig,
};
pub use policy::PrefetchPolicy;
pub use prefetch::{PrefetchFileManager, PrefetchStats};
pub use reader::BucketReader;
pub use semaphore::{Semaphore, SemaphoreGuard};
