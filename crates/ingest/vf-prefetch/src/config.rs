//! Configuration for prefetching.

use serde::{Deserialize, Serialize};
use vf_error::{Result, VfError};

/// Default in-flight byte budget (64 MiB).
pub const DEFAULT_MAX_BYTES: u64 = 64 * 1024 * 1024;

/// Default number of concurrent downloads.
pub const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Default capacity of the ready queue and the error channel.
pub const DEFAULT_READY_CAPACITY: usize = 1024;

/// Configuration for [`PrefetchFileManager`](crate::PrefetchFileManager).
///
/// # Example
///
/// ```
/// use vf_prefetch::PrefetchConfig;
///
/// let config = PrefetchConfig::new()
///     .with_max_bytes(16 * 1024 * 1024)
///     .with_max_concurrent(8);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrefetchConfig {
    /// Soft limit on the summed compressed size of files fetched but not
    /// yet handed back. A single file larger than the limit is still
    /// fetched once nothing else is in flight.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: u64,

    /// Maximum number of simultaneous downloads.
    #[serde(default = "default_max_concurrent")]
    pub max_concurrent: usize,

    /// Capacity of the ready queue; the error channel gets the same.
    #[serde(default = "default_ready_capacity")]
    pub ready_capacity: usize,
}

fn default_max_bytes() -> u64 {
    DEFAULT_MAX_BYTES
}

fn default_max_concurrent() -> usize {
    DEFAULT_MAX_CONCURRENT
}

fn default_ready_capacity() -> usize {
    DEFAULT_READY_CAPACITY
}

impl Default for PrefetchConfig {
    fn default() -> Self {
        Self {
            max_bytes: DEFAULT_MAX_BYTES,
            max_concurrent: DEFAULT_MAX_CONCURRENT,
            ready_capacity: DEFAULT_READY_CAPACITY,
        }
    }
}

impl PrefetchConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_bytes(mut self, bytes: u64) -> Self {
        self.max_bytes = bytes;
        self
    }

    pub fn with_max_concurrent(mut self, count: usize) -> Self {
        self.max_concurrent = count;
        self
    }

    pub fn with_ready_capacity(mut self, capacity: usize) -> Self {
        self.ready_capacity = capacity;
        self
    }

    /// Reject values the manager cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_bytes == 0 {
            return Err(VfError::Config("max_bytes must be greater than 0".into()));
        }
        if self.max_concurrent == 0 {
            return Err(VfError::Config(
                "max_concurrent must be greater than 0".into(),
            ));
        }
        if self.ready_capacity == 0 {
            return Err(VfError::Config(
                "ready_capacity must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
