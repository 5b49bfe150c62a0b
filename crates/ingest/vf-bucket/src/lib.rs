//! vf-bucket - bucket enumeration for vpcflow-stream.
//!
//! This crate turns paginated storage listings into a pull-based sequence of
//! [`LogFile`](vf_types::LogFile) descriptors. It provides:
//!
//! - S3 listing and whole-object fetches with LocalStack support
//! - An in-memory store for tests and local replays
//! - [`BucketStateIterator`], the continuation-cursor enumerator
//! - Composable descriptor filters and the [`FilteredIterator`] decorator
//!
//! # Example
//!
//! ```ignore
//! use vf_bucket::{BucketStateIterator, FilteredIterator, RegionFilter, S3BucketStore, S3Config};
//! use vf_traits::BucketIterator;
//!
//! let config = S3Config::new("flow-logs").with_prefix("AWSLogs/");
//! let store = Arc::new(S3BucketStore::from_config(&config).await);
//!
//! let iterator = BucketStateIterator::new(store, "flow-logs");
//! let mut iterator = FilteredIterator::new(iterator, RegionFilter::new(["us-west-2"]));
//!
//! while iterator.advance().await {
//!     println!("{}", iterator.current().key);
//! }
//! iterator.close()?;
//! ```

pub mod filter;
pub mod iterator;
pub mod memory;
pub mod s3;

pub use filter::{
    AccountFilter, CompositeFilter, FilteredIterator, KeyPatternFilter, LogFileFilter,
    RegionFilter, TimeFilter, parse_date,
};
pub use iterator::BucketStateIterator;
pub use memory::MemoryBucketStore;
pub use s3::{S3BucketStore, S3Config, create_s3_client};
