//! Capability traits for vpcflow-stream.
//!
//! This crate defines the seams between the ingestion components:
//! - [`BucketStore`] - Paged listing and whole-object fetches against storage
//! - [`BucketIterator`] - Pull-based enumeration of [`LogFile`](vf_types::LogFile) descriptors
//! - [`FileManager`] - "Next ready content" / "done with this content"
//! - [`FetchPolicy`] - Builds a [`FileManager`] over an enumerator

pub mod iterator;
pub mod manager;
pub mod store;

pub use iterator::{BucketIterator, SharedIterator, shared};
pub use manager::{FetchPolicy, FileManager, Get};
pub use store::{BucketStore, ListPage, ListedObject};
