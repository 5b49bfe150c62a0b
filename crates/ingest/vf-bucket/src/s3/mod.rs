//! S3 client and storage functionality.
//!
//! This module provides the S3 side of enumeration and fetching:
//! - Client configuration with LocalStack support
//! - Paged `ListObjectsV2` listing and whole-object `GetObject` fetches

mod client;
mod store;

pub use client::{S3Config, create_s3_client};
pub use store::S3BucketStore;
