//! Object storage trait and listing types.

use async_trait::async_trait;
use bytes::Bytes;
use vf_error::Result;

/// One entry of a listing page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListedObject {
    /// Object key
    pub key: String,

    /// Stored size in bytes (zero for directory placeholders)
    pub size_bytes: u64,
}

impl ListedObject {
    /// Create a listing entry.
    pub fn new(key: impl Into<String>, size_bytes: u64) -> Self {
        Self {
            key: key.into(),
            size_bytes,
        }
    }
}

/// One page of a paginated listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListPage {
    /// Entries in storage-reported order
    pub entries: Vec<ListedObject>,

    /// Cursor to pass to the next [`BucketStore::list_page`] call
    pub next_cursor: Option<String>,

    /// Whether more pages follow this one
    pub has_more: bool,
}

/// Trait for object storage backends.
///
/// Implementations include:
/// - S3 (production)
/// - In-memory store (testing/development)
///
/// Listing failures should be reported as
/// [`BucketError::List`](vf_error::BucketError::List) and fetch failures as
/// [`FetchError::Download`](vf_error::FetchError::Download).
#[async_trait]
pub trait BucketStore: Send + Sync {
    /// Fetches one listing page.
    ///
    /// # Arguments
    ///
    /// * `bucket` - Bucket to list
    /// * `cursor` - Continuation cursor from the previous page, `None` for the first page
    async fn list_page(&self, bucket: &str, cursor: Option<&str>) -> Result<ListPage>;

    /// Downloads a whole object into memory.
    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Bytes>;
}
