//! S3-backed [`BucketStore`].

use super::client::{S3Config, create_s3_client};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::error::DisplayErrorContext;
use bytes::Bytes;
use tracing::{debug, trace};
use vf_error::{BucketError, FetchError, Result};
use vf_traits::{BucketStore, ListPage, ListedObject};

/// Lists and fetches flow log objects from S3.
#[derive(Debug, Clone)]
pub struct S3BucketStore {
    client: Client,
    prefix: Option<String>,
}

impl S3BucketStore {
    /// Wrap an existing client.
    pub fn new(client: Client) -> Self {
        Self {
            client,
            prefix: None,
        }
    }

    /// Build a client from configuration and wrap it.
    pub async fn from_config(config: &S3Config) -> Self {
        let client = create_s3_client(config).await;
        Self {
            client,
            prefix: config.prefix.clone(),
        }
    }

    /// Restrict listings to keys starting with `prefix`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

#[async_trait]
impl BucketStore for S3BucketStore {
    async fn list_page(&self, bucket: &str, cursor: Option<&str>) -> Result<ListPage> {
        let mut req = self.client.list_objects_v2().bucket(bucket);

        if let Some(prefix) = &self.prefix {
            req = req.prefix(prefix);
        }

        if let Some(token) = cursor {
            req = req.continuation_token(token);
        }

        let resp = req.send().await.map_err(|e| {
            BucketError::List(format!(
                "S3 list objects failed for bucket '{bucket}': {}",
                DisplayErrorContext(&e)
            ))
        })?;

        let entries: Vec<ListedObject> = resp
            .contents
            .unwrap_or_default()
            .into_iter()
            .map(|obj| ListedObject {
                key: obj.key.unwrap_or_default(),
                size_bytes: obj.size.unwrap_or(0).max(0) as u64,
            })
            .collect();

        trace!(
            bucket,
            entries = entries.len(),
            truncated = ?resp.is_truncated,
            "Listed S3 page"
        );

        Ok(ListPage {
            entries,
            next_cursor: resp.next_continuation_token,
            has_more: resp.is_truncated == Some(true),
        })
    }

    async fn fetch_object(&self, bucket: &str, key: &str) -> Result<Bytes> {
        let download_error = |reason: String| FetchError::Download {
            key: key.to_string(),
            reason,
        };

        let resp = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| download_error(DisplayErrorContext(&e).to_string()))?;

        let body = resp
            .body
            .collect()
            .await
            .map_err(|e| download_error(format!("failed to read object body: {e}")))?;

        let data = body.into_bytes();
        debug!(bucket, key, bytes = data.len(), "Downloaded object");

        Ok(data)
    }
}
