//! S3 integration tests using LocalStack.
//!
//! These tests verify listing, fetching and streaming against a real S3 API.

use crate::common::{LocalStackTestContext, flow_file, flow_key, gzip, record};
use std::sync::Arc;
use tokio::io::AsyncReadExt;
use vf_bucket::{BucketStateIterator, S3BucketStore, S3Config};
use vf_prefetch::{BucketReader, PrefetchConfig, PrefetchPolicy};
use vf_traits::{BucketIterator, BucketStore};

const BUCKET: &str = "vpcflow-integration";

async fn store(ctx: &LocalStackTestContext, prefix: &str) -> Arc<dyn BucketStore> {
    let config = S3Config::new(BUCKET)
        .with_prefix(prefix)
        .with_region(&ctx.region)
        .with_endpoint(&ctx.endpoint)
        .with_credentials("test", "test");
    Arc::new(S3BucketStore::from_config(&config).await)
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_s3_enumeration_skips_placeholders() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let prefix = "AWSLogs/123456789012/vpcflowlogs/us-east-1/";
    ctx.create_bucket(BUCKET).await.unwrap();
    ctx.clear_prefix(BUCKET, "AWSLogs/").await.unwrap();

    ctx.put_object(BUCKET, prefix, Vec::new()).await.unwrap();
    for (stamp, hash) in [("20240501T0000Z", "aa"), ("20240501T0005Z", "bb")] {
        let body = gzip(&flow_file(&[record("10.0.0.1", "10.0.0.2", 50000, 443, 1, 100)]));
        ctx.put_object(BUCKET, &flow_key("us-east-1", stamp, hash), body)
            .await
            .unwrap();
    }

    let mut iterator = BucketStateIterator::new(store(&ctx, prefix).await, BUCKET);
    let mut hashes = Vec::new();
    while iterator.advance().await {
        hashes.push(iterator.current().hash);
    }
    iterator.close().unwrap();

    assert_eq!(hashes, ["aa", "bb"]);
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_s3_stream_decompresses_every_file() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let prefix = "AWSLogs/123456789012/vpcflowlogs/eu-central-1/";
    ctx.create_bucket(BUCKET).await.unwrap();
    ctx.clear_prefix(BUCKET, prefix).await.unwrap();

    for i in 0..5u32 {
        let body = gzip(&flow_file(&[record("10.0.0.1", "10.0.0.2", 50000 + i, 443, 1, 100)]));
        let key = flow_key("eu-central-1", &format!("20240501T00{i:02}Z"), &format!("h{i}"));
        ctx.put_object(BUCKET, &key, body).await.unwrap();
    }

    let store = store(&ctx, prefix).await;
    let config = PrefetchConfig::default().with_max_concurrent(3);
    let policy = PrefetchPolicy::new(store.clone(), config).unwrap();
    let mut reader = BucketReader::new(BucketStateIterator::new(store, BUCKET), policy);

    let mut text = String::new();
    reader.read_to_string(&mut text).await.unwrap();
    reader.close().await.unwrap();

    for i in 0..5u32 {
        assert!(text.contains(&format!(" {} 443 ", 50000 + i)));
    }
}

#[tokio::test]
#[ignore = "requires LocalStack"]
async fn test_s3_missing_bucket_is_terminal() {
    let ctx = LocalStackTestContext::new().await;

    if !ctx.is_available().await {
        eprintln!("LocalStack not available, skipping test");
        return;
    }

    let config = S3Config::new("vpcflow-does-not-exist")
        .with_region(&ctx.region)
        .with_endpoint(&ctx.endpoint)
        .with_credentials("test", "test");
    let store: Arc<dyn BucketStore> = Arc::new(S3BucketStore::from_config(&config).await);

    let mut iterator = BucketStateIterator::new(store, "vpcflow-does-not-exist");
    assert!(!iterator.advance().await);

    let err = iterator.close().unwrap_err();
    assert_eq!(
        vf_error::classify_error(&err),
        vf_error::ErrorCategory::Terminal
    );
}
