//! End-to-end pipeline tests over the in-memory bucket store.
//!
//! Enumeration, filtering, prefetch, decompression and the stream reader
//! run together exactly as the CLI wires them.

use crate::common::{ACCOUNT, flow_file, flow_key, gzip, record};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use vf_bucket::{
    BucketStateIterator, CompositeFilter, FilteredIterator, MemoryBucketStore, RegionFilter,
    TimeFilter, parse_date,
};
use vf_error::{ErrorCategory, classify_error, from_io_error};
use vf_prefetch::{BucketReader, PrefetchConfig, PrefetchPolicy};

const BUCKET: &str = "flow-logs";

/// Three gzip files in two regions, five minutes apart.
fn bucket() -> Arc<MemoryBucketStore> {
    Arc::new(
        MemoryBucketStore::new()
            .with_page_size(2)
            .with_object(
                flow_key("us-west-2", "20240501T0000Z", "aaaa"),
                gzip(&flow_file(&[
                    record("10.0.0.1", "10.0.0.2", 50000, 443, 10, 1000),
                    record("10.0.0.2", "10.0.0.1", 443, 50000, 8, 4000),
                ])),
            )
            .with_object(
                flow_key("us-west-2", "20240501T0005Z", "bbbb"),
                gzip(&flow_file(&[record("10.0.0.1", "10.0.0.2", 50001, 443, 2, 200)])),
            )
            .with_object(
                flow_key("eu-west-1", "20240501T0010Z", "cccc"),
                gzip(&flow_file(&[record("10.1.0.1", "10.1.0.9", 40000, 22, 1, 60)])),
            ),
    )
}

fn reader(store: Arc<MemoryBucketStore>, config: PrefetchConfig) -> BucketReader {
    let policy = PrefetchPolicy::new(store.clone(), config).unwrap();
    BucketReader::new(BucketStateIterator::new(store, BUCKET), policy)
}

/// Read to EOF, collecting errors and continuing past them.
async fn read_all(reader: &mut BucketReader) -> (String, Vec<vf_error::ErrorCategory>) {
    let mut out = Vec::new();
    let mut errors = Vec::new();
    let mut buf = [0u8; 512];
    loop {
        match reader.read(&mut buf).await {
            Ok(0) => break,
            Ok(n) => out.extend_from_slice(&buf[..n]),
            Err(e) => errors.push(classify_error(from_io_error(&e).unwrap())),
        }
    }
    (String::from_utf8(out).unwrap(), errors)
}

fn sorted_lines(text: &str) -> Vec<&str> {
    let mut lines: Vec<&str> = text.lines().collect();
    lines.sort_unstable();
    lines
}

#[tokio::test]
async fn test_single_slot_stream_is_key_ordered_concatenation() {
    let config = PrefetchConfig::default().with_max_concurrent(1);
    let mut reader = reader(bucket(), config);

    let (text, errors) = read_all(&mut reader).await;

    assert!(errors.is_empty());
    let expected = [
        flow_file(&[record("10.1.0.1", "10.1.0.9", 40000, 22, 1, 60)]),
        flow_file(&[
            record("10.0.0.1", "10.0.0.2", 50000, 443, 10, 1000),
            record("10.0.0.2", "10.0.0.1", 443, 50000, 8, 4000),
        ]),
        flow_file(&[record("10.0.0.1", "10.0.0.2", 50001, 443, 2, 200)]),
    ]
    .concat();
    assert_eq!(text, expected);
    reader.close().await.unwrap();
}

#[tokio::test]
async fn test_concurrent_stream_delivers_every_file_once() {
    let store = bucket();
    for i in 0..8 {
        let stamp = format!("20240502T00{i:02}Z");
        let key = flow_key("ap-south-1", &stamp, &format!("h{i}"));
        store.insert(
            key.clone(),
            gzip(&flow_file(&[record("10.2.0.1", "10.2.0.2", 1000 + i, 80, 1, 1)])),
        );
        store.delay_fetch(key, Duration::from_millis(20 - 2 * i as u64));
    }

    let config = PrefetchConfig::default().with_max_concurrent(4);
    let mut reader = reader(store.clone(), config);
    let (text, errors) = read_all(&mut reader).await;

    assert!(errors.is_empty());
    assert_eq!(text.lines().filter(|l| l.starts_with("version")).count(), 11);
    assert_eq!(text.lines().filter(|l| l.contains(" 10.2.0.1 ")).count(), 8);
    assert_eq!(store.fetch_calls(), 11);
    assert!(store.peak_concurrent_fetches() <= 4);
}

#[tokio::test]
async fn test_tiny_budget_still_completes() {
    let config = PrefetchConfig::default()
        .with_max_bytes(1)
        .with_max_concurrent(3);
    let mut single = reader(bucket(), PrefetchConfig::default().with_max_concurrent(1));
    let mut budgeted = reader(bucket(), config);

    let (expected, _) = read_all(&mut single).await;
    let (text, errors) = read_all(&mut budgeted).await;

    assert!(errors.is_empty());
    assert_eq!(sorted_lines(&text), sorted_lines(&expected));
}

#[tokio::test]
async fn test_digest_over_bucket() {
    let config = PrefetchConfig::default().with_max_concurrent(2);
    let reader = reader(bucket(), config);

    let digest = vf_digest::digest(reader).await.unwrap();

    assert_eq!(digest.records(), 4);
    assert_eq!(
        digest.lines(),
        [
            format!(
                "2 {ACCOUNT} eni-0a1b2c3d 10.0.0.1 10.0.0.2 0 443 6 12 1200 1714521600 1714521660 ACCEPT OK"
            ),
            format!(
                "2 {ACCOUNT} eni-0a1b2c3d 10.0.0.2 10.0.0.1 0 443 6 8 4000 1714521600 1714521660 ACCEPT OK"
            ),
            format!(
                "2 {ACCOUNT} eni-0a1b2c3d 10.1.0.1 10.1.0.9 0 22 6 1 60 1714521600 1714521660 ACCEPT OK"
            ),
        ]
    );
}

#[tokio::test]
async fn test_dot_over_bucket() {
    let reader = reader(bucket(), PrefetchConfig::default());

    let dot = vf_digest::to_dot(reader).await.unwrap();

    assert_eq!(dot.matches(" -> ").count(), 4);
    assert_eq!(dot.matches(" [label=\"").count(), 4);
    assert!(dot.contains("\tn10001 -> n10002 ["));
    assert!(dot.ends_with("}\n"));
}

#[tokio::test]
async fn test_filtered_stream() {
    let store = bucket();
    let filter = CompositeFilter::new()
        .with_filter(RegionFilter::new(["us-west-2"]))
        .with_filter(TimeFilter::new().with_start(parse_date("2024-05-01T00:05:00Z").unwrap()));
    let iterator = FilteredIterator::new(BucketStateIterator::new(store.clone(), BUCKET), filter);
    let policy = PrefetchPolicy::new(store.clone(), PrefetchConfig::default()).unwrap();
    let mut reader = BucketReader::new(iterator, policy);

    let (text, errors) = read_all(&mut reader).await;

    assert!(errors.is_empty());
    assert_eq!(text.lines().filter(|l| l.starts_with("2 ")).count(), 1);
    assert!(text.contains(" 50001 "));
    assert_eq!(store.fetch_calls(), 1);
}

#[tokio::test]
async fn test_lost_files_are_reported_and_reading_continues() {
    let store = bucket();
    store.fail_fetch(flow_key("us-west-2", "20240501T0000Z", "aaaa"));
    // Not gzip despite the extension.
    store.insert(
        flow_key("us-west-2", "20240501T0001Z", "dddd"),
        flow_file(&[record("10.9.9.9", "10.9.9.8", 1, 2, 3, 4)]),
    );

    let mut reader = reader(store, PrefetchConfig::default().with_max_concurrent(2));
    let (text, errors) = read_all(&mut reader).await;

    assert_eq!(errors, [ErrorCategory::PerFile, ErrorCategory::PerFile]);
    assert!(text.contains(" 50001 "));
    assert!(text.contains(" 40000 "));
    assert!(!text.contains(" 10.9.9.9 "));
    assert!(!text.contains(" 4000 "));
}

#[tokio::test]
async fn test_listing_failure_drains_then_ends() {
    let store = bucket();
    store.fail_listing_at(1);

    let mut reader = reader(store, PrefetchConfig::default().with_max_concurrent(1));
    let (text, errors) = read_all(&mut reader).await;

    assert_eq!(errors, [ErrorCategory::Terminal]);
    // The first page held two files.
    assert_eq!(text.lines().filter(|l| l.starts_with("version")).count(), 2);

    let mut buf = [0u8; 16];
    assert_eq!(reader.read(&mut buf).await.unwrap(), 0);
}

#[tokio::test]
async fn test_close_mid_stream() {
    let store = bucket();
    store.delay_fetch(
        flow_key("us-west-2", "20240501T0005Z", "bbbb"),
        Duration::from_millis(200),
    );
    let mut reader = reader(store, PrefetchConfig::default().with_max_concurrent(1));

    let mut buf = [0u8; 8];
    assert!(reader.read(&mut buf).await.unwrap() > 0);

    reader.close().await.unwrap();

    assert!(reader.is_exhausted());
    assert_eq!(reader.read(&mut buf).await.unwrap(), 0);
}
