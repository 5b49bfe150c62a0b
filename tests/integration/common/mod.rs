//! Common utilities for integration tests.
//!
//! This module provides shared test infrastructure: flow log fixtures, gzip
//! encoding, and LocalStack client setup.

pub mod localstack;

pub use localstack::LocalStackTestContext;

use flate2::Compression;
use flate2::write::GzEncoder;
use std::io::Write;

pub const ACCOUNT: &str = "123456789012";

/// Object key in the layout written by the flow log delivery service.
pub fn flow_key(region: &str, stamp: &str, hash: &str) -> String {
    format!(
        "AWSLogs/{ACCOUNT}/vpcflowlogs/{region}/{}/{}/{}/{ACCOUNT}_vpcflowlogs_{region}_fl-0a1b2c3d4e5f_{stamp}_{hash}.log.gz",
        &stamp[0..4],
        &stamp[4..6],
        &stamp[6..8],
    )
}

/// A version 2 flow log file: header line followed by `records`.
pub fn flow_file(records: &[String]) -> String {
    let mut text = String::from(
        "version account-id interface-id srcaddr dstaddr srcport dstport protocol packets bytes start end action log-status\n",
    );
    for record in records {
        text.push_str(record);
        text.push('\n');
    }
    text
}

/// One accepted record between `src` and `dst`.
pub fn record(src: &str, dst: &str, sport: u32, dport: u32, packets: u64, bytes: u64) -> String {
    format!(
        "2 {ACCOUNT} eni-0a1b2c3d {src} {dst} {sport} {dport} 6 {packets} {bytes} 1714521600 1714521660 ACCEPT OK"
    )
}

/// Gzip-compress `text`.
pub fn gzip(text: &str) -> Vec<u8> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes()).unwrap();
    encoder.finish().unwrap()
}
