//! Flow log file descriptors parsed from storage keys.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use vf_error::{BucketError, Result};

/// Timestamp layout embedded in flow log file names (minute resolution, UTC).
pub const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%MZ";

/// A structured representation of a VPC flow log file.
///
/// It carries enough data for a consumer to fetch the file contents. Keys
/// follow the layout written by the flow log delivery service:
///
/// ```text
/// AWSLogs/123456789012/vpcflowlogs/us-west-2/2018/10/17/
///     123456789012_vpcflowlogs_us-west-2_fl-00123456789abcdef_20181017T0030Z_0a1b2c3d.log.gz
/// ```
///
/// A descriptor with `size_bytes == 0` is a directory placeholder and carries
/// no content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogFile {
    /// Bucket in which the logs are stored
    pub bucket: String,

    /// Object key used for listing and fetching
    pub key: String,

    /// Account ID extracted from the file name
    pub account: String,

    /// Region extracted from the file name
    pub region: String,

    /// Delivery timestamp from the file name
    pub timestamp: DateTime<Utc>,

    /// ID of the flow log resource
    pub flow_log_id: String,

    /// Checksum segment from the file name
    pub hash: String,

    /// Size of the stored (compressed) object in bytes
    pub size_bytes: u64,
}

impl LogFile {
    /// Parse a listed object into a descriptor.
    ///
    /// Only the final path segment is inspected. It must contain at least six
    /// `_`-separated segments and a timestamp matching [`KEY_TIMESTAMP_FORMAT`].
    pub fn parse(bucket: &str, key: &str, size_bytes: u64) -> Result<Self> {
        let file_name = key.rsplit('/').next().unwrap_or(key);
        let segments: Vec<&str> = file_name.split('_').collect();

        if segments.len() < 6 {
            return Err(parse_error(
                key,
                format!(
                    "expected 6 '_' separated segments, found {}",
                    segments.len()
                ),
            ));
        }

        let timestamp = NaiveDateTime::parse_from_str(segments[4], KEY_TIMESTAMP_FORMAT)
            .map_err(|e| {
                parse_error(
                    key,
                    format!("timestamp could not be parsed from '{}': {e}", segments[4]),
                )
            })?
            .and_utc();

        let hash = segments[5].split('.').next().unwrap_or_default();

        Ok(Self {
            bucket: bucket.to_string(),
            key: key.to_string(),
            account: segments[0].to_string(),
            region: segments[2].to_string(),
            timestamp,
            flow_log_id: segments[3].to_string(),
            hash: hash.to_string(),
            size_bytes,
        })
    }

    /// Whether this descriptor denotes a storage directory placeholder.
    pub fn is_placeholder(&self) -> bool {
        self.size_bytes == 0
    }

    /// The `s3://bucket/key` form of this file's location.
    pub fn uri(&self) -> String {
        format!("s3://{}/{}", self.bucket, self.key)
    }
}

fn parse_error(key: &str, reason: String) -> vf_error::VfError {
    BucketError::Parse {
        key: key.to_string(),
        reason,
    }
    .into()
}
