//! Error types and classification for vpcflow-stream.
//!
//! This crate provides:
//! - [`VfError`] - Top-level error enum for the ingestion pipeline
//! - Domain-specific errors ([`BucketError`], [`FetchError`], [`DigestError`])
//! - [`ErrorCategory`] for deciding whether a stream consumer may keep reading
//! - [`from_io_error`] to recover a [`VfError`] that travelled through `std::io`

use thiserror::Error;

/// Top-level error type for vpcflow-stream.
#[derive(Error, Debug)]
pub enum VfError {
    /// Enumeration errors (listing, key parsing)
    #[error("Bucket error: {0}")]
    Bucket(#[from] BucketError),

    /// Single-file errors (download, decompression)
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Flow record digest errors
    #[error("Digest error: {0}")]
    Digest(#[from] DigestError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors raised while enumerating a bucket.
///
/// Both variants stop the enumeration permanently.
#[derive(Error, Debug)]
pub enum BucketError {
    /// A listing page could not be fetched
    #[error("error getting log file metadata: {0}")]
    List(String),

    /// A storage key does not follow the flow log naming grammar
    #[error("error parsing log file name '{key}': {reason}")]
    Parse { key: String, reason: String },
}

/// Errors raised while fetching a single file.
#[derive(Error, Debug)]
pub enum FetchError {
    /// The object could not be downloaded
    #[error("Download failed for '{key}': {reason}")]
    Download { key: String, reason: String },

    /// The downloaded object could not be decompressed
    #[error("Decompression failed for '{key}': {reason}")]
    Decompress { key: String, reason: String },
}

/// Errors raised while digesting flow log records.
#[derive(Error, Debug)]
pub enum DigestError {
    /// A record line could not be interpreted
    #[error("Malformed record at line {line}: {reason}")]
    MalformedRecord { line: u64, reason: String },

    /// The underlying reader failed
    #[error("I/O error: {0}")]
    Io(String),
}

/// Error classification for stream consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Enumeration stopped; already fetched files can still be drained
    ///
    /// Examples: listing failure, malformed key
    Terminal,

    /// One file was dropped; reading may continue with the next file
    ///
    /// Examples: download failure, corrupt gzip
    PerFile,

    /// Nothing further can be done
    ///
    /// Examples: invalid configuration, malformed record
    Permanent,
}

/// Classifies an error for the "continue past partial loss" read policy.
pub fn classify_error(error: &VfError) -> ErrorCategory {
    match error {
        VfError::Bucket(_) => ErrorCategory::Terminal,
        VfError::Fetch(_) => ErrorCategory::PerFile,
        VfError::Digest(_) => ErrorCategory::Permanent,
        VfError::Config(_) => ErrorCategory::Permanent,
    }
}

/// Recover the [`VfError`] carried inside an `io::Error`.
///
/// The stream reader surfaces pipeline errors through `std::io::Error`; this
/// gives callers back the typed error when there is one.
pub fn from_io_error(error: &std::io::Error) -> Option<&VfError> {
    error.get_ref().and_then(|inner| inner.downcast_ref::<VfError>())
}

impl From<VfError> for std::io::Error {
    fn from(error: VfError) -> Self {
        std::io::Error::other(error)
    }
}

/// Result type alias using VfError.
pub type Result<T> = std::result::Result<T, VfError>;
