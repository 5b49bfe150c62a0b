//! CLI argument definitions for vpcflow.

use clap::{Parser, ValueEnum};
use vf_cli_common::{LogLevel, parse_positive_usize, parse_size};

/// Stream VPC flow logs from S3.
///
/// Enumerates the flow log files of a bucket, prefetches and decompresses
/// them concurrently within a memory budget, and writes the records to
/// stdout: raw, digested, or as a Graphviz graph.
///
/// ## Examples
///
/// Raw records for the last day:
///   vpcflow -b my-flow-logs --start -24h
///
/// Digest of one account and region:
///   vpcflow -b my-flow-logs --accounts 123456789012 --regions us-west-2 --output digest
///
/// Traffic graph:
///   vpcflow -b my-flow-logs --start 2024-05-01 --end 2024-05-02 --output dot | dot -Tsvg > flows.svg
#[derive(Parser, Debug)]
#[command(name = "vpcflow")]
#[command(version, about, long_about = None)]
pub struct Cli {
    // === S3 Configuration ===
    /// S3 bucket holding the flow logs
    #[arg(short, long, env = "VPCFLOW_BUCKET")]
    pub bucket: String,

    /// Key prefix to list under (e.g., "AWSLogs/123456789012/")
    #[arg(short, long, env = "VPCFLOW_PREFIX")]
    pub prefix: Option<String>,

    /// Custom S3 endpoint URL (for LocalStack)
    #[arg(long, env = "VPCFLOW_S3_ENDPOINT")]
    pub s3_endpoint: Option<String>,

    /// AWS region
    #[arg(long, env = "AWS_REGION")]
    pub region: Option<String>,

    /// AWS access key ID
    #[arg(long, env = "AWS_ACCESS_KEY_ID")]
    pub access_key: Option<String>,

    /// AWS secret access key
    #[arg(long, env = "AWS_SECRET_ACCESS_KEY")]
    pub secret_key: Option<String>,

    /// AWS profile name
    #[arg(long, env = "AWS_PROFILE")]
    pub profile: Option<String>,

    // === Filter Options ===
    /// Only files delivered at or after this time (RFC 3339, YYYY-MM-DD, or relative like -24h)
    #[arg(long, allow_hyphen_values = true)]
    pub start: Option<String>,

    /// Only files delivered at or before this time
    #[arg(long, allow_hyphen_values = true)]
    pub end: Option<String>,

    /// Only files from these regions (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub regions: Vec<String>,

    /// Only files from these accounts (comma separated)
    #[arg(long, value_delimiter = ',')]
    pub accounts: Vec<String>,

    /// Glob pattern matched against file names (e.g., "*_fl-0123*")
    #[arg(long)]
    pub pattern: Option<String>,

    // === Prefetch Options ===
    /// Memory budget for prefetched content (e.g., 64MB)
    #[arg(long, default_value = "64MB", value_parser = parse_size)]
    pub max_bytes: u64,

    /// Maximum concurrent downloads (must be >= 1)
    #[arg(long, default_value = "4", value_parser = parse_positive_usize)]
    pub concurrency: usize,

    // === Output Options ===
    /// What to write to stdout
    #[arg(short, long, value_enum, default_value = "raw")]
    pub output: OutputMode,

    // === Logging Options ===
    /// Log level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

/// Output mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputMode {
    /// Decompressed records, file after file
    Raw,
    /// Records grouped by conversation with summed counters
    Digest,
    /// Graphviz DOT graph of the records
    Dot,
    /// Matching file descriptors as JSON lines, without fetching content
    List,
}
