//! Main execution logic for the vpcflow CLI.

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};
use vf_bucket::{
    AccountFilter, BucketStateIterator, CompositeFilter, FilteredIterator, KeyPatternFilter,
    LogFileFilter, RegionFilter, S3BucketStore, S3Config, TimeFilter, parse_date,
};
use vf_prefetch::{BucketReader, PrefetchConfig, PrefetchPolicy};
use vf_traits::{BucketIterator, BucketStore};

use crate::args::{Cli, OutputMode};
use crate::skip::SkipFileErrors;

/// Statistics of one run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Files listed in `list` mode
    pub files_listed: u64,
    /// Decompressed bytes read from the bucket
    pub bytes_read: u64,
    /// Records summarized in `digest` mode
    pub records: Option<u64>,
    /// Per-file errors that were skipped
    pub skipped: Vec<String>,
    /// Error that stopped enumeration early
    pub terminal: Option<String>,
    pub started_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl RunStats {
    fn new() -> Self {
        Self {
            files_listed: 0,
            bytes_read: 0,
            records: None,
            skipped: Vec::new(),
            terminal: None,
            started_at: Utc::now(),
            completed_at: None,
        }
    }

    pub fn duration(&self) -> Option<Duration> {
        self.completed_at.map(|end| end - self.started_at)
    }

    /// Whether some of the requested data was not delivered.
    pub fn is_partial(&self) -> bool {
        !self.skipped.is_empty() || self.terminal.is_some()
    }
}

/// Execute vpcflow against S3 with the provided arguments.
pub async fn execute(args: Cli) -> Result<RunStats> {
    let mut s3_config = S3Config::new(&args.bucket);

    if let Some(prefix) = &args.prefix {
        s3_config = s3_config.with_prefix(prefix);
    }

    if let Some(region) = &args.region {
        s3_config = s3_config.with_region(region);
    }

    if let Some(endpoint) = &args.s3_endpoint {
        s3_config = s3_config.with_endpoint(endpoint);
    }

    if let (Some(access_key), Some(secret_key)) = (&args.access_key, &args.secret_key) {
        s3_config = s3_config.with_credentials(access_key, secret_key);
    }

    if let Some(profile) = &args.profile {
        s3_config = s3_config.with_profile(profile);
    }

    let store: Arc<dyn BucketStore> = Arc::new(S3BucketStore::from_config(&s3_config).await);

    let mut stdout = tokio::io::stdout();
    run(store, &args, &mut stdout).await
}

/// Run the pipeline over `store`, writing the selected output to `out`.
pub async fn run<W: AsyncWrite + Unpin>(
    store: Arc<dyn BucketStore>,
    args: &Cli,
    out: &mut W,
) -> Result<RunStats> {
    let filter = build_filter(args)?;
    info!(bucket = %args.bucket, filter = %filter.description(), output = ?args.output, "Starting");

    let iterator = FilteredIterator::new(
        BucketStateIterator::new(store.clone(), &args.bucket),
        filter,
    );

    let mut stats = RunStats::new();

    if args.output == OutputMode::List {
        list(iterator, out, &mut stats).await?;
    } else {
        let config = PrefetchConfig::default()
            .with_max_bytes(args.max_bytes)
            .with_max_concurrent(args.concurrency);
        let policy = PrefetchPolicy::new(store, config)?;
        let mut reader = SkipFileErrors::new(BucketReader::new(iterator, policy));

        let written = match args.output {
            OutputMode::Digest => {
                let digest = vf_digest::digest(&mut reader).await?;
                stats.records = Some(digest.records());
                out.write_all(digest.to_text().as_bytes()).await
            }
            OutputMode::Dot => {
                let dot = vf_digest::to_dot(&mut reader).await?;
                out.write_all(dot.as_bytes()).await
            }
            _ => tokio::io::copy(&mut reader, out).await.map(|_| ()),
        };
        written.context("failed to write output")?;

        if let Err(e) = reader.get_mut().close().await {
            warn!(error = %e, "Enumeration reported an error on close");
            stats.terminal.get_or_insert_with(|| e.to_string());
        }

        stats.bytes_read = reader.bytes_read();
        stats.skipped = reader.skipped().to_vec();
        if stats.terminal.is_none() {
            stats.terminal = reader.terminal().map(str::to_string);
        }
    }

    out.flush().await.context("failed to flush output")?;
    stats.completed_at = Some(Utc::now());
    Ok(stats)
}

/// Write one JSON line per matching file, without fetching content.
async fn list<I, W>(mut iterator: I, out: &mut W, stats: &mut RunStats) -> Result<()>
where
    I: BucketIterator,
    W: AsyncWrite + Unpin,
{
    while iterator.advance().await {
        let file = iterator.current();
        if file.is_placeholder() {
            continue;
        }

        let mut line = serde_json::to_string(&file)?;
        line.push('\n');
        out.write_all(line.as_bytes())
            .await
            .context("failed to write output")?;
        stats.files_listed += 1;
    }

    if let Err(e) = iterator.close() {
        warn!(error = %e, "Listing stopped early");
        stats.terminal = Some(e.to_string());
    }
    debug!(files = stats.files_listed, "Listing complete");
    Ok(())
}

/// Build the composite filter from CLI arguments.
fn build_filter(args: &Cli) -> Result<CompositeFilter> {
    let mut composite = CompositeFilter::new();

    if args.start.is_some() || args.end.is_some() {
        let mut time_filter = TimeFilter::new();
        if let Some(start) = &args.start {
            let dt = parse_date(start).map_err(|e| anyhow::anyhow!("Invalid --start: {e}"))?;
            time_filter = time_filter.with_start(dt);
        }
        if let Some(end) = &args.end {
            let dt = parse_date(end).map_err(|e| anyhow::anyhow!("Invalid --end: {e}"))?;
            time_filter = time_filter.with_end(dt);
        }
        composite.add_filter(time_filter);
    }

    if !args.regions.is_empty() {
        composite.add_filter(RegionFilter::new(&args.regions));
    }

    if !args.accounts.is_empty() {
        composite.add_filter(AccountFilter::new(&args.accounts));
    }

    if let Some(pattern) = &args.pattern {
        let pattern_filter = KeyPatternFilter::new(pattern)
            .map_err(|e| anyhow::anyhow!("Invalid --pattern: {e}"))?;
        composite.add_filter(pattern_filter);
    }

    Ok(composite)
}
