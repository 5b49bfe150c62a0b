//! vpcflow CLI
//!
//! Streams VPC flow logs out of S3 as raw records, digests or graphs.

use clap::Parser;
use vf_cli_common::{format_bytes, format_number, format_throughput, init_logging};

mod args;
mod run;
mod skip;

use args::Cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    // Logs go to stderr; stdout carries the output stream
    init_logging(args.log_level)?;

    let stats = run::execute(args).await?;

    eprintln!();
    eprintln!("Run completed:");
    if stats.files_listed > 0 {
        eprintln!("  Files listed:     {}", format_number(stats.files_listed));
    }
    if stats.bytes_read > 0 {
        eprintln!("  Bytes read:       {}", format_bytes(stats.bytes_read));
    }
    if let Some(records) = stats.records {
        eprintln!("  Records:          {}", format_number(records));
    }
    eprintln!("  Files skipped:    {}", stats.skipped.len());

    if let Some(duration) = stats.duration() {
        eprintln!(
            "  Duration:         {:.2}s",
            duration.num_milliseconds() as f64 / 1000.0
        );

        if let Some(rate) = format_throughput(stats.bytes_read, duration.num_milliseconds()) {
            eprintln!("  Throughput:       {}", rate);
        }
    }

    for error in &stats.skipped {
        eprintln!("  Error: {}", error);
    }

    if let Some(error) = &stats.terminal {
        eprintln!("  Enumeration failed: {}", error);
        std::process::exit(1);
    }

    if !stats.skipped.is_empty() {
        std::process::exit(4); // Partial failure
    }

    Ok(())
}
