//! Shared utilities for vpcflow-stream CLI binaries.

pub mod args;
pub mod format;
pub mod logging;

pub use args::{LogLevel, parse_positive_usize, parse_size};
pub use format::{format_bytes, format_number, format_throughput};
pub use logging::init_logging;
