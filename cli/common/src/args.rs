//! Argument types shared by the CLI binaries.

use crate::format::UNITS;
use clap::ValueEnum;

/// Log level argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Trace level (most verbose)
    Trace,
    /// Debug level
    Debug,
    /// Info level (default)
    Info,
    /// Warning level
    Warn,
    /// Error level (least verbose)
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Parse a positive usize (>= 1).
pub fn parse_positive_usize(s: &str) -> Result<usize, String> {
    let value: usize = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;
    if value < 1 {
        return Err(format!("{value} is not in 1.."));
    }
    Ok(value)
}

/// Parse a byte size such as `1048576`, `512KB`, `64MB` or `2GB`.
/// `TB` is accepted too.
///
/// Units are binary (1 KB = 1024 bytes) and case-insensitive. Zero is
/// rejected.
pub fn parse_size(s: &str) -> Result<u64, String> {
    let trimmed = s.trim();
    let upper = trimmed.to_ascii_uppercase();

    let (digits, multiplier) = UNITS
        .into_iter()
        .chain([("B", 1)])
        .find_map(|(suffix, multiplier)| {
            upper
                .strip_suffix(suffix)
                .map(|digits| (digits.trim().to_string(), multiplier))
        })
        .unwrap_or((upper.clone(), 1));

    let value: u64 = digits
        .parse()
        .map_err(|_| format!("'{trimmed}' is not a valid size"))?;
    let bytes = value
        .checked_mul(multiplier)
        .ok_or_else(|| format!("'{trimmed}' is too large"))?;
    if bytes == 0 {
        return Err("size must be greater than 0".to_string());
    }
    Ok(bytes)
}
