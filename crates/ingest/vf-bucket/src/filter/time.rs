//! Capture-time filtering.

use chrono::{DateTime, TimeDelta, Utc};
use vf_error::{Result, VfError};
use vf_types::LogFile;

use super::LogFileFilter;

/// Keeps descriptors whose capture timestamp lies in a range.
///
/// Both bounds are inclusive; an unset bound is open.
#[derive(Debug, Clone, Default)]
pub struct TimeFilter {
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
}

impl TimeFilter {
    /// Create a filter with no constraints.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop files captured before `start`.
    pub fn with_start(mut self, start: DateTime<Utc>) -> Self {
        self.start = Some(start);
        self
    }

    /// Drop files captured after `end`.
    pub fn with_end(mut self, end: DateTime<Utc>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn start(&self) -> Option<DateTime<Utc>> {
        self.start
    }

    pub fn end(&self) -> Option<DateTime<Utc>> {
        self.end
    }

    /// Check if this filter has any constraints.
    pub fn has_constraints(&self) -> bool {
        self.start.is_some() || self.end.is_some()
    }

    /// Check a timestamp against the range.
    pub fn matches_time(&self, timestamp: DateTime<Utc>) -> bool {
        if self.start.is_some_and(|start| timestamp < start) {
            return false;
        }
        if self.end.is_some_and(|end| timestamp > end) {
            return false;
        }
        true
    }
}

impl LogFileFilter for TimeFilter {
    fn matches(&self, file: &LogFile) -> bool {
        self.matches_time(file.timestamp)
    }

    fn description(&self) -> String {
        let fmt = |t: &DateTime<Utc>| t.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        match (&self.start, &self.end) {
            (Some(start), Some(end)) => format!("time({}..={})", fmt(start), fmt(end)),
            (Some(start), None) => format!("time({}..)", fmt(start)),
            (None, Some(end)) => format!("time(..={})", fmt(end)),
            (None, None) => "time(any)".to_string(),
        }
    }
}

/// Parse a date string.
///
/// Accepts RFC 3339 (`2024-01-15T10:30:00Z`), a bare date (`2024-01-15`,
/// midnight UTC) or a relative offset from now (`-24h`, `-7d`, `-2w`).
pub fn parse_date(input: &str) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Some(relative) = input.strip_prefix('-') {
        return parse_relative(relative, Utc::now());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = chrono::NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(VfError::Config(format!(
        "Invalid date '{input}'. Expected RFC 3339 (2024-01-15T10:30:00Z), \
         date only (2024-01-15), or relative (-24h, -7d, -2w)"
    )))
}

fn parse_relative(input: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let Some(unit) = input.chars().last() else {
        return Err(VfError::Config("Empty relative date".to_string()));
    };
    let amount = &input[..input.len() - unit.len_utf8()];

    let amount: i64 = amount
        .parse()
        .map_err(|_| VfError::Config(format!("Invalid number in relative date: '{amount}'")))?;

    let offset = match unit.to_ascii_lowercase() {
        'h' => TimeDelta::try_hours(amount),
        'd' => TimeDelta::try_days(amount),
        'w' => TimeDelta::try_weeks(amount),
        _ => {
            return Err(VfError::Config(format!(
                "Invalid relative date unit '{unit}'. Use 'h' (hours), 'd' (days), or 'w' (weeks)"
            )));
        }
    };

    offset
        .and_then(|offset| now.checked_sub_signed(offset))
        .ok_or_else(|| VfError::Config(format!("Relative date out of range: '-{input}'")))
}
