//! Formatting utilities for the run summary.

/// Binary size units, largest first.
pub(crate) const UNITS: [(&str, u64); 4] = [
    ("TB", 1 << 40),
    ("GB", 1 << 30),
    ("MB", 1 << 20),
    ("KB", 1 << 10),
];

/// Format bytes as human-readable string.
///
/// # Examples
///
/// ```
/// use vf_cli_common::format_bytes;
///
/// assert_eq!(format_bytes(500), "500 bytes");
/// assert_eq!(format_bytes(1536), "1.50 KB");
/// assert_eq!(format_bytes(64 * 1024 * 1024), "64.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    UNITS
        .iter()
        .find(|(_, size)| bytes >= *size)
        .map(|(unit, size)| format!("{:.2} {unit}", bytes as f64 / *size as f64))
        .unwrap_or_else(|| format!("{bytes} bytes"))
}

/// Format a count with thousands separators.
///
/// # Examples
///
/// ```
/// use vf_cli_common::format_number;
///
/// assert_eq!(format_number(123), "123");
/// assert_eq!(format_number(1234567), "1,234,567");
/// ```
pub fn format_number(n: u64) -> String {
    let digits = n.to_string();
    let lead = digits.len() % 3;

    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (i + 3 - lead) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Format a transfer rate, or `None` when the elapsed time is zero.
pub fn format_throughput(bytes: u64, millis: i64) -> Option<String> {
    if millis <= 0 {
        return None;
    }
    let per_second = (bytes as f64 * 1000.0 / millis as f64) as u64;
    Some(format!("{}/s", format_bytes(per_second)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 bytes");
        assert_eq!(format_bytes(1023), "1023 bytes");
        assert_eq!(format_bytes(1024), "1.00 KB");
        assert_eq!(format_bytes(1_048_576), "1.00 MB");
        assert_eq!(format_bytes(1_073_741_824), "1.00 GB");
        assert_eq!(format_bytes(1_099_511_627_776), "1.00 TB");
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(12), "12");
        assert_eq!(format_number(1234), "1,234");
        assert_eq!(format_number(12345), "12,345");
        assert_eq!(format_number(123456), "123,456");
        assert_eq!(format_number(1234567890), "1,234,567,890");
    }

    #[test]
    fn test_format_throughput() {
        assert_eq!(format_throughput(2048, 1000).as_deref(), Some("2.00 KB/s"));
        assert_eq!(format_throughput(1024, 500).as_deref(), Some("2.00 KB/s"));
        assert_eq!(format_throughput(1024, 0), None);
    }
}
