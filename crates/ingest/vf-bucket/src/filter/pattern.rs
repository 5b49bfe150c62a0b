//! Glob filtering on key file names.

use glob::Pattern;
use vf_error::{Result, VfError};
use vf_types::LogFile;

use super::LogFileFilter;

/// Matches the file name portion of a key (after the last `/`) against a
/// glob pattern, so `*_us-east-1_*.log.gz` matches at any depth.
#[derive(Debug, Clone)]
pub struct KeyPatternFilter {
    pattern: String,
    compiled: Pattern,
}

impl KeyPatternFilter {
    /// Returns a config error if the pattern is invalid.
    pub fn new(pattern: &str) -> Result<Self> {
        let compiled = Pattern::new(pattern)
            .map_err(|e| VfError::Config(format!("Invalid glob pattern '{pattern}': {e}")))?;

        Ok(Self {
            pattern: pattern.to_string(),
            compiled,
        })
    }

    /// Check a raw key against the pattern.
    pub fn matches_key(&self, key: &str) -> bool {
        let file_name = key.rsplit('/').next().unwrap_or(key);
        self.compiled.matches(file_name)
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl LogFileFilter for KeyPatternFilter {
    fn matches(&self, file: &LogFile) -> bool {
        self.matches_key(&file.key)
    }

    fn description(&self) -> String {
        format!("pattern({})", self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "AWSLogs/123456789012/vpcflowlogs/us-east-1/2024/01/15/\
                       123456789012_vpcflowlogs_us-east-1_fl-0abc_20240115T1005Z_9f8e7d6c.log.gz";

    #[test]
    fn test_matches_file_name_only() {
        let filter = KeyPatternFilter::new("*.log.gz").unwrap();

        assert!(filter.matches_key(KEY));
        assert!(filter.matches_key("plain.log.gz"));
        assert!(!filter.matches_key("plain.log"));
    }

    #[test]
    fn test_directory_part_is_ignored() {
        let filter = KeyPatternFilter::new("AWSLogs*").unwrap();
        assert!(!filter.matches_key(KEY));
    }

    #[test]
    fn test_region_glob() {
        let filter = KeyPatternFilter::new("*_us-east-?_*").unwrap();
        let file = LogFile {
            key: KEY.to_string(),
            ..Default::default()
        };

        assert!(filter.matches(&file));
        assert_eq!(filter.description(), "pattern(*_us-east-?_*)");
    }

    #[test]
    fn test_invalid_pattern() {
        assert!(matches!(
            KeyPatternFilter::new("[invalid"),
            Err(VfError::Config(_))
        ));
    }
}
