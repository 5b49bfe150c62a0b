//! Region and account filtering.

use std::collections::BTreeSet;
use vf_types::LogFile;

use super::LogFileFilter;

fn collect(values: impl IntoIterator<Item = impl Into<String>>) -> BTreeSet<String> {
    values
        .into_iter()
        .map(|v| {
            let v: String = v.into();
            v.trim().to_string()
        })
        .filter(|v| !v.is_empty())
        .collect()
}

/// Keeps descriptors from a set of AWS regions.
#[derive(Debug, Clone, Default)]
pub struct RegionFilter {
    regions: BTreeSet<String>,
}

impl RegionFilter {
    /// An empty set matches nothing.
    pub fn new(regions: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            regions: collect(regions),
        }
    }

    pub fn regions(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(String::as_str)
    }
}

impl LogFileFilter for RegionFilter {
    fn matches(&self, file: &LogFile) -> bool {
        self.regions.contains(&file.region)
    }

    fn description(&self) -> String {
        format!("region({})", self.regions().collect::<Vec<_>>().join(","))
    }
}

/// Keeps descriptors from a set of AWS account IDs.
#[derive(Debug, Clone, Default)]
pub struct AccountFilter {
    accounts: BTreeSet<String>,
}

impl AccountFilter {
    /// An empty set matches nothing.
    pub fn new(accounts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            accounts: collect(accounts),
        }
    }

    pub fn accounts(&self) -> impl Iterator<Item = &str> {
        self.accounts.iter().map(String::as_str)
    }
}

impl LogFileFilter for AccountFilter {
    fn matches(&self, file: &LogFile) -> bool {
        self.accounts.contains(&file.account)
    }

    fn description(&self) -> String {
        format!("account({})", self.accounts().collect::<Vec<_>>().join(","))
    }
}
