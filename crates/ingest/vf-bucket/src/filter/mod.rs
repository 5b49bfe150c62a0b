//! Descriptor filtering.
//!
//! Filters decide which [`LogFile`] descriptors are worth fetching, using the
//! metadata decoded from the key alone. [`FilteredIterator`] applies a filter
//! to any [`BucketIterator`](vf_traits::BucketIterator).

mod composite;
mod filtered;
mod pattern;
mod region;
mod time;

pub use composite::CompositeFilter;
pub use filtered::FilteredIterator;
pub use pattern::KeyPatternFilter;
pub use region::{AccountFilter, RegionFilter};
pub use time::{TimeFilter, parse_date};

use vf_types::LogFile;

/// Predicate over flow log descriptors.
pub trait LogFileFilter: Send + Sync {
    /// Check if a descriptor passes the filter.
    fn matches(&self, file: &LogFile) -> bool;

    /// Get a human-readable description of the filter.
    fn description(&self) -> String;
}

impl<F: LogFileFilter + ?Sized> LogFileFilter for Box<F> {
    fn matches(&self, file: &LogFile) -> bool {
        (**self).matches(file)
    }

    fn description(&self) -> String {
        (**self).description()
    }
}
