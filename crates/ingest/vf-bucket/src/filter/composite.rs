//! AND-combination of filters.

use vf_types::LogFile;

use super::LogFileFilter;

/// A descriptor passes only if it passes every constituent filter.
///
/// An empty composite matches everything.
#[derive(Default)]
pub struct CompositeFilter {
    filters: Vec<Box<dyn LogFileFilter>>,
}

impl CompositeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter (builder pattern).
    pub fn with_filter(mut self, filter: impl LogFileFilter + 'static) -> Self {
        self.add_filter(filter);
        self
    }

    pub fn add_filter(&mut self, filter: impl LogFileFilter + 'static) {
        self.filters.push(Box::new(filter));
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl LogFileFilter for CompositeFilter {
    fn matches(&self, file: &LogFile) -> bool {
        self.filters.iter().all(|f| f.matches(file))
    }

    fn description(&self) -> String {
        if self.filters.is_empty() {
            return "all".to_string();
        }
        let descriptions: Vec<String> = self.filters.iter().map(|f| f.description()).collect();
        descriptions.join(" AND ")
    }
}

impl std::fmt::Debug for CompositeFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeFilter")
            .field("filters", &self.description())
            .finish()
    }
}
