//! Prefetch fetch policy.

use crate::config::PrefetchConfig;
use crate::prefetch::PrefetchFileManager;
use std::sync::Arc;
use vf_error::Result;
use vf_traits::{BucketStore, FetchPolicy, FileManager, SharedIterator};

/// Fetch policy that starts a [`PrefetchFileManager`].
#[derive(Clone)]
pub struct PrefetchPolicy {
    store: Arc<dyn BucketStore>,
    config: PrefetchConfig,
}

impl PrefetchPolicy {
    /// Returns a config error if `config` is invalid.
    pub fn new(store: Arc<dyn BucketStore>, config: PrefetchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { store, config })
    }

    pub fn config(&self) -> &PrefetchConfig {
        &self.config
    }
}

impl FetchPolicy for PrefetchPolicy {
    fn start(&self, iterator: SharedIterator) -> Box<dyn FileManager> {
        Box::new(PrefetchFileManager::spawn(
            Arc::clone(&self.store),
            iterator,
            &self.config,
        ))
    }
}

impl std::fmt::Debug for PrefetchPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrefetchPolicy")
            .field("config", &self.config)
            .finish()
    }
}
