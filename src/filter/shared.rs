//! Live filter handle that can be swapped on config reload.

use std::sync::Arc;

use arc_swap::ArcSwap;

use super::content::ContentFilter;

/// Cheaply clonable handle to the filter currently in force.
///
/// Each request loads one snapshot, so a reload never changes the filter
/// half-way through an evaluation.
#[derive(Debug, Clone)]
pub struct SharedFilter {
    current: Arc<ArcSwap<ContentFilter>>,
}

impl SharedFilter {
    pub fn new(filter: ContentFilter) -> Self {
        Self {
            current: Arc::new(ArcSwap::from_pointee(filter)),
        }
    }

    /// Snapshot of the filter in force right now.
    pub fn load(&self) -> Arc<ContentFilter> {
        self.current.load_full()
    }

    /// Atomically install a new filter for subsequent requests.
    pub fn replace(&self, filter: ContentFilter) {
        self.current.store(Arc::new(filter));
    }
}

impl From<ContentFilter> for SharedFilter {
    fn from(filter: ContentFilter) -> Self {
        Self::new(filter)
    }
}
