//! Configuration file watcher for hot reload of filter rules.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::config::loader::{build_filter, load_config};
use crate::filter::SharedFilter;

/// Watches the configuration file and swaps in a new filter when it changes.
///
/// Only the `filter` and `limits` sections take effect on reload; listener and
/// upstream changes need a restart.
pub struct ConfigWatcher {
    path: PathBuf,
    filter: SharedFilter,
}

impl ConfigWatcher {
    pub fn new(path: &Path, filter: SharedFilter) -> Self {
        Self {
            path: path.to_path_buf(),
            filter,
        }
    }

    /// Start watching. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let path = self.path.clone();
        let filter = self.filter;

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event.kind.is_modify() || event.kind.is_create() {
                        tracing::info!("Config file change detected, reloading filter");
                        reload(&path, &filter);
                    }
                }
                Err(e) => tracing::error!("Watch error: {:?}", e),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}

/// Load `path` and install its filter. On failure the current filter stays.
pub fn reload(path: &Path, filter: &SharedFilter) -> bool {
    let compiled = load_config(path)
        .map_err(|e| e.to_string())
        .and_then(|config| build_filter(&config).map_err(|e| e.to_string()));

    match compiled {
        Ok(new_filter) => {
            tracing::info!(
                patterns = new_filter.pattern_count(),
                mode = new_filter.mode().as_str(),
                "Filter reloaded"
            );
            filter.replace(new_filter);
            true
        }
        Err(e) => {
            tracing::error!(
                "Failed to reload config: {}. Keeping current filter.",
                e
            );
            false
        }
    }
}
