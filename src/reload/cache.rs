//! Last good site plus the error of the latest failed rebuild.
//!
//! ```text
//! reload() ──► rebuild lock ──► Site::load ──► publish (atomic swap)
//!                                                 │
//!                     ok  → (new site, None)      │
//!                     err → (old site, Some(err)) ◄┘
//! ```
//!
//! The `(site, error)` pair lives behind one [`ArcSwap`], so readers always
//! see a consistent pair and never wait on a rebuild in progress. Rebuilds
//! are serialized by a separate mutex: overlapping saves queue up instead of
//! racing, and results publish in the order rebuilds started.

use crate::debug;
use crate::site::{Site, SiteOptions};
use anyhow::Result;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Shared rebuild failure.
pub type SharedError = Arc<anyhow::Error>;

/// One consistent read of the cache.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub site: Arc<Site>,
    pub error: Option<SharedError>,
}

#[derive(Debug)]
pub struct SiteCache {
    root: PathBuf,
    options: SiteOptions,
    state: ArcSwap<Snapshot>,
    rebuild: Mutex<()>,
}

impl SiteCache {
    /// Load the initial site. Failure here is fatal: there is no good state yet.
    pub fn new(root: &Path, options: SiteOptions) -> Result<Self> {
        let site = Site::load(root, &options)?;
        Ok(Self {
            root: root.to_path_buf(),
            options,
            state: ArcSwap::from_pointee(Snapshot {
                site: Arc::new(site),
                error: None,
            }),
            rebuild: Mutex::new(()),
        })
    }

    /// Current `(site, last_error)` pair.
    pub fn get(&self) -> Snapshot {
        Snapshot::clone(&self.state.load())
    }

    /// Rebuild from disk and publish the outcome.
    ///
    /// On failure the previous site stays in place and the error is recorded.
    pub fn reload(&self) -> Result<Arc<Site>, SharedError> {
        let _rebuild = self.rebuild.lock();
        let start = Instant::now();
        let result = Site::load(&self.root, &self.options);
        debug!("reload"; "rebuild took {}ms", start.elapsed().as_millis());
        self.set(result)
    }

    /// Publish a load result: success replaces the site and clears the
    /// error, failure only records the error.
    pub fn set(&self, result: Result<Site>) -> Result<Arc<Site>, SharedError> {
        let result = result.map(Arc::new).map_err(Arc::new);
        self.state.rcu(|current| match &result {
            Ok(site) => Snapshot {
                site: Arc::clone(site),
                error: None,
            },
            Err(e) => Snapshot {
                site: Arc::clone(&current.site),
                error: Some(Arc::clone(e)),
            },
        });
        result
    }
}
