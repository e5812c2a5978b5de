//! Debounced content watcher.
//!
//! ```text
//! notify ──► relevance filter ──► Debouncer ──(quiet for DEBOUNCE)──► on_change()
//! ```
//!
//! Editors save in bursts (temp file, rename, several writes). Every relevant
//! event pushes the deadline out again; the callback runs once the burst has
//! been quiet for a full window.

use crate::config::CONFIG_FILES;
use crate::content::{CONTENT_EXT, SERIES_INDEX};
use crate::core::Lifetime;
use crate::site::{NOTES_DIR, POSTS_DIR};
use crate::{debug, log};
use anyhow::{Context, Result};
use crossbeam::channel::{self, Receiver};
use notify::{EventKind, RecursiveMode, Watcher as _};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Quiet period before a burst of events triggers a rebuild.
pub const DEBOUNCE: Duration = Duration::from_millis(100);

// ============================================================================
// Debouncer
// ============================================================================

/// Idle → Pending(deadline) → fire, with every event replacing the deadline.
///
/// Time is always passed in so tests can drive it with a virtual clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Debouncer {
    window: Duration,
    deadline: Option<Instant>,
}

impl Debouncer {
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            deadline: None,
        }
    }

    /// Record a relevant event seen at `now`.
    pub fn on_event(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    /// Returns `true` exactly once per burst, when its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                true
            }
            _ => false,
        }
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

impl Default for Debouncer {
    fn default() -> Self {
        Self::new(DEBOUNCE)
    }
}

// ============================================================================
// Relevance
// ============================================================================

/// Markdown content, series descriptors and the site config.
pub fn is_relevant(path: &Path) -> bool {
    if is_temp_file(path) {
        return false;
    }
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    ext == CONTENT_EXT || name == SERIES_INDEX || CONFIG_FILES.contains(&name)
}

/// Editor swap and backup files.
fn is_temp_file(path: &Path) -> bool {
    let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

    matches!(ext, "bck" | "bak" | "backup" | "swp" | "swo" | "tmp")
        || name.ends_with('~')
        || name.starts_with('.')
}

fn is_relevant_event(event: &notify::Event) -> bool {
    let kind_matters = match event.kind {
        EventKind::Create(_) | EventKind::Remove(_) => true,
        EventKind::Modify(modify) => !matches!(modify, notify::event::ModifyKind::Metadata(_)),
        _ => false,
    };
    kind_matters && event.paths.iter().any(|p| is_relevant(p))
}

// ============================================================================
// Watcher
// ============================================================================

/// Watches `posts/`, `notes/` and the site root of one site.
pub struct ContentWatcher {
    watcher: notify::RecommendedWatcher,
    events: Receiver<notify::Result<notify::Event>>,
    debouncer: Debouncer,
    /// Content directories absent at startup, armed once they appear.
    missing: Vec<PathBuf>,
}

impl ContentWatcher {
    /// Start watching. Missing content directories are picked up through the
    /// root watch when they are created.
    pub fn new(root: &Path) -> Result<Self> {
        let (tx, events) = channel::unbounded();
        let mut watcher = notify::recommended_watcher(move |res: notify::Result<notify::Event>| {
            let _ = tx.send(res);
        })
        .context("create file watcher")?;

        let mut missing = Vec::new();
        for (path, mode) in watch_paths(root) {
            if !path.exists() {
                debug!("watch"; "waiting for {}", path.display());
                missing.push(path);
                continue;
            }
            watcher
                .watch(&path, mode)
                .with_context(|| format!("watch {}", path.display()))?;
            debug!("watch"; "watching {}", path.display());
        }

        Ok(Self {
            watcher,
            events,
            debouncer: Debouncer::default(),
            missing,
        })
    }

    /// Start watching any missing content directory `event` created.
    ///
    /// Returns `true` when one was armed; its contents count as a change.
    fn arm_created_roots(&mut self, event: &notify::Event) -> bool {
        if !matches!(event.kind, EventKind::Create(_)) || self.missing.is_empty() {
            return false;
        }

        let mut armed = false;
        let watcher = &mut self.watcher;
        self.missing.retain(|dir| {
            if !event.paths.contains(dir) || !dir.is_dir() {
                return true;
            }
            match watcher.watch(dir, RecursiveMode::Recursive) {
                Ok(()) => {
                    debug!("watch"; "watching {}", dir.display());
                    armed = true;
                    false
                }
                Err(e) => {
                    log!("watch"; "watch {}: {}", dir.display(), e);
                    true
                }
            }
        });
        armed
    }

    /// Run until `lifetime` is cancelled, calling `on_change` once per burst.
    ///
    /// Dropping `self` on return closes the underlying event source.
    pub fn run(mut self, lifetime: &Lifetime, mut on_change: impl FnMut()) {
        loop {
            let timeout = match self.debouncer.deadline() {
                Some(deadline) => channel::at(deadline),
                None => channel::never(),
            };

            channel::select! {
                recv(lifetime.done()) -> _ => break,
                recv(self.events) -> msg => match msg {
                    Ok(Ok(event)) => {
                        if self.arm_created_roots(&event) || is_relevant_event(&event) {
                            debug!("watch"; "{:?} {:?}", event.kind, event.paths);
                            self.debouncer.on_event(Instant::now());
                        }
                    }
                    Ok(Err(e)) => log!("watch"; "notify error: {}", e),
                    Err(_) => break,
                },
                recv(timeout) -> _ => {
                    if self.debouncer.poll(Instant::now()) {
                        on_change();
                    }
                }
            }
        }

        debug!("watch"; "stopped");
        drop(self.watcher);
    }
}

fn watch_paths(root: &Path) -> [(PathBuf, RecursiveMode); 3] {
    [
        (root.join(POSTS_DIR), RecursiveMode::Recursive),
        (root.join(NOTES_DIR), RecursiveMode::Recursive),
        (root.to_path_buf(), RecursiveMode::NonRecursive),
    ]
}
