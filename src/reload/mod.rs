//! Dev-server core: keep the last good site, rebuild on change, tell tabs.
//!
//! # Architecture
//!
//! ```text
//! ContentWatcher ──► LiveReloader::on_change ──► SiteCache::reload
//!                                  │
//!                                  └──► Subscribers::broadcast ──► event streams
//! ```
//!
//! # Modules
//!
//! - `broadcast` - Single-slot subscriber mailboxes, drop-on-full fan-out
//! - `cache` - Last good site plus the latest rebuild error
//! - `live` - Request entry point, event stream, reload callback
//! - `reply` - Transport-independent HTTP reply
//! - `routes` - Content pages by URL
//! - `watcher` - Debounced filesystem watcher

pub mod broadcast;
pub mod cache;
pub mod live;
pub mod reply;
pub mod routes;
pub mod watcher;

pub use cache::SiteCache;
pub use live::LiveReloader;
pub use reply::Reply;
pub use watcher::ContentWatcher;
