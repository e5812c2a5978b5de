//! MIME type constants for generated artifacts.
//!
//! Only the content kinds the site actually produces are listed; the dev
//! server picks one per route instead of sniffing file extensions.

/// Common MIME type constants.
pub mod types {
    // Text
    pub const HTML: &str = "text/html; charset=utf-8";
    pub const PLAIN: &str = "text/plain; charset=utf-8";
    pub const JAVASCRIPT: &str = "text/javascript; charset=utf-8";

    // Web feeds and manifests
    pub const RSS: &str = "application/rss+xml";
    pub const MANIFEST: &str = "application/manifest+json";

    // Server-sent events
    pub const EVENT_STREAM: &str = "text/event-stream";
}
