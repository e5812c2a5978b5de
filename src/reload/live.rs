//! Live reloader: site cache + watcher + reload broadcast around the
//! content routes.
//!
//! ```text
//!              ┌──────────── /__dev__/sse ───────► Subscription ──► event stream
//! request ─────┼──────────── /__dev__/reload.js ─► client script
//!              ├──────────── /__dev__/rebuild ───► reload() ──► 303 / 500
//!              └─► cache.get() ─┬─ error ─► error page
//!                               └─ site ──► ContentServer ──► inject script
//!
//! watcher ──► on_change() ──► cache.reload() ──► broadcast (ok or error)
//! ```

use super::broadcast::{Reload, Subscribers, Subscription};
use super::cache::SiteCache;
use super::reply::Reply;
use super::routes::{ContentServer, RequestContext};
use super::watcher::ContentWatcher;
use crate::core::Lifetime;
use crate::embed::serve::{ERROR_HTML, ErrorVars, RELOAD_JS, ReloadVars};
use crate::logger::{status_error, status_success};
use crate::render::Renderer;
use crate::utils::html::{escape, inject_before_body_end, strip_ansi};
use crate::utils::mime::types::{JAVASCRIPT, PLAIN};
use crate::{debug, log};
use crossbeam::channel;
use std::io::{self, Write};
use std::sync::Arc;
use std::time::Duration;

pub const SSE_PATH: &str = "/__dev__/sse";
pub const RELOAD_JS_PATH: &str = "/__dev__/reload.js";
pub const REBUILD_PATH: &str = "/__dev__/rebuild";

/// Interval of `: keep-alive` comments on idle event streams. A failed write
/// is how a closed tab is noticed.
const KEEP_ALIVE: Duration = Duration::from_secs(15);

pub struct LiveReloader {
    cache: Arc<SiteCache>,
    content: ContentServer,
    subscribers: Arc<Subscribers>,
    lifetime: Lifetime,
}

impl LiveReloader {
    pub fn new(cache: Arc<SiteCache>, renderer: Arc<dyn Renderer>, lifetime: Lifetime) -> Self {
        Self {
            cache,
            content: ContentServer::new(renderer),
            subscribers: Arc::new(Subscribers::new()),
            lifetime,
        }
    }

    /// Whether `path` must be answered with [`LiveReloader::stream`].
    pub fn is_event_stream(path: &str) -> bool {
        strip_query(path) == SSE_PATH
    }

    /// Answer every request except the event stream.
    pub fn handle(&self, path: &str) -> Reply {
        match strip_query(path) {
            RELOAD_JS_PATH => return Reply::ok(JAVASCRIPT, reload_script()),
            REBUILD_PATH => return self.rebuild(),
            _ => {}
        }

        let snapshot = self.cache.get();
        if let Some(error) = &snapshot.error {
            return error_page(error);
        }

        let ctx = RequestContext {
            site: snapshot.site,
        };
        let mut reply = self.content.handle(&ctx, path);
        if reply.is_html() {
            let html = inject_before_body_end(&reply.body_str(), &script_tag());
            reply.body = html.into_bytes();
        }
        reply
    }

    /// Open a mailbox for one event-stream connection.
    pub fn subscribe(&self) -> Subscription {
        self.subscribers.subscribe()
    }

    /// Pump reload events into `w` until the tab goes away, the mailbox is
    /// closed, or the lifetime ends.
    pub fn stream(&self, subscription: &Subscription, w: &mut dyn Write) -> io::Result<()> {
        let keep_alive = channel::tick(KEEP_ALIVE);
        send(w, b": connected\n\n")?;

        loop {
            channel::select! {
                recv(subscription.receiver()) -> msg => match msg {
                    Ok(Reload) => send(w, b"data: reload\n\n")?,
                    Err(_) => return Ok(()),
                },
                recv(self.lifetime.done()) -> _ => return Ok(()),
                recv(keep_alive) -> _ => send(w, b": keep-alive\n\n")?,
            }
        }
    }

    /// Reload callback: rebuild, report, and tell every tab to refresh.
    ///
    /// Tabs are told even when the rebuild failed so they show the error page.
    pub fn on_change(&self) {
        log!("reload"; "change detected, rebuilding...");
        match self.cache.reload() {
            Ok(site) => status_success(&format!("rebuilt {} posts", site.posts.len())),
            Err(e) => status_error("rebuild failed", &format!("{e:#}")),
        }
        if self.lifetime.is_cancelled() {
            return;
        }
        let notified = self.subscribers.broadcast();
        debug!("reload"; "notified {} of {} tabs", notified, self.subscriber_count());
    }

    /// Drive `watcher` until the lifetime ends, then close every stream.
    pub fn watch(&self, watcher: ContentWatcher) {
        watcher.run(&self.lifetime, || self.on_change());
        self.shutdown();
    }

    /// Force-close all open event streams.
    pub fn shutdown(&self) {
        self.subscribers.close_all();
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn rebuild(&self) -> Reply {
        log!("reload"; "manual rebuild requested");
        let result = self.cache.reload();
        self.subscribers.broadcast();
        match result {
            Ok(_) => Reply::see_other("/"),
            Err(e) => Reply::new(500, PLAIN, format!("rebuild failed: {e:#}")),
        }
    }
}

fn send(w: &mut dyn Write, frame: &[u8]) -> io::Result<()> {
    w.write_all(frame)?;
    w.flush()
}

fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn reload_script() -> String {
    RELOAD_JS.render(&ReloadVars {
        sse_path: SSE_PATH.to_owned(),
    })
}

fn script_tag() -> String {
    format!("<script src=\"{RELOAD_JS_PATH}\"></script>")
}

fn error_page(error: &anyhow::Error) -> Reply {
    let chain = format!("{error:#}");
    let body = ERROR_HTML.render(&ErrorVars {
        script_src: RELOAD_JS_PATH.to_owned(),
        error: escape(&strip_ansi(&chain)).into_owned(),
    });
    Reply::html(500, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Canceller, lifetime};
    use crate::render::HtmlRenderer;
    use crate::site::{POSTS_DIR, SiteOptions};
    use crate::test_helpers::*;
    use std::fs;
    use std::thread;
    use tempfile::TempDir;

    fn setup() -> (TempDir, Canceller, Arc<LiveReloader>) {
        let dir = TempDir::new().unwrap();
        write_scenario_site(dir.path());
        let cache = Arc::new(SiteCache::new(dir.path(), SiteOptions::default()).unwrap());
        let (canceller, lifetime) = lifetime();
        let reloader = LiveReloader::new(cache, Arc::new(HtmlRenderer), lifetime);
        (dir, canceller, Arc::new(reloader))
    }

    fn break_site(dir: &TempDir) -> std::path::PathBuf {
        write_file(&dir.path().join(POSTS_DIR), "broken.md", "---\ntitle: <oops>\n---\n")
    }

    #[test]
    fn test_pages_get_reload_script() {
        let (_dir, _canceller, reloader) = setup();

        let reply = reloader.handle("/posts/first");
        assert_eq!(reply.status, 200);
        let body = reply.body_str();
        assert!(body.contains("<script src=\"/__dev__/reload.js\"></script></body>"));

        let feed = reloader.handle("/rss.xml");
        assert!(!feed.body_str().contains("reload.js"));
    }

    #[test]
    fn test_reload_js_endpoint() {
        let (_dir, _canceller, reloader) = setup();
        let reply = reloader.handle(RELOAD_JS_PATH);
        assert_eq!(reply.content_type, JAVASCRIPT);
        assert!(reply.body_str().contains(SSE_PATH));
        assert!(LiveReloader::is_event_stream("/__dev__/sse?t=1"));
        assert!(!LiveReloader::is_event_stream("/"));
    }

    #[test]
    fn test_failed_rebuild_serves_error_page_then_recovers() {
        let (dir, _canceller, reloader) = setup();
        let sub = reloader.subscribe();

        let broken = break_site(&dir);
        reloader.on_change();

        // Broadcast happens even though the rebuild failed
        assert_eq!(sub.receiver().try_recv(), Ok(Reload));

        let reply = reloader.handle("/posts/first");
        assert_eq!(reply.status, 500);
        let body = reply.body_str();
        assert!(body.contains("Site failed to reload"));
        assert!(body.contains("posts must have a description"));
        assert!(body.contains("<script src=\"/__dev__/reload.js\"></script>"));

        fs::remove_file(broken).unwrap();
        reloader.on_change();
        assert_eq!(reloader.handle("/posts/first").status, 200);
    }

    #[test]
    fn test_manual_rebuild() {
        let (dir, _canceller, reloader) = setup();

        let ok = reloader.handle(REBUILD_PATH);
        assert_eq!(ok.status, 303);
        assert_eq!(ok.location.as_deref(), Some("/"));

        break_site(&dir);
        let failed = reloader.handle(REBUILD_PATH);
        assert_eq!(failed.status, 500);
        assert!(failed.body_str().starts_with("rebuild failed"));
    }

    #[test]
    fn test_stream_delivers_reload_and_stops_on_cancel() {
        let (_dir, canceller, reloader) = setup();
        let sub = reloader.subscribe();
        assert_eq!(reloader.subscriber_count(), 1);

        reloader.subscribers.broadcast();
        let streamer = {
            let reloader = Arc::clone(&reloader);
            thread::spawn(move || {
                let mut out = Vec::new();
                reloader.stream(&sub, &mut out).unwrap();
                out
            })
        };

        thread::sleep(Duration::from_millis(50));
        canceller.cancel();
        let out = String::from_utf8(streamer.join().unwrap()).unwrap();

        assert!(out.starts_with(": connected\n\n"));
        assert!(out.contains("data: reload\n\n"));
        assert_eq!(reloader.subscriber_count(), 0);
    }

    #[test]
    fn test_shutdown_closes_streams() {
        let (_dir, _canceller, reloader) = setup();
        let sub = reloader.subscribe();

        reloader.shutdown();
        let mut out = Vec::new();
        reloader.stream(&sub, &mut out).unwrap();
        assert_eq!(out, b": connected\n\n");
    }
}
