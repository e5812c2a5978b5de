//! Development server with live reload support.
//!
//! ```text
//! main thread      incoming_requests ──► rayon pool ──► LiveReloader::handle
//!                                   └──► sse thread ──► LiveReloader::stream
//! watch thread     ContentWatcher ──► LiveReloader::on_change
//! ```
//!
//! Ctrl+C unblocks the request loop and cancels the lifetime; the watcher and
//! every event stream return on their own.

mod lifecycle;
mod response;

use crate::config::SiteConfig;
use crate::core::{self, is_shutdown, register_server};
use crate::reload::{ContentWatcher, LiveReloader, SiteCache};
use crate::render::HtmlRenderer;
use crate::site::SiteOptions;
use crate::{debug, log};
use anyhow::{Context, Result};
use std::net::IpAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use tiny_http::{Request, Server};

/// Request handler threads for ordinary pages.
const REQUEST_THREADS: usize = 4;

/// CLI overrides for the `serve:` config section.
#[derive(Debug, Clone, Default)]
pub struct ServeArgs {
    pub interface: Option<IpAddr>,
    pub port: Option<u16>,
    pub watch: Option<bool>,
    pub notes: bool,
}

/// Serve the site rooted at `root` until Ctrl+C.
pub fn serve_site(root: &Path, args: &ServeArgs) -> Result<()> {
    let config = SiteConfig::load(root, None).context("load config")?;
    let interface = args.interface.unwrap_or(config.serve.interface);
    let port = args.port.unwrap_or(config.serve.port);
    let watch = args.watch.unwrap_or(config.serve.watch);

    let (server, addr) = lifecycle::bind_with_retry(interface, port)?;
    let server = Arc::new(server);

    // Links point at the dev server and drafts are always visible
    let options = SiteOptions {
        include_drafts: true,
        enable_notes: args.notes,
        base_url: Some(format!("http://{addr}")),
    };
    let cache = Arc::new(SiteCache::new(root, options)?);

    let (canceller, lifetime) = core::lifetime();
    register_server(Arc::clone(&server), canceller.clone());

    let reloader = Arc::new(LiveReloader::new(cache, Arc::new(HtmlRenderer), lifetime));
    let watch_handle = if watch {
        Some(spawn_watcher(root.to_path_buf(), Arc::clone(&reloader))?)
    } else {
        None
    };

    log!("serve"; "http://{}", addr);
    let result = run_request_loop(&server, &reloader);

    canceller.cancel();
    reloader.shutdown();
    lifecycle::wait_for_shutdown(watch_handle);
    result
}

fn spawn_watcher(root: PathBuf, reloader: Arc<LiveReloader>) -> Result<thread::JoinHandle<()>> {
    let watcher = ContentWatcher::new(&root)?;
    thread::Builder::new()
        .name("watch".into())
        .spawn(move || reloader.watch(watcher))
        .context("spawn watcher thread")
}

fn run_request_loop(server: &Server, reloader: &Arc<LiveReloader>) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(REQUEST_THREADS)
        .build()
        .context("create request thread pool")?;

    for request in server.incoming_requests() {
        if LiveReloader::is_event_stream(request.url()) && response::is_get_or_head(&request) {
            // Long-lived: keep it off the pool
            let reloader = Arc::clone(reloader);
            thread::spawn(move || {
                if let Err(e) = response::respond_event_stream(request, &reloader) {
                    log!("serve"; "event stream error: {e}");
                }
            });
            continue;
        }

        let reloader = Arc::clone(reloader);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &reloader) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, reloader: &LiveReloader) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }
    if !response::is_get_or_head(&request) {
        return response::respond_method_not_allowed(request);
    }

    let reply = reloader.handle(request.url());
    debug!("serve"; "{} {} -> {}", request.method(), request.url(), reply.status);
    response::respond(request, reply)
}
