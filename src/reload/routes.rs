//! Content routes of the dev server, mirroring the static output layout.
//!
//! | Path                        | Page                     |
//! |-----------------------------|--------------------------|
//! | `/`                         | index                    |
//! | `/about`                    | about page               |
//! | `/favicon.ico`              | 204                      |
//! | `/manifest.webmanifest`     | manifest                 |
//! | `/rss.xml`                  | feed                     |
//! | `/notes`, `/notes/{slug}`   | notes index, note        |
//! | `/notes/tags[/{tag}]`       | note tag index / page    |
//! | `/posts/{slug}`             | standalone post          |
//! | `/posts/{series}/{slug}`    | series post              |
//! | `/tags[/{tag}]`             | tag index / page         |
//! | `/archive[/{year}]`         | archive index / page     |
//! | `/{series}`                 | series index             |
//!
//! A trailing `.html` is accepted everywhere. Anything else renders the 404
//! page.

use super::reply::Reply;
use crate::log;
use crate::render::Renderer;
use crate::site::Site;
use crate::utils::mime::types::{HTML, MANIFEST, RSS};
use crate::utils::path::file_stem;
use anyhow::Result;
use percent_encoding::percent_decode_str;
use std::sync::Arc;

/// Per-request state: the site snapshot the request is served from.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub site: Arc<Site>,
}

/// Renders content pages for request paths.
#[derive(Clone)]
pub struct ContentServer {
    renderer: Arc<dyn Renderer>,
}

impl ContentServer {
    pub fn new(renderer: Arc<dyn Renderer>) -> Self {
        Self { renderer }
    }

    pub fn handle(&self, ctx: &RequestContext, path: &str) -> Reply {
        let Some(segments) = split_path(path) else {
            return self.not_found(ctx, path);
        };
        let site = ctx.site.as_ref();
        let r = self.renderer.as_ref();
        let segments: Vec<&str> = segments.iter().map(String::as_str).collect();

        match segments.as_slice() {
            [] | ["index"] => self.render(path, HTML, |w| r.render_index(w, site)),
            ["about"] => match &site.about {
                Some(about) => self.render(path, HTML, |w| r.render_about(w, site, about)),
                None => self.not_found(ctx, path),
            },
            ["favicon.ico"] => Reply::no_content(),
            ["manifest.webmanifest"] => {
                let manifest = site.manifest();
                self.render(path, MANIFEST, |w| r.render_manifest(w, site, &manifest))
            }
            ["rss.xml"] => {
                let feed = site.feed();
                self.render(path, RSS, |w| r.render_feed(w, site, &feed))
            }
            ["notes", ..] if !site.has_notes() => self.not_found(ctx, path),
            ["notes"] => self.render(path, HTML, |w| r.render_notes_index(w, site)),
            ["notes", "tags"] => self.render(path, HTML, |w| r.render_note_tag_index(w, site)),
            ["notes", "tags", stem] => {
                let tags = site.notes.iter().flat_map(|n| n.tags.iter());
                let Some(tag) = find_tag(tags, stem) else {
                    return self.not_found(ctx, path);
                };
                let notes = site.notes.for_tag(tag);
                self.render(path, HTML, |w| r.render_note_tag_page(w, site, tag, &notes))
            }
            ["notes", slug] => match site.notes.get_by_slug(slug) {
                Some(note) => self.render(path, HTML, |w| r.render_note(w, site, note)),
                None => self.not_found(ctx, path),
            },
            ["posts", slug] => self.post(ctx, path, slug),
            ["posts", series, slug] => {
                match site.series.get_by_slug(series).and_then(|s| s.post(slug)) {
                    Some(post) => self.render(path, HTML, |w| r.render_post(w, site, post)),
                    None => self.not_found(ctx, path),
                }
            }
            ["tags"] => self.render(path, HTML, |w| r.render_tag_index(w, site)),
            ["tags", stem] => {
                let tags = site.posts.iter().flat_map(|p| p.tags.iter());
                let Some(tag) = find_tag(tags, stem) else {
                    return self.not_found(ctx, path);
                };
                let posts = site.posts.for_tag(tag);
                self.render(path, HTML, |w| r.render_tag_page(w, site, tag, &posts))
            }
            ["archive"] => self.render(path, HTML, |w| r.render_archive_index(w, site)),
            ["archive", year] => {
                let posts = site.posts.for_year(year);
                if posts.is_empty() {
                    return self.not_found(ctx, path);
                }
                self.render(path, HTML, |w| r.render_archive_page(w, site, year, &posts))
            }
            [slug] => match site.series.get_by_slug(slug) {
                Some(series) => {
                    self.render(path, HTML, |w| r.render_series_index(w, site, series))
                }
                None => self.not_found(ctx, path),
            },
            _ => self.not_found(ctx, path),
        }
    }

    fn post(&self, ctx: &RequestContext, path: &str, slug: &str) -> Reply {
        let site = ctx.site.as_ref();
        match site.posts.get_by_slug(slug) {
            Some(post) => self.render(path, HTML, |w| self.renderer.render_post(w, site, post)),
            None => self.not_found(ctx, path),
        }
    }

    fn not_found(&self, ctx: &RequestContext, path: &str) -> Reply {
        let mut body = Vec::new();
        match self.renderer.render_404(&mut body, &ctx.site) {
            Ok(()) => Reply::html(404, body),
            Err(e) => {
                log!("serve"; "render 404 for {}: {:#}", path, e);
                Reply::new(404, crate::utils::mime::types::PLAIN, "Not Found")
            }
        }
    }

    /// Render into a buffer first so a failure never sends a partial page.
    fn render<F>(&self, path: &str, content_type: &'static str, f: F) -> Reply
    where
        F: FnOnce(&mut Vec<u8>) -> Result<()>,
    {
        let mut body = Vec::new();
        match f(&mut body) {
            Ok(()) => Reply::ok(content_type, body),
            Err(e) => {
                log!("serve"; "render {}: {:#}", path, e);
                Reply::internal_error()
            }
        }
    }
}

/// The tag whose output file stem is `stem`; tag pages are addressed by
/// the same name they are written under.
fn find_tag<'a>(mut tags: impl Iterator<Item = &'a String>, stem: &str) -> Option<&'a str> {
    tags.find(|tag| file_stem(tag) == stem).map(String::as_str)
}

/// Decoded path segments with query, trailing slash and `.html` removed.
///
/// `None` when a segment is not valid UTF-8 after decoding.
fn split_path(path: &str) -> Option<Vec<String>> {
    let path = path.split(['?', '#']).next().unwrap_or("");
    let path = path.trim_matches('/');
    if path.is_empty() {
        return Some(Vec::new());
    }

    let mut segments = path
        .split('/')
        .map(|s| percent_decode_str(s).decode_utf8().ok().map(|s| s.into_owned()))
        .collect::<Option<Vec<_>>>()?;

    if let Some(last) = segments.last_mut()
        && let Some(stem) = last.strip_suffix(".html")
    {
        *last = stem.to_owned();
    }
    Some(segments)
}
