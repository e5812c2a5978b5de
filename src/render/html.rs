//! Default renderer: plain, escaped HTML pages in a shared layout.

use super::Renderer;
use crate::content::{About, Note, Post, Series};
use crate::embed::site::{LAYOUT_HTML, LayoutVars};
use crate::site::Site;
use crate::utils::html::{escape, escape_attr};
use crate::utils::path::file_stem;
use crate::utils::text::truncate;
use anyhow::Result;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use std::fmt::Write as _;
use std::io::Write;
use std::sync::Arc;

/// Characters left as-is inside a URL path segment.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Posts listed below the featured post on the home page.
const INDEX_MORE_POSTS: usize = 10;

/// Max length of `<meta name="description">`.
const META_DESCRIPTION_LEN: usize = 160;

#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl HtmlRenderer {
    /// Wrap `body` in the site layout and write it out.
    fn page(
        &self,
        w: &mut dyn Write,
        site: &Site,
        title: Option<&str>,
        description: &str,
        body: String,
    ) -> Result<()> {
        let config = &site.config;
        let full_title = match title {
            Some(title) => format!("{title} | {}", config.title),
            None => config.title.clone(),
        };

        let html = LAYOUT_HTML.render(&LayoutVars {
            title: escape(&full_title).into_owned(),
            site_title: escape(&config.title).into_owned(),
            description: escape_attr(&truncate(description, META_DESCRIPTION_LEN)).into_owned(),
            nav: nav(site),
            footer: footer(site),
            body,
        });

        w.write_all(html.as_bytes())?;
        Ok(())
    }
}

impl Renderer for HtmlRenderer {
    fn render_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
        let mut body = String::new();
        match site.posts.head() {
            Some((latest, _)) => {
                body.push_str(&post_article(site, latest));
                let more = &site.posts.recent(INDEX_MORE_POSTS + 1)[1..];
                if !more.is_empty() {
                    body.push_str("<h2>More posts</h2>\n");
                    body.push_str(&post_list(more));
                    body.push_str("<p><a href=\"/archive\">All posts</a></p>\n");
                }
            }
            None => body.push_str("<p>Nothing here yet.</p>\n"),
        }
        self.page(w, site, None, &site.config.description, body)
    }

    fn render_about(&self, w: &mut dyn Write, site: &Site, about: &About) -> Result<()> {
        let body = format!("<h1>About</h1>\n{}", about.body);
        self.page(w, site, Some("About"), &site.config.description, body)
    }

    fn render_post(&self, w: &mut dyn Write, site: &Site, post: &Post) -> Result<()> {
        self.page(
            w,
            site,
            Some(&post.title),
            &post.description,
            post_article(site, post),
        )
    }

    fn render_series_index(&self, w: &mut dyn Write, site: &Site, series: &Series) -> Result<()> {
        let mut body = format!("<h1>{}</h1>\n", escape(&series.name));
        if let Some(description) = &series.description {
            let _ = writeln!(body, "<p>{}</p>", escape(description));
        }
        body.push_str("<ol>\n");
        for post in series.posts.iter() {
            let _ = writeln!(
                body,
                "<li value=\"{}\"><a href=\"{}\">{}</a> {}</li>",
                site.series.position_of(post),
                post_href(&post.slug),
                escape(&post.title),
                time(post)
            );
        }
        body.push_str("</ol>\n");

        let description = series.description.as_deref().unwrap_or(&series.name);
        self.page(w, site, Some(&series.name), description, body)
    }

    fn render_archive_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
        let mut body = String::from("<h1>Archive</h1>\n");
        for entry in site.posts.index_by_year() {
            let _ = writeln!(
                body,
                "<h2><a href=\"/archive/{0}\">{0}</a></h2>",
                escape(&entry.key)
            );
            body.push_str(&post_list(&entry.items));
        }
        self.page(w, site, Some("Archive"), &site.config.description, body)
    }

    fn render_archive_page(
        &self,
        w: &mut dyn Write,
        site: &Site,
        year: &str,
        posts: &[Arc<Post>],
    ) -> Result<()> {
        let mut body = format!("<h1>Posts from {}</h1>\n", escape(year));
        body.push_str(&post_list(posts));
        let title = format!("Archive {year}");
        self.page(w, site, Some(&title), &site.config.description, body)
    }

    fn render_tag_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
        let mut body = String::from("<h1>Tags</h1>\n<ul>\n");
        for entry in site.posts.index_by_tag() {
            let _ = writeln!(
                body,
                "<li><a href=\"/tags/{}\">{}</a> ({})</li>",
                segment(&file_stem(&entry.key)),
                escape(&entry.key),
                entry.items.len()
            );
        }
        body.push_str("</ul>\n");
        self.page(w, site, Some("Tags"), &site.config.description, body)
    }

    fn render_tag_page(
        &self,
        w: &mut dyn Write,
        site: &Site,
        tag: &str,
        posts: &[Arc<Post>],
    ) -> Result<()> {
        let mut body = format!("<h1>Posts tagged “{}”</h1>\n", escape(tag));
        body.push_str(&post_list(posts));
        let title = format!("Tag: {tag}");
        self.page(w, site, Some(&title), &site.config.description, body)
    }

    fn render_notes_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
        let mut body = String::from("<h1>Notes</h1>\n");

        let pinned = site.notes.pinned();
        if !pinned.is_empty() {
            body.push_str("<h2>Pinned</h2>\n");
            body.push_str(&note_list(&pinned));
        }

        let rest: Vec<_> = site.notes.iter().filter(|n| !n.pinned).cloned().collect();
        if !rest.is_empty() {
            if !pinned.is_empty() {
                body.push_str("<h2>All notes</h2>\n");
            }
            body.push_str(&note_list(&rest));
        }

        if site.notes.has_tags() {
            body.push_str("<p><a href=\"/notes/tags\">Browse by tag</a></p>\n");
        }
        self.page(w, site, Some("Notes"), &site.config.description, body)
    }

    fn render_note(&self, w: &mut dyn Write, site: &Site, note: &Note) -> Result<()> {
        let mut body = format!("<article>\n<h1>{}</h1>\n", escape(&note.title));
        if !note.tags.is_empty() {
            let _ = writeln!(body, "<p class=\"meta\">{}</p>", tag_links(&note.tags, "/notes/tags"));
        }
        body.push_str(note.body());
        body.push_str("</article>\n");
        self.page(w, site, Some(&note.title), &note.title, body)
    }

    fn render_note_tag_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
        let mut body = String::from("<h1>Note tags</h1>\n<ul>\n");
        for entry in site.notes.index_by_tag() {
            let _ = writeln!(
                body,
                "<li><a href=\"/notes/tags/{}\">{}</a> ({})</li>",
                segment(&file_stem(&entry.key)),
                escape(&entry.key),
                entry.items.len()
            );
        }
        body.push_str("</ul>\n");
        self.page(w, site, Some("Note tags"), &site.config.description, body)
    }

    fn render_note_tag_page(
        &self,
        w: &mut dyn Write,
        site: &Site,
        tag: &str,
        notes: &[Arc<Note>],
    ) -> Result<()> {
        let mut body = format!("<h1>Notes tagged “{}”</h1>\n", escape(tag));
        body.push_str(&note_list(notes));
        let title = format!("Notes: {tag}");
        self.page(w, site, Some(&title), &site.config.description, body)
    }

    fn render_404(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
        let body = String::from(
            "<h1>Page not found</h1>\n<p>Nothing lives here. Try the <a href=\"/archive\">archive</a>.</p>\n",
        );
        self.page(w, site, Some("Not found"), &site.config.description, body)
    }
}

// ============================================================================
// Fragments
// ============================================================================

fn nav(site: &Site) -> String {
    let mut nav = String::from("<a href=\"/archive\">Archive</a>");
    if site.posts.has_tags() {
        nav.push_str("<a href=\"/tags\">Tags</a>");
    }
    if site.has_notes() {
        nav.push_str("<a href=\"/notes\">Notes</a>");
    }
    if site.about.is_some() {
        nav.push_str("<a href=\"/about\">About</a>");
    }
    nav.push_str("<a href=\"/rss.xml\">RSS</a>");
    nav
}

fn footer(site: &Site) -> String {
    let config = &site.config;
    let mut footer = format!(
        "<p>&copy; {} {}</p>",
        site.copyright_year(),
        escape(&config.author)
    );
    if site.has_social_links() {
        footer.push_str("<p>");
        for (name, url) in [("GitHub", &config.social.github), ("LinkedIn", &config.social.linkedin)] {
            if !url.is_empty() {
                let _ = write!(footer, "<a href=\"{}\">{name}</a> ", escape_attr(url));
            }
        }
        footer.push_str("</p>");
    }
    footer
}

/// Full post: header, series box, body.
fn post_article(site: &Site, post: &Post) -> String {
    let mut out = format!(
        "<article>\n<h1><a href=\"{}\">{}</a></h1>\n<p class=\"meta\">{}",
        post_href(&post.slug),
        escape(&post.title),
        time(post)
    );
    if post.draft {
        out.push_str(" · draft");
    }
    if !post.tags.is_empty() {
        let _ = write!(out, " · {}", tag_links(&post.tags, "/tags"));
    }
    out.push_str("</p>\n");

    if let Some(info) = site.series_info(&post.slug) {
        let _ = write!(
            out,
            "<aside class=\"series\"><p>Part {} of <a href=\"/{}\">{}</a></p>",
            info.position,
            segment(&info.series.slug),
            escape(&info.series.name)
        );
        if let Some(prev) = info.previous {
            let _ = write!(
                out,
                "<p>Previous: <a href=\"{}\">{}</a></p>",
                post_href(&prev.slug),
                escape(&prev.title)
            );
        }
        if let Some(next) = info.next {
            let _ = write!(
                out,
                "<p>Next: <a href=\"{}\">{}</a></p>",
                post_href(&next.slug),
                escape(&next.title)
            );
        }
        out.push_str("</aside>\n");
    }

    out.push_str(post.body());
    out.push_str("</article>\n");
    out
}

fn post_list(posts: &[Arc<Post>]) -> String {
    let mut out = String::from("<ul class=\"posts\">\n");
    for post in posts {
        let _ = writeln!(
            out,
            "<li><a href=\"{}\">{}</a> {}</li>",
            post_href(&post.slug),
            escape(&post.title),
            time(post)
        );
    }
    out.push_str("</ul>\n");
    out
}

fn note_list(notes: &[Arc<Note>]) -> String {
    let mut out = String::from("<ul class=\"notes\">\n");
    for note in notes {
        let _ = writeln!(
            out,
            "<li><a href=\"/notes/{}\">{}</a></li>",
            segment(&note.slug),
            escape(&note.title)
        );
    }
    out.push_str("</ul>\n");
    out
}

fn tag_links(tags: &[String], base: &str) -> String {
    tags.iter()
        .map(|tag| {
            let href = segment(&file_stem(tag));
            format!("<a href=\"{base}/{href}\">#{}</a>", escape(tag))
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn time(post: &Post) -> String {
    format!(
        "<time datetime=\"{}\">{}</time>",
        post.timestamp.format("%Y-%m-%d"),
        post.timestamp.format("%B %-d, %Y")
    )
}

/// Link to a post; series slugs keep their `/` separator.
fn post_href(slug: &str) -> String {
    let path: Vec<_> = slug.split('/').map(segment).collect();
    format!("/posts/{}", path.join("/"))
}

fn segment(s: &str) -> String {
    utf8_percent_encode(s, SEGMENT).to_string()
}
