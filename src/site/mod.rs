//! The site aggregate: config plus every content collection.
//!
//! # Load pipeline
//!
//! ```text
//! config ──► about ──► notes? ──► series ──► posts ──► merge + sort ──► slug check
//! ```
//!
//! Phases run strictly in order and any failure aborts the whole load. A
//! loaded `Site` is never mutated; rebuilding produces a fresh instance.

mod feed;
mod manifest;

pub use feed::Feed;
pub use manifest::Manifest;

use crate::config::SiteConfig;
use crate::content::{
    About, AllSeries, ContentError, Notes, Posts, SeriesPostInfo, load_all_series,
    load_notes, load_posts,
};
use crate::{debug, log};
use anyhow::{Context, Result};
use chrono::{Datelike, Utc};
use rustc_hash::FxHashMap;
use std::path::Path;
use std::time::{Duration, Instant};

/// Directory of standalone posts and series.
pub const POSTS_DIR: &str = "posts";
/// Directory of notes.
pub const NOTES_DIR: &str = "notes";

/// Load-time switches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SiteOptions {
    /// Keep draft posts (standalone and series).
    pub include_drafts: bool,
    /// Load `notes/` and render the notes section.
    pub enable_notes: bool,
    /// Replace the configured base URL.
    pub base_url: Option<String>,
}

#[derive(Debug)]
pub struct Site {
    pub config: SiteConfig,
    pub about: Option<About>,
    pub notes: Notes,
    /// Standalone and series posts, newest first.
    pub posts: Posts,
    pub series: AllSeries,
    pub options: SiteOptions,
}

impl Site {
    /// Run the load pipeline against the site rooted at `root`.
    pub fn load(root: &Path, options: &SiteOptions) -> Result<Self> {
        let start = Instant::now();

        let config = phase("config", |c: &SiteConfig| c.config_path.display().to_string(), || {
            SiteConfig::load(root, options.base_url.as_deref())
        })
        .context("load config")?;

        let about = phase("about page", |_| String::new(), || About::load(root))
            .context("load about")?;

        let notes = if options.enable_notes {
            phase("notes", |n: &Notes| n.len().to_string(), || {
                load_notes(&root.join(NOTES_DIR))
            })
            .context("load notes")?
        } else {
            Notes::default()
        };

        let posts_dir = root.join(POSTS_DIR);
        let series = phase("series", |s: &AllSeries| s.len().to_string(), || {
            load_all_series(&posts_dir, options.include_drafts)
        })
        .context("load series")?;

        let posts = phase("posts", |p: &Posts| p.len().to_string(), || -> Result<Posts, ContentError> {
            let mut posts = load_posts(&posts_dir, options.include_drafts)?;
            posts.extend(series.all_posts());
            posts.sort();
            check_unique_slugs(&posts)?;
            Ok(posts)
        })
        .context("load posts")?;

        log!("site"; "loaded {} posts, {} series, {} notes ({})",
            posts.len(), series.len(), notes.len(), millis(start.elapsed()));

        Ok(Self {
            config,
            about,
            notes,
            posts,
            series,
            options: options.clone(),
        })
    }

    /// Series placement of the post with full slug `slug`.
    pub fn series_info(&self, slug: &str) -> Option<SeriesPostInfo<'_>> {
        self.series.series_info(slug)
    }

    /// Year of the earliest post, or the current year for an empty site.
    pub fn copyright_year(&self) -> i32 {
        self.posts
            .earliest()
            .map_or_else(|| Utc::now().year(), |post| post.timestamp.year())
    }

    pub fn has_social_links(&self) -> bool {
        let social = &self.config.social;
        !social.github.is_empty() || !social.linkedin.is_empty()
    }

    /// Whether the notes section is rendered.
    pub fn has_notes(&self) -> bool {
        self.options.enable_notes && !self.notes.is_empty()
    }

    pub fn manifest(&self) -> Manifest {
        Manifest::new(self)
    }

    pub fn feed(&self) -> Feed {
        Feed::new(self)
    }
}

/// Run one load phase with timing logs.
fn phase<T, E>(
    name: &str,
    count: impl Fn(&T) -> String,
    f: impl FnOnce() -> Result<T, E>,
) -> Result<T, E> {
    debug!("site"; "loading {}...", name);
    let start = Instant::now();
    let value = f()?;

    let n = count(&value);
    let elapsed = millis(start.elapsed());
    if n.is_empty() {
        debug!("site"; "loaded {} ({})", name, elapsed);
    } else {
        debug!("site"; "loaded {} {} ({})", n, name, elapsed);
    }
    Ok(value)
}

fn millis(d: Duration) -> String {
    format!("{}ms", d.as_millis())
}

/// Reject two posts sharing a slug after the series merge.
fn check_unique_slugs(posts: &Posts) -> Result<(), ContentError> {
    let mut seen: FxHashMap<&str, &Path> = FxHashMap::default();
    for post in posts {
        if let Some(first) = seen.insert(&post.slug, &post.source) {
            return Err(ContentError::DuplicateSlug {
                slug: post.slug.clone(),
                first: first.to_path_buf(),
                second: post.source.clone(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
