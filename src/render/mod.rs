//! Renderer contract: one method per output artifact.
//!
//! The compiler and the dev server only decide *what* to render and *where*
//! it goes; markup is entirely up to the [`Renderer`] implementation.

mod html;

pub use html::HtmlRenderer;

use crate::content::{About, Note, Post, Series};
use crate::site::{Feed, Manifest, Site};
use anyhow::Result;
use std::io::Write;
use std::sync::Arc;

/// Turns a loaded [`Site`] into page bytes.
///
/// Every method writes one complete artifact to `w`.
pub trait Renderer: Send + Sync {
    fn render_index(&self, w: &mut dyn Write, site: &Site) -> Result<()>;

    fn render_about(&self, w: &mut dyn Write, site: &Site, about: &About) -> Result<()>;

    fn render_post(&self, w: &mut dyn Write, site: &Site, post: &Post) -> Result<()>;

    fn render_series_index(&self, w: &mut dyn Write, site: &Site, series: &Series) -> Result<()>;

    fn render_archive_index(&self, w: &mut dyn Write, site: &Site) -> Result<()>;

    fn render_archive_page(
        &self,
        w: &mut dyn Write,
        site: &Site,
        year: &str,
        posts: &[Arc<Post>],
    ) -> Result<()>;

    fn render_tag_index(&self, w: &mut dyn Write, site: &Site) -> Result<()>;

    fn render_tag_page(
        &self,
        w: &mut dyn Write,
        site: &Site,
        tag: &str,
        posts: &[Arc<Post>],
    ) -> Result<()>;

    fn render_notes_index(&self, w: &mut dyn Write, site: &Site) -> Result<()>;

    fn render_note(&self, w: &mut dyn Write, site: &Site, note: &Note) -> Result<()>;

    fn render_note_tag_index(&self, w: &mut dyn Write, site: &Site) -> Result<()>;

    fn render_note_tag_page(
        &self,
        w: &mut dyn Write,
        site: &Site,
        tag: &str,
        notes: &[Arc<Note>],
    ) -> Result<()>;

    fn render_404(&self, w: &mut dyn Write, site: &Site) -> Result<()>;

    fn render_manifest(&self, w: &mut dyn Write, _site: &Site, manifest: &Manifest) -> Result<()> {
        manifest.write_to(w)
    }

    fn render_feed(&self, w: &mut dyn Write, _site: &Site, feed: &Feed) -> Result<()> {
        feed.write_to(w)
    }
}
