//! Static build: traverse a loaded [`Site`] and write one file per artifact.
//!
//! # Output layout
//!
//! ```text
//! public/
//! ├── index.html            about.html (if present)
//! ├── archive.html          archive/<year>.html
//! ├── tags.html             tags/<tag>.html
//! ├── posts/<slug>.html     posts/<series>/<slug>.html
//! ├── <series>.html
//! ├── notes.html            notes/<slug>.html         (notes only)
//! ├── notes/tags.html       notes/tags/<tag>.html     (notes only)
//! ├── manifest.webmanifest
//! └── rss.xml
//! ```
//!
//! Markup is entirely the [`Renderer`]'s business; the compiler only decides
//! paths. The first failing artifact aborts the build and names its path.
//! Files already written stay on disk.

use crate::debug;
use crate::render::Renderer;
use crate::site::{NOTES_DIR, POSTS_DIR, Site};
use crate::utils::path::file_stem;
use anyhow::{Context, Result};
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

const ARCHIVE_DIR: &str = "archive";
const TAGS_DIR: &str = "tags";
const HTML_EXT: &str = "html";

pub const MANIFEST_FILE: &str = "manifest.webmanifest";
pub const FEED_FILE: &str = "rss.xml";

/// Renders a [`Site`] into an output directory.
pub struct Compiler<'a> {
    site: &'a Site,
    renderer: &'a dyn Renderer,
    written: AtomicUsize,
}

impl<'a> Compiler<'a> {
    pub fn new(site: &'a Site, renderer: &'a dyn Renderer) -> Self {
        Self {
            site,
            renderer,
            written: AtomicUsize::new(0),
        }
    }

    /// Wipe `output` and write every artifact into it.
    ///
    /// Returns the number of files written.
    pub fn compile(&self, output: &Path) -> Result<usize> {
        let site = self.site;
        let r = self.renderer;
        let with_notes = !site.notes.is_empty();

        self.create_output_dir(output, with_notes)
            .with_context(|| format!("create output directory {}", output.display()))?;

        self.write(&output.join("index.html"), |w| r.render_index(w, site))?;

        if let Some(about) = &site.about {
            self.write(&output.join("about.html"), |w| r.render_about(w, site, about))?;
        }

        if with_notes {
            self.compile_notes(output)?;
        }

        site.posts.par_iter().try_for_each(|post| {
            let path = post_path(output, &post.slug);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("create {}", parent.display()))?;
            }
            self.write(&path, |w| r.render_post(w, site, post))
        })?;

        for series in site.series.iter() {
            let path = output.join(html_name(&series.slug));
            self.write(&path, |w| r.render_series_index(w, site, series))?;
        }

        self.write(&output.join(html_name(ARCHIVE_DIR)), |w| {
            r.render_archive_index(w, site)
        })?;
        for entry in site.posts.index_by_year() {
            let path = output.join(ARCHIVE_DIR).join(html_name(&entry.key));
            self.write(&path, |w| r.render_archive_page(w, site, &entry.key, &entry.items))?;
        }

        self.write(&output.join(html_name(TAGS_DIR)), |w| r.render_tag_index(w, site))?;
        for entry in site.posts.index_by_tag() {
            let path = output.join(TAGS_DIR).join(html_name(&file_stem(&entry.key)));
            self.write(&path, |w| r.render_tag_page(w, site, &entry.key, &entry.items))?;
        }

        let manifest = site.manifest();
        self.write(&output.join(MANIFEST_FILE), |w| {
            r.render_manifest(w, site, &manifest)
        })?;

        let feed = site.feed();
        self.write(&output.join(FEED_FILE), |w| r.render_feed(w, site, &feed))?;

        Ok(self.written.load(Ordering::Relaxed))
    }

    fn compile_notes(&self, output: &Path) -> Result<()> {
        let site = self.site;
        let r = self.renderer;
        let notes_dir = output.join(NOTES_DIR);

        self.write(&output.join(html_name(NOTES_DIR)), |w| r.render_notes_index(w, site))?;

        site.notes.par_iter().try_for_each(|note| {
            self.write(&notes_dir.join(html_name(&note.slug)), |w| {
                r.render_note(w, site, note)
            })
        })?;

        self.write(&notes_dir.join(html_name(TAGS_DIR)), |w| {
            r.render_note_tag_index(w, site)
        })?;
        for entry in site.notes.index_by_tag() {
            let path = notes_dir.join(TAGS_DIR).join(html_name(&file_stem(&entry.key)));
            self.write(&path, |w| {
                r.render_note_tag_page(w, site, &entry.key, &entry.items)
            })?;
        }

        Ok(())
    }

    fn create_output_dir(&self, output: &Path, with_notes: bool) -> Result<()> {
        if output.exists() {
            fs::remove_dir_all(output)?;
        }

        let mut dirs = vec![
            output.to_path_buf(),
            output.join(POSTS_DIR),
            output.join(ARCHIVE_DIR),
            output.join(TAGS_DIR),
        ];
        if with_notes {
            dirs.push(output.join(NOTES_DIR));
            dirs.push(output.join(NOTES_DIR).join(TAGS_DIR));
        }

        for dir in dirs {
            fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
        }
        Ok(())
    }

    /// Create `path` and hand a buffered writer to `render`.
    fn write<F>(&self, path: &Path, render: F) -> Result<()>
    where
        F: FnOnce(&mut dyn Write) -> Result<()>,
    {
        debug!("build"; "writing {}", path.display());

        let file = File::create(path).with_context(|| format!("create {}", path.display()))?;
        let mut w = BufWriter::new(file);
        render(&mut w).with_context(|| format!("render {}", path.display()))?;
        w.flush().with_context(|| format!("write {}", path.display()))?;

        self.written.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// `posts/<slug>.html`; series slugs contain a `/` and land in a subdirectory.
fn post_path(output: &Path, slug: &str) -> PathBuf {
    let mut path = output.join(POSTS_DIR);
    let (dirs, name) = slug.rsplit_once('/').unwrap_or(("", slug));
    path.extend(dirs.split('/').filter(|s| !s.is_empty()));
    path.push(html_name(name));
    path
}

fn html_name(stem: &str) -> String {
    format!("{stem}.{HTML_EXT}")
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{About, Note, Post, Series};
    use crate::render::HtmlRenderer;
    use crate::site::SiteOptions;
    use crate::test_helpers::*;
    use anyhow::bail;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn scenario(enable_notes: bool) -> (TempDir, Site) {
        let dir = TempDir::new().unwrap();
        write_scenario_site(dir.path());
        write_file(dir.path(), "about.md", "About me.\n");
        write_note(&dir.path().join(NOTES_DIR), "til", "TIL", &["rust"], false);
        let site = Site::load(
            dir.path(),
            &SiteOptions {
                enable_notes,
                ..SiteOptions::default()
            },
        )
        .unwrap();
        (dir, site)
    }

    #[test]
    fn test_compile_writes_full_layout() {
        let (dir, site) = scenario(true);
        let out = dir.path().join("public");

        let written = Compiler::new(&site, &HtmlRenderer).compile(&out).unwrap();

        for file in [
            "index.html",
            "about.html",
            "archive.html",
            "archive/2025.html",
            "archive/2024.html",
            "tags.html",
            "tags/go.html",
            "tags/meta.html",
            "tags/news.html",
            "posts/first.html",
            "posts/summer.html",
            "posts/new-year.html",
            "posts/go-basics/intro.html",
            "posts/go-basics/types.html",
            "go-basics.html",
            "notes.html",
            "notes/til.html",
            "notes/tags.html",
            "notes/tags/rust.html",
            "manifest.webmanifest",
            "rss.xml",
        ] {
            assert!(out.join(file).is_file(), "missing {file}");
        }
        assert_eq!(written, 21);
    }

    #[test]
    fn test_compile_tag_with_slash() {
        let dir = TempDir::new().unwrap();
        write_site(dir.path());
        write_post(&dir.path().join(POSTS_DIR), "pipeline", "Pipeline", "2024-05-01", &["ci/cd"]);
        write_note(&dir.path().join(NOTES_DIR), "deploy", "Deploy", &["ci/cd"], false);
        let site = Site::load(
            dir.path(),
            &SiteOptions {
                enable_notes: true,
                ..SiteOptions::default()
            },
        )
        .unwrap();
        let out = dir.path().join("public");

        Compiler::new(&site, &HtmlRenderer).compile(&out).unwrap();

        assert!(out.join("tags/ci%2Fcd.html").is_file());
        assert!(out.join("notes/tags/ci%2Fcd.html").is_file());
        assert!(!out.join("tags/ci").exists());

        let tags = fs::read_to_string(out.join("tags.html")).unwrap();
        assert!(tags.contains("href=\"/tags/ci%252Fcd\""), "{tags}");
    }

    #[test]
    fn test_compile_without_notes() {
        let (dir, site) = scenario(false);
        let out = dir.path().join("public");

        Compiler::new(&site, &HtmlRenderer).compile(&out).unwrap();

        assert!(!out.join("notes").exists());
        assert!(!out.join("notes.html").exists());
    }

    #[test]
    fn test_compile_clears_previous_output() {
        let (dir, site) = scenario(false);
        let out = dir.path().join("public");
        write_file(&out, "stale.html", "old");

        Compiler::new(&site, &HtmlRenderer).compile(&out).unwrap();

        assert!(!out.join("stale.html").exists());
        assert!(out.join("index.html").exists());
    }

    /// Renders like [`HtmlRenderer`] but fails on one post.
    struct FailingRenderer;

    impl Renderer for FailingRenderer {
        fn render_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
            HtmlRenderer.render_index(w, site)
        }
        fn render_about(&self, w: &mut dyn Write, site: &Site, about: &About) -> Result<()> {
            HtmlRenderer.render_about(w, site, about)
        }
        fn render_post(&self, w: &mut dyn Write, site: &Site, post: &Post) -> Result<()> {
            if post.slug == "summer" {
                bail!("template exploded");
            }
            HtmlRenderer.render_post(w, site, post)
        }
        fn render_series_index(&self, w: &mut dyn Write, s: &Site, x: &Series) -> Result<()> {
            HtmlRenderer.render_series_index(w, s, x)
        }
        fn render_archive_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
            HtmlRenderer.render_archive_index(w, site)
        }
        fn render_archive_page(
            &self,
            w: &mut dyn Write,
            site: &Site,
            year: &str,
            posts: &[Arc<Post>],
        ) -> Result<()> {
            HtmlRenderer.render_archive_page(w, site, year, posts)
        }
        fn render_tag_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
            HtmlRenderer.render_tag_index(w, site)
        }
        fn render_tag_page(
            &self,
            w: &mut dyn Write,
            site: &Site,
            tag: &str,
            posts: &[Arc<Post>],
        ) -> Result<()> {
            HtmlRenderer.render_tag_page(w, site, tag, posts)
        }
        fn render_notes_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
            HtmlRenderer.render_notes_index(w, site)
        }
        fn render_note(&self, w: &mut dyn Write, site: &Site, note: &Note) -> Result<()> {
            HtmlRenderer.render_note(w, site, note)
        }
        fn render_note_tag_index(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
            HtmlRenderer.render_note_tag_index(w, site)
        }
        fn render_note_tag_page(
            &self,
            w: &mut dyn Write,
            site: &Site,
            tag: &str,
            notes: &[Arc<Note>],
        ) -> Result<()> {
            HtmlRenderer.render_note_tag_page(w, site, tag, notes)
        }
        fn render_404(&self, w: &mut dyn Write, site: &Site) -> Result<()> {
            HtmlRenderer.render_404(w, site)
        }
    }

    #[test]
    fn test_render_failure_names_path() {
        let (dir, site) = scenario(false);
        let out = dir.path().join("public");

        let err = Compiler::new(&site, &FailingRenderer).compile(&out).unwrap_err();
        let msg = format!("{err:#}");

        assert!(msg.contains("summer.html"), "{msg}");
        assert!(msg.contains("template exploded"));
        // Best effort: earlier artifacts stay on disk
        assert!(out.join("index.html").exists());
        assert!(!out.join("rss.xml").exists());
    }

    #[test]
    fn test_post_path() {
        let out = Path::new("/out");
        assert_eq!(post_path(out, "first"), Path::new("/out/posts/first.html"));
        assert_eq!(
            post_path(out, "go-basics/intro"),
            Path::new("/out/posts/go-basics/intro.html")
        );
        assert_eq!(post_path(out, "v1.2"), Path::new("/out/posts/v1.2.html"));
    }
}
