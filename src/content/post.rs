//! Blog posts and the site-wide post collection.

use super::index::{self, Dated, Index, Tagged};
use super::{ContentError, markdown, markdown_files};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Deserialize;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

// ============================================================================
// Frontmatter
// ============================================================================

/// YAML frontmatter of a post file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PostFrontmatter {
    title: String,
    description: String,
    tags: Vec<String>,
    draft: bool,
    date: Option<String>,
}

impl PostFrontmatter {
    /// Check required fields and resolve the authored timestamp.
    ///
    /// Drafts get "now" truncated to the day; published posts must carry a
    /// parsable date.
    fn validate(&self, path: &Path) -> Result<DateTime<Utc>, ContentError> {
        let fail = |msg: &str| ContentError::validation(path, msg);

        if self.title.trim().is_empty() {
            return Err(fail("posts must have a title"));
        }
        if self.description.trim().is_empty() {
            return Err(fail("posts must have a description"));
        }

        match (self.draft, self.date.as_deref()) {
            (true, Some(_)) => Err(fail("drafts must not have a timestamp")),
            (true, None) => Ok(draft_timestamp()),
            (false, None) => Err(fail("posts must have a timestamp")),
            (false, Some(raw)) => parse_timestamp(raw)
                .ok_or_else(|| fail(&format!("invalid post timestamp `{raw}`"))),
        }
    }
}

/// Timestamp assigned to drafts: the current UTC day at midnight.
fn draft_timestamp() -> DateTime<Utc> {
    Utc::now().date_naive().and_time(NaiveTime::MIN).and_utc()
}

/// Parse a frontmatter date.
///
/// Accepts RFC 3339 (`2024-01-01T10:00:00Z`), `2024-01-01 10:00:00`,
/// `2024-01-01T10:00:00` (read as UTC) and a bare `2024-01-01`.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .map(|d| d.and_time(NaiveTime::MIN).and_utc())
}

// ============================================================================
// Post
// ============================================================================

/// A single blog post.
///
/// Immutable once loaded, apart from `slug` and `series` which series
/// assembly sets before the post is shared.
#[derive(Debug)]
pub struct Post {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub timestamp: DateTime<Utc>,
    pub draft: bool,
    /// URL slug; `{series}/{name}` for series members.
    pub slug: String,
    /// Slug of the owning series, if any.
    pub series: Option<String>,
    /// Source file the post was loaded from.
    pub source: PathBuf,
    markdown: String,
    html: OnceLock<String>,
}

impl Post {
    /// Load and validate the post at `path`.
    ///
    /// Frontmatter is checked before the body is ever rendered.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let doc = markdown::read_document::<PostFrontmatter>(path)?;
        let timestamp = doc.meta.validate(path)?;

        Ok(Self {
            title: doc.meta.title,
            description: doc.meta.description,
            tags: doc.meta.tags,
            timestamp,
            draft: doc.meta.draft,
            slug: file_slug(path),
            series: None,
            source: path.to_path_buf(),
            markdown: doc.body,
            html: OnceLock::new(),
        })
    }

    /// Rendered HTML body, produced on first access.
    pub fn body(&self) -> &str {
        self.html.get_or_init(|| markdown::render(&self.markdown))
    }

    /// Slug without the series prefix.
    pub fn local_slug(&self) -> &str {
        self.slug.rsplit_once('/').map_or(&self.slug, |(_, s)| s)
    }
}

impl Tagged for Post {
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl Dated for Post {
    fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// Slug derived from a content file name: the file stem.
pub fn file_slug(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Load every `*.md` file directly inside `dir` as a post.
///
/// Drafts are skipped unless `include_drafts` is set. The result is sorted
/// newest first.
pub fn load_posts(dir: &Path, include_drafts: bool) -> Result<Posts, ContentError> {
    let mut posts = Vec::new();
    for path in markdown_files(dir)? {
        let post = Post::load(&path)?;
        if include_drafts || !post.draft {
            posts.push(post);
        }
    }

    let mut posts: Posts = posts.into_iter().map(Arc::new).collect();
    posts.sort();
    Ok(posts)
}

// ============================================================================
// Posts
// ============================================================================

/// Ordered collection of shared posts.
#[derive(Debug, Clone, Default)]
pub struct Posts(Vec<Arc<Post>>);

impl Posts {
    pub fn new(posts: Vec<Arc<Post>>) -> Self {
        Self(posts)
    }

    /// Sort newest first; equal timestamps order by slug ascending.
    pub fn sort(&mut self) {
        self.0.sort_by(|a, b| {
            b.timestamp
                .cmp(&a.timestamp)
                .then_with(|| a.slug.cmp(&b.slug))
        });
    }

    /// Sort oldest first, the reading order of a series.
    pub fn sort_oldest_first(&mut self) {
        self.0.sort_by(|a, b| {
            a.timestamp
                .cmp(&b.timestamp)
                .then_with(|| a.slug.cmp(&b.slug))
        });
    }

    pub fn push(&mut self, post: Arc<Post>) {
        self.0.push(post);
    }

    pub fn extend(&mut self, other: Posts) {
        self.0.extend(other.0);
    }

    /// Most recent post.
    pub fn latest(&self) -> Option<&Arc<Post>> {
        self.0.first()
    }

    /// Oldest post.
    pub fn earliest(&self) -> Option<&Arc<Post>> {
        self.0.last()
    }

    /// The first `max` posts; `max == 0` or `max >= len` returns all.
    pub fn recent(&self, max: usize) -> &[Arc<Post>] {
        if max == 0 || max >= self.0.len() {
            &self.0
        } else {
            &self.0[..max]
        }
    }

    /// First post and the remainder.
    pub fn head(&self) -> Option<(&Arc<Post>, &[Arc<Post>])> {
        self.0.split_first()
    }

    /// Posts carrying `tag`, in collection order.
    pub fn for_tag(&self, tag: &str) -> Posts {
        self.filter(|p| p.tags.iter().any(|t| t == tag))
    }

    /// Posts authored in `year` (four-digit key), in collection order.
    pub fn for_year(&self, year: &str) -> Posts {
        self.filter(|p| p.year_key() == year)
    }

    pub fn get_by_slug(&self, slug: &str) -> Option<&Arc<Post>> {
        self.0.iter().find(|p| p.slug == slug)
    }

    pub fn has_tags(&self) -> bool {
        self.0.iter().any(|p| !p.tags.is_empty())
    }

    pub fn index_by_tag(&self) -> Index<Arc<Post>> {
        index::index_by_tag(&self.0)
    }

    pub fn index_by_year(&self) -> Index<Arc<Post>> {
        index::index_by_year(&self.0)
    }

    #[cfg(test)]
    pub fn slugs(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|p| p.slug.as_str())
    }

    fn filter(&self, f: impl Fn(&Post) -> bool) -> Posts {
        self.0.iter().filter(|p| f(p)).cloned().collect()
    }
}

impl Deref for Posts {
    type Target = [Arc<Post>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<Arc<Post>> for Posts {
    fn from_iter<I: IntoIterator<Item = Arc<Post>>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Posts {
    type Item = &'a Arc<Post>;
    type IntoIter = std::slice::Iter<'a, Arc<Post>>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_file, write_post};
    use chrono::{Datelike, TimeZone};
    use tempfile::TempDir;

    #[test]
    fn test_load_post() {
        let dir = TempDir::new().unwrap();
        let path = write_post(dir.path(), "hello", "Hello", "2024-06-01", &["rust"]);

        let post = Post::load(&path).unwrap();
        assert_eq!(post.title, "Hello");
        assert_eq!(post.slug, "hello");
        assert_eq!(post.tags, vec!["rust"]);
        assert_eq!(
            post.timestamp,
            Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
        );
        assert!(post.series.is_none());
        assert!(post.body().contains("<p>"));
    }

    #[test]
    fn test_missing_title() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "a.md",
            "---\ndescription: d\ndate: 2024-01-01\n---\nbody",
        );
        let err = Post::load(&path).unwrap_err();
        assert!(err.to_string().contains("posts must have a title"));
        assert!(err.to_string().contains("a.md"));
    }

    #[test]
    fn test_missing_description() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "a.md", "---\ntitle: t\ndate: 2024-01-01\n---\n");
        let err = Post::load(&path).unwrap_err();
        assert!(err.to_string().contains("description"));
    }

    #[test]
    fn test_published_requires_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "a.md", "---\ntitle: t\ndescription: d\n---\n");
        let err = Post::load(&path).unwrap_err();
        assert!(err.to_string().contains("posts must have a timestamp"));
    }

    #[test]
    fn test_draft_rejects_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "a.md",
            "---\ntitle: t\ndescription: d\ndraft: true\ndate: 2024-01-01\n---\n",
        );
        let err = Post::load(&path).unwrap_err();
        assert!(err.to_string().contains("drafts must not have a timestamp"));
    }

    #[test]
    fn test_draft_gets_today() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "a.md",
            "---\ntitle: t\ndescription: d\ndraft: true\n---\n",
        );
        let post = Post::load(&path).unwrap();
        assert!(post.draft);
        assert_eq!(post.timestamp.time(), NaiveTime::MIN);
        assert_eq!(post.timestamp.date_naive(), Utc::now().date_naive());
    }

    #[test]
    fn test_invalid_timestamp() {
        let dir = TempDir::new().unwrap();
        let path = write_file(
            dir.path(),
            "a.md",
            "---\ntitle: t\ndescription: d\ndate: yesterday\n---\n",
        );
        let err = Post::load(&path).unwrap_err();
        assert!(err.to_string().contains("invalid post timestamp"));
    }

    #[test]
    fn test_parse_timestamp_formats() {
        let midnight = Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01"), Some(midnight));

        let ten = Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap();
        assert_eq!(parse_timestamp("2024-03-01T10:00:00Z"), Some(ten));
        assert_eq!(parse_timestamp("2024-03-01 10:00:00"), Some(ten));
        assert_eq!(parse_timestamp("2024-03-01T12:00:00+02:00"), Some(ten));
        assert_eq!(parse_timestamp("March 1st"), None);
    }

    #[test]
    fn test_load_posts_filters_drafts_and_sorts() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "old", "Old", "2023-01-01", &[]);
        write_post(dir.path(), "new", "New", "2024-01-01", &[]);
        write_file(
            dir.path(),
            "wip.md",
            "---\ntitle: W\ndescription: d\ndraft: true\n---\n",
        );
        write_file(dir.path(), "notes.txt", "ignored");

        let posts = load_posts(dir.path(), false).unwrap();
        assert_eq!(posts.slugs().collect::<Vec<_>>(), vec!["new", "old"]);

        let posts = load_posts(dir.path(), true).unwrap();
        assert_eq!(posts.len(), 3);
        // Draft is dated today, so it sorts first
        assert_eq!(posts.latest().unwrap().slug, "wip");
    }

    #[test]
    fn test_sort_ties_by_slug() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "b", "B", "2024-01-01", &[]);
        write_post(dir.path(), "a", "A", "2024-01-01", &[]);
        let posts = load_posts(dir.path(), false).unwrap();
        assert_eq!(posts.slugs().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_collection_helpers() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "p1", "P1", "2023-05-01", &["go"]);
        write_post(dir.path(), "p2", "P2", "2024-05-01", &["rust"]);
        write_post(dir.path(), "p3", "P3", "2024-06-01", &["rust", "go"]);
        let posts = load_posts(dir.path(), false).unwrap();

        assert_eq!(posts.latest().unwrap().slug, "p3");
        assert_eq!(posts.earliest().unwrap().slug, "p1");
        assert_eq!(posts.recent(2).len(), 2);
        assert_eq!(posts.recent(0).len(), 3);
        assert_eq!(posts.recent(10).len(), 3);

        let (first, rest) = posts.head().unwrap();
        assert_eq!(first.slug, "p3");
        assert_eq!(rest.len(), 2);

        let go: Vec<_> = posts.for_tag("go").slugs().map(String::from).collect();
        assert_eq!(go, vec!["p3", "p1"]);
        assert!(posts.for_tag("missing").is_empty());
        assert_eq!(posts.for_year("2024").len(), 2);
        assert_eq!(posts.get_by_slug("p2").unwrap().timestamp.year(), 2024);
        assert!(posts.get_by_slug("nope").is_none());
        assert!(posts.has_tags());
    }

    #[test]
    fn test_head_empty() {
        assert!(Posts::default().head().is_none());
        assert!(Posts::default().recent(3).is_empty());
    }
}
