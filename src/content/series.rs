//! Series: named, ordered groups of posts under `posts/<slug>/`.
//!
//! ```text
//! posts/go-basics/
//! ├── index.yaml       name + optional description
//! ├── setup.md         → slug "go-basics/setup"
//! └── types.md         → slug "go-basics/types"
//! ```
//!
//! Members are sorted oldest first. Each member records the series slug, and
//! position/prev/next are derived from `Series::posts` on demand.

use super::post::{Post, Posts};
use super::{ContentError, markdown_files};
use serde::Deserialize;
use std::ops::Deref;
use std::path::Path;
use std::{fs, io, sync::Arc};

/// Descriptor file that marks a directory as a series.
pub const SERIES_INDEX: &str = "index.yaml";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SeriesDescriptor {
    name: String,
    description: String,
}

#[derive(Debug)]
pub struct Series {
    /// Directory name.
    pub slug: String,
    /// Display name from `index.yaml`.
    pub name: String,
    pub description: Option<String>,
    /// Members, oldest first.
    pub posts: Posts,
}

impl Series {
    /// Load the series rooted at `dir`.
    pub fn load(dir: &Path, include_drafts: bool) -> Result<Self, ContentError> {
        let index_path = dir.join(SERIES_INDEX);
        let descriptor = read_descriptor(&index_path)?;

        if descriptor.name.trim().is_empty() {
            return Err(ContentError::validation(&index_path, "series must have a name"));
        }

        let slug = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut members = Vec::new();
        for path in markdown_files(dir)? {
            let post = Post::load(&path)?;
            if include_drafts || !post.draft {
                members.push(post);
            }
        }

        // Prefix slugs and record membership before the posts are shared
        for post in &mut members {
            post.slug = format!("{slug}/{}", post.slug);
            post.series = Some(slug.clone());
        }

        let mut posts: Posts = members.into_iter().map(Arc::new).collect();
        posts.sort_oldest_first();

        let description = Some(descriptor.description).filter(|d| !d.trim().is_empty());

        Ok(Self {
            slug,
            name: descriptor.name,
            description,
            posts,
        })
    }

    /// Find a member by its post-local slug (without the series prefix).
    pub fn post(&self, local_slug: &str) -> Option<&Arc<Post>> {
        self.posts.iter().find(|p| p.local_slug() == local_slug)
    }

    /// Zero-based index of the member with full slug `slug`.
    fn index_of(&self, slug: &str) -> Option<usize> {
        self.posts.iter().position(|p| p.slug == slug)
    }
}

fn read_descriptor(path: &Path) -> Result<SeriesDescriptor, ContentError> {
    let content = fs::read_to_string(path).map_err(|e| ContentError::Io(path.to_path_buf(), e))?;
    if content.trim().is_empty() {
        return Ok(SeriesDescriptor::default());
    }
    serde_yaml::from_str(&content).map_err(|e| ContentError::Series(path.to_path_buf(), e))
}

// ============================================================================
// AllSeries
// ============================================================================

/// Where a post sits inside its series.
#[derive(Debug, Clone, Copy)]
pub struct SeriesPostInfo<'a> {
    pub series: &'a Series,
    /// 1-based position.
    pub position: usize,
    pub previous: Option<&'a Arc<Post>>,
    pub next: Option<&'a Arc<Post>>,
}

/// Every series of the site, in directory-name order.
#[derive(Debug, Clone, Default)]
pub struct AllSeries(Vec<Arc<Series>>);

/// Discover every subdirectory of `posts_dir` holding an `index.yaml`.
///
/// Subdirectories without a descriptor are not series and are skipped.
pub fn load_all_series(posts_dir: &Path, include_drafts: bool) -> Result<AllSeries, ContentError> {
    let entries = match fs::read_dir(posts_dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(AllSeries::default()),
        Err(e) => return Err(ContentError::Io(posts_dir.to_path_buf(), e)),
    };

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| ContentError::Io(posts_dir.to_path_buf(), e))?;
        let path = entry.path();
        if path.is_dir() && path.join(SERIES_INDEX).is_file() {
            dirs.push(path);
        }
    }
    dirs.sort();

    let series = dirs
        .iter()
        .map(|dir| Series::load(dir, include_drafts).map(Arc::new))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(AllSeries(series))
}

impl AllSeries {
    pub fn get_by_slug(&self, slug: &str) -> Option<&Arc<Series>> {
        self.0.iter().find(|s| s.slug == slug)
    }

    /// Series position of the post with full slug `slug`.
    ///
    /// `None` for standalone posts and unknown slugs.
    pub fn series_info(&self, slug: &str) -> Option<SeriesPostInfo<'_>> {
        let (series_slug, _) = slug.split_once('/')?;
        let series = self.get_by_slug(series_slug)?;
        let i = series.index_of(slug)?;

        Some(SeriesPostInfo {
            series,
            position: i + 1,
            previous: i.checked_sub(1).and_then(|p| series.posts.get(p)),
            next: series.posts.get(i + 1),
        })
    }

    /// 1-based position of `post` in its series.
    ///
    /// # Panics
    ///
    /// If `post` is not a series member. Callers check `post.series` first.
    pub fn position_of(&self, post: &Post) -> usize {
        let Some(series_slug) = post.series.as_deref() else {
            panic!("position_of called on standalone post `{}`", post.slug);
        };
        self.get_by_slug(series_slug)
            .and_then(|s| s.index_of(&post.slug))
            .map(|i| i + 1)
            .unwrap_or_else(|| panic!("post `{}` not found in series `{series_slug}`", post.slug))
    }

    /// Every series member, newest first.
    pub fn all_posts(&self) -> Posts {
        let mut posts: Posts = self
            .0
            .iter()
            .flat_map(|s| s.posts.iter().cloned())
            .collect();
        posts.sort();
        posts
    }
}

impl Deref for AllSeries {
    type Target = [Arc<Series>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_file, write_post, write_series};
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn go_basics(root: &Path) -> PathBuf {
        let dir = write_series(root, "go-basics", "Go Basics");
        write_post(&dir, "types", "Types", "2024-03-01", &[]);
        write_post(&dir, "setup", "Setup", "2024-02-01", &[]);
        write_post(&dir, "errors", "Errors", "2024-04-01", &[]);
        dir
    }

    #[test]
    fn test_load_series() {
        let root = TempDir::new().unwrap();
        let dir = go_basics(root.path());

        let series = Series::load(&dir, false).unwrap();
        assert_eq!(series.slug, "go-basics");
        assert_eq!(series.name, "Go Basics");

        let slugs: Vec<_> = series.posts.slugs().collect();
        assert_eq!(slugs, vec!["go-basics/setup", "go-basics/types", "go-basics/errors"]);
        assert!(
            series
                .posts
                .iter()
                .all(|p| p.series.as_deref() == Some("go-basics"))
        );
        assert_eq!(series.post("types").unwrap().title, "Types");
    }

    #[test]
    fn test_series_requires_name() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("unnamed");
        write_file(&dir, SERIES_INDEX, "description: no name\n");

        let err = Series::load(&dir, false).unwrap_err();
        assert!(err.to_string().contains("series must have a name"));
        assert!(err.to_string().contains("index.yaml"));
    }

    #[test]
    fn test_malformed_descriptor() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("broken");
        write_file(&dir, SERIES_INDEX, "name: [unclosed\n");

        let err = Series::load(&dir, false).unwrap_err();
        assert!(matches!(err, ContentError::Series(..)));
    }

    #[test]
    fn test_series_info_positions() {
        let root = TempDir::new().unwrap();
        go_basics(root.path());
        let all = load_all_series(root.path(), false).unwrap();
        let series = all.get_by_slug("go-basics").unwrap();

        for (i, post) in series.posts.iter().enumerate() {
            let info = all.series_info(&post.slug).unwrap();
            assert_eq!(info.position, i + 1);
            assert_eq!(all.position_of(post), i + 1);
            assert_eq!(
                info.previous.map(|p| p.slug.as_str()),
                i.checked_sub(1).map(|p| series.posts[p].slug.as_str())
            );
            assert_eq!(
                info.next.map(|p| p.slug.as_str()),
                series.posts.get(i + 1).map(|p| p.slug.as_str())
            );
            assert!(std::ptr::eq(info.series, series.as_ref()));
        }

        assert!(all.series_info("standalone").is_none());
        assert!(all.series_info("go-basics/missing").is_none());
        assert!(all.series_info("nope/setup").is_none());
    }

    #[test]
    #[should_panic(expected = "standalone")]
    fn test_position_of_standalone_panics() {
        let root = TempDir::new().unwrap();
        let path = write_post(root.path(), "solo", "Solo", "2024-01-01", &[]);
        let post = Post::load(&path).unwrap();
        AllSeries::default().position_of(&post);
    }

    #[test]
    fn test_load_all_series_skips_plain_dirs() {
        let root = TempDir::new().unwrap();
        go_basics(root.path());
        write_post(&root.path().join("assets"), "stray", "Stray", "2024-01-01", &[]);

        let all = load_all_series(root.path(), false).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.all_posts().latest().unwrap().slug, "go-basics/errors");
    }

    #[test]
    fn test_series_drafts_filtered() {
        let root = TempDir::new().unwrap();
        let dir = write_series(root.path(), "wip", "WIP");
        write_file(&dir, "draft.md", "---\ntitle: D\ndescription: d\ndraft: true\n---\n");

        let hidden = Series::load(&dir, false).unwrap();
        assert!(hidden.posts.is_empty());

        let shown = Series::load(&dir, true).unwrap();
        assert_eq!(shown.posts.len(), 1);
    }
}
