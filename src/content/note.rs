//! Notes: short, undated pages grouped by tag.

use super::index::{self, Index, Tagged};
use super::post::file_slug;
use super::{ContentError, markdown, markdown_files};
use serde::Deserialize;
use std::ops::Deref;
use std::path::Path;
use std::sync::{Arc, OnceLock};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NoteFrontmatter {
    title: String,
    /// Required, but may be an empty list.
    tags: Option<Vec<String>>,
    pinned: bool,
}

#[derive(Debug)]
pub struct Note {
    pub title: String,
    pub tags: Vec<String>,
    pub pinned: bool,
    pub slug: String,
    markdown: String,
    html: OnceLock<String>,
}

impl Note {
    /// Load and validate the note at `path`.
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let doc = markdown::read_document::<NoteFrontmatter>(path)?;
        let meta = doc.meta;

        if meta.title.trim().is_empty() {
            return Err(ContentError::validation(path, "notes must have a title"));
        }
        let Some(tags) = meta.tags else {
            return Err(ContentError::validation(path, "notes must have a tags field"));
        };

        Ok(Self {
            title: meta.title,
            tags,
            pinned: meta.pinned,
            slug: file_slug(path),
            markdown: doc.body,
            html: OnceLock::new(),
        })
    }

    /// Rendered HTML body, produced on first access.
    pub fn body(&self) -> &str {
        self.html.get_or_init(|| markdown::render(&self.markdown))
    }
}

impl Tagged for Note {
    fn tags(&self) -> &[String] {
        &self.tags
    }
}

/// Load every note in `dir`, sorted by title.
///
/// A missing directory is an empty collection.
pub fn load_notes(dir: &Path) -> Result<Notes, ContentError> {
    let mut notes = Vec::new();
    for path in markdown_files(dir)? {
        notes.push(Arc::new(Note::load(&path)?));
    }
    // Case-sensitive byte order, same as the tag index
    notes.sort_by(|a, b| a.title.cmp(&b.title));
    Ok(Notes(notes))
}

/// Title-ordered collection of shared notes.
#[derive(Debug, Clone, Default)]
pub struct Notes(Vec<Arc<Note>>);

impl Notes {
    pub fn get_by_slug(&self, slug: &str) -> Option<&Arc<Note>> {
        self.0.iter().find(|n| n.slug == slug)
    }

    /// Pinned notes, in title order.
    pub fn pinned(&self) -> Notes {
        Notes(self.0.iter().filter(|n| n.pinned).cloned().collect())
    }

    /// Notes carrying `tag`, in title order.
    pub fn for_tag(&self, tag: &str) -> Notes {
        Notes(
            self.0
                .iter()
                .filter(|n| n.tags.iter().any(|t| t == tag))
                .cloned()
                .collect(),
        )
    }

    pub fn has_tags(&self) -> bool {
        self.0.iter().any(|n| !n.tags.is_empty())
    }

    pub fn index_by_tag(&self) -> Index<Arc<Note>> {
        index::index_by_tag(&self.0)
    }
}

impl Deref for Notes {
    type Target = [Arc<Note>];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{write_file, write_note};
    use tempfile::TempDir;

    #[test]
    fn test_empty_tags_is_valid() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "n.md", "---\ntitle: N\ntags: []\n---\nbody");
        let note = Note::load(&path).unwrap();
        assert!(note.tags.is_empty());
        assert_eq!(note.slug, "n");
    }

    #[test]
    fn test_missing_tags_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "n.md", "---\ntitle: N\n---\nbody");
        let err = Note::load(&path).unwrap_err();
        assert!(matches!(err, ContentError::Validation { .. }));
        assert!(err.to_string().contains("notes must have a tags field"));
    }

    #[test]
    fn test_missing_title_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write_file(dir.path(), "n.md", "---\ntags: [a]\n---\n");
        assert!(Note::load(&path).is_err());
    }

    #[test]
    fn test_missing_dir_is_empty() {
        let dir = TempDir::new().unwrap();
        let notes = load_notes(&dir.path().join("notes")).unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn test_notes_sorted_by_title_case_sensitive() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "b", "banana", &[], false);
        write_note(dir.path(), "a", "Zebra", &[], false);
        write_note(dir.path(), "c", "apple", &[], true);

        let notes = load_notes(dir.path()).unwrap();
        let titles: Vec<_> = notes.iter().map(|n| n.title.as_str()).collect();
        assert_eq!(titles, vec!["Zebra", "apple", "banana"]);
    }

    #[test]
    fn test_note_helpers() {
        let dir = TempDir::new().unwrap();
        write_note(dir.path(), "one", "One", &["rust"], true);
        write_note(dir.path(), "two", "Two", &["rust", "cli"], false);
        write_note(dir.path(), "three", "Three", &[], true);

        let notes = load_notes(dir.path()).unwrap();
        assert_eq!(notes.get_by_slug("two").unwrap().title, "Two");
        assert!(notes.get_by_slug("four").is_none());

        let pinned: Vec<_> = notes.pinned().iter().map(|n| n.slug.clone()).collect();
        assert_eq!(pinned, vec!["one", "three"]);

        assert_eq!(notes.for_tag("rust").len(), 2);
        assert!(notes.has_tags());

        let index = notes.index_by_tag();
        let keys: Vec<_> = index.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["cli", "rust"]);
        assert_eq!(index[1].items.len(), 2);
    }
}
