//! Content model: posts, notes, series and the about page.
//!
//! # Module Structure
//!
//! ```text
//! content/
//! ├── markdown   # Frontmatter split/decode + pulldown-cmark rendering
//! ├── post       # Post, Posts, load_posts
//! ├── note       # Note, Notes, load_notes
//! ├── series     # Series, AllSeries, SeriesPostInfo
//! ├── about      # Optional about.md
//! ├── index      # index_by_tag / index_by_year
//! └── error      # ContentError
//! ```
//!
//! Every loader validates eagerly and fails on the first malformed file.
//! Nothing here touches global state, so loading is safe to repeat.

mod about;
mod error;
mod index;
mod markdown;
mod note;
mod post;
mod series;

pub use about::About;
pub use error::ContentError;
pub use note::{Note, Notes, load_notes};
pub use post::{Post, Posts, load_posts};
pub use series::{AllSeries, SERIES_INDEX, Series, SeriesPostInfo, load_all_series};

use std::path::{Path, PathBuf};
use std::{fs, io};

/// Extension of content files.
pub const CONTENT_EXT: &str = "md";

/// `*.md` files directly inside `dir`, sorted by path.
///
/// A missing directory has no files.
fn markdown_files(dir: &Path) -> Result<Vec<PathBuf>, ContentError> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(ContentError::Io(dir.to_path_buf(), e)),
    };

    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| ContentError::Io(dir.to_path_buf(), e))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == CONTENT_EXT) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
