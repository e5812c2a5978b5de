//! Optional `about.md` page.

use super::{ContentError, markdown};
use std::path::Path;
use std::{fs, io};

/// File name of the about page in the site root.
pub const ABOUT_FILE: &str = "about.md";

/// The about page. Frontmatter, if any, is ignored.
#[derive(Debug)]
pub struct About {
    pub body: String,
}

impl About {
    /// Load `about.md` from `root`.
    ///
    /// A missing file yields `Ok(None)`; any other read failure is an error.
    pub fn load(root: &Path) -> Result<Option<Self>, ContentError> {
        let path = root.join(ABOUT_FILE);
        let source = match fs::read_to_string(&path) {
            Ok(source) => source,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ContentError::Io(path, e)),
        };

        let (_, body) = markdown::split_frontmatter(&source);
        Ok(Some(Self {
            body: markdown::render(body),
        }))
    }
}
