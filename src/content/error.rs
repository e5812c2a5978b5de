//! Content loading errors.
//!
//! Every variant carries the offending file so `{:#}` output points straight
//! at the file to fix.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("IO error when reading `{}`", .0.display())]
    Io(PathBuf, #[source] std::io::Error),

    #[error("invalid frontmatter in `{}`", .0.display())]
    Frontmatter(PathBuf, #[source] serde_yaml::Error),

    #[error("{}: {message}", path.display())]
    Validation { path: PathBuf, message: String },

    #[error("malformed series descriptor `{}`", .0.display())]
    Series(PathBuf, #[source] serde_yaml::Error),

    #[error("duplicate post slug `{slug}` (`{}` and `{}`)", first.display(), second.display())]
    DuplicateSlug {
        slug: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl ContentError {
    pub fn validation(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            message: message.into(),
        }
    }
}
