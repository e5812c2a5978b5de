//! Frontmatter splitting and markdown rendering.
//!
//! Content files look like:
//!
//! ```text
//! ---
//! title: Hello
//! tags: [intro]
//! ---
//! Body in **markdown**.
//! ```
//!
//! The YAML block is decoded into a caller-chosen type; the body is kept as
//! markdown source and rendered on demand with pulldown-cmark.

use super::ContentError;
use pulldown_cmark::{Options, Parser, html};
use serde::de::DeserializeOwned;
use std::{fs, path::Path};

/// Frontmatter fence line.
const FENCE: &str = "---";

/// A content file split into decoded metadata and raw markdown body.
#[derive(Debug)]
pub struct Document<T> {
    pub meta: T,
    pub body: String,
}

/// Read `path` and decode its frontmatter as `T`.
///
/// A file without a frontmatter block decodes `T` from an empty mapping, so
/// required-field checks still run and report what is missing.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Document<T>, ContentError> {
    let source =
        fs::read_to_string(path).map_err(|e| ContentError::Io(path.to_path_buf(), e))?;
    parse_document(&source, path)
}

/// Decode frontmatter from an in-memory source. `path` is only used for errors.
pub fn parse_document<T: DeserializeOwned>(
    source: &str,
    path: &Path,
) -> Result<Document<T>, ContentError> {
    let (yaml, body) = split_frontmatter(source);
    let yaml = if yaml.trim().is_empty() { "{}" } else { yaml };

    let meta = serde_yaml::from_str(yaml)
        .map_err(|e| ContentError::Frontmatter(path.to_path_buf(), e))?;

    Ok(Document {
        meta,
        body: body.to_string(),
    })
}

/// Split `source` into `(frontmatter, body)`.
///
/// Returns an empty frontmatter when the file does not open with a fence or
/// the fence is never closed.
pub fn split_frontmatter(source: &str) -> (&str, &str) {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);

    let Some(rest) = source
        .strip_prefix(FENCE)
        .and_then(|r| r.strip_prefix("\r\n").or_else(|| r.strip_prefix('\n')))
    else {
        return ("", source);
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            return (&rest[..offset], &rest[offset + line.len()..]);
        }
        offset += line.len();
    }

    ("", source)
}

/// Render markdown to HTML with the extensions blog posts commonly use.
pub fn render(markdown: &str) -> String {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_TABLES);
    opts.insert(Options::ENABLE_FOOTNOTES);
    opts.insert(Options::ENABLE_STRIKETHROUGH);
    opts.insert(Options::ENABLE_TASKLISTS);
    opts.insert(Options::ENABLE_HEADING_ATTRIBUTES);

    let parser = Parser::new_ext(markdown, opts);
    let mut out = String::with_capacity(markdown.len() * 3 / 2);
    html::push_html(&mut out, parser);
    out
}
