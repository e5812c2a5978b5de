//! Site configuration management for `stele.yaml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── error      # ConfigError, ConfigDiagnostics
//! ├── serve      # serve: section (interface, port, watch)
//! └── mod.rs     # SiteConfig (this file)
//! ```
//!
//! # Fields
//!
//! | Field          | Purpose                                    |
//! |----------------|--------------------------------------------|
//! | `author`       | Copyright holder, shown in feed            |
//! | `baseURL`      | Absolute site URL (http or https)          |
//! | `categories`   | Manifest and feed categories               |
//! | `description`  | Site description                           |
//! | `title`        | Site title                                 |
//! | `social`       | `github` / `linkedin` profile links        |
//! | `serve`        | Development server settings                |

mod error;
mod serve;

pub use error::{ConfigDiagnostics, ConfigError};
pub use serve::ServeConfig;

use crate::log;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Config file names, in lookup order.
pub const CONFIG_FILES: [&str; 2] = ["stele.yaml", "config.yml"];

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing stele.yaml
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Site author, used for copyright lines.
    pub author: String,

    /// Absolute base URL without trailing slash.
    #[serde(rename = "baseURL")]
    pub base_url: String,

    /// Site-wide categories for the manifest and the feed.
    pub categories: Vec<String>,

    pub description: String,

    pub title: String,

    pub social: SocialConfig,

    /// Development server settings
    pub serve: ServeConfig,
}

/// Optional social profile links.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SocialConfig {
    pub github: String,
    pub linkedin: String,
}

impl SiteConfig {
    /// Load and validate the config file in `root`.
    ///
    /// `base_url` replaces the configured base URL before validation; the
    /// dev server uses it to point every absolute link at itself.
    pub fn load(root: &Path, base_url: Option<&str>) -> Result<Self, ConfigError> {
        let path = find_config_file(root)?;
        let content =
            fs::read_to_string(&path).map_err(|e| ConfigError::Io(path.clone(), e))?;

        let (mut config, ignored) =
            Self::parse_with_ignored(&content).map_err(|e| ConfigError::Yaml(path.clone(), e))?;

        if !ignored.is_empty() {
            print_unknown_fields_warning(&ignored, &path);
        }

        if let Some(url) = base_url {
            config.base_url = url.to_string();
        }
        config.base_url = config.base_url.trim_end_matches('/').to_string();
        config.config_path = path;

        config.validate()?;
        Ok(config)
    }

    /// Parse YAML and collect the paths of fields nothing deserialized.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), serde_yaml::Error> {
        // An empty document is a valid (if useless) config
        if content.trim().is_empty() {
            return Ok((Self::default(), Vec::new()));
        }

        let mut ignored = Vec::new();
        let deserializer = serde_yaml::Deserializer::from_str(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Validate required fields, collecting every problem before failing.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut diag = ConfigDiagnostics::new();

        if self.author.trim().is_empty() {
            diag.error("author", "site config must have an author");
        }
        if self.description.trim().is_empty() {
            diag.error("description", "site config must have a description");
        }
        if self.title.trim().is_empty() {
            diag.error("title", "site config must have a title");
        }
        validate_base_url(&self.base_url, &mut diag);

        diag.into_result()
    }
}

fn validate_base_url(base_url: &str, diag: &mut ConfigDiagnostics) {
    const HINT: &str = "baseURL: https://example.com";

    if base_url.is_empty() {
        diag.error_with_hint("baseURL", "site config must have a base URL", HINT);
        return;
    }

    match url::Url::parse(base_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => diag.error_with_hint(
            "baseURL",
            format!("base URL scheme must be http or https, got `{}`", url.scheme()),
            HINT,
        ),
        Err(e) => diag.error_with_hint("baseURL", format!("invalid base URL: {e}"), HINT),
    }
}

/// Locate the config file in `root`, trying each name in [`CONFIG_FILES`].
fn find_config_file(root: &Path) -> Result<PathBuf, ConfigError> {
    CONFIG_FILES
        .iter()
        .map(|name| root.join(name))
        .find(|path| path.is_file())
        .ok_or_else(|| ConfigError::NotFound(root.to_path_buf()))
}

/// Print warning about unknown fields.
fn print_unknown_fields_warning(fields: &[String], path: &Path) {
    let display_path = path
        .file_name()
        .map(|n| n.to_string_lossy())
        .unwrap_or_else(|| path.to_string_lossy());
    log!("warning"; "unknown fields in {}, ignoring:", display_path);
    for field in fields {
        eprintln!("- {}", field);
    }
}

#[cfg(test)]
pub(crate) fn test_parse_config(content: &str) -> SiteConfig {
    SiteConfig::parse_with_ignored(content)
        .map(|(config, _)| config)
        .expect("test config should parse")
}
