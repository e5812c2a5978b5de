//! Web app manifest (`manifest.webmanifest`).

use super::Site;
use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub background_color: String,
    pub categories: Vec<String>,
    pub description: String,
    pub display: String,
    pub icons: Vec<ManifestIcon>,
    pub name: String,
    pub start_url: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ManifestIcon {
    pub purpose: String,
    pub sizes: String,
    #[serde(rename = "src")]
    pub source: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl Manifest {
    pub fn new(site: &Site) -> Self {
        let config = &site.config;
        Self {
            background_color: "white".into(),
            categories: config.categories.clone(),
            description: config.description.clone(),
            display: "fullscreen".into(),
            icons: Vec::new(),
            name: config.title.clone(),
            start_url: config.base_url.clone(),
        }
    }

    /// Write the manifest as pretty-printed JSON.
    pub fn write_to(&self, w: &mut dyn Write) -> Result<()> {
        serde_json::to_writer_pretty(&mut *w, self).context("manifest: render")?;
        Ok(())
    }
}
