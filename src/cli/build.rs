//! `stele build`: load the site once and compile it to disk.

use crate::compiler::Compiler;
use crate::log;
use crate::render::HtmlRenderer;
use crate::site::{Site, SiteOptions};
use anyhow::{Context, Result};
use std::path::Path;
use std::time::Instant;

/// Build the site rooted at `root` into `output` (relative to `root`).
pub fn build_site(root: &Path, output: &Path, options: &SiteOptions) -> Result<()> {
    let start = Instant::now();
    let site = Site::load(root, options)?;

    let output = root.join(output);
    let written = Compiler::new(&site, &HtmlRenderer)
        .compile(&output)
        .context("build")?;

    log!("build"; "wrote {} files to {} ({}ms)",
        written, output.display(), start.elapsed().as_millis());
    Ok(())
}
