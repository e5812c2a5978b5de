//! Fixture writers shared by unit tests.

use std::fs;
use std::path::{Path, PathBuf};

/// Minimal valid `stele.yaml`.
pub const CONFIG: &str = "\
author: Test Author
baseURL: https://example.com
categories: [testing]
description: A test site
title: Test Site
";

/// Write `content` to `dir/name`, creating `dir` as needed.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    fs::create_dir_all(dir).unwrap();
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Write a published post `dir/<slug>.md`.
pub fn write_post(dir: &Path, slug: &str, title: &str, date: &str, tags: &[&str]) -> PathBuf {
    let content = format!(
        "---\ntitle: {title}\ndescription: About {title}\ndate: {date}\ntags: [{}]\n---\nBody of {title}.\n",
        tags.join(", ")
    );
    write_file(dir, &format!("{slug}.md"), &content)
}

/// Write a draft post (no date) `dir/<slug>.md`.
pub fn write_draft(dir: &Path, slug: &str, title: &str) -> PathBuf {
    let content =
        format!("---\ntitle: {title}\ndescription: About {title}\ndraft: true\n---\nDraft.\n");
    write_file(dir, &format!("{slug}.md"), &content)
}

/// Write a note `dir/<slug>.md`.
pub fn write_note(dir: &Path, slug: &str, title: &str, tags: &[&str], pinned: bool) -> PathBuf {
    let content = format!(
        "---\ntitle: {title}\ntags: [{}]\npinned: {pinned}\n---\nNote {title}.\n",
        tags.join(", ")
    );
    write_file(dir, &format!("{slug}.md"), &content)
}

/// Create `posts_dir/<slug>/index.yaml` and return the series directory.
pub fn write_series(posts_dir: &Path, slug: &str, name: &str) -> PathBuf {
    let dir = posts_dir.join(slug);
    write_file(&dir, "index.yaml", &format!("name: {name}\ndescription: All about {name}\n"));
    dir
}

/// A site root with config only.
pub fn write_site(root: &Path) {
    write_file(root, "stele.yaml", CONFIG);
}

/// The reference site: three standalone posts and a two-part series.
///
/// ```text
/// posts/new-year.md         2025-01-01  [news]
/// posts/summer.md           2024-06-01  [go, news]
/// posts/first.md            2024-01-01  [meta]
/// posts/go-basics/intro.md  2024-02-01  [go]
/// posts/go-basics/types.md  2024-03-01  [go]
/// ```
pub fn write_scenario_site(root: &Path) {
    write_site(root);
    let posts = root.join("posts");
    write_post(&posts, "first", "First", "2024-01-01", &["meta"]);
    write_post(&posts, "summer", "Summer", "2024-06-01", &["go", "news"]);
    write_post(&posts, "new-year", "New Year", "2025-01-01", &["news"]);

    let series = write_series(&posts, "go-basics", "Go Basics");
    write_post(&series, "intro", "Intro", "2024-02-01", &["go"]);
    write_post(&series, "types", "Types", "2024-03-01", &["go"]);
}
