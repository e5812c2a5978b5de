//! Grouping of posts and notes into keyed listing buckets.
//!
//! ```text
//! items (newest first)          index_by_tag              index_by_year
//! ┌─────────────────────┐       ┌───────────────────┐     ┌────────────────┐
//! │ c  2025  [go]       │  ──►  │ go   → [c, a]     │     │ 2025 → [c]     │
//! │ b  2024  [rust]     │       │ rust → [b, a]     │     │ 2024 → [b, a]  │
//! │ a  2024  [go, rust] │       └───────────────────┘     └────────────────┘
//! └─────────────────────┘        keys ascending            keys descending
//! ```
//!
//! Items keep their input order inside each bucket.

use chrono::{DateTime, Datelike, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Content that carries a tag list.
pub trait Tagged {
    fn tags(&self) -> &[String];
}

/// Content that carries an authored timestamp.
pub trait Dated {
    fn timestamp(&self) -> DateTime<Utc>;

    /// Four-digit year key used by archive pages.
    fn year_key(&self) -> String {
        year_key(self.timestamp())
    }
}

impl<T: Tagged + ?Sized> Tagged for Arc<T> {
    fn tags(&self) -> &[String] {
        (**self).tags()
    }
}

impl<T: Dated + ?Sized> Dated for Arc<T> {
    fn timestamp(&self) -> DateTime<Utc> {
        (**self).timestamp()
    }
}

/// Zero-padded four-digit year of `ts`.
pub fn year_key(ts: DateTime<Utc>) -> String {
    format!("{:04}", ts.year())
}

/// One bucket of an index: a key and the items filed under it.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexEntry<T> {
    pub key: String,
    pub items: Vec<T>,
}

/// Ordered sequence of buckets.
pub type Index<T> = Vec<IndexEntry<T>>;

/// Group items by tag. An item with N tags lands in N buckets.
///
/// Buckets are sorted by tag, ascending and case-sensitive.
pub fn index_by_tag<T: Tagged + Clone>(items: &[T]) -> Index<T> {
    let mut groups: BTreeMap<&str, Vec<T>> = BTreeMap::new();
    for item in items {
        for tag in item.tags() {
            groups.entry(tag.as_str()).or_default().push(item.clone());
        }
    }

    groups
        .into_iter()
        .map(|(key, items)| IndexEntry {
            key: key.to_string(),
            items,
        })
        .collect()
}

/// Group items by the year of their timestamp, newest year first.
pub fn index_by_year<T: Dated + Clone>(items: &[T]) -> Index<T> {
    let mut groups: BTreeMap<String, Vec<T>> = BTreeMap::new();
    for item in items {
        groups.entry(item.year_key()).or_default().push(item.clone());
    }

    groups
        .into_iter()
        .rev()
        .map(|(key, items)| IndexEntry { key, items })
        .collect()
}
