//! RSS 2.0 feed (`rss.xml`).
//!
//! One item per post, newest first, with an atom `rel="self"` link back to
//! the feed itself.

use super::Site;
use crate::utils::mime::types::RSS;
use anyhow::{Result, anyhow};
use chrono::Utc;
use rss::extension::atom::{self, AtomExtensionBuilder, Link};
use rss::{Category, CategoryBuilder, Channel, ChannelBuilder, GuidBuilder, Item, ItemBuilder};
use rss::validation::Validate;
use std::collections::BTreeMap;
use std::io::Write;

/// The site feed, built from a loaded [`Site`].
#[derive(Debug, Clone)]
pub struct Feed {
    channel: Channel,
}

impl Feed {
    pub fn new(site: &Site) -> Self {
        let config = &site.config;
        let base = config.base_url.as_str();

        let mut self_link = Link::default();
        self_link.set_href(format!("{base}/rss.xml"));
        self_link.set_rel("self");
        self_link.set_mime_type(Some(RSS.to_string()));

        let items: Vec<Item> = site
            .posts
            .iter()
            .map(|post| {
                let link = format!("{base}/posts/{}", post.slug);
                ItemBuilder::default()
                    .title(Some(post.title.clone()))
                    .link(Some(link.clone()))
                    .guid(Some(GuidBuilder::default().permalink(true).value(link).build()))
                    .description(Some(post.description.clone()))
                    .categories(categories(&post.tags))
                    .pub_date(Some(post.timestamp.to_rfc2822()))
                    .build()
            })
            .collect();

        let channel = ChannelBuilder::default()
            .namespaces(BTreeMap::from([(
                "atom".to_string(),
                atom::NAMESPACE.to_string(),
            )]))
            .title(config.title.clone())
            .link(base.to_string())
            .description(config.description.clone())
            .categories(categories(&config.categories))
            .copyright(Some(format!(
                "Copyright {} {}",
                site.copyright_year(),
                config.author
            )))
            .language(Some("en".to_string()))
            .pub_date(site.posts.latest().map(|post| post.timestamp.to_rfc2822()))
            .last_build_date(Some(Utc::now().to_rfc2822()))
            .atom_ext(Some(AtomExtensionBuilder::default().links(vec![self_link]).build()))
            .items(items)
            .build();

        Self { channel }
    }

    /// Validate and write the feed XML.
    pub fn write_to(&self, w: &mut dyn Write) -> Result<()> {
        self.channel
            .validate()
            .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
        self.channel
            .write_to(w)
            .map_err(|e| anyhow!("rss: render: {e}"))?;
        Ok(())
    }
}

fn categories(names: &[String]) -> Vec<Category> {
    names
        .iter()
        .map(|name| CategoryBuilder::default().name(name.clone()).build())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::SiteOptions;
    use crate::test_helpers::write_scenario_site;
    use tempfile::TempDir;

    fn scenario_feed() -> Feed {
        let dir = TempDir::new().unwrap();
        write_scenario_site(dir.path());
        let site = Site::load(dir.path(), &SiteOptions::default()).unwrap();
        site.feed()
    }

    #[test]
    fn test_feed_channel() {
        let feed = scenario_feed();
        let channel = feed.channel;

        assert_eq!(channel.title(), "Test Site");
        assert_eq!(channel.link(), "https://example.com");
        assert_eq!(channel.language(), Some("en"));
        assert_eq!(channel.copyright(), Some("Copyright 2024 Test Author"));
        assert_eq!(channel.items().len(), 5);
        assert_eq!(channel.pub_date(), Some("Wed, 1 Jan 2025 00:00:00 +0000"));

        let atom = channel.atom_ext().unwrap();
        assert_eq!(atom.links()[0].href(), "https://example.com/rss.xml");
        assert_eq!(atom.links()[0].rel(), "self");
    }

    #[test]
    fn test_feed_items() {
        let feed = scenario_feed();
        let first = &feed.channel.items()[0];

        assert_eq!(first.title(), Some("New Year"));
        assert_eq!(first.link(), Some("https://example.com/posts/new-year"));
        assert_eq!(first.guid().unwrap().value(), "https://example.com/posts/new-year");
        assert_eq!(first.categories()[0].name(), "news");
        assert_eq!(first.pub_date(), Some("Wed, 1 Jan 2025 00:00:00 +0000"));

        let series_item = &feed.channel.items()[2];
        assert_eq!(
            series_item.link(),
            Some("https://example.com/posts/go-basics/types")
        );
    }

    #[test]
    fn test_feed_write_valid_xml() {
        let feed = scenario_feed();
        let mut out = Vec::new();
        feed.write_to(&mut out).unwrap();
        let xml = String::from_utf8(out).unwrap();

        assert!(xml.contains("<rss"));
        assert!(xml.contains("xmlns:atom"));
        assert!(xml.contains("rel=\"self\""));
    }
}
