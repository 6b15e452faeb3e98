//! Google AI blog source.
//!
//! The blog is hosted on Blogger, so post links point at either
//! `ai.googleblog.com` or a `*.blogspot.com` mirror. When the index page
//! yields nothing the Blogger feeds are tried.

use super::{ListingPage, SiteSource};
use crate::extract::{ExtractOptions, rules_from};
use std::time::Duration;

pub const BLOG_URL: &str = "https://ai.googleblog.com";

pub const SELECTORS: [&str; 10] = [
    "h2.post-title a",
    ".post-title a",
    r#"h3 a[href*="blogspot.com"]"#,
    r#"h2 a[href*="blogspot.com"]"#,
    ".entry-title a",
    "h1.entry-title a",
    "h2.entry-title a",
    "article h2 a",
    ".blog-post h2 a",
    ".post h2 a",
];

pub const FEED_URLS: [&str; 3] = [
    "https://ai.googleblog.com/feeds/posts/default",
    "https://ai.googleblog.com/rss.xml",
    "https://ai.googleblog.com/atom.xml",
];

const POST_HOSTS: [&str; 2] = ["blogspot.com", "ai.googleblog.com"];

/// Blogger sidebars are full of short archive links.
const MIN_TITLE_LEN: usize = 16;

pub fn source() -> SiteSource {
    SiteSource::new("Google AI", "google_ai")
        .with_listing(ListingPage {
            url: BLOG_URL.to_string(),
            base_url: Some(BLOG_URL.to_string()),
            rules: rules_from(SELECTORS),
            options: ExtractOptions {
                min_title_len: MIN_TITLE_LEN,
                href_must_contain: POST_HOSTS.iter().map(|h| h.to_string()).collect(),
                source: Some("Google AI Blog".to_string()),
                ..ExtractOptions::default()
            },
        })
        .with_feeds(FEED_URLS, Some("Google AI Blog RSS"))
        .with_pre_fetch_delay(Duration::from_secs(2))
}
