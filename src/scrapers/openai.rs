//! OpenAI blog sources.
//!
//! Two variants exist because the blog page sits behind bot protection
//! that often answers 403:
//!
//! - [`html_source`] scrapes `https://openai.com/blog`
//! - [`rss_source`] only tries the known feed locations

use super::{ListingPage, SiteSource};
use crate::extract::{ExtractOptions, rules_from};
use std::time::Duration;

pub const BASE_URL: &str = "https://openai.com";
pub const BLOG_URL: &str = "https://openai.com/blog";

/// Selector guesses for the blog index, most specific last.
pub const SELECTORS: [&str; 5] = [
    r#"a[href*="/blog/"]"#,
    ".blog-post a",
    r#"[data-testid="blog-post"] a"#,
    "article a",
    ".post-title a",
];

pub const FEED_URLS: [&str; 4] = [
    "https://openai.com/blog/rss.xml",
    "https://openai.com/rss.xml",
    "https://openai.com/feed.xml",
    "https://openai.com/blog/feed",
];

/// Titles of 10 characters or fewer are navigation links.
const MIN_TITLE_LEN: usize = 11;

/// Scrape the blog index page. Posts carry no source label.
pub fn html_source() -> SiteSource {
    SiteSource::new("OpenAI", "openai")
        .with_listing(ListingPage {
            url: BLOG_URL.to_string(),
            base_url: Some(BASE_URL.to_string()),
            rules: rules_from(SELECTORS),
            options: ExtractOptions {
                min_title_len: MIN_TITLE_LEN,
                href_must_contain: vec!["/blog/".to_string()],
                ..ExtractOptions::default()
            },
        })
        .with_pre_fetch_delay(Duration::from_secs(2))
}

/// Read posts from the first feed URL that answers 200.
pub fn rss_source() -> SiteSource {
    SiteSource::new("OpenAI", "openai_rss")
        .with_feeds(FEED_URLS, Some("RSS"))
        .with_report_title("OpenAI Blog Posts Report (RSS)")
        .with_report_note("**Data Source:** Real RSS feed (no fake data)")
}
