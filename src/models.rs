//! Data models for scraped blog posts and the reports built from them.
//!
//! - [`Post`]: one blog post found on a listing page or in a feed
//! - [`SourceReport`]: the posts collected from a single source in one run
//! - [`UnifiedReport`]: every source of a unified run, in run order
//!
//! All of these serialize straight into the JSON output files.

use chrono::{DateTime, Local};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};

/// A blog post title and link discovered on a source.
///
/// # Invariants
///
/// * `title` is whitespace-normalized and never empty
/// * `url` is absolute unless the feed itself published a relative link
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Post {
    /// The post headline as shown on the listing page or feed.
    pub title: String,
    /// Link to the post.
    pub url: String,
    /// When this run saw the post.
    pub scraped_at: DateTime<Local>,
    /// Label of where the post came from, e.g. `"Google AI Blog RSS"`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Post {
    pub fn new(title: impl Into<String>, url: impl Into<String>, source: Option<&str>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            scraped_at: Local::now(),
            source: source.map(str::to_string),
        }
    }
}

/// The posts one source produced during a run.
#[derive(Debug, Clone)]
pub struct SourceReport {
    /// Display name of the source, e.g. `"OpenAI"`.
    pub name: String,
    /// Posts in extraction order. Empty when every candidate failed.
    pub posts: Vec<Post>,
}

impl SourceReport {
    pub fn succeeded(&self) -> bool {
        !self.posts.is_empty()
    }
}

/// The merged result of a unified run.
///
/// Serializes as
/// `{generated_at, total_competitors, total_posts, competitors: {name: [posts]}}`
/// with `competitors` keyed in run order.
#[derive(Debug, Serialize)]
pub struct UnifiedReport {
    pub generated_at: DateTime<Local>,
    pub total_competitors: usize,
    pub total_posts: usize,
    #[serde(serialize_with = "serialize_in_run_order")]
    pub competitors: Vec<SourceReport>,
}

impl UnifiedReport {
    pub fn new(competitors: Vec<SourceReport>) -> Self {
        let total_posts = competitors.iter().map(|c| c.posts.len()).sum();
        Self {
            generated_at: Local::now(),
            total_competitors: competitors.len(),
            total_posts,
            competitors,
        }
    }
}

fn serialize_in_run_order<S>(reports: &[SourceReport], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut map = serializer.serialize_map(Some(reports.len()))?;
    for report in reports {
        map.serialize_entry(&report.name, &report.posts)?;
    }
    map.end()
}
