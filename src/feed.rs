//! RSS and Atom fallback parsing.
//!
//! When a listing page yields nothing, sources fall back to their feeds.
//! Feeds are parsed from the raw response bytes with `feed-rs`, so the
//! document's own `encoding=` declaration decides how text is decoded.
//! Each entry becomes the same [`Post`] record the HTML extractor builds.

use crate::error::ExtractError;
use crate::models::Post;
use crate::utils::normalize_whitespace;
use feed_rs::model::Entry;
use tracing::debug;

/// Parse an RSS or Atom document into at most `limit` posts.
///
/// Entries whose title is missing or blank are skipped. The link is the
/// entry's `alternate` link when it has one, else its first link, else
/// an empty string.
///
/// # Errors
///
/// Returns [`ExtractError::Feed`] when the bytes are not a feed.
pub fn parse_feed(data: &[u8], limit: usize, source: Option<&str>) -> Result<Vec<Post>, ExtractError> {
    let feed = feed_rs::parser::parse(data).map_err(ExtractError::feed)?;

    let posts: Vec<Post> = feed
        .entries
        .iter()
        .filter_map(|entry| {
            let title = entry
                .title
                .as_ref()
                .map(|t| normalize_whitespace(&t.content))
                .filter(|t| !t.is_empty());
            match title {
                Some(title) => Some(Post::new(title, entry_link(entry), source)),
                None => {
                    debug!(id = %entry.id, "Skipping feed entry without a title");
                    None
                }
            }
        })
        .take(limit)
        .collect();

    debug!(entries = feed.entries.len(), count = posts.len(), "Parsed feed entries");
    Ok(posts)
}

fn entry_link(entry: &Entry) -> String {
    entry
        .links
        .iter()
        .find(|link| link.rel.as_deref() == Some("alternate"))
        .or_else(|| entry.links.first())
        .map(|link| link.href.trim().to_string())
        .unwrap_or_default()
}
