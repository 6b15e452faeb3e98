//! Multi-selector post extraction from blog listing pages.
//!
//! Listing pages change markup without notice, so each source carries an
//! ordered list of CSS selector guesses. [`extract`] walks them in order,
//! keeps elements that look like post links, and stops as soon as it has
//! enough posts.
//!
//! # Filtering
//!
//! An element becomes a [`Post`] only if:
//! - it has a link target (its own `href`, or a descendant `a[href]`)
//! - its visible text is non-empty and at least `min_title_len` characters
//! - its href passes the source-wide and per-rule substring filters
//! - the raw href has not been seen earlier in the same call
//!
//! A second pass then drops posts whose lowercased title repeats an
//! earlier one, since the same headline is often linked twice with
//! different markup.

use crate::error::ExtractError;
use crate::models::Post;
use crate::utils::normalize_whitespace;
use itertools::Itertools;
use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::{debug, warn};
use url::Url;

static LINK_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("a[href]").unwrap());

/// One CSS selector guess, optionally restricted to hrefs containing a substring.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorRule {
    pub selector: String,
    pub href_contains: Option<String>,
}

impl SelectorRule {
    pub fn new(selector: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            href_contains: None,
        }
    }

    pub fn with_href_filter(selector: impl Into<String>, href_contains: impl Into<String>) -> Self {
        Self {
            selector: selector.into(),
            href_contains: Some(href_contains.into()),
        }
    }

    /// Parse the selector, reporting invalid CSS as [`ExtractError::Selector`].
    pub fn compile(&self) -> Result<Selector, ExtractError> {
        Selector::parse(&self.selector).map_err(|e| ExtractError::Selector {
            selector: self.selector.clone(),
            message: e.to_string(),
        })
    }

    fn accepts(&self, href: &str) -> bool {
        self.href_contains
            .as_deref()
            .is_none_or(|needle| href.contains(needle))
    }
}

/// Build a rule list from bare selectors.
pub fn rules_from<I, S>(selectors: I) -> Vec<SelectorRule>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    selectors.into_iter().map(SelectorRule::new).collect()
}

/// Knobs shared by every rule of one extraction.
#[derive(Debug, Clone)]
pub struct ExtractOptions {
    /// Maximum number of posts returned.
    pub limit: usize,
    /// Minimum title length in characters.
    pub min_title_len: usize,
    /// Substrings an href must contain. Any one match is enough; an empty
    /// list accepts every href.
    pub href_must_contain: Vec<String>,
    /// Label stamped onto every post.
    pub source: Option<String>,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            limit: 10,
            min_title_len: 1,
            href_must_contain: Vec::new(),
            source: None,
        }
    }
}

impl ExtractOptions {
    fn accepts(&self, href: &str) -> bool {
        self.href_must_contain.is_empty()
            || self.href_must_contain.iter().any(|needle| href.contains(needle))
    }
}

/// Extract posts from an HTML string. See [`extract`].
pub fn extract_html(
    html: &str,
    base_url: &Url,
    rules: &[SelectorRule],
    options: &ExtractOptions,
) -> Vec<Post> {
    let document = Html::parse_document(html);
    extract(&document, base_url, rules, options)
}

/// Extract deduplicated posts from a parsed listing page.
///
/// Rules are tried in order and scanning stops once `options.limit` posts
/// have been collected, so earlier rules win. Invalid selectors are logged
/// and skipped. The result never exceeds `options.limit`, never contains
/// two posts with the same raw href, and never contains two posts whose
/// titles match case-insensitively.
pub fn extract(
    document: &Html,
    base_url: &Url,
    rules: &[SelectorRule],
    options: &ExtractOptions,
) -> Vec<Post> {
    let mut posts: Vec<Post> = Vec::new();
    let mut seen_hrefs: HashSet<String> = HashSet::new();

    'rules: for rule in rules {
        if posts.len() >= options.limit {
            break;
        }
        let selector = match rule.compile() {
            Ok(selector) => selector,
            Err(e) => {
                warn!(error = %e, "Skipping selector rule");
                continue;
            }
        };

        let before = posts.len();
        for element in document.select(&selector) {
            if posts.len() >= options.limit {
                break 'rules;
            }

            let Some(href) = link_target(&element) else {
                continue;
            };
            let title = normalize_whitespace(&element.text().collect::<String>());

            if title.is_empty()
                || title.chars().count() < options.min_title_len
                || !options.accepts(href)
                || !rule.accepts(href)
                || seen_hrefs.contains(href)
            {
                continue;
            }

            let url = absolutize(href, base_url);
            seen_hrefs.insert(href.to_string());
            posts.push(Post::new(title, url, options.source.as_deref()));
        }
        debug!(selector = %rule.selector, added = posts.len() - before, "Applied selector");
    }

    let collected = posts.len();
    let unique: Vec<Post> = posts
        .into_iter()
        .unique_by(|post| post.title.to_lowercase())
        .take(options.limit)
        .collect();

    debug!(
        collected,
        kept = unique.len(),
        "Dropped posts with repeated titles"
    );
    unique
}

/// The element's own non-empty `href`, else the first descendant link's.
fn link_target<'a>(element: &ElementRef<'a>) -> Option<&'a str> {
    let own = element.value().attr("href").filter(|href| !href.is_empty());
    own.or_else(|| {
        element
            .select(&LINK_SELECTOR)
            .filter_map(|a| a.value().attr("href"))
            .find(|href| !href.is_empty())
    })
}

/// Resolve an href found on a page served from `base_url`.
///
/// - `/path` is appended to the base origin
/// - anything not starting with `http` is appended to the base URL after a `/`
/// - everything else is kept as-is
pub fn absolutize(href: &str, base_url: &Url) -> String {
    if href.starts_with('/') {
        format!("{}{}", base_url.origin().ascii_serialization(), href)
    } else if !href.starts_with("http") {
        format!("{}/{}", base_url.as_str().trim_end_matches('/'), href)
    } else {
        href.to_string()
    }
}
