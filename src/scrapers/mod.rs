//! Blog sources and the procedure that collects posts from them.
//!
//! Every source implements [`BlogSource`]: it lists the URLs it is willing
//! to fetch ([`Candidate`]s, listing page first, feeds after) and knows how
//! to turn a fetched [`Document`] into posts. [`collect_posts`] drives any
//! source the same way, so the tracker never needs to know which site it
//! is talking to.
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Fallback |
//! |--------|--------|--------|----------|
//! | OpenAI | [`openai::html_source`] | HTML scraping | none |
//! | OpenAI (RSS) | [`openai::rss_source`] | Feed candidates | none |
//! | Google AI | [`google::source`] | HTML scraping | RSS/Atom feeds |
//! | Configured competitors | [`competitors`] | HTML scraping | none |
//!
//! # Failure Policy
//!
//! A candidate that fails to fetch or parse is logged and skipped. When no
//! candidate yields posts the source returns an empty list; placeholder
//! posts are never invented.

use crate::error::{ExtractError, FetchError};
use crate::extract::{ExtractOptions, SelectorRule, extract_html};
use crate::feed::parse_feed;
use crate::http::{Candidate, CandidateKind, Document, HttpClient};
use crate::models::Post;
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, instrument, warn};
use url::Url;

pub mod competitors;
pub mod google;
pub mod openai;

/// A blog that can be searched for recent posts.
#[async_trait]
pub trait BlogSource: Send + Sync {
    /// Display name used in logs and reports, e.g. `"Google AI"`.
    fn name(&self) -> &str;

    /// Stem for this source's output files, e.g. `"google_ai"`.
    fn file_prefix(&self) -> &str;

    /// Heading of this source's Markdown report.
    fn report_title(&self) -> String {
        format!("{} Blog Posts Report", self.name())
    }

    /// Extra line placed under the report header, if any.
    fn report_note(&self) -> Option<&str> {
        None
    }

    /// Pause before the first request to this source.
    fn pre_fetch_delay(&self) -> Duration {
        Duration::ZERO
    }

    /// URLs to try, in order of preference.
    fn candidates(&self) -> Vec<Candidate>;

    /// Fetch one candidate.
    async fn fetch_candidate(
        &self,
        http: &HttpClient,
        candidate: &Candidate,
    ) -> Result<Document, FetchError> {
        http.fetch(candidate).await
    }

    /// Turn a fetched document into at most `limit` posts.
    fn extract(&self, document: &Document, limit: usize) -> Result<Vec<Post>, ExtractError>;
}

/// Walk a source's candidates until one produces posts.
///
/// Fetch and extraction errors are logged and the next candidate is
/// tried. Returns an empty list when every candidate fails.
#[instrument(level = "info", skip_all, fields(source = %source.name(), limit = limit))]
pub async fn collect_posts(source: &dyn BlogSource, http: &HttpClient, limit: usize) -> Vec<Post> {
    let delay = source.pre_fetch_delay();
    if !delay.is_zero() {
        sleep(delay).await;
    }

    for candidate in source.candidates() {
        info!(url = %candidate.url, kind = ?candidate.kind, "Trying candidate");
        let document = match source.fetch_candidate(http, &candidate).await {
            Ok(document) => document,
            Err(e) if e.is_forbidden() => {
                warn!(error = %e, "Access forbidden; the site may have bot protection");
                continue;
            }
            Err(e) => {
                warn!(error = %e, "Candidate fetch failed");
                continue;
            }
        };

        match source.extract(&document, limit) {
            Ok(posts) if !posts.is_empty() => {
                info!(count = posts.len(), url = %candidate.url, "Collected posts");
                return posts;
            }
            Ok(_) => info!(url = %candidate.url, "Candidate produced no posts"),
            Err(e) => warn!(error = %e, url = %candidate.url, "Candidate could not be parsed"),
        }
    }

    warn!("No posts found; returning an empty list");
    Vec::new()
}

/// A blog listing page and the selector guesses used on it.
#[derive(Debug, Clone)]
pub struct ListingPage {
    pub url: String,
    /// Base for resolving relative hrefs. Defaults to the fetched page URL.
    pub base_url: Option<String>,
    pub rules: Vec<SelectorRule>,
    pub options: ExtractOptions,
}

/// A source described entirely by data: an optional listing page followed
/// by feed URLs.
#[derive(Debug, Clone)]
pub struct SiteSource {
    name: String,
    file_prefix: String,
    report_title: Option<String>,
    report_note: Option<String>,
    listing: Option<ListingPage>,
    feeds: Vec<String>,
    feed_label: Option<String>,
    pre_fetch_delay: Duration,
}

impl SiteSource {
    pub fn new(name: impl Into<String>, file_prefix: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_prefix: file_prefix.into(),
            report_title: None,
            report_note: None,
            listing: None,
            feeds: Vec::new(),
            feed_label: None,
            pre_fetch_delay: Duration::ZERO,
        }
    }

    pub fn with_listing(mut self, listing: ListingPage) -> Self {
        self.listing = Some(listing);
        self
    }

    pub fn with_feeds<I, S>(mut self, urls: I, label: Option<&str>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feeds = urls.into_iter().map(Into::into).collect();
        self.feed_label = label.map(str::to_string);
        self
    }

    pub fn with_pre_fetch_delay(mut self, delay: Duration) -> Self {
        self.pre_fetch_delay = delay;
        self
    }

    pub fn with_report_title(mut self, title: impl Into<String>) -> Self {
        self.report_title = Some(title.into());
        self
    }

    pub fn with_report_note(mut self, note: impl Into<String>) -> Self {
        self.report_note = Some(note.into());
        self
    }

    fn base_for(&self, listing: &ListingPage, document: &Document) -> Url {
        match listing.base_url.as_deref().map(Url::parse) {
            Some(Ok(base)) => base,
            Some(Err(e)) => {
                warn!(base_url = ?listing.base_url, error = %e, "Invalid base URL; using page URL");
                document.url.clone()
            }
            None => document.url.clone(),
        }
    }
}

#[async_trait]
impl BlogSource for SiteSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn file_prefix(&self) -> &str {
        &self.file_prefix
    }

    fn report_title(&self) -> String {
        self.report_title
            .clone()
            .unwrap_or_else(|| format!("{} Blog Posts Report", self.name))
    }

    fn report_note(&self) -> Option<&str> {
        self.report_note.as_deref()
    }

    fn pre_fetch_delay(&self) -> Duration {
        self.pre_fetch_delay
    }

    fn candidates(&self) -> Vec<Candidate> {
        self.listing
            .iter()
            .map(|listing| Candidate::listing(&listing.url))
            .chain(self.feeds.iter().map(Candidate::feed))
            .collect()
    }

    fn extract(&self, document: &Document, limit: usize) -> Result<Vec<Post>, ExtractError> {
        match document.kind {
            CandidateKind::Listing => {
                let Some(listing) = &self.listing else {
                    return Ok(Vec::new());
                };
                let base = self.base_for(listing, document);
                let options = ExtractOptions {
                    limit,
                    ..listing.options.clone()
                };
                Ok(extract_html(&document.text(), &base, &listing.rules, &options))
            }
            CandidateKind::Feed => {
                parse_feed(&document.body, limit, self.feed_label.as_deref())
            }
        }
    }
}
