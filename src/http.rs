//! HTTP client configuration and document fetching.
//!
//! A [`ClientConfig`] is a plain immutable value describing the headers and
//! timeout for one run. [`ClientConfig::build`] turns it into an
//! [`HttpClient`], which every source of that run shares.
//!
//! # Status handling
//!
//! | Candidate | Accepted | 403 | Other |
//! |-----------|----------|-----|-------|
//! | Listing page | any 2xx | [`FetchError::Forbidden`] | [`FetchError::Status`] |
//! | Feed | 200 only | [`FetchError::Forbidden`] | [`FetchError::Status`] |
//!
//! Nothing is retried.

use crate::error::FetchError;
use crate::utils::truncate_for_log;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Client, StatusCode};
use std::borrow::Cow;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

pub const SHORT_USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36";

/// Headers and timeout for every request of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub user_agent: String,
    /// Extra `(name, value)` headers sent with every request.
    pub headers: Vec<(String, String)>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl ClientConfig {
    /// Desktop-browser header set, 15 second timeout.
    pub fn browser() -> Self {
        Self {
            user_agent: BROWSER_USER_AGENT.to_string(),
            headers: [
                (
                    "Accept",
                    "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8",
                ),
                ("Accept-Language", "en-US,en;q=0.5"),
                ("Connection", "keep-alive"),
                ("Upgrade-Insecure-Requests", "1"),
            ]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
            timeout: Duration::from_secs(15),
        }
    }

    /// User agent only, 10 second timeout. Used for feed-only runs.
    pub fn minimal() -> Self {
        Self {
            user_agent: SHORT_USER_AGENT.to_string(),
            headers: Vec::new(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn header_map(&self) -> HeaderMap {
        let mut map = HeaderMap::new();
        match HeaderValue::from_str(&self.user_agent) {
            Ok(value) => {
                map.insert(USER_AGENT, value);
            }
            Err(_) => warn!(user_agent = %self.user_agent, "Invalid user agent; sending none"),
        }
        for (key, value) in &self.headers {
            match (
                HeaderName::from_bytes(key.as_bytes()),
                HeaderValue::from_str(value.trim()),
            ) {
                (Ok(name), Ok(value)) => {
                    map.insert(name, value);
                }
                _ => warn!(%key, %value, "Skipping invalid header"),
            }
        }
        map
    }

    /// Build the shared client for this run.
    pub fn build(&self) -> Result<HttpClient, reqwest::Error> {
        let inner = Client::builder()
            .timeout(self.timeout)
            .default_headers(self.header_map())
            .build()?;
        Ok(HttpClient { inner })
    }
}

/// What a fetched URL is expected to contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateKind {
    /// An HTML page listing blog posts.
    Listing,
    /// An RSS or Atom feed.
    Feed,
}

/// A URL a source may fetch, in the order the source prefers.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub url: String,
    pub kind: CandidateKind,
}

impl Candidate {
    pub fn listing(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: CandidateKind::Listing,
        }
    }

    pub fn feed(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind: CandidateKind::Feed,
        }
    }
}

/// A successfully fetched candidate.
///
/// Listing pages are decoded with the response charset and stored as
/// UTF-8. Feed bodies are kept exactly as received so the XML parser can
/// honour the document's declared encoding.
#[derive(Debug, Clone)]
pub struct Document {
    pub url: Url,
    pub kind: CandidateKind,
    pub body: Vec<u8>,
}

impl Document {
    /// The body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }
}

/// The run-scoped HTTP client.
#[derive(Debug, Clone)]
pub struct HttpClient {
    inner: Client,
}

impl HttpClient {
    /// GET a candidate and apply the status rules for its kind.
    #[instrument(level = "info", skip_all, fields(url = %candidate.url, kind = ?candidate.kind))]
    pub async fn fetch(&self, candidate: &Candidate) -> Result<Document, FetchError> {
        let url = Url::parse(&candidate.url).map_err(|source| FetchError::InvalidUrl {
            url: candidate.url.clone(),
            source,
        })?;

        let response = self
            .inner
            .get(url.clone())
            .send()
            .await
            .map_err(|source| FetchError::Network {
                url: candidate.url.clone(),
                source,
            })?;

        let status = response.status();
        let accepted = match candidate.kind {
            CandidateKind::Listing => status.is_success(),
            CandidateKind::Feed => status == StatusCode::OK,
        };
        if status == StatusCode::FORBIDDEN {
            return Err(FetchError::Forbidden {
                url: candidate.url.clone(),
            });
        }
        if !accepted {
            return Err(FetchError::Status {
                url: candidate.url.clone(),
                status: status.as_u16(),
            });
        }

        let body = match candidate.kind {
            CandidateKind::Listing => response.text().await.map(String::into_bytes),
            CandidateKind::Feed => response.bytes().await.map(|b| b.to_vec()),
        }
        .map_err(|source| FetchError::Network {
            url: candidate.url.clone(),
            source,
        })?;

        let document = Document {
            url,
            kind: candidate.kind,
            body,
        };
        info!(bytes = document.body.len(), status = status.as_u16(), "Fetched document");
        debug!(preview = %truncate_for_log(&document.text(), 200), "Document body");
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client() -> HttpClient {
        ClientConfig::browser()
            .with_timeout(Duration::from_secs(5))
            .build()
            .unwrap()
    }

    #[test]
    fn test_browser_header_map() {
        let map = ClientConfig::browser().header_map();
        assert_eq!(map.get(USER_AGENT).unwrap(), BROWSER_USER_AGENT);
        assert_eq!(map.get("Accept-Language").unwrap(), "en-US,en;q=0.5");
        assert_eq!(map.len(), 5);
    }

    #[test]
    fn test_invalid_header_is_skipped() {
        let config = ClientConfig {
            headers: vec![("Bad Header".to_string(), "x".to_string())],
            ..ClientConfig::minimal()
        };
        let map = config.header_map();
        assert_eq!(map.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_listing_sends_browser_headers() {
        let server = MockServer::start();
        let mock = server.mock(|when, then| {
            when.method(GET)
                .path("/blog")
                .header("user-agent", BROWSER_USER_AGENT)
                .header("upgrade-insecure-requests", "1");
            then.status(200)
                .header("content-type", "text/html; charset=utf-8")
                .body("<html><body>ok</body></html>");
        });

        let doc = client()
            .fetch(&Candidate::listing(server.url("/blog")))
            .await
            .unwrap();
        mock.assert();
        assert_eq!(doc.kind, CandidateKind::Listing);
        assert!(doc.text().contains("ok"));
    }

    #[tokio::test]
    async fn test_feed_body_kept_as_received() {
        let server = MockServer::start();
        let body: &[u8] = b"<?xml version=\"1.0\" encoding=\"ISO-8859-1\"?><rss>Caf\xE9</rss>";
        server.mock(|when, then| {
            when.method(GET).path("/rss.xml");
            then.status(200)
                .header("content-type", "application/rss+xml")
                .body(body);
        });

        let doc = client()
            .fetch(&Candidate::feed(server.url("/rss.xml")))
            .await
            .unwrap();
        assert_eq!(doc.body, body);
    }

    #[tokio::test]
    async fn test_fetch_forbidden() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/blog");
            then.status(403);
        });

        let err = client()
            .fetch(&Candidate::listing(server.url("/blog")))
            .await
            .unwrap_err();
        assert!(err.is_forbidden());
    }

    #[tokio::test]
    async fn test_feed_requires_exactly_200() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(GET).path("/rss.xml");
            then.status(204);
        });

        let err = client()
            .fetch(&Candidate::feed(server.url("/rss.xml")))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::Status { status: 204, .. }));
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let err = client()
            .fetch(&Candidate::listing("not a url"))
            .await
            .unwrap_err();
        assert!(matches!(err, FetchError::InvalidUrl { .. }));
    }
}
