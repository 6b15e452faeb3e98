//! Competitors configuration file.
//!
//! The `competitors` run reads a JSON (or YAML) file mapping each
//! competitor name to a listing URL and its selector guesses:
//!
//! ```json
//! {
//!   "competitors": {
//!     "Anthropic": {
//!       "url": "https://www.anthropic.com/news",
//!       "selectors": ["article h3 a", "a[href*='/news/']"],
//!       "href_contains": "/news/",
//!       "min_title_len": 12
//!     }
//!   },
//!   "delay_between_requests": 1
//! }
//! ```
//!
//! A missing file is not an error: the run proceeds with no competitors.
//! Competitors are visited in the order the file lists them.

use crate::error::ConfigError;
use indexmap::IndexMap;
use serde::Deserialize;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{info, instrument, warn};

const DEFAULT_DELAY_SECS: f64 = 1.0;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct TrackerConfig {
    #[serde(default)]
    pub competitors: IndexMap<String, CompetitorConfig>,
    /// Seconds to wait between two competitors.
    #[serde(default = "default_delay_secs")]
    pub delay_between_requests: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            competitors: IndexMap::new(),
            delay_between_requests: DEFAULT_DELAY_SECS,
        }
    }
}

impl TrackerConfig {
    /// The configured delay, or one second if the value is negative or not a number.
    pub fn delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.delay_between_requests).unwrap_or_else(|_| {
            warn!(
                delay_between_requests = self.delay_between_requests,
                "Invalid delay; using default"
            );
            Duration::from_secs_f64(DEFAULT_DELAY_SECS)
        })
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CompetitorConfig {
    pub url: String,
    #[serde(default)]
    pub selectors: Vec<String>,
    /// Only keep links whose href contains this substring.
    #[serde(default)]
    pub href_contains: Option<String>,
    #[serde(default = "default_min_title_len")]
    pub min_title_len: usize,
}

fn default_delay_secs() -> f64 {
    DEFAULT_DELAY_SECS
}

fn default_min_title_len() -> usize {
    1
}

/// Load the competitors file at `path`.
///
/// `.yaml` / `.yml` files are parsed as YAML, everything else as JSON.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file exists but cannot be read or parsed.
#[instrument(level = "info", skip_all, fields(path = %path.display()))]
pub async fn load_config(path: &Path) -> Result<TrackerConfig, ConfigError> {
    let display = path.display().to_string();
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            warn!("Config file not found; using an empty configuration");
            return Ok(TrackerConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Io {
                path: display,
                source,
            });
        }
    };

    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    let config: TrackerConfig = if is_yaml {
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Yaml {
            path: display,
            source,
        })?
    } else {
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: display,
            source,
        })?
    };

    info!(
        competitors = config.competitors.len(),
        delay_between_requests = config.delay_between_requests,
        "Loaded configuration"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_missing_file_gives_empty_config() {
        let tmp = tempfile::tempdir().unwrap();
        let config = load_config(&tmp.path().join("config.json")).await.unwrap();
        assert!(config.competitors.is_empty());
        assert_eq!(config.delay(), Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_json_config() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            file,
            r#"{{
                "competitors": {{
                    "Acme": {{ "url": "https://acme.test/blog", "selectors": ["h2 a", ".post a"] }}
                }},
                "delay_between_requests": 0.5
            }}"#
        )
        .unwrap();

        let config = load_config(file.path()).await.unwrap();
        let acme = &config.competitors["Acme"];
        assert_eq!(acme.url, "https://acme.test/blog");
        assert_eq!(acme.selectors, vec!["h2 a", ".post a"]);
        assert_eq!(acme.href_contains, None);
        assert_eq!(acme.min_title_len, 1);
        assert_eq!(config.delay(), Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_yaml_config() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        write!(
            file,
            "competitors:\n  Acme:\n    url: https://acme.test/news\n    selectors:\n      - article a\n    href_contains: /news/\n    min_title_len: 12\n"
        )
        .unwrap();

        let config = load_config(file.path()).await.unwrap();
        let acme = &config.competitors["Acme"];
        assert_eq!(acme.href_contains.as_deref(), Some("/news/"));
        assert_eq!(acme.min_title_len, 12);
        assert_eq!(config.delay_between_requests, 1.0);
    }

    #[tokio::test]
    async fn test_competitors_keep_file_order() {
        let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(
            json,
            r#"{{ "competitors": {{
                "Zeta": {{ "url": "https://zeta.test" }},
                "Acme": {{ "url": "https://acme.test" }},
                "Mid": {{ "url": "https://mid.test" }}
            }} }}"#
        )
        .unwrap();
        let config = load_config(json.path()).await.unwrap();
        let names: Vec<&str> = config.competitors.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zeta", "Acme", "Mid"]);

        let mut yaml = tempfile::Builder::new().suffix(".yml").tempfile().unwrap();
        write!(
            yaml,
            "competitors:\n  Zeta:\n    url: https://zeta.test\n  Acme:\n    url: https://acme.test\n"
        )
        .unwrap();
        let config = load_config(yaml.path()).await.unwrap();
        let names: Vec<&str> = config.competitors.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Zeta", "Acme"]);
    }

    #[tokio::test]
    async fn test_malformed_json_is_an_error() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, "{{ not json").unwrap();
        let err = load_config(file.path()).await.unwrap_err();
        assert!(matches!(err, ConfigError::Json { .. }));
    }

    #[test]
    fn test_negative_delay_falls_back() {
        let config = TrackerConfig {
            delay_between_requests: -3.0,
            ..TrackerConfig::default()
        };
        assert_eq!(config.delay(), Duration::from_secs(1));
    }
}
