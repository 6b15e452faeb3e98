//! Sources built from the competitors configuration file.

use super::{ListingPage, SiteSource};
use crate::config::{CompetitorConfig, TrackerConfig};
use crate::extract::{ExtractOptions, SelectorRule};
use crate::utils::slugify_name;
use tracing::warn;

/// One listing-page source per configured competitor, in file order.
///
/// Invalid selectors are reported here so a typo in the config shows up
/// once at startup; extraction skips them as well.
pub fn sources(config: &TrackerConfig) -> Vec<SiteSource> {
    config
        .competitors
        .iter()
        .map(|(name, competitor)| source(name, competitor))
        .collect()
}

fn source(name: &str, competitor: &CompetitorConfig) -> SiteSource {
    let rules: Vec<SelectorRule> = competitor
        .selectors
        .iter()
        .map(|selector| match &competitor.href_contains {
            Some(needle) => SelectorRule::with_href_filter(selector, needle),
            None => SelectorRule::new(selector),
        })
        .collect();

    for rule in &rules {
        if let Err(e) = rule.compile() {
            warn!(competitor = %name, error = %e, "Configured selector is invalid");
        }
    }
    if rules.is_empty() {
        warn!(competitor = %name, "No selectors configured; nothing will be found");
    }

    SiteSource::new(name, slugify_name(name)).with_listing(ListingPage {
        url: competitor.url.clone(),
        base_url: None,
        rules,
        options: ExtractOptions {
            min_title_len: competitor.min_title_len,
            ..ExtractOptions::default()
        },
    })
}
