//! Run orchestration.
//!
//! A [`Tracker`] owns the run-scoped HTTP client and output locations.
//! Sources are visited strictly one after another with a fixed pause in
//! between; one source failing never stops the next one.

use crate::http::HttpClient;
use crate::models::{SourceReport, UnifiedReport};
use crate::outputs::naming::NamingStrategy;
use crate::outputs::{json, markdown};
use crate::scrapers::{BlogSource, collect_posts};
use chrono::Local;
use futures::stream::{self, StreamExt};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info, instrument, warn};

/// Where a run writes its files.
#[derive(Debug, Clone)]
pub struct OutputDirs {
    pub json_dir: String,
    pub reports_dir: String,
}

#[derive(Debug)]
pub struct Tracker {
    http: HttpClient,
    dirs: OutputDirs,
    between_sources: Duration,
}

impl Tracker {
    pub fn new(http: HttpClient, dirs: OutputDirs) -> Self {
        Self {
            http,
            dirs,
            between_sources: Duration::ZERO,
        }
    }

    /// Pause inserted between two consecutive sources.
    pub fn with_delay(mut self, between_sources: Duration) -> Self {
        self.between_sources = between_sources;
        self
    }

    /// Collect from every source in order.
    #[instrument(level = "info", skip_all, fields(sources = sources.len(), limit = limit))]
    pub async fn collect_all(&self, sources: &[Box<dyn BlogSource>], limit: usize) -> Vec<SourceReport> {
        let reports: Vec<SourceReport> = stream::iter(sources.iter().enumerate())
            .then(|(i, source)| async move {
                if i > 0 && !self.between_sources.is_zero() {
                    sleep(self.between_sources).await;
                }
                info!(source = %source.name(), "Scraping source");
                let posts = collect_posts(source.as_ref(), &self.http, limit).await;
                info!(source = %source.name(), count = posts.len(), "Finished source");
                SourceReport {
                    name: source.name().to_string(),
                    posts,
                }
            })
            .collect()
            .await;
        reports
    }

    /// Collect one source and, if it produced posts, write its JSON and
    /// Markdown files. Nothing is written for an empty result.
    #[instrument(level = "info", skip_all, fields(source = %source.name(), limit = limit))]
    pub async fn run_single(
        &self,
        source: &dyn BlogSource,
        limit: usize,
        naming: &dyn NamingStrategy,
    ) -> SourceReport {
        let posts = collect_posts(source, &self.http, limit).await;
        let report = SourceReport {
            name: source.name().to_string(),
            posts,
        };

        if !report.succeeded() {
            warn!("No blog posts found; no files written");
            return report;
        }

        for (i, post) in report.posts.iter().enumerate() {
            info!(rank = i + 1, title = %post.title, url = %post.url, "Found post");
        }

        let stem = format!("{}_posts", source.file_prefix());
        if let Err(e) = json::write_posts(&report.posts, &self.dirs.json_dir, &stem, naming).await {
            error!(error = %e, "Failed to write posts JSON");
        }

        let md = markdown::source_report(
            &source.report_title(),
            source.report_note(),
            &report.posts,
            &Local::now(),
        );
        let stem = format!("{}_report", source.file_prefix());
        if let Err(e) = markdown::write_report(&md, &self.dirs.reports_dir, &stem, naming).await {
            error!(error = %e, "Failed to write Markdown report");
        }

        report
    }

    /// Collect every source, then write the unified Markdown report and
    /// unified JSON, even when every source came back empty.
    #[instrument(level = "info", skip_all, fields(limit = limit))]
    pub async fn run_unified(
        &self,
        sources: &[Box<dyn BlogSource>],
        limit: usize,
        naming: &dyn NamingStrategy,
    ) -> UnifiedReport {
        let reports = self.collect_all(sources, limit).await;

        let md = markdown::unified_report(&reports, &Local::now());
        if let Err(e) = markdown::write_report(
            &md,
            &self.dirs.reports_dir,
            "unified_competitor_report",
            naming,
        )
        .await
        {
            error!(error = %e, "Failed to write unified report");
        }

        let unified = UnifiedReport::new(reports);
        if let Err(e) = json::write_unified(&unified, &self.dirs.json_dir, naming).await {
            error!(error = %e, "Failed to write unified JSON");
        }

        info!(total_posts = unified.total_posts, "Unified run complete");
        for report in &unified.competitors {
            info!(
                source = %report.name,
                count = report.posts.len(),
                succeeded = report.succeeded(),
                "Source summary"
            );
        }
        unified
    }

    /// Collect configured competitors and write the daily digest.
    #[instrument(level = "info", skip_all, fields(limit = limit))]
    pub async fn run_competitors(
        &self,
        sources: &[Box<dyn BlogSource>],
        limit: usize,
        naming: &dyn NamingStrategy,
    ) -> Vec<SourceReport> {
        let reports = self.collect_all(sources, limit).await;
        let md = markdown::competitor_digest(&reports, &Local::now());
        if let Err(e) = markdown::write_report(&md, &self.dirs.reports_dir, "report", naming).await {
            error!(error = %e, "Failed to write competitor digest");
        }
        reports
    }
}
