//! # Blog Tracker
//!
//! Tracks the latest posts published on company blogs. Each source fetches
//! a blog listing page, extracts post titles and links with an ordered list
//! of CSS selectors, and falls back to the blog's RSS/Atom feeds when the
//! page yields nothing. Results are written as JSON data files and
//! Markdown reports.
//!
//! ## Usage
//!
//! ```sh
//! blog_tracker openai
//! blog_tracker google --limit 5
//! blog_tracker unified
//! blog_tracker competitors --config config.json
//! ```
//!
//! ## Architecture
//!
//! 1. **Fetching**: one shared HTTP client per run, candidates tried in order
//! 2. **Extraction**: selector rules, dedup by link and by title
//! 3. **Output**: JSON data files and Markdown reports with timestamped names

use clap::Parser;
use std::error::Error;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, error, info, instrument};
use tracing_subscriber::{EnvFilter, fmt as tfmt};

mod cli;
mod config;
mod error;
mod extract;
mod feed;
mod http;
mod models;
mod outputs;
mod scrapers;
mod tracker;
mod utils;

use cli::{Cli, Command};
use http::ClientConfig;
use outputs::naming::TimestampNaming;
use scrapers::{BlogSource, competitors, google, openai};
use tracker::{OutputDirs, Tracker};
use utils::ensure_writable_dir;

/// Pause between sources in a unified run.
const UNIFIED_DELAY: Duration = Duration::from_secs(3);

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn Error>> {
    // --- Tracing init ---
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tfmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .with_timer(tracing_subscriber::fmt::time::UtcTime::rfc_3339())
        .init();

    let start_time = std::time::Instant::now();
    info!("blog_tracker starting up");

    let args = Cli::parse();
    let limit = args.effective_limit();
    debug!(?args.command, %args.reports_dir, %args.json_dir, limit, "Parsed CLI arguments");

    // Early check: the reports dir must be writable before any fetching.
    if let Err(e) = ensure_writable_dir(&args.reports_dir).await {
        error!(
            path = %args.reports_dir,
            error = %e,
            "Reports directory is not writable (fix perms or choose a different path)"
        );
        return Err(e);
    }

    let client_config = match args.command {
        Command::OpenaiRss => ClientConfig::minimal(),
        _ => ClientConfig::browser(),
    };
    let http = client_config.build()?;
    let dirs = OutputDirs {
        json_dir: args.json_dir.clone(),
        reports_dir: args.reports_dir.clone(),
    };

    match &args.command {
        Command::Openai => {
            let tracker = Tracker::new(http, dirs);
            tracker
                .run_single(&openai::html_source(), limit, &TimestampNaming::now())
                .await;
        }
        Command::OpenaiRss => {
            let tracker = Tracker::new(http, dirs);
            tracker
                .run_single(&openai::rss_source(), limit, &TimestampNaming::now())
                .await;
        }
        Command::Google => {
            let tracker = Tracker::new(http, dirs);
            tracker
                .run_single(&google::source(), limit, &TimestampNaming::now())
                .await;
        }
        Command::Unified => {
            let sources: Vec<Box<dyn BlogSource>> = vec![
                Box::new(openai::html_source()),
                Box::new(google::source()),
            ];
            let tracker = Tracker::new(http, dirs).with_delay(UNIFIED_DELAY);
            tracker
                .run_unified(&sources, limit, &TimestampNaming::now())
                .await;
        }
        Command::Competitors { config } => {
            let tracker_config = config::load_config(Path::new(config)).await?;
            let sources: Vec<Box<dyn BlogSource>> = competitors::sources(&tracker_config)
                .into_iter()
                .map(|s| Box::new(s) as Box<dyn BlogSource>)
                .collect();
            info!(count = sources.len(), config = %config, "Loaded competitors");

            let tracker = Tracker::new(http, dirs).with_delay(tracker_config.delay());
            tracker
                .run_competitors(&sources, limit, &TimestampNaming::daily(chrono::Local::now()))
                .await;
        }
    }

    let elapsed = start_time.elapsed();
    info!(
        ?elapsed,
        secs = elapsed.as_secs(),
        millis = elapsed.subsec_millis(),
        "Execution complete"
    );

    Ok(())
}
