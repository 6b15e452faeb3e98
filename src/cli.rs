//! Command-line interface definitions for Blog Tracker.
//!
//! Every flag has a default, so `blog_tracker <command>` with no other
//! arguments runs the fixed sequence for that command.

use clap::{Parser, Subcommand};

/// Command-line arguments for the Blog Tracker application.
///
/// # Examples
///
/// ```sh
/// # Latest OpenAI posts, scraped from the blog listing page
/// blog_tracker openai
///
/// # Both built-in sources into one report, 5 posts each
/// blog_tracker unified
///
/// # Config-driven competitors run
/// blog_tracker --reports-dir ./out competitors --config competitors.yaml
/// ```
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Directory for Markdown reports
    #[arg(long, global = true, env = "BLOG_TRACKER_REPORTS_DIR", default_value = "reports")]
    pub reports_dir: String,

    /// Directory for JSON data files
    #[arg(long, global = true, env = "BLOG_TRACKER_JSON_DIR", default_value = ".")]
    pub json_dir: String,

    /// Maximum posts per source (10 by default, 5 for `unified`)
    #[arg(long, global = true)]
    pub limit: Option<usize>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Scrape the OpenAI blog listing page
    Openai,
    /// Read the OpenAI RSS feeds only
    OpenaiRss,
    /// Scrape the Google AI blog, falling back to its feeds
    Google,
    /// Run OpenAI and Google AI in sequence into one report
    Unified,
    /// Run every competitor listed in a config file
    Competitors {
        /// Competitors config, JSON or YAML
        #[arg(short, long, default_value = "config.json")]
        config: String,
    },
}

impl Cli {
    /// Posts per source for the selected command.
    pub fn effective_limit(&self) -> usize {
        match (self.limit, &self.command) {
            (Some(limit), _) => limit,
            (None, Command::Unified) => 5,
            (None, _) => 10,
        }
    }
}
