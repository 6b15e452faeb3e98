//! Markdown report rendering.
//!
//! Three layouts exist:
//!
//! - [`source_report`]: the numbered post list for one source
//! - [`unified_report`]: a summary table plus one section per source
//! - [`competitor_digest`]: a short daily digest, top five titles per competitor
//!
//! Rendering is pure; [`write_report`] puts the text on disk.

use super::naming::NamingStrategy;
use crate::models::{Post, SourceReport};
use chrono::{DateTime, Local, SecondsFormat};
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, instrument};

/// Titles listed per competitor in the daily digest.
const DIGEST_TOP_N: usize = 5;

fn generated_line(generated: &DateTime<Local>) -> String {
    format!("**Generated:** {}\n\n", generated.format("%Y-%m-%d %H:%M:%S"))
}

fn post_entry(index: usize, post: &Post, with_source: bool) -> String {
    let mut entry = format!(
        "{}. **{}**\n   - URL: {}\n   - Scraped: {}\n",
        index,
        post.title,
        post.url,
        post.scraped_at.to_rfc3339_opts(SecondsFormat::Secs, false)
    );
    if with_source && let Some(source) = &post.source {
        entry.push_str(&format!("   - Source: {}\n", source));
    }
    entry.push('\n');
    entry
}

/// Report for a single source run.
pub fn source_report(
    title: &str,
    note: Option<&str>,
    posts: &[Post],
    generated: &DateTime<Local>,
) -> String {
    let mut md = format!("# {}\n\n", title);
    md.push_str(&generated_line(generated));
    md.push_str(&format!("**Total Posts Found:** {}\n\n", posts.len()));

    if let Some(source) = posts.first().and_then(|p| p.source.as_deref()) {
        md.push_str(&format!("**Source:** {}\n\n", source));
    }
    if let Some(note) = note {
        md.push_str(note);
        md.push_str("\n\n");
    }

    if posts.is_empty() {
        md.push_str("No blog posts found.\n\n");
        return md;
    }

    md.push_str("## Latest Blog Posts\n\n");
    for (i, post) in posts.iter().enumerate() {
        md.push_str(&post_entry(i + 1, post, false));
    }
    md
}

/// Report covering every source of a unified run.
pub fn unified_report(reports: &[SourceReport], generated: &DateTime<Local>) -> String {
    let total: usize = reports.iter().map(|r| r.posts.len()).sum();

    let mut md = String::from("# AI Competitor Intelligence Report\n\n");
    md.push_str(&generated_line(generated));
    md.push_str(&format!("**Total Posts Found:** {}\n\n", total));

    md.push_str("## Summary by Competitor\n\n");
    for report in reports {
        let status = if report.succeeded() { "✅" } else { "❌" };
        md.push_str(&format!(
            "- **{}**: {} posts {}\n",
            report.name,
            report.posts.len(),
            status
        ));
    }
    md.push('\n');

    for report in reports {
        md.push_str(&format!("## {}\n\n", report.name));
        if report.posts.is_empty() {
            md.push_str("No posts found or scraping failed.\n\n");
            continue;
        }
        for (i, post) in report.posts.iter().enumerate() {
            md.push_str(&post_entry(i + 1, post, true));
        }
    }
    md
}

/// Daily digest for the config-driven competitors run.
pub fn competitor_digest(reports: &[SourceReport], generated: &DateTime<Local>) -> String {
    let mut md = format!(
        "# AI Competitor Intelligence Report - {}\n\n",
        generated.format("%Y-%m-%d")
    );
    for report in reports {
        md.push_str(&format!("## {}\n\n", report.name));
        if report.posts.is_empty() {
            md.push_str("No new articles found.\n");
        } else {
            for post in report.posts.iter().take(DIGEST_TOP_N) {
                md.push_str(&format!("- {}\n", post.title));
            }
        }
        md.push('\n');
    }
    md
}

/// Write rendered Markdown to `{dir}/{stem}_<name>.md`, creating `dir` if needed.
#[instrument(level = "info", skip_all, fields(%dir, %stem))]
pub async fn write_report(
    content: &str,
    dir: &str,
    stem: &str,
    naming: &dyn NamingStrategy,
) -> Result<PathBuf, Box<dyn Error>> {
    fs::create_dir_all(dir).await?;
    let path = Path::new(dir).join(naming.file_name(stem, "md"));
    fs::write(&path, content).await?;
    info!(path = %path.display(), "Report saved");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outputs::naming::FixedNaming;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2025, 5, 6, 14, 30, 0).unwrap()
    }

    fn post(title: &str, url: &str, source: Option<&str>) -> Post {
        Post {
            title: title.to_string(),
            url: url.to_string(),
            scraped_at: at(),
            source: source.map(str::to_string),
        }
    }

    #[test]
    fn test_source_report_layout() {
        let posts = vec![
            post("First headline", "https://ai.googleblog.com/1", Some("Google AI Blog")),
            post("Second headline", "https://ai.googleblog.com/2", Some("Google AI Blog")),
        ];
        let md = source_report("Google AI Blog Posts Report", None, &posts, &at());
        let scraped = at().to_rfc3339_opts(SecondsFormat::Secs, false);

        let expected = format!(
            "# Google AI Blog Posts Report\n\n\
             **Generated:** 2025-05-06 14:30:00\n\n\
             **Total Posts Found:** 2\n\n\
             **Source:** Google AI Blog\n\n\
             ## Latest Blog Posts\n\n\
             1. **First headline**\n   - URL: https://ai.googleblog.com/1\n   - Scraped: {scraped}\n\n\
             2. **Second headline**\n   - URL: https://ai.googleblog.com/2\n   - Scraped: {scraped}\n\n"
        );
        assert_eq!(md, expected);
    }

    #[test]
    fn test_source_report_note_and_empty() {
        let md = source_report("OpenAI Blog Posts Report (RSS)", Some("**Data Source:** Real RSS feed (no fake data)"), &[], &at());
        assert!(md.contains("**Total Posts Found:** 0\n\n"));
        assert!(md.contains("**Data Source:** Real RSS feed (no fake data)\n\n"));
        assert!(md.ends_with("No blog posts found.\n\n"));
    }

    #[test]
    fn test_unified_report_sections() {
        let reports = vec![
            SourceReport {
                name: "OpenAI".to_string(),
                posts: vec![post("A new model release", "https://openai.com/blog/x", None)],
            },
            SourceReport {
                name: "Google AI".to_string(),
                posts: vec![],
            },
        ];
        let md = unified_report(&reports, &at());

        assert!(md.starts_with("# AI Competitor Intelligence Report\n\n"));
        assert!(md.contains("**Total Posts Found:** 1\n\n"));
        assert!(md.contains("- **OpenAI**: 1 posts ✅\n"));
        assert!(md.contains("- **Google AI**: 0 posts ❌\n"));
        assert!(md.contains("## OpenAI\n\n1. **A new model release**\n"));
        assert!(md.contains("## Google AI\n\nNo posts found or scraping failed.\n\n"));
        assert!(!md.contains("   - Source:"));
    }

    #[test]
    fn test_unified_report_lists_source_label() {
        let reports = vec![SourceReport {
            name: "Google AI".to_string(),
            posts: vec![post("Feed post title", "https://x", Some("Google AI Blog RSS"))],
        }];
        let md = unified_report(&reports, &at());
        assert!(md.contains("   - Source: Google AI Blog RSS\n\n"));
    }

    #[test]
    fn test_competitor_digest_top_five() {
        let posts: Vec<Post> = (1..=7)
            .map(|i| post(&format!("Headline {i}"), "https://acme.test", None))
            .collect();
        let reports = vec![
            SourceReport {
                name: "Acme".to_string(),
                posts,
            },
            SourceReport {
                name: "Zeta".to_string(),
                posts: vec![],
            },
        ];
        let md = competitor_digest(&reports, &at());

        assert_eq!(
            md,
            "# AI Competitor Intelligence Report - 2025-05-06\n\n\
             ## Acme\n\n\
             - Headline 1\n- Headline 2\n- Headline 3\n- Headline 4\n- Headline 5\n\n\
             ## Zeta\n\n\
             No new articles found.\n\n"
        );
    }

    #[tokio::test]
    async fn test_write_report_creates_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("reports");
        let path = write_report("# Hi\n", dir.to_str().unwrap(), "report", &FixedNaming)
            .await
            .unwrap();
        assert_eq!(path, dir.join("report.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# Hi\n");
    }
}
