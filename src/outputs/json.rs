//! JSON output files.
//!
//! Single-source runs write a pretty-printed array of posts; unified runs
//! write one object holding every source's posts. Target directories are
//! created on demand.

use super::naming::NamingStrategy;
use crate::models::{Post, UnifiedReport};
use serde::Serialize;
use std::error::Error;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{error, info, instrument};

/// Write `posts` as `{dir}/{stem}_<name>.json` and return the path.
#[instrument(level = "info", skip_all, fields(%dir, %stem, count = posts.len()))]
pub async fn write_posts(
    posts: &[Post],
    dir: &str,
    stem: &str,
    naming: &dyn NamingStrategy,
) -> Result<PathBuf, Box<dyn Error>> {
    write_json(posts, dir, &naming.file_name(stem, "json")).await
}

/// Write the unified report as `{dir}/unified_competitor_data_<name>.json`.
#[instrument(level = "info", skip_all, fields(%dir, total_posts = report.total_posts))]
pub async fn write_unified(
    report: &UnifiedReport,
    dir: &str,
    naming: &dyn NamingStrategy,
) -> Result<PathBuf, Box<dyn Error>> {
    write_json(
        report,
        dir,
        &naming.file_name("unified_competitor_data", "json"),
    )
    .await
}

async fn write_json<T: Serialize + ?Sized>(
    value: &T,
    dir: &str,
    file_name: &str,
) -> Result<PathBuf, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(value)?;

    if let Err(e) = fs::create_dir_all(dir).await {
        error!(%dir, error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = Path::new(dir).join(file_name);
    fs::write(&path, json).await?;
    info!(path = %path.display(), "Wrote JSON file");
    Ok(path)
}
