//! File naming for report outputs.
//!
//! Every run writes new files rather than overwriting old ones; the name
//! embeds when the run happened. Callers pick the strategy, which keeps
//! the writers free of clock access and lets tests use fixed names.

use chrono::{DateTime, Local};

pub trait NamingStrategy {
    /// File name (no directory) for `stem` with `extension`.
    fn file_name(&self, stem: &str, extension: &str) -> String;
}

/// Appends a timestamp to the stem: `openai_posts_20250506_143000.json`.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampNaming {
    stamp: String,
}

impl TimestampNaming {
    /// Second resolution, `%Y%m%d_%H%M%S`.
    pub fn seconds(at: DateTime<Local>) -> Self {
        Self {
            stamp: at.format("%Y%m%d_%H%M%S").to_string(),
        }
    }

    /// Day resolution, `%Y-%m-%d`. Later runs on the same day overwrite.
    pub fn daily(at: DateTime<Local>) -> Self {
        Self {
            stamp: at.format("%Y-%m-%d").to_string(),
        }
    }

    pub fn now() -> Self {
        Self::seconds(Local::now())
    }
}

impl NamingStrategy for TimestampNaming {
    fn file_name(&self, stem: &str, extension: &str) -> String {
        format!("{}_{}.{}", stem, self.stamp, extension)
    }
}

/// Uses the stem as-is: `openai_posts.json`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedNaming;

impl NamingStrategy for FixedNaming {
    fn file_name(&self, stem: &str, extension: &str) -> String {
        format!("{}.{}", stem, extension)
    }
}
