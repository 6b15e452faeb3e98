//! Output generation: JSON data files and Markdown reports.
//!
//! # Submodules
//!
//! - [`json`]: posts and unified results as JSON
//! - [`markdown`]: human-readable reports
//! - [`naming`]: how output files are named
//!
//! # Output Structure
//!
//! ```text
//! json_dir/
//! ├── openai_posts_20250506_143000.json
//! ├── google_ai_posts_20250506_143000.json
//! └── unified_competitor_data_20250506_143000.json
//!
//! reports_dir/
//! ├── openai_report_20250506_143000.md
//! ├── unified_competitor_report_20250506_143000.md
//! └── report_2025-05-06.md            # competitors digest
//! ```

pub mod json;
pub mod markdown;
pub mod naming;
