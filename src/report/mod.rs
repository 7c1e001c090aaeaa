//! Reporting: terminal output and the Markdown report document.

pub mod format;
pub mod markdown;

pub use format::{format_summary, format_table};
pub use markdown::{REPORT_FILE, write_report_markdown};
