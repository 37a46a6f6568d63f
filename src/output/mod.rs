//! Output module for audit reports
//!
//! This module handles:
//! - Rendering the audit report as a markdown file
//! - Printing bucket statistics to the terminal

mod markdown;
pub mod stats;

pub use markdown::{format_markdown_report, report_file_name, write_markdown_report};
pub use stats::{collect_statistics, print_statistics, LinkStatistics};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to format output: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
