//! Output module for crawl reporting
//!
//! This module handles:
//! - The two-line diagnostic written when a crawl operation is aborted
//! - Podcast and episode statistics for the command-line driver

pub mod diagnostic;
pub mod stats;

pub use diagnostic::write_failure_report;
pub use stats::{load_statistics, print_statistics, CrawlStatistics};
