//! Failure report for aborted crawls
//!
//! A caught crawl failure is reported as exactly two newline-terminated
//! lines: the error class name, then the podcast title.

use crate::CrawlError;
use std::io::{self, Write};

/// Writes the two-line failure report to `out`
pub fn write_failure_report<W: Write + ?Sized>(
    out: &mut W,
    error: &CrawlError,
    podcast_title: &str,
) -> io::Result<()> {
    writeln!(out, "{}", error.kind())?;
    writeln!(out, "{}", podcast_title)?;
    out.flush()
}
