//! Columnfile reader and summariser.
//!
//! A columnfile is a whitespace-delimited numeric table whose comment lines
//! carry `# name = value` metadata and `# title1 title2 ...` column names.
//! This library provides tools for:
//! - Parsing a columnfile into an immutable [`Table`], skipping malformed lines
//! - Computing per-column min, max and mean with an explicit no-data result
//! - Rendering the shape, metadata and statistics as text or JSON

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod parser;
pub mod report;

pub use config::{ColumnfileConfig, OutputFormat, ParseOptions, ReportOptions, ShortRowPolicy};
pub use error::{ColumnfileError, Result};
pub use models::{IssueKind, LineIssue, Metadata, Table};
pub use parser::{ParseOutcome, ParseStats, parse_reader, parse_str, read_columnfile, read_columnfile_or_empty};
pub use report::{ColumnStats, ColumnSummary, Report, compute_stats, report};
