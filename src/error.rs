//! Error handling for columnfile reading and reporting.
//!
//! File-level failures propagate as `Err`; per-line problems are recoverable
//! and are usually collected as [`crate::models::LineIssue`] instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ColumnfileError {
    #[error("Cannot open columnfile {path}")]
    FileOpen {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Read error in {path} at line {line_number}")]
    Read {
        path: PathBuf,
        line_number: usize,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed metadata on line {line_number}: {line}")]
    MalformedMetadata { line_number: usize, line: String },

    #[error("Error on line {line_number} (row {row_index}): {reason}\nline: {line}")]
    MalformedRow {
        line_number: usize,
        row_index: usize,
        reason: String,
        line: String,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Failed to write report: {0}")]
    Output(#[from] std::io::Error),
}

impl ColumnfileError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ColumnfileError>;
