//! Core data structures for columnfile processing.
//!
//! Defines the parsed [`Table`], the builder the parser drives while it walks
//! the file, and the per-line issue records collected along the way.

use crate::error::ColumnfileError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Parameter name to parameter value, sorted by name
pub type Metadata = BTreeMap<String, String>;

/// A parsed columnfile: metadata, column titles and a row-major numeric matrix
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    metadata: Metadata,
    titles: Vec<String>,
    column_count: usize,
    rows: Vec<Vec<f64>>,
}

impl Table {
    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    /// Look up a single metadata parameter
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.metadata.get(name).map(String::as_str)
    }

    pub fn titles(&self) -> &[String] {
        &self.titles
    }

    pub fn column_count(&self) -> usize {
        self.column_count
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Values at one column index, in row order.
    ///
    /// Rows accepted under an earlier, narrower title line may not reach
    /// `index`; those rows are skipped.
    pub fn column(&self, index: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index).copied())
    }

    /// Values for the column with the given title, if present
    pub fn column_by_title(&self, title: &str) -> Option<Vec<f64>> {
        let index = self.titles.iter().position(|t| t == title)?;
        Some(self.column(index).collect())
    }
}

/// Incremental builder used while parsing; consumed into an immutable [`Table`]
#[derive(Debug, Default)]
pub struct TableBuilder {
    metadata: Metadata,
    titles: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl TableBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a parameter, replacing any earlier value for the same name
    pub fn set_parameter(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.metadata.insert(name.into(), value.into());
    }

    /// Replace the column titles (and therefore the expected column count)
    pub fn set_titles(&mut self, titles: Vec<String>) {
        self.titles = titles;
    }

    pub fn column_count(&self) -> usize {
        self.titles.len()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, row: Vec<f64>) {
        debug_assert_eq!(row.len(), self.titles.len());
        self.rows.push(row);
    }

    pub fn build(self) -> Table {
        Table {
            column_count: self.titles.len(),
            metadata: self.metadata,
            titles: self.titles,
            rows: self.rows,
        }
    }
}

/// Why a line was skipped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IssueKind {
    /// `#` line containing `=` but fewer than four fields
    MalformedMetadata,
    /// More fields than declared columns
    TooManyFields { expected: usize },
    /// Fewer fields than declared columns, under the reject policy
    TooFewFields { expected: usize, found: usize },
    /// One or more fields failed to parse as a float
    UnparsableFields { fields: Vec<String> },
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueKind::MalformedMetadata => write!(f, "expected '# name = value'"),
            IssueKind::TooManyFields { expected } => {
                write!(f, "line too long, expected {} fields", expected)
            }
            IssueKind::TooFewFields { expected, found } => {
                write!(f, "line too short, expected {} fields, found {}", expected, found)
            }
            IssueKind::UnparsableFields { fields } => {
                write!(f, "could not parse {} as numbers", fields.join(", "))
            }
        }
    }
}

/// A single skipped line, kept for callers that want more than the log output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineIssue {
    /// 1-based line number in the file
    pub line_number: usize,
    /// Rows accepted before this line
    pub row_index: usize,
    pub kind: IssueKind,
    pub line: String,
}

impl LineIssue {
    pub fn is_row_rejection(&self) -> bool {
        !matches!(self.kind, IssueKind::MalformedMetadata)
    }

    /// Convert into the matching recoverable error, for logging or escalation
    pub fn to_error(&self) -> ColumnfileError {
        match &self.kind {
            IssueKind::MalformedMetadata => ColumnfileError::MalformedMetadata {
                line_number: self.line_number,
                line: self.line.clone(),
            },
            kind => ColumnfileError::MalformedRow {
                line_number: self.line_number,
                row_index: self.row_index,
                reason: kind.to_string(),
                line: self.line.clone(),
            },
        }
    }
}
