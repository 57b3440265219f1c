//! Columnfile parsing.
//!
//! Walks the input line by line, classifying each line as blank, metadata
//! (`# name = value`), column titles (`# a b c`) or a whitespace-separated
//! data row. Malformed lines are logged, recorded and skipped; only I/O
//! failures abort the parse.

use crate::config::{ParseOptions, ShortRowPolicy};
use crate::error::{ColumnfileError, Result};
use crate::models::{IssueKind, LineIssue, Table, TableBuilder};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, error, info, warn};

const COMMENT_MARKER: char = '#';
const ASSIGNMENT: char = '=';

/// Result of parsing one columnfile
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub table: Table,
    pub stats: ParseStats,
    /// Every skipped line, in file order
    pub issues: Vec<LineIssue>,
}

impl ParseOutcome {
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Line counters gathered during a parse
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub total_lines: usize,
    pub blank_lines: usize,
    pub metadata_lines: usize,
    pub title_lines: usize,
    pub data_lines: usize,
    pub rows_accepted: usize,
    pub rows_rejected: usize,
    pub malformed_metadata: usize,
}

impl ParseStats {
    /// Accepted data rows as a percentage of data lines
    pub fn success_rate(&self) -> f64 {
        if self.data_lines == 0 {
            0.0
        } else {
            (self.rows_accepted as f64 / self.data_lines as f64) * 100.0
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LineKind {
    Blank,
    Metadata,
    Title,
    Data,
}

fn classify(line: &str) -> LineKind {
    if line.is_empty() {
        LineKind::Blank
    } else if line.starts_with(COMMENT_MARKER) {
        if line.contains(ASSIGNMENT) {
            LineKind::Metadata
        } else {
            LineKind::Title
        }
    } else {
        LineKind::Data
    }
}

/// Extract `(name, value)` from `# name = value`
fn parse_metadata(line: &str) -> Option<(&str, &str)> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    let name = *fields.get(1)?;
    let value = *fields.get(3)?;
    Some((name, value))
}

/// Column titles from `# a b c`; the leading marker field is dropped
fn parse_titles(line: &str) -> Vec<String> {
    line.split_whitespace().skip(1).map(str::to_string).collect()
}

/// Parse one data row against the current column count
fn parse_row(
    line: &str,
    column_count: usize,
    policy: ShortRowPolicy,
) -> std::result::Result<Vec<f64>, IssueKind> {
    let mut row = Vec::with_capacity(column_count);
    let mut unparsable = Vec::new();

    for (i, field) in line.split_whitespace().enumerate() {
        if i >= column_count {
            return Err(IssueKind::TooManyFields {
                expected: column_count,
            });
        }
        match field.parse::<f64>() {
            Ok(value) => row.push(value),
            Err(_) => {
                unparsable.push(field.to_string());
                row.push(0.0);
            }
        }
    }

    if !unparsable.is_empty() {
        return Err(IssueKind::UnparsableFields { fields: unparsable });
    }

    if row.len() < column_count {
        match policy {
            ShortRowPolicy::ZeroFill => row.resize(column_count, 0.0),
            ShortRowPolicy::Reject => {
                return Err(IssueKind::TooFewFields {
                    expected: column_count,
                    found: row.len(),
                });
            }
        }
    }

    Ok(row)
}

/// Line-at-a-time state machine building a [`Table`]
struct ColumnfileParser<'a> {
    options: &'a ParseOptions,
    builder: TableBuilder,
    stats: ParseStats,
    issues: Vec<LineIssue>,
}

impl<'a> ColumnfileParser<'a> {
    fn new(options: &'a ParseOptions) -> Self {
        Self {
            options,
            builder: TableBuilder::new(),
            stats: ParseStats::default(),
            issues: Vec::new(),
        }
    }

    fn feed(&mut self, line_number: usize, line: &str) {
        self.stats.total_lines += 1;

        match classify(line) {
            LineKind::Blank => self.stats.blank_lines += 1,
            LineKind::Metadata => match parse_metadata(line) {
                Some((name, value)) => {
                    self.stats.metadata_lines += 1;
                    self.builder.set_parameter(name, value);
                }
                None => {
                    self.stats.malformed_metadata += 1;
                    self.record(line_number, line, IssueKind::MalformedMetadata);
                }
            },
            LineKind::Title => {
                self.stats.title_lines += 1;
                let titles = parse_titles(line);
                if self.builder.column_count() > 0 {
                    debug!(
                        "Line {}: column titles redefined ({} -> {} columns)",
                        line_number,
                        self.builder.column_count(),
                        titles.len()
                    );
                }
                self.builder.set_titles(titles);
            }
            LineKind::Data => {
                self.stats.data_lines += 1;
                match parse_row(line, self.builder.column_count(), self.options.short_rows) {
                    Ok(row) => {
                        self.stats.rows_accepted += 1;
                        self.builder.push_row(row);
                    }
                    Err(kind) => {
                        self.stats.rows_rejected += 1;
                        self.record(line_number, line, kind);
                    }
                }
            }
        }
    }

    fn record(&mut self, line_number: usize, line: &str, kind: IssueKind) {
        let issue = LineIssue {
            line_number,
            row_index: self.builder.row_count(),
            kind,
            line: line.to_string(),
        };
        warn!("{}", issue.to_error());
        self.issues.push(issue);
    }

    fn finish(self) -> ParseOutcome {
        let table = self.builder.build();
        info!(
            "Parsed {} columns, {} rows ({} rejected, {} parameters)",
            table.column_count(),
            table.row_count(),
            self.stats.rows_rejected,
            table.metadata().len()
        );
        ParseOutcome {
            table,
            stats: self.stats,
            issues: self.issues,
        }
    }
}

/// Parse columnfile text already held in memory
pub fn parse_str(contents: &str, options: &ParseOptions) -> ParseOutcome {
    let mut parser = ColumnfileParser::new(options);
    for (index, line) in contents.lines().enumerate() {
        parser.feed(index + 1, line);
    }
    parser.finish()
}

/// Parse columnfile text from any buffered reader
pub fn parse_reader<R: BufRead>(reader: R, options: &ParseOptions) -> Result<ParseOutcome> {
    parse_lines(reader, options, Path::new("<input>"))
}

fn parse_lines<R: BufRead>(reader: R, options: &ParseOptions, path: &Path) -> Result<ParseOutcome> {
    let mut parser = ColumnfileParser::new(options);
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|source| ColumnfileError::Read {
            path: path.to_path_buf(),
            line_number: index + 1,
            source,
        })?;
        parser.feed(index + 1, &line);
    }
    Ok(parser.finish())
}

/// Read and parse a columnfile from disk.
///
/// The file handle is dropped on every return path, including read errors.
pub fn read_columnfile(path: &Path, options: &ParseOptions) -> Result<ParseOutcome> {
    let file = File::open(path).map_err(|source| ColumnfileError::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("Reading columnfile {}", path.display());
    parse_lines(BufReader::new(file), options, path)
}

/// Like [`read_columnfile`], but logs any failure and yields an empty table
pub fn read_columnfile_or_empty(path: &Path, options: &ParseOptions) -> ParseOutcome {
    read_columnfile(path, options).unwrap_or_else(|e| {
        match std::error::Error::source(&e) {
            Some(source) => error!("{}: {}", e, source),
            None => error!("{}", e),
        }
        ParseOutcome::default()
    })
}
