//! Summary statistics and report rendering for a parsed [`Table`].

use crate::config::{OutputFormat, ReportOptions};
use crate::error::Result;
use crate::models::{Metadata, Table};
use serde::{Deserialize, Deserializer, Serialize};
use std::io::Write;
use tracing::debug;

/// Min, max and mean of one column, or nothing when the column is empty
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ColumnStats {
    Values {
        #[serde(deserialize_with = "nullable_f64")]
        min: f64,
        #[serde(deserialize_with = "nullable_f64")]
        max: f64,
        #[serde(deserialize_with = "nullable_f64")]
        mean: f64,
        count: usize,
    },
    NoData,
}

impl ColumnStats {
    /// `(min, max, mean)` when there was data
    pub fn triple(&self) -> Option<(f64, f64, f64)> {
        match *self {
            ColumnStats::Values { min, max, mean, .. } => Some((min, max, mean)),
            ColumnStats::NoData => None,
        }
    }
}

/// serde_json writes non-finite floats as `null`; read those back as NaN
fn nullable_f64<'de, D>(deserializer: D) -> std::result::Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

/// Single pass over `values`; min and max start from the first value
pub fn compute_stats<I>(values: I) -> ColumnStats
where
    I: IntoIterator<Item = f64>,
{
    let mut values = values.into_iter();
    let Some(first) = values.next() else {
        return ColumnStats::NoData;
    };

    let (mut min, mut max, mut sum, mut count) = (first, first, first, 1usize);
    for value in values {
        if value < min {
            min = value;
        }
        if value > max {
            max = value;
        }
        sum += value;
        count += 1;
    }

    ColumnStats::Values {
        min,
        max,
        mean: sum / count as f64,
        count,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub title: String,
    pub stats: ColumnStats,
}

/// Shape, metadata and per-column statistics of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub columns: usize,
    pub rows: usize,
    pub metadata: Metadata,
    pub column_stats: Vec<ColumnSummary>,
}

impl Report {
    pub fn from_table(table: &Table) -> Self {
        let column_stats = table
            .titles()
            .iter()
            .enumerate()
            .map(|(index, title)| ColumnSummary {
                title: title.clone(),
                stats: if table.is_empty() {
                    ColumnStats::NoData
                } else {
                    compute_stats(table.column(index))
                },
            })
            .collect();

        debug!(
            "Computed statistics for {} columns over {} rows",
            table.column_count(),
            table.row_count()
        );

        Self {
            columns: table.column_count(),
            rows: table.row_count(),
            metadata: table.metadata().clone(),
            column_stats,
        }
    }

    pub fn stats_for(&self, title: &str) -> Option<&ColumnStats> {
        self.column_stats
            .iter()
            .find(|summary| summary.title == title)
            .map(|summary| &summary.stats)
    }

    pub fn write_text<W: Write>(&self, writer: &mut W, precision: usize) -> Result<()> {
        writeln!(writer, "Columns: {} Rows {}", self.columns, self.rows)?;
        for (name, value) in &self.metadata {
            writeln!(writer, "Parameter {} = {}", name, value)?;
        }
        for summary in &self.column_stats {
            match summary.stats {
                ColumnStats::Values { min, max, mean, .. } => writeln!(
                    writer,
                    "Column named {} : from {:.*} to {:.*} mean {:.*}",
                    summary.title, precision, min, precision, max, precision, mean
                )?,
                ColumnStats::NoData => writeln!(writer, "Column named {} : no data", summary.title)?,
            }
        }
        Ok(())
    }

    pub fn write_json<W: Write>(&self, writer: &mut W) -> Result<()> {
        serde_json::to_writer_pretty(&mut *writer, self).map_err(std::io::Error::from)?;
        writeln!(writer)?;
        Ok(())
    }

    pub fn render<W: Write>(&self, writer: &mut W, options: &ReportOptions) -> Result<()> {
        match options.format {
            OutputFormat::Text => self.write_text(writer, options.precision),
            OutputFormat::Json => self.write_json(writer),
        }
    }
}

/// Build the report for `table` and render it to `writer`
pub fn report<W: Write>(table: &Table, options: &ReportOptions, writer: &mut W) -> Result<Report> {
    let report = Report::from_table(table);
    report.render(writer, options)?;
    Ok(report)
}
