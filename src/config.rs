//! Configuration for parsing and reporting.
//!
//! Defaults reproduce the behaviour of the classic columnfile reader; every
//! stricter mode is opt-in.

use crate::error::{ColumnfileError, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Largest precision that still changes the printed value of an `f64`
pub const MAX_PRECISION: usize = 17;

/// Default number of decimals, matching C-style `%f`
pub const DEFAULT_PRECISION: usize = 6;

/// What to do with data rows that have fewer fields than declared columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShortRowPolicy {
    /// Pad the missing trailing values with 0.0 and accept the row
    #[default]
    ZeroFill,
    /// Treat the row as malformed and drop it
    Reject,
}

/// Report rendering format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text
    #[default]
    Text,
    /// JSON for scripting
    Json,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseOptions {
    pub short_rows: ShortRowPolicy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportOptions {
    /// Decimals printed for min, max and mean in text output
    pub precision: usize,
    pub format: OutputFormat,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            format: OutputFormat::Text,
        }
    }
}

/// Complete run configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnfileConfig {
    pub parse: ParseOptions,
    pub report: ReportOptions,
    /// Fail the run when any line was rejected
    pub strict: bool,
}

impl ColumnfileConfig {
    pub fn with_short_row_policy(mut self, policy: ShortRowPolicy) -> Self {
        self.parse.short_rows = policy;
        self
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.report.precision = precision;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.report.format = format;
        self
    }

    pub fn with_strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// Check option values are within range
    pub fn validate(&self) -> Result<()> {
        if self.report.precision > MAX_PRECISION {
            return Err(ColumnfileError::configuration(format!(
                "Precision {} exceeds maximum of {}",
                self.report.precision, MAX_PRECISION
            )));
        }

        debug!("Configuration validated: {:?}", self);
        Ok(())
    }
}
