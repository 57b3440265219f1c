//! Command-line interface components.

use crate::config::{ColumnfileConfig, DEFAULT_PRECISION, OutputFormat, ShortRowPolicy};
use crate::parser::read_columnfile;
use crate::report::report;
use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use tracing::{debug, info};

/// Exit code for a bad invocation, including `--help`
pub const USAGE_EXIT_CODE: i32 = 2;

/// Exit code for a run that started but failed
pub const FAILURE_EXIT_CODE: i32 = 1;

#[derive(Parser, Debug, Clone)]
#[command(name = "columnfile-stats")]
#[command(about = "Print metadata and per-column min/max/mean for a columnfile")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Columnfile to summarise
    #[arg(value_name = "INPUTFILE")]
    pub input: PathBuf,

    /// Drop data rows with fewer fields than columns instead of zero-filling them
    #[arg(long)]
    pub reject_short_rows: bool,

    /// Report format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Decimals printed for min, max and mean
    #[arg(long, default_value_t = DEFAULT_PRECISION)]
    pub precision: usize,

    /// Exit with an error if any line was rejected
    #[arg(long)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn get_log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "warn"
        }
    }

    /// Map flags onto a validated configuration
    pub fn to_config(&self) -> crate::Result<ColumnfileConfig> {
        let mut config = ColumnfileConfig::default()
            .with_precision(self.precision)
            .with_format(self.format);
        if self.reject_short_rows {
            config = config.with_short_row_policy(ShortRowPolicy::Reject);
        }
        if self.strict {
            config = config.with_strict();
        }
        config.validate()?;
        Ok(config)
    }
}

/// Set up structured logging to stderr; `RUST_LOG` takes precedence
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("columnfile_stats={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_writer(std::io::stderr)
                .compact(),
        )
        .try_init()
        .context("Failed to initialise logging")?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Read the input file and write its report to `out`
pub fn run<W: Write>(args: &Args, out: &mut W) -> Result<()> {
    let config = args.to_config()?;

    let outcome = read_columnfile(&args.input, &config.parse)?;

    report(&outcome.table, &config.report, out).context("Failed to write report")?;

    info!(
        "Accepted {} of {} data lines ({:.1}%)",
        outcome.stats.rows_accepted,
        outcome.stats.data_lines,
        outcome.stats.success_rate()
    );

    if config.strict && outcome.has_issues() {
        anyhow::bail!(
            "{} line(s) rejected in {}",
            outcome.issues.len(),
            args.input.display()
        );
    }

    Ok(())
}
