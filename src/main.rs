use clap::Parser;
use clap::error::ErrorKind;
use colored::Colorize;
use columnfile_stats::cli::{self, Args, FAILURE_EXIT_CODE, USAGE_EXIT_CODE};
use std::io;
use std::process;

fn main() {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) if err.kind() == ErrorKind::DisplayVersion => err.exit(),
        Err(err) => {
            // Help and usage errors both go to stderr with the usage exit code
            eprint!("{}", err.render());
            process::exit(USAGE_EXIT_CODE);
        }
    };

    if let Err(e) = cli::setup_logging(&args) {
        eprintln!("Warning: {:#}", e);
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if let Err(error) = cli::run(&args, &mut out) {
        eprintln!("{} {:#}", "Error:".red().bold(), error);
        process::exit(FAILURE_EXIT_CODE);
    }
}
