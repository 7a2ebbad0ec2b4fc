mod errors;
mod logging;
mod parser;
mod runner;

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use dumpguard_core::EtlMode;
use logging::{init_logging, LogConfig, LogFormat};

/// Output format for validation results
#[derive(Debug, Clone, ValueEnum)]
enum OutputFormat {
    /// Print results to standard output (human-readable)
    Stdout,
    /// Output results in JSON format
    Json,
}

/// Which dump folders to validate
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ModeArg {
    /// Daily delta dumps only
    Delta,
    /// Full snapshot dumps only
    Full,
    /// Delta first, then full
    All,
}

impl ModeArg {
    fn modes(self) -> &'static [EtlMode] {
        match self {
            ModeArg::Delta => &[EtlMode::Delta],
            ModeArg::Full => &[EtlMode::Full],
            ModeArg::All => &EtlMode::ALL,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dumpguard",
    version,
    about = "DumpGuard - validate ETL export dumps against their manifests",
    long_about = "DumpGuard checks daily-delta and full-snapshot CSV dumps against their \
                  manifest (row counts, identifier column, created/modified flags, time \
                  window) and against the boundary rows sampled in each validation file.\n\n\
                  Example usage:\n  \
                  dumpguard ./20241204 --mode delta --output json"
)]
struct Args {
    /// Directory holding the `daily/` and `full/` dump folders [default: ./<date_tag>]
    #[arg(value_name = "BASE_PATH")]
    base_path: Option<PathBuf>,

    /// Which ETL mode to validate
    #[arg(short, long, value_enum, default_value = "all")]
    mode: ModeArg,

    /// Optional TOML file overriding the window, tags and database names
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Output format for validation results
    #[arg(short, long, value_enum, default_value = "stdout")]
    output: OutputFormat,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log output format, written to stderr
    #[arg(long, value_enum, default_value = "pretty")]
    log_format: LogFormat,
}

fn main() {
    let args = Args::parse();

    if let Err(err) = init_logging(&LogConfig::from_verbosity(args.verbose, args.log_format)) {
        eprintln!("Error: {}", err);
        std::process::exit(2);
    }

    match runner::run(&args) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("Error: {:#}", err);
            std::process::exit(2);
        }
    }
}
