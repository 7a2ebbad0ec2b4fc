use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dumpguard_core::{DumpValidator, EtlMode, RunSummary};
use dumpguard_reports::{JsonFormatter, Reporter, StdOutFormatter};
use tracing::{info, warn};

use crate::{parser::parse_config, Args, OutputFormat};

pub fn run(args: &Args) -> Result<bool> {
    let config = parse_config(args.config.as_deref())
        .with_context(|| "Failed to load configuration")?;
    let base_path = args
        .base_path
        .clone()
        .unwrap_or_else(|| PathBuf::from(".").join(config.date_tag()));
    if !base_path.is_dir() {
        warn!(path = %base_path.display(), "base path is not a directory");
    }
    info!(
        base = %base_path.display(),
        window_start = %config.window().start(),
        window_end = %config.window().end(),
        "starting dump validation"
    );

    let validator = DumpValidator::new(config);
    let modes = args.mode.modes();
    let version = env!("CARGO_PKG_VERSION").to_string();

    let summary = match args.output {
        OutputFormat::Stdout => {
            let mut formatter = StdOutFormatter::new(version);
            sweep(&validator, &base_path, modes, &mut formatter)
        }
        OutputFormat::Json => {
            let mut formatter = JsonFormatter::new(version);
            let summary = sweep(&validator, &base_path, modes, &mut formatter);
            let json = formatter
                .to_json()
                .context("Failed to serialise JSON report")?;
            println!("{}", json);
            summary
        }
    };

    info!(
        passed = summary.passed,
        failed = summary.failed,
        skipped = summary.skipped,
        errors = summary.faulted,
        "dump validation finished"
    );
    Ok(summary.is_clean())
}

/// Validate each mode's databases in order, reporting each database as soon
/// as it completes.
fn sweep<R: Reporter>(
    validator: &DumpValidator,
    base_path: &Path,
    modes: &[EtlMode],
    reporter: &mut R,
) -> RunSummary {
    reporter.on_start();
    let mut summary = RunSummary::default();
    for &mode in modes {
        reporter.on_mode_start(mode);
        for database in validator.config().databases() {
            let report = validator.process_database(base_path, mode, database);
            summary.record_database(&report);
            reporter.on_database_result(mode, &report);
        }
    }
    reporter.on_summary(&summary);
    summary
}
