use std::path::Path;

use rayon::prelude::*;
use tracing::{debug, info, info_span, warn};

use crate::{
    boundary::compare,
    config::{EtlMode, ValidatorConfig},
    dataset::Dataset,
    manifest::{read_manifest, ManifestEntry, ManifestRow},
    paths::DumpPaths,
    results::{
        BoundaryCheck, DatabaseOutcome, DatabaseReport, ModeReport, ResourceFault, TableOutcome,
        TableReport,
    },
    rules::evaluate,
};

/// DumpValidator - sweeps every database and table of a dump directory.
///
/// Missing or unreadable files never stop the sweep: each table ends up with
/// its own outcome and the next table is processed regardless.
pub struct DumpValidator {
    config: ValidatorConfig,
}

impl DumpValidator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn paths(&self, base_path: &Path, mode: EtlMode) -> DumpPaths {
        DumpPaths::new(base_path, mode, &self.config)
    }

    /// Validate every configured database for one mode, in configuration order.
    pub fn process_mode(&self, base_path: &Path, mode: EtlMode) -> ModeReport {
        let databases = self
            .config
            .databases()
            .iter()
            .map(|db| self.process_database(base_path, mode, db))
            .collect();
        ModeReport { mode, databases }
    }

    pub fn process_database(&self, base_path: &Path, mode: EtlMode, database: &str) -> DatabaseReport {
        let span = info_span!("database", %mode, database);
        let _enter = span.enter();
        let paths = self.paths(base_path, mode);
        let manifest_path = paths.manifest(database);

        let outcome = if !manifest_path.exists() {
            warn!(path = %manifest_path.display(), "manifest file not found");
            DatabaseOutcome::ManifestMissing
        } else {
            match read_manifest(&manifest_path) {
                Ok(entries) => {
                    info!(tables = entries.len(), "manifest loaded");
                    // collect() keeps manifest order
                    let tables = entries
                        .par_iter()
                        .map(|entry| {
                            span.in_scope(|| self.process_table(&paths, mode, database, entry))
                        })
                        .collect();
                    DatabaseOutcome::Tables(tables)
                }
                Err(e) => {
                    warn!(path = %manifest_path.display(), error = %e, "invalid manifest");
                    DatabaseOutcome::Fault(ResourceFault::new(&manifest_path, &e))
                }
            }
        };

        DatabaseReport {
            database: database.to_string(),
            manifest_path,
            outcome,
        }
    }

    pub fn process_table(
        &self,
        paths: &DumpPaths,
        mode: EtlMode,
        database: &str,
        entry: &ManifestEntry,
    ) -> TableReport {
        let _span = info_span!("table", %mode, database, table = %entry.table_name).entered();
        let outcome = match &entry.row {
            Ok(row) => self.check_table(paths, mode, database, row),
            Err(e) => {
                warn!(error = %e, "manifest row rejected");
                TableOutcome::Fault(ResourceFault::new(&paths.manifest(database), e))
            }
        };
        TableReport {
            table_name: entry.table_name.clone(),
            outcome,
        }
    }

    fn check_table(
        &self,
        paths: &DumpPaths,
        mode: EtlMode,
        database: &str,
        row: &ManifestRow,
    ) -> TableOutcome {
        let window = self.config.window();
        if row.time_start != window.start() || row.time_end != window.end() {
            debug!(
                manifest_start = %row.time_start,
                manifest_end = %row.time_end,
                "manifest window differs from configured window"
            );
        }

        let raw_path = paths.raw(database, &row.table_name);
        if !raw_path.exists() {
            warn!(path = %raw_path.display(), "raw file not found");
            return TableOutcome::RawMissing(raw_path);
        }

        let raw = match Dataset::load(&raw_path) {
            Ok(raw) => raw,
            Err(e) => {
                warn!(path = %raw_path.display(), error = %e, "failed to load raw file");
                return TableOutcome::Fault(ResourceFault::new(&raw_path, &e));
            }
        };

        let outcome = evaluate(&raw, row, mode, window);
        info!(rows = raw.num_rows(), defects = outcome.messages().len(), "raw file checked");

        let validation_path = paths.validation(database, &row.table_name);
        let boundary = if !validation_path.exists() {
            debug!(path = %validation_path.display(), "validation file not found");
            BoundaryCheck::NotFound(validation_path)
        } else {
            match Dataset::load(&validation_path) {
                Ok(validation) => BoundaryCheck::Compared(compare(&raw, &validation)),
                Err(e) => {
                    warn!(path = %validation_path.display(), error = %e, "failed to load validation file");
                    BoundaryCheck::Fault(ResourceFault::new(&validation_path, &e))
                }
            }
        };

        TableOutcome::Checked {
            rows: raw.num_rows(),
            raw: outcome,
            boundary,
        }
    }
}
